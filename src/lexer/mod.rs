//! Phase 1: Lexer — character-precise tokenization of BibTeX source bytes.
//!
//! A lexer with two pieces of state beyond position — brace depth and a
//! lexical context — that never fails on well-formed input and returns a
//! synthetic error token rather than panicking on malformed input.

mod token;

pub use token::{StringDelim, Token, TokenKind};

use std::sync::OnceLock;

use regex::Regex;

/// Lexical context driving how a bare identifier-shaped run of characters is
/// classified: a field name / entry type / key outside a value, or a macro
/// reference inside one. Set by the grammar as it descends into each
/// production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexContext {
    TopLevel,
    InEntry,
    InValue,
}

fn identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '+' | '-' | '.' | '/' | '\'')
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_:+\-./']*").unwrap())
}

pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    context: LexContext,
    brace_depth: i32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            context: LexContext::TopLevel,
            brace_depth: 0,
        }
    }

    pub fn set_context(&mut self, context: LexContext) {
        self.context = context;
    }

    pub fn context(&self) -> LexContext {
        self.context
    }

    pub fn brace_depth(&self) -> i32 {
        self.brace_depth
    }

    pub fn line(&self) -> usize {
        self.line
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn remaining_str(&self) -> &str {
        std::str::from_utf8(&self.input[self.pos..]).unwrap_or("")
    }

    /// Reads the next token. Never fails: unterminated strings and
    /// unbalanced braces surface as `TokenKind::Error` and the lexer
    /// advances past the offending construct.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let line = self.line;

        let Some(b) = self.peek() else {
            return Token::new(TokenKind::Eof, line);
        };

        match b {
            b'@' => {
                self.advance();
                Token::new(TokenKind::At, line)
            }
            b'#' => {
                self.advance();
                Token::new(TokenKind::ConcatOp, line)
            }
            b'=' => {
                self.advance();
                Token::new(TokenKind::Equals, line)
            }
            b',' => {
                self.advance();
                Token::new(TokenKind::Comma, line)
            }
            b'(' => {
                self.advance();
                Token::new(TokenKind::LParen, line)
            }
            b')' => {
                self.advance();
                Token::new(TokenKind::RParen, line)
            }
            b'{' if self.context == LexContext::InValue => self.read_braced_string(),
            b'"' if self.context == LexContext::InValue => self.read_quoted_string(),
            b'{' => {
                self.advance();
                Token::new(TokenKind::LBrace, line)
            }
            b'}' => {
                self.advance();
                Token::new(TokenKind::RBrace, line)
            }
            b'0'..=b'9' => self.read_number(),
            c if identifier_start(c as char) => self.read_identifier(),
            _ => {
                // Unknown character: consume it and report an error token so
                // the builder can start entry-level recovery.
                self.advance();
                Token::new(TokenKind::Error(format!("unexpected character '{}'", b as char)), line)
            }
        }
    }

    fn read_identifier(&mut self) -> Token {
        let line = self.line;
        let caught = identifier_regex()
            .find(self.remaining_str())
            .map(|m| m.as_str().to_string());
        let text = match caught {
            Some(t) => t,
            None => {
                // identifier_start already guaranteed a match; this arm is
                // unreachable in practice but keeps next_token total.
                let c = self.advance().unwrap() as char;
                return Token::new(TokenKind::Error(format!("bad identifier start '{c}'")), line);
            }
        };
        for _ in 0..text.len() {
            self.advance();
        }
        if self.context == LexContext::InValue {
            Token::new(TokenKind::MacroRef(text), line)
        } else {
            Token::new(TokenKind::Identifier(text), line)
        }
    }

    fn read_number(&mut self) -> Token {
        let line = self.line;
        let mut text = String::new();
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() {
                text.push(b as char);
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Number(text), line)
    }

    /// Reads a `{...}` balanced group as a single token. The opening brace
    /// is consumed here; depth starts at 1 for it and the routine stops
    /// when depth returns to 0, i.e. at the matching close brace.
    fn read_braced_string(&mut self) -> Token {
        let line = self.line;
        self.advance(); // consume opening '{'
        let mut depth = 1i32;
        self.brace_depth = depth;
        let mut text = String::new();
        loop {
            match self.peek() {
                None => {
                    self.brace_depth = 0;
                    return Token::new(
                        TokenKind::Error(format!("unterminated braced string starting line {line}")),
                        line,
                    );
                }
                Some(b'{') => {
                    depth += 1;
                    self.brace_depth = depth;
                    text.push('{');
                    self.advance();
                }
                Some(b'}') => {
                    depth -= 1;
                    self.brace_depth = depth;
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                    text.push('}');
                }
                Some(b) => {
                    text.push(b as char);
                    self.advance();
                }
            }
        }
        self.brace_depth = 0;
        Token::new(
            TokenKind::StringLiteral { text, delim: StringDelim::Brace },
            line,
        )
    }

    /// Reads a `"..."` string. A `"` at brace depth > 0 is literal;
    /// only a `"` at depth 0 terminates.
    fn read_quoted_string(&mut self) -> Token {
        let line = self.line;
        self.advance(); // consume opening '"'
        let mut depth = 0i32;
        self.brace_depth = depth;
        let mut text = String::new();
        loop {
            match self.peek() {
                None => {
                    self.brace_depth = 0;
                    return Token::new(
                        TokenKind::Error(format!("unterminated quoted string starting line {line}")),
                        line,
                    );
                }
                Some(b'"') if depth == 0 => {
                    self.advance();
                    break;
                }
                Some(b'{') => {
                    depth += 1;
                    self.brace_depth = depth;
                    text.push('{');
                    self.advance();
                }
                Some(b'}') => {
                    if depth > 0 {
                        depth -= 1;
                        self.brace_depth = depth;
                    }
                    text.push('}');
                    self.advance();
                }
                Some(b) => {
                    text.push(b as char);
                    self.advance();
                }
            }
        }
        self.brace_depth = 0;
        Token::new(
            TokenKind::StringLiteral { text, delim: StringDelim::Quote },
            line,
        )
    }

    /// Peeks one byte ahead without consuming — used by the builder to
    /// decide between `{` and `(` entry-body delimiters.
    pub fn peek_byte(&self) -> Option<u8> {
        self.peek_at(0)
    }
}
