//! Phase 2: Grammar / AST Builder — recursive-descent, one-token lookahead.
//!
//! ```text
//! file       := entry*
//! entry      := '@' ident body
//! body       := ( '{' | '(' )  entry-contents  ( '}' | ')' )
//! entry-contents :=
//!       comment-body           if entry-type = comment
//!     | value                  if entry-type = preamble
//!     | field (',' field)* [','] if macro-def
//!     | key ',' field (',' field)* [','] otherwise
//! field      := ident '=' value
//! value      := simple-value ( '#' simple-value )*
//! simple-value := quoted-string | braced-string | number | macro-ref
//! key        := ident-or-number-or-braced
//! ```
//!
//! On a missing delimiter the builder performs entry-level recovery: it
//! discards tokens until the next `@` at brace-depth 0 and emits a warning
//! including the saved line number.

use crate::ast::{Entry, EntryMetatype, Field, SimpleValue, Value};
use crate::diagnostics::{Severity, Warning, WarningSink};
use crate::lexer::{Lexer, LexContext, StringDelim, Token, TokenKind};

/// Internal signal that the current entry could not be completed and
/// recovery must run. Never surfaces outside this module.
#[derive(Debug)]
struct Recover {
    line: usize,
    message: String,
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Option<Token>,
    filename: String,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a [u8], filename: impl Into<String>) -> Self {
        Self { lexer: Lexer::new(input), lookahead: None, filename: filename.into() }
    }

    fn peek(&mut self, context: LexContext) -> &Token {
        self.lexer.set_context(context);
        if self.lookahead.is_none() {
            self.lookahead = Some(self.lexer.next_token());
        }
        self.lookahead.as_ref().unwrap()
    }

    fn bump(&mut self, context: LexContext) -> Token {
        self.lexer.set_context(context);
        match self.lookahead.take() {
            Some(tok) => tok,
            None => self.lexer.next_token(),
        }
    }

    /// Parses every entry in the input, applying `options` to regular
    /// entries' field values and installing macro definitions into `table`
    /// as they are encountered.
    pub fn parse_all(
        &mut self,
        options: crate::postprocess::ParseOptions,
        table: &mut crate::macros::MacroTable,
        sink: &mut dyn WarningSink,
    ) -> Vec<Entry> {
        let mut entries = Vec::new();
        loop {
            if matches!(self.peek(LexContext::TopLevel).kind, TokenKind::Eof) {
                break;
            }
            match self.parse_one_entry(sink) {
                Ok(Some(mut entry)) => {
                    match entry.metatype {
                        EntryMetatype::MacroDef => {
                            crate::macros::install_macro_def(table, &entry, &self.filename, sink);
                        }
                        EntryMetatype::Regular => {
                            for field in &mut entry.fields {
                                field.value = crate::postprocess::post_process_value(
                                    &field.value,
                                    options,
                                    table,
                                    &self.filename,
                                    0,
                                    sink,
                                );
                            }
                        }
                        EntryMetatype::Comment | EntryMetatype::Preamble => {}
                    }
                    entries.push(entry);
                }
                Ok(None) => {}
                Err(Recover { line, message }) => {
                    sink.report(Warning {
                        severity: Severity::SyntaxError,
                        filename: self.filename.clone(),
                        line,
                        message,
                    });
                    self.recover();
                }
            }
        }
        entries
    }

    /// Parses a single `@...` entry. Returns `Ok(None)` for stray top-level
    /// garbage that isn't the start of an entry (skipped with a warning).
    fn parse_one_entry(&mut self, sink: &mut dyn WarningSink) -> Result<Option<Entry>, Recover> {
        let at = self.bump(LexContext::TopLevel);
        if !matches!(at.kind, TokenKind::At) {
            sink.report(Warning {
                severity: Severity::SyntaxError,
                filename: self.filename.clone(),
                line: at.line,
                message: "expected '@' at top level".into(),
            });
            return Ok(None);
        }

        let type_tok = self.bump(LexContext::TopLevel);
        let entry_type = match type_tok.kind {
            TokenKind::Identifier(s) => s,
            _ => {
                return Err(Recover {
                    line: type_tok.line,
                    message: "expected entry type identifier after '@'".into(),
                })
            }
        };
        let metatype = crate::ast::metatype_for(&entry_type);

        let open = self.bump(LexContext::TopLevel);
        let closing = match open.kind {
            TokenKind::LBrace => TokenKind::RBrace,
            TokenKind::LParen => TokenKind::RParen,
            _ => {
                return Err(Recover {
                    line: open.line,
                    message: format!("expected '{{' or '(' to open entry body for @{entry_type}"),
                })
            }
        };

        let entry = match metatype {
            EntryMetatype::Comment => self.parse_comment_body(entry_type, &closing)?,
            EntryMetatype::Preamble => self.parse_preamble_body(entry_type, &closing)?,
            EntryMetatype::MacroDef => self.parse_macro_def_body(entry_type, &closing)?,
            EntryMetatype::Regular => self.parse_regular_body(entry_type, &closing)?,
        };

        Ok(Some(entry))
    }

    /// `@comment`'s body is freeform text up to the matching delimiter,
    /// matching how BibTeX is conventionally used to comment out arbitrary
    /// `.bib` content rather than holding structured fields.
    fn parse_comment_body(&mut self, entry_type: String, closing: &TokenKind) -> Result<Entry, Recover> {
        let mut depth = 1i32;
        loop {
            let tok = self.bump(LexContext::TopLevel);
            match &tok.kind {
                TokenKind::LBrace | TokenKind::LParen => depth += 1,
                TokenKind::RBrace | TokenKind::RParen if &tok.kind == closing => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::RBrace | TokenKind::RParen => depth -= 1,
                TokenKind::Eof => {
                    return Err(Recover { line: tok.line, message: "unterminated @comment body".into() })
                }
                _ => {}
            }
        }
        Ok(Entry::new(entry_type, None, Vec::new()))
    }

    fn parse_preamble_body(&mut self, entry_type: String, closing: &TokenKind) -> Result<Entry, Recover> {
        let value = self.parse_value()?;
        self.expect(closing.clone())?;
        let mut entry = Entry::new(entry_type, None, Vec::new());
        entry.fields.push(Field::new("preamble".into(), value));
        Ok(entry)
    }

    fn parse_macro_def_body(&mut self, entry_type: String, closing: &TokenKind) -> Result<Entry, Recover> {
        let mut fields = vec![self.parse_field()?];
        loop {
            let tok = self.peek(LexContext::InEntry).clone();
            if matches!(tok.kind, TokenKind::Comma) {
                self.bump(LexContext::InEntry);
                if self.peek(LexContext::InEntry).kind == *closing {
                    break;
                }
                fields.push(self.parse_field()?);
            } else {
                break;
            }
        }
        self.expect(closing.clone())?;
        Ok(Entry::new(entry_type, None, fields))
    }

    fn parse_regular_body(&mut self, entry_type: String, closing: &TokenKind) -> Result<Entry, Recover> {
        let key = self.parse_key()?;
        self.expect(TokenKind::Comma)?;
        let mut fields = Vec::new();
        loop {
            if self.peek(LexContext::InEntry).kind == *closing {
                break;
            }
            fields.push(self.parse_field()?);
            let tok = self.peek(LexContext::InEntry).clone();
            if matches!(tok.kind, TokenKind::Comma) {
                self.bump(LexContext::InEntry);
            } else {
                break;
            }
        }
        self.expect(closing.clone())?;
        Ok(Entry::new(entry_type, Some(key), fields))
    }

    fn parse_key(&mut self) -> Result<String, Recover> {
        if self.lexer.peek_byte() == Some(b'{') {
            let tok = self.bump(LexContext::InValue);
            return match tok.kind {
                TokenKind::StringLiteral { text, delim: StringDelim::Brace } => Ok(text),
                other => Err(Recover { line: tok.line, message: format!("expected citation key, found {other:?}") }),
            };
        }
        let tok = self.bump(LexContext::InEntry);
        match tok.kind {
            TokenKind::Identifier(s) | TokenKind::Number(s) => Ok(s),
            other => Err(Recover { line: tok.line, message: format!("expected citation key, found {other:?}") }),
        }
    }

    fn parse_field(&mut self) -> Result<Field, Recover> {
        let name_tok = self.bump(LexContext::InEntry);
        let name = match name_tok.kind {
            TokenKind::Identifier(s) => s,
            other => {
                return Err(Recover { line: name_tok.line, message: format!("expected field name, found {other:?}") })
            }
        };
        self.expect(TokenKind::Equals)?;
        let value = self.parse_value()?;
        Ok(Field::new(name, value))
    }

    fn parse_value(&mut self) -> Result<Value, Recover> {
        let mut parts = vec![self.parse_simple_value()?];
        loop {
            if matches!(self.peek(LexContext::InEntry).kind, TokenKind::ConcatOp) {
                self.bump(LexContext::InEntry);
                parts.push(self.parse_simple_value()?);
            } else {
                break;
            }
        }
        Ok(Value::new(parts))
    }

    fn parse_simple_value(&mut self) -> Result<SimpleValue, Recover> {
        let tok = self.bump(LexContext::InValue);
        match tok.kind {
            TokenKind::StringLiteral { text, .. } => Ok(SimpleValue::StringLiteral(text)),
            TokenKind::Number(n) => Ok(SimpleValue::NumberLiteral(n)),
            TokenKind::MacroRef(name) => Ok(SimpleValue::MacroReference(name)),
            other => Err(Recover { line: tok.line, message: format!("expected a value, found {other:?}") }),
        }
    }

    /// Checks the next token without consuming it on mismatch, so that a
    /// token which turns out to be the start of the *next* entry (most
    /// commonly `@`) is still sitting in the lookahead for [`Self::recover`]
    /// to find.
    fn expect(&mut self, kind: TokenKind) -> Result<(), Recover> {
        let tok = self.peek(LexContext::InEntry).clone();
        if tok.kind == kind {
            self.bump(LexContext::InEntry);
            Ok(())
        } else {
            Err(Recover { line: tok.line, message: format!("expected {kind:?}, found {:?}", tok.kind) })
        }
    }

    /// Discards tokens until the next `@` at brace-depth 0.
    /// Depth is tracked from scratch starting at this call:
    /// a `{`/`(` seen during recovery nests past it, a matching `}`/`)`
    /// un-nests, and an `@` only ends recovery once back at depth 0.
    fn recover(&mut self) {
        self.lexer.set_context(LexContext::TopLevel);
        let mut depth = 0i32;
        loop {
            let tok = match self.lookahead.take() {
                Some(tok) => tok,
                None => self.lexer.next_token(),
            };
            match tok.kind {
                TokenKind::Eof => {
                    self.lookahead = Some(tok);
                    return;
                }
                TokenKind::At if depth == 0 => {
                    self.lookahead = Some(tok);
                    return;
                }
                TokenKind::LBrace | TokenKind::LParen => depth += 1,
                TokenKind::RBrace | TokenKind::RParen => {
                    if depth > 0 {
                        depth -= 1;
                    }
                }
                _ => {}
            }
        }
    }
}

/// Parses every entry in `input`, a convenience wrapper around
/// [`Parser::parse_all`] for callers who don't need to reuse the parser.
pub fn parse_all(
    input: &[u8],
    filename: &str,
    options: crate::postprocess::ParseOptions,
    table: &mut crate::macros::MacroTable,
    sink: &mut dyn WarningSink,
) -> Vec<Entry> {
    let mut parser = Parser::new(input, filename);
    parser.parse_all(options, table, sink)
}
