//! Renders a split `Name` back out to text, with optional per-part
//! abbreviation.

use super::brace_scan::split_top_level_hyphen;
use super::split::Name;

/// Which parts to include, in what order, and how to render each one.
#[derive(Debug, Clone)]
pub struct NameFormat {
    pub order: Vec<NamePart>,
    pub first: PartFormat,
    pub von: PartFormat,
    pub last: PartFormat,
    pub jr: PartFormat,
    /// Whether a single-letter abbreviated token suppresses its trailing
    /// punctuation (e.g. a post-token period). The default, matching
    /// conventional BibTeX behavior, always appends it.
    pub suppress_punct_after_single_letter: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePart {
    First,
    Von,
    Last,
    Jr,
}

#[derive(Debug, Clone)]
pub struct PartFormat {
    pub abbreviated: bool,
    /// Text placed before the whole part, only emitted if the part is
    /// non-empty (and not the first part emitted overall).
    pub pre_part: String,
    /// Text placed between this part's tokens.
    pub join_tokens: String,
    /// Text placed after each rendered token (repeated once per
    /// hyphen-component when abbreviating a hyphenated token).
    pub post_token: String,
}

impl Default for PartFormat {
    fn default() -> Self {
        Self {
            abbreviated: false,
            pre_part: String::new(),
            join_tokens: " ".to_string(),
            post_token: String::new(),
        }
    }
}

impl Default for NameFormat {
    fn default() -> Self {
        Self {
            order: vec![NamePart::First, NamePart::Von, NamePart::Last, NamePart::Jr],
            first: PartFormat::default(),
            von: PartFormat::default(),
            last: PartFormat::default(),
            jr: PartFormat::default(),
            suppress_punct_after_single_letter: false,
        }
    }
}

pub fn format_name(name: &Name, format: &NameFormat) -> String {
    let mut out = String::new();
    let mut emitted_any = false;
    for part in &format.order {
        let (indices, part_format) = match part {
            NamePart::First => (&name.first, &format.first),
            NamePart::Von => (&name.von, &format.von),
            NamePart::Last => (&name.last, &format.last),
            NamePart::Jr => (&name.jr, &format.jr),
        };
        if indices.is_empty() {
            continue;
        }
        if emitted_any {
            out.push_str(&part_format.pre_part);
        }
        let rendered: Vec<String> = indices
            .iter()
            .map(|&i| render_token(&name.tokens[i].text, part_format, format.suppress_punct_after_single_letter))
            .collect();
        out.push_str(&rendered.join(&part_format.join_tokens));
        emitted_any = true;
    }
    out
}

fn render_token(token: &str, format: &PartFormat, suppress_single: bool) -> String {
    if !format.abbreviated {
        return token.to_string();
    }
    let components = split_top_level_hyphen(token);
    let rendered: Vec<String> = components
        .iter()
        .map(|component| {
            let (prefix, closing_braces) = abbreviate_component(component);
            let mut piece = prefix;
            piece.push_str(&"}".repeat(closing_braces));
            let is_bare_single_letter = piece.chars().count() == 1 && piece.chars().next().is_some_and(char::is_alphabetic);
            if suppress_single && is_bare_single_letter {
                piece
            } else {
                piece.push_str(&format.post_token);
                piece
            }
        })
        .collect();
    rendered.join("-")
}

/// Extracts the abbreviation of one hyphen-component: its first significant
/// character (by the same rule as case classification), plus any braces
/// opened along the way — returned as `(prefix, closing_braces_needed)` so
/// the caller can append the right number of `}` to keep braces balanced.
fn abbreviate_component(s: &str) -> (String, usize) {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut i = 0;
    let mut open = 0usize;
    let mut out = String::new();
    while i < n {
        let c = chars[i];
        match c {
            '{' => {
                out.push('{');
                open += 1;
                if i + 1 < n && chars[i + 1] == '\\' {
                    out.push('\\');
                    let mut j = i + 2;
                    while j < n && chars[j].is_alphabetic() {
                        out.push(chars[j]);
                        j += 1;
                    }
                    while j < n && !chars[j].is_alphabetic() && chars[j] != '}' {
                        out.push(chars[j]);
                        j += 1;
                    }
                    if j < n && chars[j].is_alphabetic() {
                        out.push(chars[j]);
                        return (out, open);
                    }
                    i = j;
                    continue;
                }
                i += 1;
            }
            '}' => {
                if open > 0 {
                    open -= 1;
                }
                out.push('}');
                i += 1;
            }
            c if c.is_alphabetic() => {
                out.push(c);
                return (out, open);
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    (out, open)
}
