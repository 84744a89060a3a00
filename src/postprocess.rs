//! Phase: Post-Processor — the per-entry value transformations driven by
//! an options bitmask.

use crate::ast::{SimpleValue, Value};
use crate::diagnostics::{Severity, Warning, WarningSink};
use crate::macros::MacroTable;

/// The post-processing option bitmask. Kept as named bools rather than a
/// raw integer for readability, with `bits`/`from_bits` for API parity with
/// the conceptual bitmask interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Macro references replaced by macro text; concatenation performed.
    pub expand: bool,
    /// Adjacent string literals concatenated (meaningful with `expand`).
    pub paste: bool,
    /// Runs of whitespace collapsed to one space; leading/trailing trimmed.
    pub collapse: bool,
    /// This post-process call is for a `@string` (macro-def) entry.
    pub is_macro: bool,
    /// This post-process call is for a regular field value.
    pub field: bool,
    /// Suppress "undefined macro" warnings without changing the
    /// substitution itself: an undefined reference still becomes an empty
    /// string, only the warning is skipped.
    pub nostore_macros: bool,
}

pub const EXPAND: u32 = 1 << 0;
pub const PASTE: u32 = 1 << 1;
pub const COLLAPSE: u32 = 1 << 2;
pub const MACRO: u32 = 1 << 3;
pub const FIELD: u32 = 1 << 4;
pub const NOSTORE_MACROS: u32 = 1 << 5;

impl ParseOptions {
    pub fn bits(&self) -> u32 {
        (self.expand as u32 * EXPAND)
            | (self.paste as u32 * PASTE)
            | (self.collapse as u32 * COLLAPSE)
            | (self.is_macro as u32 * MACRO)
            | (self.field as u32 * FIELD)
            | (self.nostore_macros as u32 * NOSTORE_MACROS)
    }

    pub fn from_bits(bits: u32) -> Self {
        Self {
            expand: bits & EXPAND != 0,
            paste: bits & PASTE != 0,
            collapse: bits & COLLAPSE != 0,
            is_macro: bits & MACRO != 0,
            field: bits & FIELD != 0,
            nostore_macros: bits & NOSTORE_MACROS != 0,
        }
    }

    /// The fixed option set a `@string` entry's value is post-processed
    /// with: `EXPAND|PASTE`, never `COLLAPSE`.
    pub fn for_macro_def() -> Self {
        Self { expand: true, paste: true, is_macro: true, ..Self::default() }
    }
}

/// Applies `options` to `value`, resolving macro references against
/// `table`. `replace_undefined` controls what happens to an undefined
/// macro reference: when false it is left as a `MacroReference`
/// simple-value (still warned about) instead of being collapsed to the
/// empty string.
pub fn post_process_value(
    value: &Value,
    options: ParseOptions,
    table: &MacroTable,
    filename: &str,
    line: usize,
    sink: &mut dyn WarningSink,
) -> Value {
    post_process_value_ex(value, options, table, filename, line, sink, true)
}

pub fn post_process_value_ex(
    value: &Value,
    options: ParseOptions,
    table: &MacroTable,
    filename: &str,
    line: usize,
    sink: &mut dyn WarningSink,
    replace_undefined: bool,
) -> Value {
    let mut parts = value.parts.clone();

    if options.expand {
        parts = parts
            .into_iter()
            .map(|part| expand_one(part, table, filename, line, sink, options.nostore_macros, replace_undefined))
            .collect();
    }

    if options.paste {
        parts = paste_adjacent(parts);
    }

    if options.collapse {
        parts = parts
            .into_iter()
            .map(|part| match part {
                SimpleValue::StringLiteral(s) => SimpleValue::StringLiteral(collapse_whitespace(&s)),
                other => other,
            })
            .collect();
    }

    // Every simple-value here, including numbers and un-transformed
    // literals, already owns its bytes with no interior aliasing against
    // `table`'s storage, so there is nothing further to copy.
    Value::new(parts)
}

fn expand_one(
    part: SimpleValue,
    table: &MacroTable,
    filename: &str,
    line: usize,
    sink: &mut dyn WarningSink,
    nostore_macros: bool,
    replace_undefined: bool,
) -> SimpleValue {
    match part {
        SimpleValue::MacroReference(name) => match table.lookup(&name) {
            Some(text) => SimpleValue::StringLiteral(text.to_string()),
            None => {
                if !nostore_macros {
                    sink.report(Warning {
                        severity: Severity::Warning,
                        filename: filename.to_string(),
                        line,
                        message: format!("undefined macro `{name}`"),
                    });
                }
                if replace_undefined {
                    SimpleValue::StringLiteral(String::new())
                } else {
                    SimpleValue::MacroReference(name)
                }
            }
        },
        other => other,
    }
}

/// Concatenates adjacent string literals into one. Requires `expand` to
/// have already run when macros are present.
fn paste_adjacent(parts: Vec<SimpleValue>) -> Vec<SimpleValue> {
    let mut out: Vec<SimpleValue> = Vec::with_capacity(parts.len());
    for part in parts {
        match (out.last_mut(), &part) {
            (Some(SimpleValue::StringLiteral(prev)), SimpleValue::StringLiteral(next)) => {
                prev.push_str(next);
            }
            _ => out.push(part),
        }
    }
    out
}

/// Collapses interior whitespace runs to a single space and trims the ends.
fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if c.is_whitespace() {
            in_run = true;
        } else {
            if in_run && !out.is_empty() {
                out.push(' ');
            }
            in_run = false;
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;

    fn lit(s: &str) -> SimpleValue {
        SimpleValue::StringLiteral(s.to_string())
    }

    #[test]
    fn expand_paste_concatenates_macro_scenario() {
        // @string{and = " and "} then @string{names = "J" # and # "B"}
        let mut table = MacroTable::new();
        let mut sink = CollectingSink::new();
        table.add("and", " and ".into(), "t.bib", 1, &mut sink);

        let value = Value::new(vec![
            lit("J"),
            SimpleValue::MacroReference("and".into()),
            lit("B"),
        ]);
        let result = post_process_value(&value, ParseOptions::for_macro_def(), &table, "t.bib", 2, &mut sink);
        assert_eq!(result, Value::new(vec![lit("J and B")]));
    }

    #[test]
    fn undefined_macro_becomes_empty_string_and_warns() {
        let table = MacroTable::new();
        let mut sink = CollectingSink::new();
        let value = Value::new(vec![SimpleValue::MacroReference("year".into())]);
        let options = ParseOptions { expand: true, ..ParseOptions::default() };
        let result = post_process_value(&value, options, &table, "t.bib", 1, &mut sink);
        assert_eq!(result, Value::new(vec![lit("")]));
        assert_eq!(sink.warning_count(), 1);
    }

    #[test]
    fn expand_is_idempotent() {
        let mut table = MacroTable::new();
        let mut sink = CollectingSink::new();
        table.add("jan", "January".into(), "t.bib", 1, &mut sink);
        let value = Value::new(vec![SimpleValue::MacroReference("jan".into())]);
        let once = post_process_value(&value, ParseOptions::for_macro_def(), &table, "t.bib", 2, &mut sink);
        let twice = post_process_value(&once, ParseOptions::for_macro_def(), &table, "t.bib", 2, &mut sink);
        assert_eq!(once, twice);
    }

    #[test]
    fn collapse_trims_and_squashes_whitespace() {
        assert_eq!(collapse_whitespace("  a   b\tc  "), "a b c");
    }

    #[test]
    fn double_free_regression_year_macro_expands_twice_without_panic() {
        // @string{year = 1995} then @article{k, year = year}, expanded twice.
        let mut table = MacroTable::new();
        let mut sink = CollectingSink::new();
        table.add("year", "1995".into(), "t.bib", 1, &mut sink);
        let value = Value::new(vec![SimpleValue::MacroReference("year".into())]);
        let options = ParseOptions { expand: true, paste: true, ..ParseOptions::default() };
        let first = post_process_value(&value, options, &table, "t.bib", 2, &mut sink);
        let second = post_process_value(&first, options, &table, "t.bib", 2, &mut sink);
        assert_eq!(second, Value::new(vec![lit("1995")]));
    }
}
