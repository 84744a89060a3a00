//! Top-level session orchestration.
//!
//! This module bundles the state a consumer carries across a batch of
//! parses: the macro table (mutated by `@string` entries as they're seen)
//! and the warning sink every phase reports into. A `ParseSession` is the
//! single entry point that wires the lexer, parser, macro table and
//! post-processor together; most callers need nothing below this module.

use crate::ast::Entry;
use crate::diagnostics::WarningSink;
use crate::macros::MacroTable;
use crate::postprocess::{self, ParseOptions};

pub struct ParseSession {
    table: MacroTable,
    sink: Box<dyn WarningSink>,
}

impl ParseSession {
    pub fn new(sink: Box<dyn WarningSink>) -> Self {
        Self { table: MacroTable::new(), sink }
    }

    pub fn warning_count(&self) -> usize {
        self.sink.warning_count()
    }

    /// Parses every entry in `input`, installing `@string` macro
    /// definitions into the session's table and post-processing each
    /// regular entry's fields as it goes.
    pub fn parse_all(&mut self, input: &str, filename: &str, options: ParseOptions) -> Vec<Entry> {
        crate::parser::parse_all(input.as_bytes(), filename, options, &mut self.table, self.sink.as_mut())
    }

    /// Parses a single entry (everything up to its closing delimiter) and
    /// returns it, or `None` if the input held no entry at all.
    pub fn parse_entry(&mut self, input: &str, filename: &str, options: ParseOptions) -> Option<Entry> {
        self.parse_all(input, filename, options).into_iter().next()
    }

    pub fn post_process_value(
        &mut self,
        value: &crate::ast::Value,
        options: ParseOptions,
        filename: &str,
        line: usize,
    ) -> crate::ast::Value {
        postprocess::post_process_value(value, options, &self.table, filename, line, self.sink.as_mut())
    }

    pub fn add_macro_text(&mut self, name: &str, text: String, filename: &str, line: usize) {
        self.table.add(name, text, filename, line, self.sink.as_mut());
    }

    pub fn delete_macro(&mut self, name: &str) {
        self.table.delete(name);
    }

    pub fn delete_all_macros(&mut self) {
        self.table.delete_all();
    }

    pub fn macro_text(&self, name: &str) -> Option<&str> {
        self.table.lookup(name)
    }

    pub fn macro_length(&self, name: &str) -> usize {
        self.table.length(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;

    #[test]
    fn session_carries_macro_state_across_parse_calls() {
        let mut session = ParseSession::new(Box::new(CollectingSink::new()));
        session.parse_all(r#"@string{and = " and "}"#, "t.bib", ParseOptions::default());
        assert_eq!(session.macro_text("and"), Some(" and "));

        let entries = session.parse_all(
            r#"@article{k, title = "J" # and # "B"}"#,
            "t.bib",
            ParseOptions { expand: true, paste: true, ..ParseOptions::default() },
        );
        let title = entries[0].field("title").unwrap();
        assert_eq!(title.value.parts.len(), 1);
        assert_eq!(title.value.parts[0].as_text(), "J and B");
    }

    #[test]
    fn delete_all_macros_clears_prior_definitions() {
        let mut session = ParseSession::new(Box::new(CollectingSink::new()));
        session.add_macro_text("jan", "January".into(), "t.bib", 1);
        session.delete_all_macros();
        assert_eq!(session.macro_text("jan"), None);
        assert_eq!(session.macro_length("jan"), 0);
    }
}
