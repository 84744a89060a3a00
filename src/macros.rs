//! Macro table: a per-session name→expanded-text map,
//! mutated by `@string` entries and by explicit add/delete calls.

use std::collections::HashMap;

use crate::ascii::fold_case;
use crate::ast::{Entry, EntryMetatype, Field};
use crate::diagnostics::{Severity, Warning, WarningSink};
use crate::postprocess::{self, ParseOptions};

#[derive(Debug, Default)]
pub struct MacroTable {
    entries: HashMap<String, String>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores already-expanded text under a case-folded name, overwriting
    /// and warning on redefinition.
    pub fn add(&mut self, name: &str, text: String, filename: &str, line: usize, sink: &mut dyn WarningSink) {
        let key = fold_case(name);
        if self.entries.contains_key(&key) {
            sink.report(Warning {
                severity: Severity::Warning,
                filename: filename.to_string(),
                line,
                message: format!("macro `{name}` redefined"),
            });
        }
        self.entries.insert(key, text);
    }

    /// Installs the macro defined by a `@string` entry's sole field.
    ///
    /// `add_from_ast` requires the field's value to already
    /// be post-processed with `EXPAND|PASTE` and *not* `COLLAPSE` (so that
    /// e.g. `" and "` keeps its surrounding spaces for later interpolation).
    /// If `options` is the empty bitset, this applies that post-processing
    /// itself rather than trust the caller.
    pub fn add_from_ast(
        &mut self,
        field: &Field,
        options: ParseOptions,
        filename: &str,
        line: usize,
        sink: &mut dyn WarningSink,
    ) {
        let text = if options.bits() == 0 {
            let required = ParseOptions { expand: true, paste: true, collapse: false, ..ParseOptions::default() };
            let expanded = postprocess::post_process_value(&field.value, required, self, filename, line, sink);
            textual_value(&expanded)
        } else {
            textual_value(&field.value)
        };
        self.add(&field.name, text, filename, line, sink);
    }

    /// Looks up a macro's already-expanded text.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(&fold_case(name)).map(String::as_str)
    }

    /// `macro-length`: a usage error (undefined name) returns
    /// the `0` sentinel rather than an `Option`.
    pub fn length(&self, name: &str) -> usize {
        self.lookup(name).map(str::len).unwrap_or(0)
    }

    pub fn delete(&mut self, name: &str) {
        self.entries.remove(&fold_case(name));
    }

    pub fn delete_all(&mut self) {
        self.entries.clear();
    }
}

/// Concatenates a value's simple-value texts; used only on already-expanded
/// (single-literal) values, so this does not need to itself expand macros.
fn textual_value(value: &crate::ast::Value) -> String {
    value.parts.iter().map(|p| p.as_text()).collect::<Vec<_>>().join("")
}

/// Drives macro-table mutation for a whole parsed `@string` entry, per
/// A macro-def entry has exactly one field; anything else is an internal error.
pub fn install_macro_def(
    table: &mut MacroTable,
    entry: &Entry,
    filename: &str,
    sink: &mut dyn WarningSink,
) {
    debug_assert_eq!(entry.metatype, EntryMetatype::MacroDef);
    if entry.fields.len() != 1 {
        sink.report(Warning {
            severity: Severity::InternalError,
            filename: filename.to_string(),
            line: 0,
            message: "macro-def entry must have exactly one field".into(),
        });
        return;
    }
    let field = &entry.fields[0];
    let options = ParseOptions { expand: true, paste: true, collapse: false, ..ParseOptions::default() };
    table.add_from_ast(field, options, filename, 0, sink);
}
