//! Name splitting and formatting: turns one `and`-separated author/editor
//! field into a list of raw name strings, then splits and renders each one.

mod brace_scan;
pub mod format;
pub mod split;
pub mod stringlist;
pub mod tokenize;

pub use format::{format_name, NameFormat, NamePart, PartFormat};
pub use split::{split_name, Name};
pub use stringlist::{split_list, StringList};
pub use tokenize::{is_lowercase_token, tokenize_name, NameToken};

use crate::diagnostics::WarningSink;

/// Splits a whole `author`/`editor`-style field value on the literal word
/// `and` (case-insensitive, brace-depth aware) and splits each resulting
/// name into parts. This is the whole-field entry point; `split_list` and
/// `split_name` are the two phases it composes.
pub fn split_names(field_value: &str, filename: &str, line: usize, sink: &mut dyn WarningSink) -> Vec<Name> {
    let raw = split_list(field_value, "and", filename, line, "name list", sink);
    raw.iter()
        .enumerate()
        .map(|(i, one)| split_name(one, filename, line, i, sink))
        .collect()
}
