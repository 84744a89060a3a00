//! `StringList`: an ordered sequence of substrings over one owned backing
//! buffer, split from a larger string on a whitespace-bounded,
//! brace-depth-aware delimiter.

use crate::ascii::eq_ignore_ascii_case;
use crate::diagnostics::{Severity, Warning, WarningSink};
use crate::name::brace_scan::brace_aware_words;

/// Owns a single backing buffer; every substring borrows from it and the
/// whole list is freed as one allocation when dropped. The separator
/// between substrings in the buffer is a literal NUL byte — unusual in a
/// Rust `String`, but a valid one that never appears in parsed
/// bibliography text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringList {
    buffer: String,
    spans: Vec<std::ops::Range<usize>>,
}

impl StringList {
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.spans.get(index).map(|r| &self.buffer[r.clone()])
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans.iter().map(move |r| &self.buffer[r.clone()])
    }
}

/// Partitions `string` on whitespace-bounded,
/// case-insensitive occurrences of `delim`, ignoring matches at brace
/// depth > 0, absorbing leading/trailing matches, and warning (via
/// `description`) on two adjacent matches that yield a null substring.
pub fn split_list(
    string: &str,
    delim: &str,
    filename: &str,
    line: usize,
    description: &str,
    sink: &mut dyn WarningSink,
) -> StringList {
    let words = brace_aware_words(string);
    let is_delim = |r: &std::ops::Range<usize>| eq_ignore_ascii_case(&string[r.clone()], delim);

    let first_real = words.iter().position(|w| !is_delim(w));
    let last_real = words.iter().rposition(|w| !is_delim(w));

    let mut groups: Vec<Vec<&str>> = Vec::new();
    if let (Some(first), Some(last)) = (first_real, last_real) {
        let mut current: Vec<&str> = Vec::new();
        for idx in first..=last {
            let w = &words[idx];
            if is_delim(w) {
                let empty = current.is_empty();
                groups.push(std::mem::take(&mut current));
                if empty {
                    sink.report(Warning {
                        severity: Severity::Warning,
                        filename: filename.to_string(),
                        line,
                        message: format!("{description}: null substring between adjacent delimiters"),
                    });
                }
            } else {
                current.push(&string[w.clone()]);
            }
        }
        groups.push(current);
    } else {
        // Every word (or there are no words) is itself the delimiter, or the
        // string is empty: a single, possibly-empty, substring.
        groups.push(Vec::new());
    }

    let mut buffer = String::new();
    let mut spans = Vec::with_capacity(groups.len());
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            buffer.push('\0');
        }
        let start = buffer.len();
        buffer.push_str(&group.join(" "));
        spans.push(start..buffer.len());
    }

    StringList { buffer, spans }
}
