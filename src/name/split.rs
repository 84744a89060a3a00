//! Assigns a tokenized name's tokens to the first/von/last/jr parts.

use crate::diagnostics::{Severity, Warning, WarningSink};

use super::tokenize::{is_lowercase_token, tokenize_name, NameToken};

/// A name split into four parts, each a list of token indices into
/// `tokens` (in original left-to-right order within each part).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub tokens: Vec<NameToken>,
    pub first: Vec<usize>,
    pub von: Vec<usize>,
    pub last: Vec<usize>,
    pub jr: Vec<usize>,
}

impl Name {
    pub fn part_text(&self, indices: &[usize]) -> Vec<&str> {
        indices.iter().map(|&i| self.tokens[i].text.as_str()).collect()
    }
}

/// Splits `name` into its four parts.
///
/// - No comma: `First von Last` form. The von part is the first run of
///   lowercase tokens (never including the final token); everything before
///   it is first, everything from it onward (excluding von) is last. With
///   no lowercase tokens at all, first is everything but the last word and
///   last is that last word.
/// - One comma: `von Last, First` — everything before the comma splits into
///   von/last (with no leading first part there), everything after is
///   first; jr stays empty.
/// - Two commas: `von Last, Jr, First`.
/// - More than two commas: only the first two are structural; later ones
///   are folded into the first part (warned as non-standard).
pub fn split_name(name: &str, filename: &str, line: usize, name_num: usize, sink: &mut dyn WarningSink) -> Name {
    let tokens = tokenize_name(name);
    if tokens.is_empty() {
        return Name { tokens, first: vec![], von: vec![], last: vec![], jr: vec![] };
    }

    let comma_positions: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.comma_after)
        .map(|(i, _)| i)
        .collect();

    if comma_positions.len() > 2 {
        sink.report(Warning {
            severity: Severity::Warning,
            filename: filename.to_string(),
            line,
            message: format!("name #{name_num} has more than two commas; treating extras as part of the first part"),
        });
    }

    let groups = split_at_commas(&tokens, &comma_positions);
    let is_lower = |idx: usize| is_lowercase_token(&tokens[idx].text);

    match groups.len() {
        1 => {
            // No comma: "First von Last" all in one group, so first has to
            // be carved out here rather than coming from its own group.
            let (first, von, last) = split_first_von_last_classified(&groups[0], is_lower);
            Name { tokens, first, von, last, jr: vec![] }
        }
        2 => {
            let (von, last) = split_von_last_classified(&groups[0], is_lower);
            let first = groups[1].clone();
            Name { tokens, first, von, last, jr: vec![] }
        }
        _ => {
            let (von, last) = split_von_last_classified(&groups[0], is_lower);
            let jr = groups[1].clone();
            let first = groups[2..].concat();
            Name { tokens, first, von, last, jr }
        }
    }
}

/// Groups token indices by comma boundary (inclusive of the comma-bearing
/// token in the group that precedes it).
fn split_at_commas(tokens: &[NameToken], comma_positions: &[usize]) -> Vec<Vec<usize>> {
    let mut groups = Vec::new();
    let mut start = 0usize;
    for &pos in comma_positions {
        groups.push((start..=pos).collect::<Vec<_>>());
        start = pos + 1;
    }
    groups.push((start..tokens.len()).collect());
    groups
}

/// Within a `von last` fragment (given as token indices), finds the longest
/// leading run of lowercase tokens and treats it as the von part; the rest
/// is last. If every token is lowercase, the last one is still promoted to
/// last (a name cannot be all-von).
fn split_von_last_classified(group: &[usize], is_lower: impl Fn(usize) -> bool) -> (Vec<usize>, Vec<usize>) {
    if group.is_empty() {
        return (vec![], vec![]);
    }
    if group.len() == 1 {
        return (vec![], group.to_vec());
    }
    let mut von_end = 0usize; // number of leading lowercase tokens, capped below len-1
    for &idx in &group[..group.len() - 1] {
        if is_lower(idx) {
            von_end += 1;
        } else {
            break;
        }
    }
    let (von, last) = group.split_at(von_end);
    (von.to_vec(), last.to_vec())
}

/// Like `split_von_last_classified` but also carves out a leading `first`
/// part: everything before the first lowercase token (other than the final
/// token, which is always `last`) becomes `first`, and the von run starts
/// at that first lowercase token.
fn split_first_von_last_classified(
    group: &[usize],
    is_lower: impl Fn(usize) -> bool,
) -> (Vec<usize>, Vec<usize>, Vec<usize>) {
    if group.is_empty() {
        return (vec![], vec![], vec![]);
    }
    if group.len() == 1 {
        return (vec![], vec![], group.to_vec());
    }
    let last_idx = group.len() - 1;
    let von_start = group[..last_idx].iter().position(|&idx| is_lower(idx));
    match von_start {
        None => {
            let (first, last) = group.split_at(last_idx);
            (first.to_vec(), vec![], last.to_vec())
        }
        Some(start) => {
            let mut end = start;
            while end < last_idx && is_lower(group[end]) {
                end += 1;
            }
            (group[..start].to_vec(), group[start..end].to_vec(), group[end..].to_vec())
        }
    }
}
