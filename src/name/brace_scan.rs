//! Brace-depth-aware segmentation shared by [`super::stringlist`],
//! [`super::tokenize`], and [`super::format`]: a run of non-boundary bytes
//! is one segment, braces nest regardless of what's inside them, and a
//! boundary byte only ends a segment at depth 0.

use std::ops::Range;

pub fn depth_aware_segments(s: &str, is_boundary: impl Fn(u8) -> bool) -> Vec<Range<usize>> {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    let mut segments = Vec::new();
    let mut start: Option<usize> = None;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' => {
                depth += 1;
                if start.is_none() {
                    start = Some(i);
                }
            }
            b'}' => {
                if depth > 0 {
                    depth -= 1;
                }
                if start.is_none() {
                    start = Some(i);
                }
            }
            b if depth == 0 && is_boundary(b) => {
                if let Some(s0) = start.take() {
                    segments.push(s0..i);
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(i);
                }
            }
        }
    }
    if let Some(s0) = start {
        segments.push(s0..bytes.len());
    }
    segments
}

pub fn brace_aware_words(s: &str) -> Vec<Range<usize>> {
    depth_aware_segments(s, |b| b.is_ascii_whitespace())
}

/// Splits on `-` at brace depth 0, dropping the hyphen itself — used by
/// hyphenated-token abbreviation.
pub fn split_top_level_hyphen(s: &str) -> Vec<&str> {
    depth_aware_segments(s, |b| b == b'-')
        .into_iter()
        .map(|r| &s[r])
        .collect()
}
