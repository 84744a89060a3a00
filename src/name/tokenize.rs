//! Splits a single name string into tokens at whitespace or commas, and
//! classifies each token as lowercase (a likely "von" particle) or not.

use super::brace_scan::depth_aware_segments;

/// One token plus whether a structural comma immediately follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameToken {
    pub text: String,
    pub comma_after: bool,
}

/// Tokenizes on whitespace or a comma at brace depth 0. Commas are recorded
/// against the token that precedes them rather than returned as their own
/// tokens; a name with only whitespace yields zero tokens.
pub fn tokenize_name(name: &str) -> Vec<NameToken> {
    let bytes = name.as_bytes();
    let mut depth = 0i32;
    let mut tokens: Vec<NameToken> = Vec::new();
    let mut start: Option<usize> = None;

    let mut flush = |start: &mut Option<usize>, end: usize, tokens: &mut Vec<NameToken>| {
        if let Some(s0) = start.take() {
            tokens.push(NameToken { text: name[s0..end].to_string(), comma_after: false });
        }
    };

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
            b',' if depth == 0 => {
                flush(&mut start, i, &mut tokens);
                if let Some(last) = tokens.last_mut() {
                    last.comma_after = true;
                } else {
                    // A leading comma with no preceding token: record it as
                    // a standalone structural marker so comma counting
                    // (second-half detection) still sees it.
                    tokens.push(NameToken { text: String::new(), comma_after: true });
                }
            }
            b if depth == 0 && b.is_ascii_whitespace() => {
                flush(&mut start, i, &mut tokens);
            }
            _ => {
                if start.is_none() {
                    start = Some(i);
                }
            }
        }
    }
    flush(&mut start, bytes.len(), &mut tokens);
    tokens
}

/// The character that decides whether a token counts as lowercase, per the
/// case-classification rule: the first alphabetic character at brace depth
/// 0, with the exception that a `{\controlseq ...}` group counts its first
/// alphabetic character *after* the control sequence name as significant,
/// and any other braced group is skipped over entirely.
fn significant_char(token: &str) -> Option<char> {
    let chars: Vec<char> = token.chars().collect();
    let n = chars.len();
    let mut i = 0;
    while i < n {
        let c = chars[i];
        if c == '{' {
            let mut depth = 1;
            let mut j = i + 1;
            while j < n && depth > 0 {
                match chars[j] {
                    '{' => depth += 1,
                    '}' => depth -= 1,
                    _ => {}
                }
                j += 1;
            }
            let close = j; // one past the matching '}', or n if unterminated

            if i + 1 < n && chars[i + 1] == '\\' {
                let mut k = i + 2;
                while k < close && chars[k].is_alphabetic() {
                    k += 1;
                }
                while k < close {
                    if chars[k].is_alphabetic() {
                        return Some(chars[k]);
                    }
                    k += 1;
                }
                // No letter found inside the special-character group;
                // keep scanning past it rather than giving up.
            }
            i = close.max(i + 1);
            continue;
        }
        if c.is_alphabetic() {
            return Some(c);
        }
        i += 1;
    }
    None
}

/// A token with no alphabetic character at its significant position is
/// classified uppercase (non-particle).
pub fn is_lowercase_token(token: &str) -> bool {
    matches!(significant_char(token), Some(c) if c.is_ascii_lowercase())
}

/// Tokenizes on whitespace alone, ignoring structural commas — used when a
/// caller already knows it has a comma-free fragment (e.g. one comma-group
/// of a name).
pub fn tokenize_words(fragment: &str) -> Vec<String> {
    depth_aware_segments(fragment, |b| b.is_ascii_whitespace())
        .into_iter()
        .map(|r| fragment[r].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_and_records_commas() {
        let tokens = tokenize_name("von der Beet, Jr, Ludwig");
        let text: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, vec!["von", "der", "Beet", "Jr", "Ludwig"]);
        assert!(tokens[2].comma_after);
        assert!(tokens[3].comma_after);
        assert!(!tokens[4].comma_after);
    }

    #[test]
    fn whitespace_only_name_yields_no_tokens() {
        assert!(tokenize_name("   \t  ").is_empty());
    }

    #[test]
    fn braced_group_is_a_single_token() {
        let tokens = tokenize_name("{Foo Bar} Baz");
        let text: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, vec!["{Foo Bar}", "Baz"]);
    }

    #[test]
    fn unterminated_brace_consumes_rest_of_string_as_one_token() {
        let tokens = tokenize_name("{Foo Bar Baz");
        let text: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, vec!["{Foo Bar Baz"]);
    }

    #[test]
    fn plain_lowercase_token_is_a_particle_candidate() {
        assert!(is_lowercase_token("von"));
        assert!(!is_lowercase_token("Von"));
    }

    #[test]
    fn generic_braced_group_is_skipped_for_classification() {
        // {Foo}bar: the first letter outside the group, 'b', is significant.
        assert!(is_lowercase_token("{Foo}bar"));
    }

    #[test]
    fn special_character_group_uses_first_letter_after_control_sequence() {
        // {\"o}ffentlich: 'o' inside the group is the significant character.
        assert!(is_lowercase_token("{\\\"o}ffentlich"));
        assert!(!is_lowercase_token("{\\\"O}ffentlich"));
    }
}
