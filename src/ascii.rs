//! ASCII-only case folding: deliberately avoids any locale-sensitive case
//! routine, so behavior never depends on the running process's locale.

/// Folds ASCII uppercase letters to lowercase; non-ASCII bytes pass through.
pub fn fold_case(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_uppercase() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Case-insensitive (ASCII-only) equality, used by the macro table and by
/// `split_list`'s delimiter matching.
pub fn eq_ignore_ascii_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
