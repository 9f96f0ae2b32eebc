//! Whitespace normalization applied before every check and before storage.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse internal whitespace runs to one space and trim both ends.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(value: &str) -> String {
    WHITESPACE_RUN.replace_all(value, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_and_trims() {
        assert_eq!(normalize("  Alice \t  Smith\n"), "Alice Smith");
        assert_eq!(normalize("\u{00A0}x\u{00A0}\u{00A0}y "), "x y");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize(" a  b\r\n c ");
        assert_eq!(normalize(&once), once);
    }
}
