//! Text helpers shared by validation and the exact-match indexes.
//!
//! Normalization is deliberately minimal: Unicode lowercasing, which does not
//! depend on the process locale. No trimming or whitespace folding is applied,
//! so `"Homer "` and `"homer"` are different keys.

use crate::error::{TypeError, TypeResult};

/// Returns `true` if the value is empty or consists only of whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Normalize an author or title for indexing and lookup.
///
/// # Examples
///
/// ```
/// use libris_types::normalize;
///
/// assert_eq!(normalize("The Odyssey"), "the odyssey");
/// assert_eq!(normalize("HOMER"), "homer");
/// ```
pub fn normalize(value: &str) -> String {
    value.to_lowercase()
}

/// Return `value` unchanged if it is not blank.
pub fn require_non_blank<'a>(value: &'a str, field: &'static str) -> TypeResult<&'a str> {
    if is_blank(value) {
        return Err(TypeError::MissingField { field });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn blank_detects_empty_and_whitespace() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n"));
        assert!(!is_blank("x"));
        assert!(!is_blank("  x  "));
    }

    #[test]
    fn normalize_lowercases() {
        assert_eq!(normalize("HOMER"), "homer");
        assert_eq!(normalize("The Odyssey"), "the odyssey");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_is_not_locale_sensitive() {
        // Turkish dotted capital I lowercases the same way everywhere.
        assert_eq!(normalize("İSTANBUL"), "i\u{307}stanbul");
        assert_eq!(normalize("ÉMILE ZOLA"), "émile zola");
    }

    #[test]
    fn require_non_blank_validates_input() {
        let err = require_non_blank("  ", "isbn").unwrap_err();
        assert_eq!(err, TypeError::MissingField { field: "isbn" });
        assert_eq!(err.to_string(), "isbn must be provided");
        assert_eq!(require_non_blank("abc", "isbn").unwrap(), "abc");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "[a-zA-Z0-9 àéÀÉß-]{0,32}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once.clone());
        }

        #[test]
        fn case_variants_normalize_equal(s in "[a-zA-Z ]{1,24}") {
            prop_assert_eq!(normalize(&s.to_uppercase()), normalize(&s.to_lowercase()));
        }
    }
}
