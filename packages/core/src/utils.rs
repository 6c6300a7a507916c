// ABOUTME: Textual conventions of provider-issued API tokens
// ABOUTME: Account id extraction and the non-secret trailing fingerprint

use crate::constants::{ACCOUNT_ID_SEPARATOR, FINGERPRINT_LEN};

/// Account id embedded in a provider token: everything before the first `i`.
///
/// A token without any `i` is returned whole. Only the first separator
/// counts; later `i` characters stay in the discarded remainder.
pub fn account_id_of(token: &str) -> &str {
    token
        .split_once(ACCOUNT_ID_SEPARATOR)
        .map_or(token, |(account_id, _)| account_id)
}

/// Last four characters of a provider token, or the whole token when shorter
pub fn fingerprint_of(token: &str) -> &str {
    let start = token
        .char_indices()
        .rev()
        .nth(FINGERPRINT_LEN - 1)
        .map_or(0, |(idx, _)| idx);
    &token[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("12345ixyz789", "12345")]
    #[case("12345", "12345")]
    #[case("12ia3ib4", "12")]
    #[case("i9999", "")]
    #[case("", "")]
    fn test_account_id_of(#[case] token: &str, #[case] expected: &str) {
        assert_eq!(account_id_of(token), expected);
    }

    #[rstest]
    #[case("12345ixyz789", "z789")]
    #[case("abcd", "abcd")]
    #[case("abc", "abc")]
    #[case("a", "a")]
    #[case("", "")]
    fn test_fingerprint_of(#[case] token: &str, #[case] expected: &str) {
        assert_eq!(fingerprint_of(token), expected);
    }

    #[test]
    fn test_fingerprint_counts_characters_not_bytes() {
        assert_eq!(fingerprint_of("123iaé€bc"), "é€bc");
    }
}
