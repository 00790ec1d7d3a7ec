//! Token generation and comparison.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use subtle::ConstantTimeEq;

/// Generate a new CSRF token from `length` bytes of randomness, rendered as
/// URL-safe base64 without padding.
///
/// Uses the thread-local CSPRNG, safe for concurrent use across request tasks.
pub fn generate(length: usize) -> String {
    let mut bytes = vec![0u8; length];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare the claimed token against the expected token in constant time.
///
/// The comparison cost is independent of the position of the first mismatched
/// byte. Length differences are revealed, which is safe for this use.
pub fn tokens_match(expected: &str, claimed: &str) -> bool {
    expected.as_bytes().ct_eq(claimed.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_honors_length() {
        // base64 without padding: ceil(n * 4 / 3) characters
        assert_eq!(generate(32).len(), 43);
        assert_eq!(generate(16).len(), 22);
    }

    #[test]
    fn test_generate_is_unguessable_enough_to_differ() {
        assert_ne!(generate(32), generate(32));
    }

    #[test]
    fn test_tokens_match_equal() {
        assert!(tokens_match("abc", "abc"));
    }

    #[test]
    fn test_tokens_match_rejects_same_length_difference() {
        assert!(!tokens_match("abc", "abd"));
    }

    #[test]
    fn test_tokens_match_rejects_length_difference() {
        assert!(!tokens_match("abc", "abcd"));
        assert!(!tokens_match("abc", ""));
        assert!(!tokens_match("", "abc"));
    }

    #[test]
    fn test_tokens_match_empty_both() {
        assert!(tokens_match("", ""));
    }
}
