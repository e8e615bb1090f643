//! Text normalization and content fingerprinting

use sha2::{Digest, Sha256};

/// Collapses internal whitespace runs to single spaces and trims the ends.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits text into lowercase alphanumeric tokens.
///
/// Shared by the fallback tag and embedding paths so both see the same
/// token stream for a given input.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// SHA-256 hex digest of the input.
///
/// Used as the cache key component and as the seed for the deterministic
/// fallback embedding.
pub fn fingerprint(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Bounded-length prefix of the input, for cache diagnostics.
pub fn preview(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  hello   world \t\n again "), "hello world again");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("  a  b\tc  ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_tokenize_splits_on_non_alphanumeric() {
        assert_eq!(
            tokenize("React docs: https://react.dev!"),
            vec!["react", "docs", "https", "react", "dev"]
        );
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        assert_eq!(fingerprint("hello"), fingerprint("hello"));
        assert_ne!(fingerprint("hello"), fingerprint("hello "));
    }

    #[test]
    fn test_fingerprint_known_digest() {
        // sha256("abc")
        assert_eq!(
            fingerprint("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("héllo wörld", 5), "héllo");
        assert_eq!(preview("short", 200), "short");
    }
}
