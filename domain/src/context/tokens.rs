//! Token estimation and truncation.
//!
//! Token counts are estimated at four characters per token. The estimate
//! is deterministic, which is all chunk assignment and prompt truncation
//! need: the same text always yields the same chunks and the same prefix.

/// Characters counted as one token
pub const CHARS_PER_TOKEN: usize = 4;

/// Default ceiling for a chunk placed in a single prompt
pub const DEFAULT_CHUNK_TOKEN_LIMIT: usize = 32_768;

/// Estimated token count of `text` (rounded up)
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Longest prefix of `text` that fits in `max_tokens`.
///
/// Cuts on a character boundary; text within the limit is returned whole.
pub fn truncate_tokens(text: &str, max_tokens: usize) -> &str {
    let max_chars = max_tokens.saturating_mul(CHARS_PER_TOKEN);
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_estimate_counts_chars_not_bytes() {
        // 4 chars, 12 bytes
        assert_eq!(estimate_tokens("あのねえ"), 1);
    }

    #[test]
    fn test_truncate_no_op_when_short() {
        assert_eq!(truncate_tokens("hello", 2), "hello");
    }

    #[test]
    fn test_truncate_prefix() {
        assert_eq!(truncate_tokens("abcdefghij", 2), "abcdefgh");
        assert_eq!(truncate_tokens("abcdefghij", 0), "");
    }

    #[test]
    fn test_truncate_multibyte_boundary() {
        let s = "あいうえおかきくけこ";
        assert_eq!(truncate_tokens(s, 1), "あいうえ");
    }

    #[test]
    fn test_truncate_is_deterministic() {
        let text = "The butler left at nine. ".repeat(100);
        assert_eq!(truncate_tokens(&text, 10), truncate_tokens(&text, 10));
        assert_eq!(estimate_tokens(truncate_tokens(&text, 10)), 10);
    }
}
