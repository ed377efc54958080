//! Shared utility functions

/// Shorten `s` to at most `max_len` bytes for log lines and error details,
/// marking the cut with "...". Never splits a UTF-8 character.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let target = max_len.saturating_sub(3);
    let end = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|i| *i <= target)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_input_untouched() {
        assert_eq!(truncate_str("fusion", 10), "fusion");
    }

    #[test]
    fn test_truncate_long_input() {
        assert_eq!(truncate_str("reciprocal rank fusion", 13), "reciprocal...");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // 'é' is two bytes; a cut at byte 2 would split it
        assert_eq!(truncate_str("héllo wörld", 5), "h...");
    }
}
