// Logging support. This crate only ever calls the `log` facade — it never
// installs a logger itself, matching §4.6: an embedding application chooses
// and initializes its own `log::Log` implementation.

/// Safely truncate a string preview for a log line, by character count
/// rather than byte count, so a multi-byte UTF-8 character is never split.
#[inline]
pub fn safe_preview(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_char_count_not_byte_count() {
        let text = "héllo wörld";
        assert_eq!(safe_preview(text, 5), "héllo");
    }

    #[test]
    fn shorter_than_limit_is_unchanged() {
        assert_eq!(safe_preview("hi", 10), "hi");
    }
}
