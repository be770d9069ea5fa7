/// Lower-case and collapse every whitespace run to a single space.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Keep at most `max` characters (not bytes) of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(
            normalize_text("  Only 3\n\tLEFT   in stock "),
            "only 3 left in stock"
        );
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("i’ll miss out", 3), "i’l");
        assert_eq!(truncate_chars("short", 140), "short");
        assert_eq!(truncate_chars("abcdef", 0), "");
    }
}
