/// `Some(s)` unless `s` is empty.
pub fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

/// Hard cut at `limit` characters with an ellipsis, used by compact output.
pub fn clip(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{clip, non_empty};

    #[test]
    fn clip_leaves_short_text() {
        assert_eq!(clip("short", 40), "short");
    }

    #[test]
    fn clip_cuts_long_text() {
        assert_eq!(clip("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn non_empty_filters_empty() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("x"), Some("x"));
    }
}
