use unicode_segmentation::UnicodeSegmentation;

/// Splits text into extended grapheme clusters, so combining sequences and
/// emoji survive diffing as single units.
///
/// ```not_rust
/// "née👍" -> ["n", "é", "e", "👍"]
/// ```
#[must_use]
pub fn split_graphemes(text: &str) -> Vec<String> {
    text.graphemes(true).map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_ascii() {
        assert_eq!(split_graphemes("Hey!"), vec!["H", "e", "y", "!"]);
    }

    #[test]
    fn test_combining_mark_is_one_cluster() {
        // 'e' followed by U+0301 COMBINING ACUTE ACCENT
        assert_eq!(split_graphemes("ne\u{301}e"), vec!["n", "e\u{301}", "e"]);
    }

    #[test]
    fn test_emoji_is_one_cluster() {
        assert_eq!(split_graphemes("a👍b"), vec!["a", "👍", "b"]);
    }

    #[test]
    fn test_empty() {
        assert_eq!(split_graphemes(""), Vec::<String>::new());
    }
}
