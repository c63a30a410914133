use super::token::Token;

/// Splits raw USFM into an ordered sequence of marker and text-run tokens.
///
/// A marker starts at a backslash and extends to the end of its name, or to
/// the closing `*` for end markers. The whitespace after a marker belongs to
/// the following text run, so concatenating the token texts reproduces the
/// input byte for byte. A backslash not followed by a marker name is plain
/// text.
///
/// ## Example
///
/// ```not_rust
/// "\\v 1 In the beginning" -> [Marker("\\v"), TextRun(" 1 In the beginning")]
/// ```
#[must_use]
pub fn tokenize(usfm: &str) -> Vec<Token> {
    let bytes = usfm.as_bytes();
    let mut result = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    // Marker syntax is ASCII, so byte-wise scanning stays on char boundaries.
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }

        let mut end = i + 1;
        if end < bytes.len() && bytes[end] == b'+' {
            end += 1;
        }
        let name_start = end;
        while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
            end += 1;
        }

        if end == name_start {
            i += 1;
            continue;
        }

        if end < bytes.len() && bytes[end] == b'*' {
            end += 1;
        }

        if text_start < i {
            result.push(Token::TextRun(usfm[text_start..i].to_owned()));
        }
        result.push(Token::Marker(usfm[i..end].to_owned()));
        text_start = end;
        i = end;
    }

    if text_start < usfm.len() {
        result.push(Token::TextRun(usfm[text_start..].to_owned()));
    }

    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_verse_line() {
        assert_eq!(
            tokenize("\\v 1 In the beginning"),
            vec![
                Token::Marker("\\v".to_owned()),
                Token::TextRun(" 1 In the beginning".to_owned()),
            ]
        );
    }

    #[test]
    fn test_character_style_with_end_marker() {
        assert_eq!(
            tokenize("\\p the \\add very\\add* word"),
            vec![
                Token::Marker("\\p".to_owned()),
                Token::TextRun(" the ".to_owned()),
                Token::Marker("\\add".to_owned()),
                Token::TextRun(" very".to_owned()),
                Token::Marker("\\add*".to_owned()),
                Token::TextRun(" word".to_owned()),
            ]
        );
    }

    #[test]
    fn test_nested_marker() {
        assert_eq!(
            tokenize("\\add a \\+nd Lord\\+nd* b\\add*"),
            vec![
                Token::Marker("\\add".to_owned()),
                Token::TextRun(" a ".to_owned()),
                Token::Marker("\\+nd".to_owned()),
                Token::TextRun(" Lord".to_owned()),
                Token::Marker("\\+nd*".to_owned()),
                Token::TextRun(" b".to_owned()),
                Token::Marker("\\add*".to_owned()),
            ]
        );
    }

    #[test]
    fn test_lone_backslash_is_text() {
        assert_eq!(
            tokenize("a \\ b \\."),
            vec![Token::TextRun("a \\ b \\.".to_owned())]
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(tokenize(""), Vec::<Token>::new());
    }

    #[test_case("\\c 1\n\\p\n\\v 1 Text \\add here\\add*.")]
    #[test_case("malformed \\\\ \\9x \\v1b tail")]
    #[test_case("\\v 2-3 combined \\f + \\fr 1:2 \\f* note")]
    fn test_lossless(usfm: &str) {
        let reassembled: String = tokenize(usfm).iter().map(Token::text).collect();
        assert_eq!(reassembled, usfm);
    }
}
