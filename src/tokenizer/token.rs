#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single unit of USFM markup: either a backslash marker or a run of
/// plain text.
///
/// The tokenizer performs no validation; anything not matching marker
/// syntax comes through verbatim as a `TextRun`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A backslash marker such as `\v` or `\add*`, including the backslash
    /// and the closing `*` when present.
    Marker(String),
    /// Plain text between markers, whitespace and newlines included.
    TextRun(String),
}

impl Token {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Token::Marker(text) | Token::TextRun(text) => text,
        }
    }

    #[must_use]
    pub fn is_marker(&self) -> bool { matches!(self, Token::Marker(_)) }

    /// The marker's base name: no backslash, no nesting `+`, no level
    /// digits, no closing `*`. `\+add*` and `\q2` give `add` and `q`.
    #[must_use]
    pub fn marker_name(&self) -> Option<&str> {
        match self {
            Token::Marker(text) => {
                let name = text.trim_start_matches('\\').trim_start_matches('+');
                let end = name
                    .find(|c: char| !c.is_ascii_alphabetic())
                    .unwrap_or(name.len());
                Some(&name[..end])
            }
            Token::TextRun(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case(r"\v", "v")]
    #[test_case(r"\q2", "q")]
    #[test_case(r"\add*", "add")]
    #[test_case(r"\+nd*", "nd")]
    fn test_marker_name(marker: &str, expected: &str) {
        assert_eq!(
            Token::Marker(marker.to_owned()).marker_name(),
            Some(expected)
        );
    }

    #[test]
    fn test_text_run_has_no_marker_name() {
        assert_eq!(Token::TextRun(" hello".to_owned()).marker_name(), None);
    }
}
