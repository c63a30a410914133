/// Splits text into alternating runs of non-whitespace and whitespace
/// characters. Punctuation and hyphens stay attached to their word, so
/// `(1st)` and `Beth-lehem` are single tokens. Concatenating the tokens
/// reproduces the input.
///
/// ## Example
///
/// ```not_rust
/// "Hi there!" -> ["Hi", " ", "there!"]
/// ```
#[must_use]
pub fn split_words(text: &str) -> Vec<String> {
    let mut result = Vec::new();

    let mut previous_boundary_index = 0;
    let mut previous_char_is_whitespace = text.chars().next().is_none_or(char::is_whitespace);

    for (i, c) in text.char_indices() {
        let is_current_char_whitespace = c.is_whitespace();
        if previous_char_is_whitespace != is_current_char_whitespace {
            result.push(text[previous_boundary_index..i].to_owned());
            previous_boundary_index = i;
        }

        previous_char_is_whitespace = is_current_char_whitespace;
    }

    if previous_boundary_index < text.len() {
        result.push(text[previous_boundary_index..].to_owned());
    }

    result
}

/// Whether a `split_words` token is a word rather than a whitespace run.
#[must_use]
pub fn is_word(token: &str) -> bool { token.chars().any(|c| !c.is_whitespace()) }

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_words_and_whitespace_alternate() {
        assert_eq!(split_words("Hi there!"), vec!["Hi", " ", "there!"]);
    }

    #[test]
    fn test_leading_and_trailing_whitespace() {
        assert_eq!(split_words(" what? "), vec![" ", "what?", " "]);
    }

    #[test]
    fn test_punctuation_stays_attached() {
        assert_eq!(
            split_words("the (1st) Beth-lehem;"),
            vec!["the", " ", "(1st)", " ", "Beth-lehem;"]
        );
    }

    #[test]
    fn test_newlines_are_whitespace_runs() {
        assert_eq!(split_words("a \nb"), vec!["a", " \n", "b"]);
    }

    #[test]
    fn test_empty() {
        assert_eq!(split_words(""), Vec::<String>::new());
    }

    #[test]
    fn test_lossless() {
        let text = " hello, \nwhere are you? ";
        assert_eq!(split_words(text).concat(), text);
    }
}
