use crate::{
    diff::{edit_op::EditOp, myers::diff_slices},
    tokenizer::word_tokenizer::{is_word, split_words},
};

/// A word-level diff rendered as an inline HTML fragment: removed runs are
/// struck through, added runs are bold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDiff {
    pub html: String,
    pub removed_words: Vec<String>,
    pub added_words: Vec<String>,
}

const REMOVED_OPEN: &str = "<span style=\"text-decoration: line-through;\">";
const ADDED_OPEN: &str = "<span style=\"font-weight: bold;\">";
const SPAN_CLOSE: &str = "</span>";

/// Renders the word-level difference between two texts as an inline HTML
/// fragment, and reports the exact removed and added words.
///
/// Whitespace runs travel with the diff but are not reported as words.
/// Input text is HTML-escaped; the only markup in the output are the two
/// kinds of span.
#[must_use]
pub fn diff_html(old: &str, new: &str) -> RenderedDiff {
    let old_tokens = split_words(old);
    let new_tokens = split_words(new);

    let mut html = String::new();
    let mut removed_words = Vec::new();
    let mut added_words = Vec::new();

    for op in diff_slices(&old_tokens, &new_tokens) {
        match op {
            EditOp::Equal(run) => html.push_str(&escape(&run.concat())),
            EditOp::Delete(run) => {
                removed_words.extend(run.iter().filter(|t| is_word(t)).cloned());
                wrap(&mut html, REMOVED_OPEN, &run.concat());
            }
            EditOp::Insert(run) => {
                added_words.extend(run.iter().filter(|t| is_word(t)).cloned());
                wrap(&mut html, ADDED_OPEN, &run.concat());
            }
        }
    }

    RenderedDiff {
        html,
        removed_words,
        added_words,
    }
}

fn wrap(html: &mut String, open: &str, content: &str) {
    html.push_str(open);
    html.push_str(&escape(content));
    html.push_str(SPAN_CLOSE);
}

/// Escapes the characters HTML treats specially.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}
