use super::{edit_op::EditOp, myers::diff_slices};
use crate::tokenizer::word_tokenizer::{is_word, split_words};

/// Character-level similarity of two strings as a percentage in `0..=100`.
///
/// The score is the ratio of matched characters to the total characters
/// across both strings, derived from a byte-level edit script. Byte
/// granularity is the documented behavior: a multi-byte character that only
/// partially matches degrades the score instead of failing. Two empty
/// strings are fully similar.
#[must_use]
pub fn character_similarity(a: &str, b: &str) -> u8 {
    ratio(
        diff_slices(a.as_bytes(), b.as_bytes()),
        a.len() + b.len(),
    )
}

/// Word-level similarity of two strings as a percentage in `0..=100`:
/// the same ratio as `character_similarity`, computed over word tokens.
#[must_use]
pub fn word_similarity(a: &str, b: &str) -> u8 {
    let a_words: Vec<String> = split_words(a).into_iter().filter(|t| is_word(t)).collect();
    let b_words: Vec<String> = split_words(b).into_iter().filter(|t| is_word(t)).collect();
    let total = a_words.len() + b_words.len();

    ratio(diff_slices(&a_words, &b_words), total)
}

fn ratio<T>(script: Vec<EditOp<T>>, total: usize) -> u8
where
    T: PartialEq + Clone + std::fmt::Debug,
{
    if total == 0 {
        return 100;
    }

    let matched: usize = script
        .iter()
        .filter(|op| matches!(op, EditOp::Equal(_)))
        .map(EditOp::len)
        .sum();

    u8::try_from(2 * matched * 100 / total).unwrap_or(100)
}
