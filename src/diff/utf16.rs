#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{edit_op::EditOp, myers::diff_slices};
use crate::tokenizer::grapheme_tokenizer::split_graphemes;

/// One changed region of a grapheme-level diff, positioned for a rich-text
/// editor that addresses text in UTF-16 code units.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utf16Change {
    /// Offset into the new text, in UTF-16 code units. A deletion is
    /// reported at the point where the removed content would have appeared.
    pub position: usize,
    /// Size of `content` in UTF-16 code units.
    pub size: usize,
    /// `true` for an insertion, `false` for a deletion.
    pub is_addition: bool,
    /// The literal inserted or deleted text.
    pub content: String,
}

/// A grapheme-level diff with UTF-16 positions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Utf16Diff {
    pub changes: Vec<Utf16Change>,
    /// How many of `changes` are pure newline placement: paragraph reflow
    /// rather than content edits.
    pub newline_changes: usize,
}

/// Diffs two strings at grapheme-cluster granularity.
///
/// Multi-code-unit clusters (combining sequences, emoji) are single diff
/// units and are never split; a non-BMP emoji shows up as one change of
/// size 2.
#[must_use]
pub fn utf16_diff(old: &str, new: &str) -> Utf16Diff {
    let script = diff_slices(&split_graphemes(old), &split_graphemes(new));

    let mut result = Utf16Diff::default();
    let mut position = 0;

    for op in script {
        match op {
            EditOp::Equal(run) => {
                position += utf16_len_of_run(&run);
            }
            EditOp::Delete(run) => {
                let content = run.concat();
                result.push_change(Utf16Change {
                    position,
                    size: utf16_len(&content),
                    is_addition: false,
                    content,
                });
            }
            EditOp::Insert(run) => {
                let content = run.concat();
                let size = utf16_len(&content);
                result.push_change(Utf16Change {
                    position,
                    size,
                    is_addition: true,
                    content,
                });
                position += size;
            }
        }
    }

    result
}

impl Utf16Diff {
    fn push_change(&mut self, change: Utf16Change) {
        if is_newline_only(&change.content) {
            self.newline_changes += 1;
        }
        self.changes.push(change);
    }
}

fn utf16_len(text: &str) -> usize { text.encode_utf16().count() }

fn utf16_len_of_run(run: &[String]) -> usize { run.iter().map(|g| utf16_len(g)).sum() }

fn is_newline_only(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| matches!(c, '\n' | '\r'))
}
