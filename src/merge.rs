mod conflict;
mod line_merge;
mod shortcuts;
mod span_merge;
mod verse_align;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use conflict::{ConflictRecord, Merged};

use crate::tokenizer::line_tokenizer::{join_lines, split_lines};

/// Tuning for the three-way merge.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Align lines by the verses they cover instead of by position, so a
    /// verse split or join on one side does not read as wholesale deletion
    /// and insertion.
    pub verse_alignment: bool,
    /// A side longer than this many times the base, with the other side
    /// essentially unchanged, supersedes the base outright.
    pub rewrite_ratio: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            verse_alignment: true,
            rewrite_ratio: 3,
        }
    }
}

/// Reconciles two divergent versions of a chapter against their common
/// ancestor.
///
/// The `user` and `server` texts are both derived from `base`. Changes made
/// by only one side apply directly; changes both sides made identically
/// apply once. Where the sides contend for the same span, the merge narrows
/// from lines to words to grapheme clusters, unioning non-overlapping
/// changes at each level. A span still contended at grapheme level goes to
/// the server, and a [`ConflictRecord`] carrying all three texts is
/// returned so the overridden edit stays observable.
///
/// The function is pure and deterministic: identical inputs give
/// byte-identical output, and malformed USFM degrades to marker-agnostic
/// text merging rather than failing.
///
/// ```
/// use usfm_merge::{MergeOptions, merge};
///
/// let base = "\\v 1 In the beginning God created the heaven and the earth.";
/// let user = "\\v 1 In the beginning God made the heaven and the earth.";
/// let server = "\\v 1 In the beginning God created the heavens and the earth.";
///
/// let merged = merge(base, user, server, &MergeOptions::default());
/// assert_eq!(
///     merged.text,
///     "\\v 1 In the beginning God made the heavens and the earth."
/// );
/// assert!(merged.conflicts.is_empty());
/// ```
#[must_use]
pub fn merge(base: &str, user: &str, server: &str, options: &MergeOptions) -> Merged {
    if let Some(merged) = shortcuts::apply(base, user, server, options) {
        return merged;
    }

    let base_lines = split_lines(base);
    let user_lines = split_lines(user);
    let server_lines = split_lines(server);

    let mut conflicts = Vec::new();
    let merged_lines = if options.verse_alignment {
        verse_align::merge_aligned(&base_lines, &user_lines, &server_lines, &mut conflicts)
    } else {
        line_merge::merge_lines(&base_lines, &user_lines, &server_lines, &mut conflicts)
    };

    Merged {
        text: join_lines(&merged_lines),
        conflicts,
    }
}
