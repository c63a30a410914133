//! Three-way merge and diff engine for collaboratively edited USFM Bible
//! text.
//!
//! A chapter edited concurrently by a client and the cloud (or by two
//! collaborators) is reconciled against their common ancestor line by line,
//! word by word, then grapheme by grapheme. Contended spans resolve in the
//! server's favor and are reported as [`ConflictRecord`]s, never dropped
//! silently. The same differs drive human-readable HTML change fragments,
//! UTF-16-addressed editor diffs, and bulk per-verse change exports.
//!
//! ```
//! use usfm_merge::{MergeOptions, merge};
//!
//! let base = "\\v 1 the quick brown fox";
//! let user = "\\v 1 the slow brown fox";
//! let server = "\\v 1 the quick brown cat";
//!
//! let merged = merge(base, user, server, &MergeOptions::default());
//! assert_eq!(merged.text, "\\v 1 the slow brown cat");
//! assert!(merged.conflicts.is_empty());
//! ```

pub mod diff;
pub mod export;
pub mod merge;
pub mod render;
pub mod store;
pub mod sync;
pub mod tokenizer;

pub use diff::{
    edit_op::EditOp,
    myers::diff_slices,
    similarity::{character_similarity, word_similarity},
    utf16::{Utf16Change, Utf16Diff, utf16_diff},
};
pub use export::{
    ChapterChange, ExportError, ExportSummary, export_verse_level, log_chapter_changes,
};
pub use merge::{ConflictRecord, Merged, MergeOptions, merge};
pub use render::{RenderedDiff, diff_html};
pub use store::{
    ChangeLog, ChapterId, ChapterStore, MemoryChangeLog, MemoryChapterStore, VerseChange,
};
pub use sync::{SyncError, Synchronizer, TimedLock};
pub use tokenizer::{token::Token, usfm_tokenizer::tokenize};
