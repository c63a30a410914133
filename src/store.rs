//! Collaborator seams for the persistence and notification layers the
//! engine talks to. The engine owns no storage of its own; callers bring an
//! implementation and the in-memory ones here back the tests and demos.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Storage key of one chapter: a translation, a book, and a chapter number.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChapterId {
    pub bible: String,
    pub book: String,
    pub chapter: u32,
}

impl ChapterId {
    #[must_use]
    pub fn new(bible: &str, book: &str, chapter: u32) -> Self {
        ChapterId {
            bible: bible.to_owned(),
            book: book.to_owned(),
            chapter,
        }
    }
}

/// A store of opaque USFM chapter blobs.
pub trait ChapterStore {
    fn get_chapter(&self, id: &ChapterId) -> Option<String>;
    fn store_chapter(&mut self, id: &ChapterId, usfm: &str);
    fn delete_chapter(&mut self, id: &ChapterId);
}

/// One verse's worth of recorded change, ready for a notification email or
/// a review UI.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseChange {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub old_html: String,
    pub diff_html: String,
    pub new_html: String,
}

/// A sink for per-verse change records.
pub trait ChangeLog {
    fn record(&mut self, change: VerseChange);
}

/// `BTreeMap`-backed chapter store: deterministic iteration, no
/// persistence.
#[derive(Debug, Default)]
pub struct MemoryChapterStore {
    chapters: BTreeMap<ChapterId, String>,
}

impl MemoryChapterStore {
    #[must_use]
    pub fn new() -> Self { MemoryChapterStore::default() }
}

impl ChapterStore for MemoryChapterStore {
    fn get_chapter(&self, id: &ChapterId) -> Option<String> { self.chapters.get(id).cloned() }

    fn store_chapter(&mut self, id: &ChapterId, usfm: &str) {
        self.chapters.insert(id.clone(), usfm.to_owned());
    }

    fn delete_chapter(&mut self, id: &ChapterId) { self.chapters.remove(id); }
}

/// Change log that keeps every record in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryChangeLog {
    changes: Vec<VerseChange>,
}

impl MemoryChangeLog {
    #[must_use]
    pub fn new() -> Self { MemoryChangeLog::default() }

    #[must_use]
    pub fn changes(&self) -> &[VerseChange] { &self.changes }
}

impl ChangeLog for MemoryChangeLog {
    fn record(&mut self, change: VerseChange) { self.changes.push(change); }
}
