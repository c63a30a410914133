//! Call-site concurrency control and the client/cloud reconciliation flow.
//!
//! The merge engine is pure; this module owns what its callers need around
//! it: at most one merge per chapter store at a time, with a bounded wait
//! so a busy cycle is skipped and logged instead of piling up behind a
//! long-running notification pass.

use std::{
    sync::{Mutex, MutexGuard, TryLockError},
    thread,
    time::{Duration, Instant},
};

use thiserror::Error;

use crate::{
    merge::{Merged, MergeOptions, merge},
    store::{ChapterId, ChapterStore},
};

/// How long `sync_chapter` waits for the store before giving up.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(200);

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A mutual-exclusion lock owning the value it protects, acquired with a
/// bounded wait. An explicit object to be passed to whoever needs the
/// exclusion, not a process-wide global.
#[derive(Debug, Default)]
pub struct TimedLock<T> {
    value: Mutex<T>,
}

impl<T> TimedLock<T> {
    pub fn new(value: T) -> Self {
        TimedLock {
            value: Mutex::new(value),
        }
    }

    /// Acquires the lock, polling until `timeout` has elapsed. `None` means
    /// the holder did not release in time; the caller should skip its cycle
    /// rather than wait longer.
    pub fn try_lock_for(&self, timeout: Duration) -> Option<MutexGuard<'_, T>> {
        let deadline = Instant::now() + timeout;

        loop {
            match self.value.try_lock() {
                Ok(guard) => return Some(guard),
                // A poisoned lock only means another thread panicked while
                // holding it; the protected value is plain data.
                Err(TryLockError::Poisoned(poisoned)) => return Some(poisoned.into_inner()),
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        return None;
                    }
                    thread::sleep(LOCK_POLL_INTERVAL.min(timeout));
                }
            }
        }
    }

    pub fn into_inner(self) -> T {
        self.value
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[derive(Error, Debug)]
pub enum SyncError {
    /// Another merge held the chapter store for the whole wait. The cycle
    /// should be skipped and retried later.
    #[error("chapter store is busy, gave up after {waited_ms} ms")]
    Busy { waited_ms: u128 },
}

/// Reconciles client edits with the chapter store, one chapter at a time.
///
/// Owns the store behind a [`TimedLock`], so concurrent callers serialize
/// and a caller that cannot get the lock in time skips its cycle instead of
/// blocking a request thread.
#[derive(Debug)]
pub struct Synchronizer<S> {
    store: TimedLock<S>,
    options: MergeOptions,
    lock_timeout: Duration,
}

impl<S> Synchronizer<S>
where
    S: ChapterStore,
{
    pub fn new(store: S, options: MergeOptions) -> Self {
        Synchronizer {
            store: TimedLock::new(store),
            options,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    #[must_use]
    pub fn store(&self) -> &TimedLock<S> { &self.store }

    pub fn into_store(self) -> S { self.store.into_inner() }

    /// Merges a client's edit of one chapter with whatever the store holds
    /// now and persists the result.
    ///
    /// `base` is the last version the client synchronized from; the store's
    /// current text stands in for the server side. Conflicts come back
    /// tagged with book and chapter so the caller can notify the affected
    /// user; the persisted text is the merge result, server side preferred.
    ///
    /// # Errors
    ///
    /// [`SyncError::Busy`] when the store lock could not be acquired within
    /// the configured timeout. Nothing is read or written in that case.
    pub fn sync_chapter(
        &self,
        id: &ChapterId,
        base: &str,
        user_text: &str,
    ) -> Result<Merged, SyncError> {
        let Some(mut store) = self.store.try_lock_for(self.lock_timeout) else {
            log::warn!(
                "skipping sync of {} {} {}: chapter store is busy",
                id.bible,
                id.book,
                id.chapter
            );
            return Err(SyncError::Busy {
                waited_ms: self.lock_timeout.as_millis(),
            });
        };

        let server_text = store.get_chapter(id).unwrap_or_else(|| base.to_owned());
        let mut merged = merge(base, user_text, &server_text, &self.options);

        for conflict in &mut merged.conflicts {
            conflict.location = Some(format!("{} {}", id.book, id.chapter));
        }
        if !merged.conflicts.is_empty() {
            log::info!(
                "sync of {} {} {} produced {} conflict(s)",
                id.bible,
                id.book,
                id.chapter,
                merged.conflicts.len()
            );
        }

        store.store_chapter(id, &merged.text);
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::MemoryChapterStore;

    fn genesis_one() -> ChapterId { ChapterId::new("KJV", "Genesis", 1) }

    #[test]
    fn test_sync_merges_and_persists() {
        let base = "\\c 1\n\\v 1 In the beginning\n\\v 2 And the earth";
        let mut store = MemoryChapterStore::new();
        store.store_chapter(&genesis_one(), "\\c 1\n\\v 1 In the beginning\n\\v 2 And the earth!");

        let synchronizer = Synchronizer::new(store, MergeOptions::default());
        let merged = synchronizer
            .sync_chapter(
                &genesis_one(),
                base,
                "\\c 1\n\\v 1 In the very beginning\n\\v 2 And the earth",
            )
            .unwrap();

        assert_eq!(
            merged.text,
            "\\c 1\n\\v 1 In the very beginning\n\\v 2 And the earth!"
        );
        assert_eq!(merged.conflicts, Vec::new());

        let store = synchronizer.into_store();
        assert_eq!(
            store.get_chapter(&genesis_one()),
            Some("\\c 1\n\\v 1 In the very beginning\n\\v 2 And the earth!".to_owned())
        );
    }

    #[test]
    fn test_first_sync_of_unknown_chapter_stores_user_text() {
        let synchronizer = Synchronizer::new(MemoryChapterStore::new(), MergeOptions::default());
        let merged = synchronizer
            .sync_chapter(&genesis_one(), "", "\\c 1\n\\v 1 New translation")
            .unwrap();

        assert_eq!(merged.text, "\\c 1\n\\v 1 New translation");
        assert_eq!(merged.conflicts, Vec::new());
    }

    #[test]
    fn test_conflicts_come_back_located() {
        let base = "\\v 1 And God said it was good";
        let mut store = MemoryChapterStore::new();
        store.store_chapter(&genesis_one(), "\\v 1 And God said; it was good");

        let synchronizer = Synchronizer::new(store, MergeOptions::default());
        let merged = synchronizer
            .sync_chapter(&genesis_one(), base, "\\v 1 And God was good")
            .unwrap();

        assert_eq!(merged.conflicts.len(), 1);
        assert_eq!(
            merged.conflicts[0].location.as_deref(),
            Some("Genesis 1")
        );
    }

    #[test]
    fn test_busy_store_skips_the_cycle() {
        let synchronizer = Synchronizer::new(MemoryChapterStore::new(), MergeOptions::default())
            .with_lock_timeout(Duration::from_millis(20));

        let _held = synchronizer.store().try_lock_for(Duration::from_millis(20));
        let result = synchronizer.sync_chapter(&genesis_one(), "", "\\v 1 a");

        assert!(matches!(result, Err(SyncError::Busy { .. })));
    }

    #[test]
    fn test_timed_lock_hands_out_the_value() {
        let lock = TimedLock::new(7);
        {
            let mut guard = lock.try_lock_for(Duration::from_millis(10)).unwrap();
            *guard += 1;
        }
        assert_eq!(lock.into_inner(), 8);
    }
}
