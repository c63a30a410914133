#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An unresolved three-way conflict, reported with its deterministic
/// default resolution.
///
/// The engine fills in the three input texts for the conflicting region and
/// the text it chose (the server's side). It is passage-agnostic: `location`
/// stays `None` until a caller tags the record with book and chapter.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictRecord {
    pub base: String,
    pub user: String,
    pub server: String,
    pub resolved: String,
    pub location: Option<String>,
}

impl ConflictRecord {
    #[must_use]
    pub fn with_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }
}

/// The outcome of a three-way merge: the reconciled text and every conflict
/// that had to be resolved by preferring one side.
///
/// The conflict list is returned by value; the engine never logs, mails, or
/// persists it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub text: String,
    pub conflicts: Vec<ConflictRecord>,
}
