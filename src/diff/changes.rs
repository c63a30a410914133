use std::fmt::Debug;

use super::edit_op::EditOp;

/// A contiguous change anchored on the base sequence: the `base_len` items
/// starting at `base_start` are replaced by `insert`. A pure insertion has
/// `base_len == 0`, a pure deletion an empty `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchoredChange<T>
where
    T: PartialEq + Clone + Debug,
{
    pub base_start: usize,
    pub base_len: usize,
    pub insert: Vec<T>,
}

impl<T> AnchoredChange<T>
where
    T: PartialEq + Clone + Debug,
{
    #[must_use]
    pub fn base_end(&self) -> usize { self.base_start + self.base_len }

    /// Whether two changes from different sides contend for the same base
    /// span. Sharing a boundary is fine; two pure insertions contend only
    /// when they land on the same point.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.base_len == 0 && other.base_len == 0 {
            return self.base_start == other.base_start;
        }

        self.base_start < other.base_end() && other.base_start < self.base_end()
    }

    /// Application order: by position, pure insertions ahead of the span
    /// they precede.
    #[must_use]
    pub fn sort_key(&self) -> (usize, usize) {
        (self.base_start, usize::from(self.base_len != 0))
    }
}

/// Converts a normalized edit script into base-anchored changes. Adjacent
/// delete and insert runs between two equal runs fold into one change.
#[must_use]
pub fn anchored_changes<T>(script: Vec<EditOp<T>>) -> Vec<AnchoredChange<T>>
where
    T: PartialEq + Clone + Debug,
{
    let mut result = Vec::new();
    let mut pending: Option<AnchoredChange<T>> = None;
    let mut base_index = 0;

    for op in script {
        match op {
            EditOp::Equal(run) => {
                if let Some(change) = pending.take() {
                    result.push(change);
                }
                base_index += run.len();
            }
            EditOp::Delete(run) => {
                let change = pending.get_or_insert_with(|| AnchoredChange {
                    base_start: base_index,
                    base_len: 0,
                    insert: Vec::new(),
                });
                change.base_len += run.len();
                base_index += run.len();
            }
            EditOp::Insert(run) => {
                let change = pending.get_or_insert_with(|| AnchoredChange {
                    base_start: base_index,
                    base_len: 0,
                    insert: Vec::new(),
                });
                change.insert.extend(run);
            }
        }
    }

    if let Some(change) = pending {
        result.push(change);
    }

    result
}

/// Applies changes to the base sequence. The changes must be sorted by
/// `base_start`, non-overlapping, and within bounds.
#[must_use]
pub fn apply_changes<T>(base: &[T], changes: &[AnchoredChange<T>]) -> Vec<T>
where
    T: PartialEq + Clone + Debug,
{
    let mut result = Vec::new();
    let mut base_index = 0;

    for change in changes {
        debug_assert!(base_index <= change.base_start, "Changes must not overlap");

        result.extend_from_slice(&base[base_index..change.base_start]);
        result.extend(change.insert.iter().cloned());
        base_index = change.base_end();
    }

    result.extend_from_slice(&base[base_index..]);
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::diff::myers::diff_slices;

    fn chars(text: &str) -> Vec<char> { text.chars().collect() }

    #[test]
    fn test_replacement_folds_into_one_change() {
        let changes = anchored_changes(diff_slices(&chars("abcd"), &chars("axd")));
        assert_eq!(
            changes,
            vec![AnchoredChange {
                base_start: 1,
                base_len: 2,
                insert: vec!['x'],
            }]
        );
    }

    #[test]
    fn test_pure_insertion() {
        let changes = anchored_changes(diff_slices(&chars("ad"), &chars("abcd")));
        assert_eq!(
            changes,
            vec![AnchoredChange {
                base_start: 1,
                base_len: 0,
                insert: vec!['b', 'c'],
            }]
        );
    }

    #[test]
    fn test_round_trip_through_apply() {
        let old = chars("the quick brown fox");
        let new = chars("a quick red fox!");
        let changes = anchored_changes(diff_slices(&old, &new));
        assert_eq!(apply_changes(&old, &changes), new);
    }

    #[test]
    fn test_overlap_rules() {
        let deletion = AnchoredChange {
            base_start: 2,
            base_len: 3,
            insert: Vec::<char>::new(),
        };
        let touching = AnchoredChange {
            base_start: 5,
            base_len: 1,
            insert: vec!['x'],
        };
        let inside = AnchoredChange {
            base_start: 3,
            base_len: 0,
            insert: vec!['y'],
        };
        let boundary_insert = AnchoredChange {
            base_start: 2,
            base_len: 0,
            insert: vec!['z'],
        };

        assert!(!deletion.overlaps(&touching));
        assert!(deletion.overlaps(&inside));
        assert!(!deletion.overlaps(&boundary_insert));
        assert!(inside.overlaps(&inside.clone()));
    }
}
