use std::fmt::Debug;

use crate::diff::{
    changes::{AnchoredChange, anchored_changes, apply_changes},
    myers::diff_slices,
};

/// Merges two concurrent edits of the same base sequence when their changes
/// are identical or touch disjoint spans.
///
/// Identical changes from both sides are applied once. Returns `None` as
/// soon as any pair of changes contends for the same span; the caller
/// escalates to a finer granularity or records a conflict.
pub fn disjoint_union<T>(base: &[T], user: &[T], server: &[T]) -> Option<Vec<T>>
where
    T: PartialEq + Clone + Debug,
{
    let user_changes = anchored_changes(diff_slices(base, user));
    let server_changes = anchored_changes(diff_slices(base, server));

    let combined = combine_changes(user_changes, server_changes)?;
    Some(apply_changes(base, &combined))
}

/// Interleaves two per-side change lists into one applicable list, or
/// `None` when the sides contend.
pub fn combine_changes<T>(
    user_changes: Vec<AnchoredChange<T>>,
    server_changes: Vec<AnchoredChange<T>>,
) -> Option<Vec<AnchoredChange<T>>>
where
    T: PartialEq + Clone + Debug,
{
    // Changes both sides made identically are no contention.
    let server_changes: Vec<AnchoredChange<T>> = server_changes
        .into_iter()
        .filter(|change| !user_changes.contains(change))
        .collect();

    for user_change in &user_changes {
        for server_change in &server_changes {
            if user_change.overlaps(server_change) {
                return None;
            }
        }
    }

    // Each side's list is already sorted; interleave by position, pure
    // insertions ahead of the span they precede, user first on exact ties.
    let mut result = Vec::with_capacity(user_changes.len() + server_changes.len());
    let mut user_iter = user_changes.into_iter().peekable();
    let mut server_iter = server_changes.into_iter().peekable();

    loop {
        match (user_iter.peek(), server_iter.peek()) {
            (Some(user_change), Some(server_change)) => {
                if user_change.sort_key() <= server_change.sort_key() {
                    result.push(user_iter.next().expect("peeked"));
                } else {
                    result.push(server_iter.next().expect("peeked"));
                }
            }
            (Some(_), None) => result.push(user_iter.next().expect("peeked")),
            (None, Some(_)) => result.push(server_iter.next().expect("peeked")),
            (None, None) => break,
        }
    }

    Some(result)
}
