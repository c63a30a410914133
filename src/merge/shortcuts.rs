//! Whole-text short-circuit rules evaluated before any line-level work, in
//! a fixed priority order. Each rule is independently testable and either
//! settles the merge completely or passes.

use crate::{
    diff::similarity::character_similarity,
    merge::{
        MergeOptions,
        conflict::{ConflictRecord, Merged},
    },
};

/// Character similarity against base at or above which a side counts as
/// essentially unchanged for the wholesale-rewrite rule.
const ESSENTIALLY_UNCHANGED: u8 = 95;

/// Runs the short-circuit rules in priority order: identical edits, one
/// side empty, wholesale rewrite.
pub fn apply(base: &str, user: &str, server: &str, options: &MergeOptions) -> Option<Merged> {
    identical_edits(user, server)
        .or_else(|| one_side_empty(base, user, server))
        .or_else(|| wholesale_rewrite(base, user, server, options))
}

/// Both sides arrived at the same text; the base does not matter.
fn identical_edits(user: &str, server: &str) -> Option<Merged> {
    (user == server).then(|| Merged {
        text: user.to_owned(),
        conflicts: Vec::new(),
    })
}

/// Exactly one side is empty: prefer the side with content. An emptied
/// chapter racing real edits almost always means a client lost state, and
/// content must never be discarded silently; when the emptying was a
/// deliberate change from base it is reported as a conflict.
fn one_side_empty(base: &str, user: &str, server: &str) -> Option<Merged> {
    let user_empty = user.trim().is_empty();
    let server_empty = server.trim().is_empty();

    if user_empty == server_empty {
        return None;
    }

    let winner = if user_empty { server } else { user };
    let loser = if user_empty { user } else { server };

    log::debug!("one side is empty, keeping the non-empty side");

    let conflicts = if loser == base {
        Vec::new()
    } else {
        vec![ConflictRecord {
            base: base.to_owned(),
            user: user.to_owned(),
            server: server.to_owned(),
            resolved: winner.to_owned(),
            location: None,
        }]
    };

    Some(Merged {
        text: winner.to_owned(),
        conflicts,
    })
}

/// One side grew far beyond the base while the other stayed essentially
/// unchanged: the grown side is a superseding rewrite (a regenerated
/// chapter), and fine-grained merging against it is not meaningful. The
/// other side's minor changes are reported as a conflict rather than
/// dropped silently.
fn wholesale_rewrite(base: &str, user: &str, server: &str, options: &MergeOptions) -> Option<Merged> {
    let grew = |side: &str| side.len() > base.len().saturating_mul(options.rewrite_ratio);
    let essentially_unchanged =
        |side: &str| character_similarity(base, side) >= ESSENTIALLY_UNCHANGED;

    let (winner, loser) = if grew(user) && essentially_unchanged(server) {
        (user, server)
    } else if grew(server) && essentially_unchanged(user) {
        (server, user)
    } else {
        return None;
    };

    log::debug!(
        "text grew beyond {}x the base, treating it as a superseding rewrite",
        options.rewrite_ratio
    );

    let conflicts = if loser == base {
        Vec::new()
    } else {
        vec![ConflictRecord {
            base: base.to_owned(),
            user: user.to_owned(),
            server: server.to_owned(),
            resolved: winner.to_owned(),
            location: None,
        }]
    };

    Some(Merged {
        text: winner.to_owned(),
        conflicts,
    })
}
