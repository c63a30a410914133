use crate::{
    diff::{
        changes::{AnchoredChange, anchored_changes, apply_changes},
        myers::diff_slices,
    },
    merge::{conflict::ConflictRecord, span_merge::disjoint_union},
    tokenizer::{
        grapheme_tokenizer::split_graphemes,
        line_tokenizer::{join_lines, split_lines},
        word_tokenizer::split_words,
    },
};

type LineChange = AnchoredChange<String>;

/// Reconciles two concurrent edits of the same base line sequence.
///
/// Identical changes apply once, changes on disjoint line spans union, and
/// contended spans are resolved by escalating to word- then
/// grapheme-granularity disjoint union. A span that still contends at
/// grapheme level goes to the server, and a `ConflictRecord` for the region
/// is appended.
pub fn merge_lines(
    base: &[String],
    user: &[String],
    server: &[String],
    conflicts: &mut Vec<ConflictRecord>,
) -> Vec<String> {
    let user_changes = anchored_changes(diff_slices(base, user));
    let server_changes: Vec<LineChange> = anchored_changes(diff_slices(base, server))
        .into_iter()
        .filter(|change| !user_changes.contains(change))
        .collect();

    let effective: Vec<LineChange> = group_changes(user_changes, server_changes)
        .into_iter()
        .map(|group| resolve_group(base, group, conflicts))
        .collect();

    apply_changes(base, &effective)
}

/// Changes from both sides that contend for one base span, in position
/// order. Most groups hold a single change from a single side.
struct Group {
    user: Vec<LineChange>,
    server: Vec<LineChange>,
}

impl Group {
    fn new(is_user: bool, change: LineChange) -> Self {
        let mut group = Group {
            user: Vec::new(),
            server: Vec::new(),
        };
        group.side_mut(is_user).push(change);
        group
    }

    fn side_mut(&mut self, is_user: bool) -> &mut Vec<LineChange> {
        if is_user { &mut self.user } else { &mut self.server }
    }

    fn contends_with(&self, is_user: bool, change: &LineChange) -> bool {
        let opposite = if is_user { &self.server } else { &self.user };
        opposite.iter().any(|member| member.overlaps(change))
    }

    fn span(&self) -> (usize, usize) {
        let members = || self.user.iter().chain(self.server.iter());
        let start = members().map(|c| c.base_start).min().unwrap_or(0);
        let end = members().map(AnchoredChange::base_end).max().unwrap_or(0);
        (start, end)
    }
}

/// Interleaves the two sorted per-side change lists and groups changes that
/// transitively contend. Sorted by position, a change can only contend with
/// the most recent group.
fn group_changes(user_changes: Vec<LineChange>, server_changes: Vec<LineChange>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();

    let mut user_iter = user_changes.into_iter().peekable();
    let mut server_iter = server_changes.into_iter().peekable();

    loop {
        let is_user = match (user_iter.peek(), server_iter.peek()) {
            (Some(user_change), Some(server_change)) => {
                user_change.sort_key() <= server_change.sort_key()
            }
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let change = if is_user {
            user_iter.next().expect("peeked")
        } else {
            server_iter.next().expect("peeked")
        };

        match groups.last_mut() {
            Some(group) if group.contends_with(is_user, &change) => {
                group.side_mut(is_user).push(change);
            }
            _ => groups.push(Group::new(is_user, change)),
        }
    }

    groups
}

fn resolve_group(
    base: &[String],
    group: Group,
    conflicts: &mut Vec<ConflictRecord>,
) -> LineChange {
    if group.server.is_empty() {
        return sole_member(group.user);
    }
    if group.user.is_empty() {
        return sole_member(group.server);
    }

    let (span_start, span_end) = group.span();
    let base_region = &base[span_start..span_end];
    let user_region = apply_changes(base_region, &rebase(group.user, span_start));
    let server_region = apply_changes(base_region, &rebase(group.server, span_start));

    let insert = resolve_region(base_region, &user_region, &server_region, conflicts);

    AnchoredChange {
        base_start: span_start,
        base_len: span_end - span_start,
        insert,
    }
}

fn sole_member(mut changes: Vec<LineChange>) -> LineChange {
    debug_assert_eq!(
        changes.len(),
        1,
        "A one-sided group cannot have formed around contention"
    );
    changes.remove(0)
}

fn rebase(changes: Vec<LineChange>, span_start: usize) -> Vec<LineChange> {
    changes
        .into_iter()
        .map(|change| AnchoredChange {
            base_start: change.base_start - span_start,
            ..change
        })
        .collect()
}

/// Resolves one contended region: word-level disjoint union first, then
/// grapheme-level, then the server's side with a conflict record.
fn resolve_region(
    base_region: &[String],
    user_region: &[String],
    server_region: &[String],
    conflicts: &mut Vec<ConflictRecord>,
) -> Vec<String> {
    if user_region == server_region {
        return user_region.to_vec();
    }

    let base_text = join_lines(base_region);
    let user_text = join_lines(user_region);
    let server_text = join_lines(server_region);

    if let Some(tokens) = disjoint_union(
        &split_words(&base_text),
        &split_words(&user_text),
        &split_words(&server_text),
    ) {
        return split_lines(&tokens.concat());
    }

    if let Some(tokens) = disjoint_union(
        &split_graphemes(&base_text),
        &split_graphemes(&user_text),
        &split_graphemes(&server_text),
    ) {
        return split_lines(&tokens.concat());
    }

    log::debug!("unresolvable contention, keeping the server's region");
    conflicts.push(ConflictRecord {
        base: base_text,
        user: user_text,
        server: server_text.clone(),
        resolved: server_text,
        location: None,
    });

    server_region.to_vec()
}
