//! Verse-aware line alignment.
//!
//! Positional line diffing sees a verse split or join (`\v 1` + `\v 2`
//! rewritten as `\v 1-2`) as unrelated deletions and insertions and
//! manufactures conflicts out of it. This pre-pass cuts the three line
//! sequences into segments whose verse coverage agrees and merges each
//! segment on its own, so re-combined verses align with the verses they
//! cover.

use std::ops::Range;

use crate::{
    merge::{conflict::ConflictRecord, line_merge::merge_lines},
    tokenizer::line_tokenizer::verse_range,
};

/// Merges with verse alignment, falling back to plain positional merging
/// when any side's verse numbering is missing, unparseable, or regressing.
pub fn merge_aligned(
    base: &[String],
    user: &[String],
    server: &[String],
    conflicts: &mut Vec<ConflictRecord>,
) -> Vec<String> {
    match aligned_segments(base, user, server) {
        Some(segments) => segments
            .into_iter()
            .flat_map(|[base_range, user_range, server_range]| {
                merge_lines(
                    &base[base_range],
                    &user[user_range],
                    &server[server_range],
                    conflicts,
                )
            })
            .collect(),
        None => merge_lines(base, user, server, conflicts),
    }
}

/// A run of lines introduced by one verse marker (or the material before
/// the first one), with the last verse number it covers.
struct Block {
    end_verse: u32,
    lines: Range<usize>,
}

/// Cuts a line sequence into verse blocks. `None` when verse numbers
/// regress, in which case positional merging is safer.
fn verse_blocks(lines: &[String]) -> Option<Vec<Block>> {
    let mut result = Vec::new();
    let mut block_start = 0;
    let mut block_end_verse = 0;
    let mut previous_verse_start = 0;

    for (i, line) in lines.iter().enumerate() {
        if let Some((from, to)) = verse_range(line) {
            if from < previous_verse_start {
                return None;
            }
            previous_verse_start = from;

            if i > block_start {
                result.push(Block {
                    end_verse: block_end_verse,
                    lines: block_start..i,
                });
            }
            block_start = i;
            block_end_verse = to;
        }
    }

    if block_start < lines.len() {
        result.push(Block {
            end_verse: block_end_verse,
            lines: block_start..lines.len(),
        });
    }

    Some(result)
}

/// Sweeps the three block lists in parallel, emitting a segment every time
/// the verse coverage of all three sides lines up. When one side runs out
/// of blocks early, everything left lands in one final segment.
fn aligned_segments(
    base: &[String],
    user: &[String],
    server: &[String],
) -> Option<Vec<[Range<usize>; 3]>> {
    let blocks = [
        verse_blocks(base)?,
        verse_blocks(user)?,
        verse_blocks(server)?,
    ];
    let line_counts = [base.len(), user.len(), server.len()];

    let line_position = |side: usize, index: usize| -> usize {
        blocks[side]
            .get(index)
            .map_or(line_counts[side], |block| block.lines.start)
    };

    let mut segments = Vec::new();
    let mut indices = [0usize; 3];

    while (0..3).any(|side| indices[side] < blocks[side].len()) {
        let segment_start = [
            line_position(0, indices[0]),
            line_position(1, indices[1]),
            line_position(2, indices[2]),
        ];

        // One block from every side that still has one, then keep pulling
        // from whichever sides lag behind the furthest coverage.
        let mut coverage = [0u32; 3];
        for side in 0..3 {
            if let Some(block) = blocks[side].get(indices[side]) {
                coverage[side] = block.end_verse;
                indices[side] += 1;
            }
        }

        loop {
            let target = coverage.iter().copied().max().unwrap_or(0);
            let mut progressed = false;

            for side in 0..3 {
                while coverage[side] < target && indices[side] < blocks[side].len() {
                    coverage[side] = coverage[side].max(blocks[side][indices[side]].end_verse);
                    indices[side] += 1;
                    progressed = true;
                }
            }

            if coverage.iter().all(|&c| c == target) {
                break;
            }
            if !progressed {
                // A side is exhausted below the target; no further
                // boundary can line up.
                for (side, index) in indices.iter_mut().enumerate() {
                    *index = blocks[side].len();
                }
                break;
            }
        }

        segments.push([
            segment_start[0]..line_position(0, indices[0]),
            segment_start[1]..line_position(1, indices[1]),
            segment_start[2]..line_position(2, indices[2]),
        ]);
    }

    Some(segments)
}
