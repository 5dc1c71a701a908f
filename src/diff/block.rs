//! Typed diff blocks: the externally visible unit of document difference.
//!
//! A character-level edit script naturally produces an adjacent delete and
//! insert for every changed word. Surfacing those as separate "deleted
//! phrase" / "added phrase" results reads as noise to a contract reviewer,
//! so grouping collapses each contiguous run of non-equal operations into a
//! single block: both sides present means `Modified`, one side means
//! `Added`/`Deleted`, and cosmetic-only content (whitespace and punctuation)
//! means `Ignored`.

use crate::diff::DiffOp;
use crate::normalize::is_cosmetic_only;
use serde::{Deserialize, Serialize};

/// Classification of a diff block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffKind {
    /// Text changed between the two versions
    Modified,
    /// Text present only in version B
    Added,
    /// Text present only in version A
    Deleted,
    /// Difference is whitespace/punctuation only; not a contract change
    Ignored,
}

/// One semantically grouped unit of difference, with associated geometry.
///
/// Created by [`group_into_blocks`](crate::diff::group_into_blocks) with
/// text and character ranges; enriched in place by
/// [`GeometryMapper::map_diff_block`](crate::mapper::GeometryMapper::map_diff_block)
/// with page numbers and bounding boxes; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffBlock {
    /// Block classification
    pub kind: DiffKind,
    /// Page of the first A-side character, if the block has an A side
    pub page_a: Option<u32>,
    /// Page of the first B-side character, if the block has a B side
    pub page_b: Option<u32>,
    /// A-side text (empty for `Added` blocks)
    pub text_a: String,
    /// B-side text (empty for `Deleted` blocks)
    pub text_b: String,
    /// Merged bounding boxes on the A side
    pub bboxes_a: Vec<[f64; 4]>,
    /// Merged bounding boxes on the B side
    pub bboxes_b: Vec<[f64; 4]>,
    /// First-occurrence character offset in text A, absent if no A side
    pub start_index_a: Option<usize>,
    /// First-occurrence character offset in text B, absent if no B side
    pub start_index_b: Option<usize>,
    /// A-side character range `(start, end)` for geometry resolution
    pub range_a: Option<(usize, usize)>,
    /// B-side character range `(start, end)` for geometry resolution
    pub range_b: Option<(usize, usize)>,
}

impl DiffBlock {
    fn from_ranges(
        range_a: Option<(usize, usize)>,
        range_b: Option<(usize, usize)>,
        chars_a: &[char],
        chars_b: &[char],
    ) -> Self {
        let text_a: String = range_a
            .map(|(s, e)| chars_a[s..e].iter().collect())
            .unwrap_or_default();
        let text_b: String = range_b
            .map(|(s, e)| chars_b[s..e].iter().collect())
            .unwrap_or_default();

        let kind = if is_cosmetic_only(&text_a) && is_cosmetic_only(&text_b) {
            DiffKind::Ignored
        } else {
            match (range_a, range_b) {
                (Some(_), Some(_)) => DiffKind::Modified,
                (None, Some(_)) => DiffKind::Added,
                _ => DiffKind::Deleted,
            }
        };

        Self {
            kind,
            page_a: None,
            page_b: None,
            text_a,
            text_b,
            bboxes_a: Vec::new(),
            bboxes_b: Vec::new(),
            start_index_a: range_a.map(|(s, _)| s),
            start_index_b: range_b.map(|(s, _)| s),
            range_a,
            range_b,
        }
    }
}

/// Group contiguous non-equal operations into typed diff blocks.
///
/// Equal operations emit no block; they only terminate the current group.
/// A delete immediately followed by an insert (or vice versa) collapses into
/// one `Modified` block. Blocks record the first-occurrence character offset
/// per side so renderers can sort stably.
pub fn group_into_blocks(ops: &[DiffOp], text_a: &str, text_b: &str) -> Vec<DiffBlock> {
    let chars_a: Vec<char> = text_a.chars().collect();
    let chars_b: Vec<char> = text_b.chars().collect();

    let mut blocks = Vec::new();
    let mut pending_a: Option<(usize, usize)> = None;
    let mut pending_b: Option<(usize, usize)> = None;

    let mut flush = |pending_a: &mut Option<(usize, usize)>,
                     pending_b: &mut Option<(usize, usize)>,
                     blocks: &mut Vec<DiffBlock>| {
        if pending_a.is_some() || pending_b.is_some() {
            blocks.push(DiffBlock::from_ranges(
                pending_a.take(),
                pending_b.take(),
                &chars_a,
                &chars_b,
            ));
        }
    };

    for op in ops {
        match op {
            DiffOp::Equal { .. } => flush(&mut pending_a, &mut pending_b, &mut blocks),
            DiffOp::Delete { a } => {
                pending_a = match pending_a {
                    Some((s, _)) => Some((s, a.end)),
                    None => Some((a.start, a.end)),
                };
            }
            DiffOp::Insert { b } => {
                pending_b = match pending_b {
                    Some((s, _)) => Some((s, b.end)),
                    None => Some((b.start, b.end)),
                };
            }
        }
    }
    flush(&mut pending_a, &mut pending_b, &mut blocks);

    blocks
}
