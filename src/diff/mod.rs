//! Character-level diff engine.
//!
//! Computes a Myers-style edit script between two normalized texts and
//! groups it into typed [`DiffBlock`]s. Diffing is pure and total: it never
//! fails for any pair of strings, including empty or completely disjoint
//! inputs.

mod block;
mod myers;

pub use block::{group_into_blocks, DiffBlock, DiffKind};

use myers::{Seg, SegList};
use std::ops::Range;

/// One operation of a character-level edit script.
///
/// Ranges are char offsets (not bytes) into the respective source texts.
/// Insert and delete operations carry only the side they touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOp {
    /// Run present in both texts
    Equal {
        /// Covered char range in text A
        a: Range<usize>,
        /// Covered char range in text B
        b: Range<usize>,
    },
    /// Run present only in text B
    Insert {
        /// Covered char range in text B
        b: Range<usize>,
    },
    /// Run present only in text A
    Delete {
        /// Covered char range in text A
        a: Range<usize>,
    },
}

/// Compute the character-level edit script between `text_a` and `text_b`.
///
/// Adjacent operations of the same kind are merged, and a delete/insert pair
/// that shares a prefix or suffix has the common run factored out into the
/// neighboring equalities, keeping matching runs as long as possible so
/// grouping produces the fewest blocks.
pub fn diff(text_a: &str, text_b: &str) -> Vec<DiffOp> {
    let a: Vec<char> = text_a.chars().collect();
    let b: Vec<char> = text_b.chars().collect();

    let mut segs = SegList::default();
    myers::solve(&a, &b, &mut segs);
    let segs = cleanup_merge(segs.into_vec(), &a, &b);

    // Materialize positions from the segment lengths.
    let mut ops = Vec::with_capacity(segs.len());
    let mut a_pos = 0;
    let mut b_pos = 0;
    for seg in segs {
        match seg {
            Seg::Equal(l) => {
                ops.push(DiffOp::Equal {
                    a: a_pos..a_pos + l,
                    b: b_pos..b_pos + l,
                });
                a_pos += l;
                b_pos += l;
            }
            Seg::Delete(l) => {
                ops.push(DiffOp::Delete { a: a_pos..a_pos + l });
                a_pos += l;
            }
            Seg::Insert(l) => {
                ops.push(DiffOp::Insert { b: b_pos..b_pos + l });
                b_pos += l;
            }
        }
    }
    ops
}

/// Reorder and factor an edit-script segment list into canonical form.
///
/// Within every maximal run of edits, deletions come before insertions, and
/// any common prefix/suffix between the deleted and inserted runs migrates
/// into the surrounding equalities.
fn cleanup_merge(segs: Vec<Seg>, a: &[char], b: &[char]) -> Vec<Seg> {
    let mut out: Vec<Seg> = Vec::with_capacity(segs.len());
    let mut a_pos = 0;
    let mut b_pos = 0;

    fn push_merged(out: &mut Vec<Seg>, seg: Seg) {
        match (out.last_mut(), seg) {
            (_, Seg::Equal(0)) | (_, Seg::Delete(0)) | (_, Seg::Insert(0)) => {}
            (Some(Seg::Equal(prev)), Seg::Equal(l)) => *prev += l,
            (Some(Seg::Delete(prev)), Seg::Delete(l)) => *prev += l,
            (Some(Seg::Insert(prev)), Seg::Insert(l)) => *prev += l,
            (_, seg) => out.push(seg),
        }
    }

    let mut i = 0;
    while i < segs.len() {
        if let Seg::Equal(l) = segs[i] {
            push_merged(&mut out, Seg::Equal(l));
            a_pos += l;
            b_pos += l;
            i += 1;
            continue;
        }

        // Collect the maximal run of edits.
        let mut del = 0;
        let mut ins = 0;
        while i < segs.len() {
            match segs[i] {
                Seg::Delete(l) => del += l,
                Seg::Insert(l) => ins += l,
                Seg::Equal(_) => break,
            }
            i += 1;
        }

        let mut a_start = a_pos;
        let mut a_end = a_pos + del;
        let mut b_start = b_pos;
        let mut b_end = b_pos + ins;
        let mut suffix = 0;

        if del > 0 && ins > 0 {
            let prefix = a[a_start..a_end]
                .iter()
                .zip(&b[b_start..b_end])
                .take_while(|(x, y)| x == y)
                .count();
            if prefix > 0 {
                push_merged(&mut out, Seg::Equal(prefix));
                a_start += prefix;
                b_start += prefix;
            }
            suffix = a[a_start..a_end]
                .iter()
                .rev()
                .zip(b[b_start..b_end].iter().rev())
                .take_while(|(x, y)| x == y)
                .count();
            a_end -= suffix;
            b_end -= suffix;
        }

        push_merged(&mut out, Seg::Delete(a_end - a_start));
        push_merged(&mut out, Seg::Insert(b_end - b_start));
        push_merged(&mut out, Seg::Equal(suffix));

        a_pos += del;
        b_pos += ins;
    }

    out
}

/// Reconstruct text B by replaying an edit script against both sources.
///
/// Equal and delete ranges index into `text_a`; insert ranges index into
/// `text_b`. Used to verify diff correctness: for any pair of strings,
/// `apply_edit_script(&diff(a, b), a, b) == b`.
pub fn apply_edit_script(ops: &[DiffOp], text_a: &str, text_b: &str) -> String {
    let a: Vec<char> = text_a.chars().collect();
    let b: Vec<char> = text_b.chars().collect();
    let mut rebuilt = String::new();
    for op in ops {
        match op {
            DiffOp::Equal { a: ra, .. } => rebuilt.extend(&a[ra.start..ra.end]),
            DiffOp::Insert { b: rb } => rebuilt.extend(&b[rb.start..rb.end]),
            DiffOp::Delete { .. } => {}
        }
    }
    rebuilt
}
