//! Reading-order reconstruction from unordered character boxes.
//!
//! The OCR collaborator reports one box per recognized character with no
//! ordering guarantee. [`CharGeometryIndex`] rebuilds a position-ordered
//! text string plus a position-to-box lookup: primary key page ascending,
//! secondary key visual line (top edges within the configured tolerance),
//! tertiary key left-to-right x-coordinate.
//!
//! The index is built once per document version and read-only afterwards,
//! so it can be shared across concurrent diff and alignment operations
//! without locking.

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::geometry::CharBox;
use indexmap::IndexMap;

/// Position-ordered view over a document's character boxes.
#[derive(Debug, Clone, Default)]
pub struct CharGeometryIndex {
    ordered_text: String,
    chars: Vec<char>,
    position_to_box: IndexMap<usize, CharBox>,
}

impl CharGeometryIndex {
    /// Build an index from an unordered list of character boxes.
    ///
    /// Deterministic for a given input set: the sort is stable, so boxes
    /// that tie on (page, line, x) keep their input order. An empty input
    /// produces an index with empty text and an empty map — not an error.
    pub fn build(boxes: &[CharBox], config: &IndexConfig) -> Self {
        if boxes.is_empty() {
            return Self::default();
        }

        // Page first, then top edge, so line bucketing sees each page's
        // boxes in vertical order.
        let mut sorted: Vec<&CharBox> = boxes.iter().collect();
        sorted.sort_by(|a, b| {
            a.page
                .cmp(&b.page)
                .then(a.y0().total_cmp(&b.y0()))
                .then(a.x0().total_cmp(&b.x0()))
        });

        // Greedy line bucketing: a box joins the current line while its top
        // edge stays within tolerance of the line's anchor. The anchor is the
        // first box of the line, not a running mean, matching the reference
        // renderer's behavior.
        let mut line_ids = vec![0usize; sorted.len()];
        let mut line_id = 0usize;
        let mut anchor = sorted[0];
        for i in 1..sorted.len() {
            let b = sorted[i];
            if !b.same_line(anchor, config.line_tolerance) {
                line_id += 1;
                anchor = b;
            }
            line_ids[i] = line_id;
        }

        let mut keyed: Vec<(usize, &CharBox)> = line_ids.into_iter().zip(sorted).collect();
        keyed.sort_by(|(la, a), (lb, b)| {
            a.page
                .cmp(&b.page)
                .then(la.cmp(lb))
                .then(a.x0().total_cmp(&b.x0()))
        });

        let mut ordered_text = String::new();
        let mut chars = Vec::with_capacity(keyed.len());
        let mut position_to_box = IndexMap::with_capacity(keyed.len());
        for (position, (_, b)) in keyed.into_iter().enumerate() {
            ordered_text.push(b.ch);
            chars.push(b.ch);
            position_to_box.insert(position, b.clone());
        }

        Self {
            ordered_text,
            chars,
            position_to_box,
        }
    }

    /// The reconstructed reading-order text.
    pub fn text(&self) -> &str {
        &self.ordered_text
    }

    /// Number of characters in the index.
    pub fn char_len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the index holds no characters.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The box at a given character position, if one exists.
    pub fn box_at(&self, position: usize) -> Option<&CharBox> {
        self.position_to_box.get(&position)
    }

    /// Every box whose position falls in `[start, end)`.
    ///
    /// Positions past the end of the document, or positions with no box,
    /// are skipped rather than treated as fatal. Inverted ranges are
    /// rejected with a typed error.
    pub fn resolve(&self, start: usize, end: usize) -> Result<Vec<&CharBox>> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok((start..end.min(self.chars.len()))
            .filter_map(|p| self.position_to_box.get(&p))
            .collect())
    }
}
