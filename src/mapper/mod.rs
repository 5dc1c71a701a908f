//! Character range to page geometry resolution.
//!
//! Resolves a character range against a [`CharGeometryIndex`] and merges the
//! per-character boxes into one rectangle per visual line, using the same
//! line rule as reading-order reconstruction. An empty result is a valid
//! outcome — callers render such differences as text-only.

use crate::config::IndexConfig;
use crate::diff::DiffBlock;
use crate::error::Result;
use crate::geometry::{bbox_union, CharBox, MergedBbox};
use crate::index::CharGeometryIndex;

/// Maps character ranges to merged per-line bounding boxes.
#[derive(Debug, Clone, Default)]
pub struct GeometryMapper {
    config: IndexConfig,
}

impl GeometryMapper {
    /// Create a mapper with the given line-merge configuration.
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    /// Resolve `[start, end)` to merged bounding boxes, one per covered line.
    ///
    /// Boxes are merged greedily while they stay on the same page and the
    /// same visual line; each merge unions the rectangles and concatenates
    /// the covered text. Returns an empty vector when the range yields no
    /// boxes; rejects inverted ranges with a typed error.
    pub fn map_range(
        &self,
        index: &CharGeometryIndex,
        start: usize,
        end: usize,
    ) -> Result<Vec<MergedBbox>> {
        let mut boxes: Vec<&CharBox> = index.resolve(start, end)?;
        boxes.sort_by(|a, b| {
            a.page
                .cmp(&b.page)
                .then(a.y0().total_cmp(&b.y0()))
                .then(a.x0().total_cmp(&b.x0()))
        });

        let mut merged: Vec<MergedBbox> = Vec::new();
        let mut line_anchor: Option<&CharBox> = None;
        for b in boxes {
            if let (Some(anchor), Some(current)) = (line_anchor, merged.last_mut()) {
                if b.same_line(anchor, self.config.line_tolerance) {
                    current.bbox = bbox_union(current.bbox, b.bbox);
                    current.text.push(b.ch);
                    continue;
                }
            }
            merged.push(MergedBbox {
                page: b.page,
                bbox: b.bbox,
                category: b.category.clone(),
                text: b.ch.to_string(),
            });
            line_anchor = Some(b);
        }
        Ok(merged)
    }

    /// Enrich a diff block with geometry from both document indexes.
    ///
    /// Resolves the A-side range against `index_a` and the B-side range
    /// against `index_b`, writing merged boxes into `bboxes_a`/`bboxes_b`
    /// and the page of the first box into `page_a`/`page_b`. Sides without
    /// a range, or ranges with no geometry, are left empty.
    pub fn map_diff_block(
        &self,
        block: &mut DiffBlock,
        index_a: &CharGeometryIndex,
        index_b: &CharGeometryIndex,
    ) -> Result<()> {
        if let Some((start, end)) = block.range_a {
            let merged = self.map_range(index_a, start, end)?;
            block.page_a = merged.first().map(|m| m.page);
            block.bboxes_a = merged.into_iter().map(|m| m.bbox).collect();
        }
        if let Some((start, end)) = block.range_b {
            let merged = self.map_range(index_b, start, end)?;
            block.page_b = merged.first().map(|m| m.page);
            block.bboxes_b = merged.into_iter().map(|m| m.bbox).collect();
        }
        Ok(())
    }
}
