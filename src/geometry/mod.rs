//! Geometric primitives for character boxes and merged regions.
//!
//! Bounding boxes are `[x0, y0, x1, y1]` in the OCR renderer's coordinate
//! space, top-left origin, matching the boxes the OCR collaborator reports.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One recognized character with its page, bounding rectangle, and OCR category.
///
/// Produced by the OCR collaborator and treated as immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharBox {
    /// Page number (1-based, matching the OCR output)
    pub page: u32,
    /// The recognized character
    pub ch: char,
    /// Bounding rectangle `[x0, y0, x1, y1]`
    pub bbox: [f64; 4],
    /// Semantic category reported by the OCR layout model (e.g. "text", "table")
    pub category: String,
}

impl CharBox {
    /// Create a character box, rejecting NaN, infinite, or inverted rectangles.
    pub fn new(page: u32, ch: char, bbox: [f64; 4], category: impl Into<String>) -> Result<Self> {
        let [x0, y0, x1, y1] = bbox;
        let finite = bbox.iter().all(|v| v.is_finite());
        if !finite || x1 < x0 || y1 < y0 {
            return Err(Error::DegenerateBbox {
                page,
                ch,
                x0,
                y0,
                x1,
                y1,
            });
        }
        Ok(Self {
            page,
            ch,
            bbox,
            category: category.into(),
        })
    }

    /// Left edge x-coordinate.
    pub fn x0(&self) -> f64 {
        self.bbox[0]
    }

    /// Top edge y-coordinate.
    pub fn y0(&self) -> f64 {
        self.bbox[1]
    }

    /// Whether this box sits on the same visual line as `other`.
    ///
    /// Two boxes are on the same line when their top edges are within
    /// `tolerance` coordinate units of each other and they share a page.
    /// The tolerance is configuration, not a law; see
    /// [`IndexConfig`](crate::config::IndexConfig).
    pub fn same_line(&self, other: &CharBox, tolerance: f64) -> bool {
        self.page == other.page && (self.y0() - other.y0()).abs() <= tolerance
    }
}

/// Union of two `[x0, y0, x1, y1]` rectangles.
pub fn bbox_union(a: [f64; 4], b: [f64; 4]) -> [f64; 4] {
    [
        a[0].min(b[0]),
        a[1].min(b[1]),
        a[2].max(b[2]),
        a[3].max(b[3]),
    ]
}

/// One merged rectangle covering a run of characters on a single line.
///
/// Produced by [`map_range`](crate::mapper::GeometryMapper::map_range); the
/// `text` field carries the covered characters for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedBbox {
    /// Page the merged rectangle lies on
    pub page: u32,
    /// Merged bounding rectangle `[x0, y0, x1, y1]`
    pub bbox: [f64; 4],
    /// OCR category of the first covered character
    pub category: String,
    /// Concatenated text of the covered characters
    pub text: String,
}
