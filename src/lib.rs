//! Text-to-geometry anchoring and reconciliation for OCR'd contracts.
//!
//! `contract_anchor` turns per-character OCR boxes into reading-order text,
//! compares two document versions at the character level, and locates
//! LLM-extracted field values back in the page geometry. All offsets
//! throughout the crate are character positions, never bytes — the target
//! corpus is Chinese contract text where byte offsets are meaningless.
//!
//! # Overview
//!
//! The crate is layered:
//!
//! - [`normalize`] canonicalizes OCR text (full-width punctuation, exotic
//!   whitespace, known character confusions) and tracks offsets back to the
//!   original text.
//! - [`index`] rebuilds reading order from unordered character boxes and
//!   keeps the char-to-box mapping.
//! - [`diff`] computes a Myers edit script and groups it into typed blocks.
//! - [`mapper`] resolves character ranges to merged per-line bounding boxes.
//! - [`align`] locates extracted values in noisy text via a tiered cascade.
//! - [`overlap`] reconciles competing candidates across extraction passes.
//! - [`pipeline`] wires everything into two entry points:
//!   [`compare_documents`] and [`anchor_extractions`].
//!
//! # Examples
//!
//! Comparing two versions of a document:
//!
//! ```
//! use contract_anchor::{compare_documents, CharBox, CompareOptions, OcrDocument};
//!
//! # fn main() -> contract_anchor::Result<()> {
//! let boxes_a: Vec<CharBox> = "总价：100万元"
//!     .chars()
//!     .enumerate()
//!     .map(|(i, ch)| CharBox::new(1, ch, [i as f64 * 10.0, 0.0, i as f64 * 10.0 + 10.0, 12.0], "text"))
//!     .collect::<contract_anchor::Result<_>>()?;
//! let boxes_b: Vec<CharBox> = "总价：150万元"
//!     .chars()
//!     .enumerate()
//!     .map(|(i, ch)| CharBox::new(1, ch, [i as f64 * 10.0, 0.0, i as f64 * 10.0 + 10.0, 12.0], "text"))
//!     .collect::<contract_anchor::Result<_>>()?;
//!
//! let blocks = compare_documents(
//!     &OcrDocument::new(boxes_a),
//!     &OcrDocument::new(boxes_b),
//!     &CompareOptions::default(),
//! )?;
//! assert_eq!(blocks.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod align;
pub mod config;
pub mod diff;
pub mod error;
pub mod geometry;
pub mod index;
pub mod mapper;
pub mod normalize;
pub mod overlap;
pub mod pipeline;

pub use align::{CharInterval, TextAligner};
pub use config::{
    AlignConfig, AnchorOptions, CompareOptions, IndexConfig, NormalizeOptions, OverlapConfig,
};
pub use diff::{diff, group_into_blocks, DiffBlock, DiffKind, DiffOp};
pub use error::{Error, Result};
pub use geometry::{CharBox, MergedBbox};
pub use index::CharGeometryIndex;
pub use mapper::GeometryMapper;
pub use overlap::{ExtractionCandidate, OverlapResolver};
pub use pipeline::{
    anchor_extractions, compare_documents, AnchoredField, OcrDocument, RawExtraction,
};
