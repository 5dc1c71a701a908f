//! End-to-end orchestration: document comparison and extraction anchoring.
//!
//! The two public entry points tie the lower layers together.
//!
//! [`compare_documents`] rebuilds reading order for both OCR documents,
//! canonicalizes the texts, diffs them in normalized space, then maps every
//! block back through the offset tables onto original positions and page
//! geometry. Running the diff on normalized text is what keeps full-width
//! punctuation and whitespace noise out of the results; the offset mapping
//! is what lets the geometry still resolve.
//!
//! [`anchor_extractions`] aligns raw extracted field values against the
//! reconstructed document text, reconciles competing candidates across
//! passes, and attaches per-line bounding boxes to each winner.

use crate::align::{CharInterval, TextAligner};
use crate::config::{AnchorOptions, CompareOptions};
use crate::diff::{diff, group_into_blocks, DiffBlock};
use crate::error::Result;
use crate::geometry::{CharBox, MergedBbox};
use crate::index::CharGeometryIndex;
use crate::mapper::GeometryMapper;
use crate::normalize::NormalizedText;
use crate::overlap::{ExtractionCandidate, OverlapResolver};
use log::info;
use serde::{Deserialize, Serialize};

/// An OCR'd document: per-character boxes in arbitrary order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrDocument {
    /// Character boxes as emitted by the OCR engine
    pub boxes: Vec<CharBox>,
}

impl OcrDocument {
    /// Wrap a set of character boxes.
    pub fn new(boxes: Vec<CharBox>) -> Self {
        Self { boxes }
    }
}

/// One raw field value from one extraction pass, before anchoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExtraction {
    /// Stable field identifier
    pub field_id: String,
    /// The value as extracted
    pub value: String,
    /// Extraction confidence reported by the producing pass, in `[0, 1]`
    pub confidence: f64,
}

/// A reconciled field value with text position and page geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchoredField {
    /// Stable field identifier
    pub field_id: String,
    /// The extracted value
    pub value: String,
    /// Location in the reconstructed document text, if alignment succeeded
    pub interval: Option<CharInterval>,
    /// Merged per-line bounding boxes for the interval
    pub bboxes: Vec<MergedBbox>,
    /// Combined confidence: extraction confidence scaled by alignment
    /// confidence when the value is anchored
    pub confidence: f64,
}

/// Compare two OCR documents and return typed, geometry-annotated diff blocks.
///
/// Both documents are rebuilt into reading order, normalized, and diffed at
/// the character level. Block ranges and first-occurrence offsets are
/// reported in *original* reading-order positions, so they index directly
/// into each document's geometry. Empty documents are valid input and simply
/// produce `Added`/`Deleted` blocks or nothing at all.
pub fn compare_documents(
    doc_a: &OcrDocument,
    doc_b: &OcrDocument,
    options: &CompareOptions,
) -> Result<Vec<DiffBlock>> {
    let index_a = CharGeometryIndex::build(&doc_a.boxes, &options.index);
    let index_b = CharGeometryIndex::build(&doc_b.boxes, &options.index);

    let norm_a = NormalizedText::build(index_a.text(), options.normalize);
    let norm_b = NormalizedText::build(index_b.text(), options.normalize);

    let ops = diff(norm_a.text(), norm_b.text());
    let mut blocks = group_into_blocks(&ops, norm_a.text(), norm_b.text());
    info!(
        "compared {} vs {} chars: {} blocks",
        index_a.char_len(),
        index_b.char_len(),
        blocks.len()
    );

    // Diffing ran in normalized space; translate every range back to the
    // original reading-order positions before resolving geometry.
    let mapper = GeometryMapper::new(options.index);
    for block in &mut blocks {
        if let Some((start, end)) = block.range_a {
            let original = norm_a.to_original(start, end)?;
            block.range_a = Some(original);
            block.start_index_a = Some(original.0);
        }
        if let Some((start, end)) = block.range_b {
            let original = norm_b.to_original(start, end)?;
            block.range_b = Some(original);
            block.start_index_b = Some(original.0);
        }
        mapper.map_diff_block(block, &index_a, &index_b)?;
    }

    Ok(blocks)
}

/// Anchor multi-pass extraction results to a document's text and geometry.
///
/// Each raw value is located in the reconstructed reading-order text via the
/// alignment cascade; candidates that cannot be located keep their value but
/// carry no interval or geometry. Competing candidates for the same field
/// are reconciled by the overlap resolver before geometry is attached.
pub fn anchor_extractions(
    doc: &OcrDocument,
    passes: Vec<Vec<RawExtraction>>,
    options: &AnchorOptions,
) -> Result<Vec<AnchoredField>> {
    let index = CharGeometryIndex::build(&doc.boxes, &options.index);
    let aligner = TextAligner::new(options.align);
    let source = index.text();

    let candidate_passes: Vec<Vec<ExtractionCandidate>> = passes
        .into_iter()
        .map(|pass| {
            pass.into_iter()
                .map(|raw| ExtractionCandidate {
                    interval: aligner.find(source, &raw.value),
                    field_id: raw.field_id,
                    pass_index: 0,
                    raw_value: raw.value,
                    confidence: raw.confidence,
                })
                .collect()
        })
        .collect();

    let resolver = OverlapResolver::new(options.overlap);
    let winners = resolver.merge_passes(candidate_passes);
    info!("anchoring kept {} candidates", winners.len());

    let mapper = GeometryMapper::new(options.index);
    let mut fields = Vec::with_capacity(winners.len());
    for candidate in winners {
        let (bboxes, confidence) = match &candidate.interval {
            Some(interval) => (
                mapper.map_range(&index, interval.start, interval.end)?,
                candidate.confidence * interval.confidence,
            ),
            None => (Vec::new(), candidate.confidence),
        };
        fields.push(AnchoredField {
            field_id: candidate.field_id,
            value: candidate.raw_value,
            interval: candidate.interval,
            bboxes,
            confidence,
        });
    }

    Ok(fields)
}
