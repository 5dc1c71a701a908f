//! Unified configuration for the anchoring and comparison pipeline.
//!
//! Every tunable threshold in the crate lives here so callers can see, in one
//! place, which constants the algorithms depend on. Defaults match the
//! reference behavior the OCR collaborator was calibrated against.

use serde::{Deserialize, Serialize};

/// Flags controlling text normalization.
///
/// Punctuation unification and whitespace canonicalization always run for
/// comparison-oriented normalization; these flags only control *removal*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Lowercase the text
    pub ignore_case: bool,
    /// Remove all whitespace instead of collapsing it
    pub ignore_whitespace: bool,
    /// Drop every character that is not a letter, digit, whitespace, or CJK ideograph
    pub ignore_punctuation: bool,
}

impl NormalizeOptions {
    /// Create default options (nothing removed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set case folding.
    pub fn with_ignore_case(mut self, value: bool) -> Self {
        self.ignore_case = value;
        self
    }

    /// Set whitespace removal.
    pub fn with_ignore_whitespace(mut self, value: bool) -> Self {
        self.ignore_whitespace = value;
        self
    }

    /// Set punctuation removal.
    pub fn with_ignore_punctuation(mut self, value: bool) -> Self {
        self.ignore_punctuation = value;
        self
    }
}

/// Configuration for reading-order reconstruction and line merging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Two boxes whose top edges differ by at most this many coordinate
    /// units belong to the same visual line.
    ///
    /// The value matches the OCR renderer's DPI-scaled output. Rotated text
    /// and multi-column layouts can defeat this clustering rule; there is
    /// currently no fallback for that case.
    pub line_tolerance: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { line_tolerance: 5.0 }
    }
}

impl IndexConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the same-line tolerance.
    pub fn with_line_tolerance(mut self, value: f64) -> Self {
        self.line_tolerance = value;
        self
    }
}

/// Configuration for the text alignment cascade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Maximum edit distance for a fuzzy window match, as a fraction of the
    /// candidate length.
    pub max_distance_ratio: f64,
    /// Minimum share of the candidate the longest common substring must
    /// cover for the fallback tier to accept.
    pub min_lcs_ratio: f64,
    /// Absolute LCS length floor for very short candidates.
    pub min_lcs_len: usize,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            max_distance_ratio: 0.2,
            min_lcs_ratio: 0.5,
            min_lcs_len: 3,
        }
    }
}

/// Configuration for overlap resolution across extraction passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapConfig {
    /// Two intervals overlap significantly when the overlap length divided
    /// by the shorter interval's length reaches this ratio.
    pub threshold: f64,
    /// Confidence gap above which the higher-confidence candidate wins outright.
    pub confidence_gap: f64,
    /// Matched-text length gap (in chars) above which the longer candidate wins.
    pub length_gap: usize,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            confidence_gap: 0.1,
            length_gap: 5,
        }
    }
}

impl OverlapConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the significant-overlap ratio threshold.
    pub fn with_threshold(mut self, value: f64) -> Self {
        self.threshold = value;
        self
    }
}

/// Options for a full document comparison run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Normalization flags applied to both sides before diffing
    pub normalize: NormalizeOptions,
    /// Reading-order reconstruction configuration
    pub index: IndexConfig,
}

/// Options for a full extraction anchoring run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnchorOptions {
    /// Alignment cascade configuration
    pub align: AlignConfig,
    /// Overlap resolution configuration
    pub overlap: OverlapConfig,
    /// Reading-order reconstruction configuration
    pub index: IndexConfig,
}
