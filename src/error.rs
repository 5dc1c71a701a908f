//! Error types for the anchoring library.
//!
//! Only malformed input is an error here. "Not found" outcomes (an extraction
//! value that cannot be located, a character range with no geometry) are
//! represented as `None` or empty collections, never as an `Err`.

/// Result type alias for anchoring operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during anchoring and comparison.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Character range with start past end
    #[error("Invalid character range: start {start} is past end {end}")]
    InvalidRange {
        /// Start offset of the rejected range
        start: usize,
        /// End offset of the rejected range
        end: usize,
    },

    /// Character box with a NaN, infinite, or inverted bounding rectangle
    #[error("Degenerate bounding box [{x0}, {y0}, {x1}, {y1}] for '{ch}' on page {page}")]
    DegenerateBbox {
        /// Page the box was reported on
        page: u32,
        /// Character carried by the box
        ch: char,
        /// Left edge
        x0: f64,
        /// Top edge
        y0: f64,
        /// Right edge
        x1: f64,
        /// Bottom edge
        y1: f64,
    },

    /// Confidence score outside the closed unit interval
    #[error("Confidence {0} is outside [0, 1]")]
    InvalidConfidence(f64),

    /// IO error (CLI input loading only)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error (CLI input loading only)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
