//! OCR text canonicalization.
//!
//! Comparison of two OCR'd contract versions must not be defeated by
//! typographic noise: full-width vs half-width punctuation, exotic Unicode
//! whitespace, or the OCR engine's known character confusions. This module
//! unifies all of that before any diffing or alignment runs.
//!
//! Two entry points exist. [`normalize_for_comparison`] always unifies
//! punctuation and whitespace representation first regardless of flags —
//! the flags only control *removal*. [`normalize`] is the softer variant
//! where whitespace collapsing is itself opt-in.
//!
//! [`NormalizedText`] performs the same canonicalization while recording,
//! for every normalized character, the original character range it consumed,
//! so downstream code can map diff results back onto source offsets.

mod table;

use crate::config::NormalizeOptions;
use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use table::SUBSTITUTIONS;

lazy_static! {
    /// Whitespace runs, including full-width space, zero-width marks, and
    /// line/paragraph separators the OCR layer emits.
    static ref WHITESPACE_RE: Regex =
        Regex::new(r"[\s\u{00A0}\u{2000}-\u{200F}\u{2028}\u{2029}\u{3000}]+").unwrap();

    /// The substitution table as char sequences, for position-tracked scanning.
    static ref SUBSTITUTION_CHARS: Vec<(Vec<char>, Vec<char>)> = SUBSTITUTIONS
        .iter()
        .map(|(k, v)| (k.chars().collect(), v.chars().collect()))
        .collect();
}

/// Whether a character counts as whitespace for OCR purposes.
///
/// Extends `char::is_whitespace` with the zero-width marks (U+200B..U+200F)
/// that OCR engines sprinkle into CJK output.
fn is_ocr_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\u{200B}'..='\u{200F}').contains(&c)
}

/// Whether a character survives punctuation removal: letters, digits,
/// whitespace, and CJK ideographs.
fn is_content_char(c: char) -> bool {
    c.is_alphabetic()
        || c.is_numeric()
        || c.is_whitespace()
        || ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Unify punctuation by applying the static substitution table as repeated
/// literal replacements, in table order.
pub fn normalize_punctuation(text: &str) -> String {
    let mut result = text.to_string();
    for (key, value) in SUBSTITUTIONS {
        result = result.replace(key, value);
    }
    result
}

/// Collapse every whitespace run to a single ASCII space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Drop every character that is not a letter, digit, whitespace, or CJK ideograph.
pub fn remove_punctuation(text: &str) -> String {
    text.chars().filter(|c| is_content_char(*c)).collect()
}

/// Normalize text with the given flags.
///
/// Punctuation unification always runs; whitespace collapsing and
/// punctuation removal run only when the corresponding flag is set.
/// Empty input yields an empty string, never an error.
pub fn normalize(text: &str, opts: NormalizeOptions) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut result = normalize_punctuation(text);
    if opts.ignore_case {
        result = result.to_lowercase();
    }
    if opts.ignore_whitespace {
        result = normalize_whitespace(&result);
    }
    if opts.ignore_punctuation {
        result = remove_punctuation(&result);
    }
    result.trim().to_string()
}

/// Normalize text for comparison.
///
/// Always unifies punctuation and collapses whitespace runs so diffing is
/// never confused by full-width vs half-width variants; the flags only
/// control removal (`ignore_whitespace` strips the collapsed spaces,
/// `ignore_punctuation` strips symbols). Idempotent.
pub fn normalize_for_comparison(text: &str, opts: NormalizeOptions) -> String {
    if text.is_empty() {
        return String::new();
    }
    // Punctuation unification must precede whitespace collapsing: a
    // substituted mark may sit adjacent to whitespace that has to merge.
    let mut result = normalize_punctuation(text);
    result = normalize_whitespace(&result);
    if opts.ignore_case {
        result = result.to_lowercase();
    }
    if opts.ignore_whitespace {
        result.retain(|c| !c.is_whitespace());
    }
    if opts.ignore_punctuation {
        result = remove_punctuation(&result);
    }
    result
}

/// Whether two texts are equal after comparison normalization.
pub fn is_equal(a: &str, b: &str, opts: NormalizeOptions) -> bool {
    normalize_for_comparison(a, opts) == normalize_for_comparison(b, opts)
}

/// Whether `text` contains nothing but whitespace and punctuation.
///
/// Used to classify cosmetic-only diff blocks as ignorable.
pub fn is_cosmetic_only(text: &str) -> bool {
    text.chars().all(|c| !is_content_char(c) || c.is_whitespace())
}

/// Normalized text with a mapping back to original character offsets.
///
/// Normalization changes length (substitutions, whitespace collapsing), so a
/// character range found in normalized space cannot be used against the
/// original text directly. `NormalizedText` records, for every normalized
/// character, the half-open original char range it consumed; the mapping is
/// monotonic non-decreasing by construction.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    text: String,
    /// Per normalized char: the original char range `(start, end)` it came from
    offsets: Vec<(usize, usize)>,
}

impl NormalizedText {
    /// Canonicalize `original` under `opts`, tracking offsets.
    ///
    /// Equivalent to [`normalize_for_comparison`] on the text content, except
    /// that leading/trailing whitespace is kept as a single mapped space
    /// (dropping it would orphan the mapping for edge characters).
    pub fn build(original: &str, opts: NormalizeOptions) -> Self {
        let chars: Vec<char> = original.chars().collect();
        let mut text = String::new();
        let mut offsets: Vec<(usize, usize)> = Vec::new();

        let mut emit = |c: char, range: (usize, usize), text: &mut String, offsets: &mut Vec<(usize, usize)>| {
            if c == ' ' {
                if opts.ignore_whitespace {
                    return;
                }
                // Collapse adjacent spaces, extending the mapped range.
                if text.ends_with(' ') {
                    if let Some(last) = offsets.last_mut() {
                        last.1 = range.1;
                    }
                    return;
                }
            }
            if opts.ignore_punctuation && !is_content_char(c) {
                return;
            }
            text.push(c);
            offsets.push(range);
        };

        let mut i = 0;
        'outer: while i < chars.len() {
            // Longest-first substitution at this position
            for (key, value) in SUBSTITUTION_CHARS.iter() {
                if chars[i..].starts_with(key) {
                    for &v in value {
                        emit(v, (i, i + key.len()), &mut text, &mut offsets);
                    }
                    i += key.len();
                    continue 'outer;
                }
            }
            let c = chars[i];
            if is_ocr_whitespace(c) {
                let mut j = i + 1;
                while j < chars.len() && is_ocr_whitespace(chars[j]) {
                    j += 1;
                }
                emit(' ', (i, j), &mut text, &mut offsets);
                i = j;
                continue;
            }
            if opts.ignore_case {
                for lower in c.to_lowercase() {
                    emit(lower, (i, i + 1), &mut text, &mut offsets);
                }
            } else {
                emit(c, (i, i + 1), &mut text, &mut offsets);
            }
            i += 1;
        }

        Self { text, offsets }
    }

    /// The normalized text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of normalized characters.
    pub fn char_len(&self) -> usize {
        self.offsets.len()
    }

    /// Map a normalized char range back to the original char range it covers.
    ///
    /// Returns `Error::InvalidRange` for inverted or out-of-bounds ranges.
    /// An empty range maps to an empty range anchored at the nearest
    /// original offset.
    pub fn to_original(&self, start: usize, end: usize) -> Result<(usize, usize)> {
        if start > end || end > self.offsets.len() {
            return Err(Error::InvalidRange { start, end });
        }
        if start == end {
            let anchor = if start < self.offsets.len() {
                self.offsets[start].0
            } else {
                self.offsets.last().map(|o| o.1).unwrap_or(0)
            };
            return Ok((anchor, anchor));
        }
        Ok((self.offsets[start].0, self.offsets[end - 1].1))
    }
}
