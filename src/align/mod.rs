//! Character-level text alignment: locating extracted values in noisy text.
//!
//! LLM extraction returns field values that rarely match the OCR text
//! byte-for-byte: whitespace differs, a character or two is mis-recognized,
//! or the model paraphrased an affix. [`TextAligner::find`] runs a cascade
//! of strategies with decreasing confidence, each tier attempted only when
//! the previous one fails:
//!
//! 1. Exact substring search (confidence 1.0)
//! 2. Exact search of the trimmed candidate (confidence 1.0)
//! 3. Whitespace-normalized search mapped back to original offsets (0.95)
//! 4. Fuzzy sliding window by edit distance (≤ 0.8)
//! 5. Longest-common-substring fallback (≤ 0.6)
//!
//! Tiers 4 and 5 are O(n·m) dynamic programming and must stay the last
//! resort; callers working with very long documents should pre-restrict the
//! source to a relevant window before invoking the aligner.
//!
//! All offsets are char positions into the source string.

use crate::config::AlignConfig;
use crate::error::{Error, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// A character offset range in a source string, with match confidence.
///
/// `matched_text` is the text actually found in the source, which can
/// differ from the candidate the caller asked for (trimmed whitespace, a
/// fuzzy window, a common substring).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharInterval {
    /// Start char offset (inclusive)
    pub start: usize,
    /// End char offset (exclusive)
    pub end: usize,
    /// The text found at `[start, end)` in the source
    pub matched_text: String,
    /// Match confidence in `[0, 1]`, scaled by the tier that produced it
    pub confidence: f64,
}

impl CharInterval {
    /// Create an interval, rejecting empty/inverted ranges and confidences
    /// outside `[0, 1]`.
    pub fn new(start: usize, end: usize, matched_text: impl Into<String>, confidence: f64) -> Result<Self> {
        if start >= end {
            return Err(Error::InvalidRange { start, end });
        }
        if !(0.0..=1.0).contains(&confidence) || confidence.is_nan() {
            return Err(Error::InvalidConfidence(confidence));
        }
        Ok(Self {
            start,
            end,
            matched_text: matched_text.into(),
            confidence,
        })
    }

    /// Interval length in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false: construction rejects empty intervals.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether this interval shares at least one position with `other`.
    pub fn overlaps(&self, other: &CharInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Overlap length divided by the shorter interval's length.
    pub fn overlap_ratio(&self, other: &CharInterval) -> f64 {
        if !self.overlaps(other) {
            return 0.0;
        }
        let overlap = self.end.min(other.end) - self.start.max(other.start);
        overlap as f64 / self.len().min(other.len()) as f64
    }
}

/// Locates candidate strings inside OCR source text via a tiered cascade.
#[derive(Debug, Clone, Default)]
pub struct TextAligner {
    config: AlignConfig,
}

impl TextAligner {
    /// Create an aligner with the given thresholds.
    pub fn new(config: AlignConfig) -> Self {
        Self { config }
    }

    /// Find the best-matching character interval for `candidate` in `source`.
    ///
    /// Returns `None` when every tier fails — the field is not locatable in
    /// the source, which callers must treat as a recoverable outcome, not an
    /// error. The raw extracted value remains usable without geometry.
    pub fn find(&self, source: &str, candidate: &str) -> Option<CharInterval> {
        if source.is_empty() || candidate.trim().is_empty() {
            return None;
        }
        let source_chars: Vec<char> = source.chars().collect();
        let candidate_chars: Vec<char> = candidate.chars().collect();

        if let Some(interval) = exact_match(&source_chars, &candidate_chars) {
            debug!("exact match for {candidate:?} at {}..{}", interval.start, interval.end);
            return Some(interval);
        }

        let trimmed: Vec<char> = candidate.trim().chars().collect();
        if trimmed.len() != candidate_chars.len() {
            if let Some(interval) = exact_match(&source_chars, &trimmed) {
                debug!("trimmed match for {candidate:?} at {}..{}", interval.start, interval.end);
                return Some(interval);
            }
        }

        if let Some(interval) = normalized_match(&source_chars, &candidate_chars) {
            debug!("whitespace-normalized match for {candidate:?} at {}..{}", interval.start, interval.end);
            return Some(interval);
        }

        if let Some(interval) = self.fuzzy_match(&source_chars, &trimmed) {
            debug!("fuzzy match for {candidate:?} at {}..{} (confidence {:.2})", interval.start, interval.end, interval.confidence);
            return Some(interval);
        }

        if let Some(interval) = self.substring_match(&source_chars, &trimmed) {
            debug!("substring fallback for {candidate:?} at {}..{} (confidence {:.2})", interval.start, interval.end, interval.confidence);
            return Some(interval);
        }

        warn!("no alignment for extracted value {candidate:?}");
        None
    }

    /// Tier 4: slide a candidate-sized window over the source and keep the
    /// minimum-edit-distance window, provided the distance stays within the
    /// configured fraction of the candidate length.
    fn fuzzy_match(&self, source: &[char], candidate: &[char]) -> Option<CharInterval> {
        let len = candidate.len();
        if len == 0 || source.len() < len {
            return None;
        }
        let max_distance = ((len as f64 * self.config.max_distance_ratio).floor() as usize).max(1);

        let mut best: Option<(usize, usize)> = None;
        for start in 0..=source.len() - len {
            let window = &source[start..start + len];
            let distance = edit_distance(candidate, window);
            if distance <= max_distance && best.map_or(true, |(_, d)| distance < d) {
                best = Some((start, distance));
                if distance == 1 {
                    // Tier 1 already ruled out distance zero.
                    break;
                }
            }
        }

        let (start, distance) = best?;
        // The distance floor of 1 lets a 1-char candidate "match" any window
        // at distance == length, which carries zero information.
        if distance >= len {
            return None;
        }
        let confidence = (1.0 - distance as f64 / len as f64) * 0.8;
        let matched: String = source[start..start + len].iter().collect();
        CharInterval::new(start, start + len, matched, confidence).ok()
    }

    /// Tier 5: accept the longest common substring if it covers enough of
    /// the candidate.
    fn substring_match(&self, source: &[char], candidate: &[char]) -> Option<CharInterval> {
        if candidate.is_empty() {
            return None;
        }
        let (start, len) = longest_common_substring(source, candidate);
        let min_len = self
            .config
            .min_lcs_len
            .max((candidate.len() as f64 * self.config.min_lcs_ratio) as usize);
        if len < min_len {
            return None;
        }
        let confidence = (len as f64 / candidate.len() as f64).min(1.0) * 0.6;
        let matched: String = source[start..start + len].iter().collect();
        CharInterval::new(start, start + len, matched, confidence).ok()
    }
}

/// Tiers 1–2: direct subslice search, confidence 1.0.
fn exact_match(source: &[char], candidate: &[char]) -> Option<CharInterval> {
    if candidate.is_empty() {
        return None;
    }
    let start = find_subslice(source, candidate)?;
    let matched: String = candidate.iter().collect();
    CharInterval::new(start, start + candidate.len(), matched, 1.0).ok()
}

/// Tier 3: search in whitespace-collapsed space, then map the hit back to
/// original offsets by walking source and normalized text in lock-step,
/// treating each original whitespace run as one normalized space.
fn normalized_match(source: &[char], candidate: &[char]) -> Option<CharInterval> {
    let norm_source = collapse_whitespace(source);
    let norm_candidate = collapse_whitespace(candidate);
    if norm_candidate.is_empty() {
        return None;
    }
    let norm_start = find_subslice(&norm_source, &norm_candidate)?;
    let (start, end) = map_normalized_span(source, &norm_source, norm_start, norm_candidate.len())?;
    if start >= end {
        return None;
    }
    let matched: String = source[start..end].iter().collect();
    CharInterval::new(start, end, matched, 0.95).ok()
}

fn collapse_whitespace(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len());
    for &c in chars {
        if c.is_whitespace() {
            if out.last() != Some(&' ') {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
    if out.first() == Some(&' ') {
        out.remove(0);
    }
    if out.last() == Some(&' ') {
        out.pop();
    }
    out
}

/// Map a span of the whitespace-collapsed text back to original offsets.
fn map_normalized_span(
    source: &[char],
    normalized: &[char],
    norm_start: usize,
    norm_len: usize,
) -> Option<(usize, usize)> {
    let mut oi = 0;
    let mut ni = 0;

    // Walk to the span start.
    while ni < norm_start {
        if oi >= source.len() || ni >= normalized.len() {
            return None;
        }
        let oc = source[oi];
        if oc.is_whitespace() {
            oi += 1;
            if normalized[ni] == ' ' {
                ni += 1;
            }
        } else if oc == normalized[ni] {
            oi += 1;
            ni += 1;
        } else {
            return None;
        }
    }
    // Whitespace consumed by a preceding normalized space can leave the
    // cursor on a blank; the span starts at the next content char.
    while oi < source.len() && source[oi].is_whitespace() && normalized.get(ni) != Some(&' ') {
        oi += 1;
    }
    let start = oi;

    // Walk to the span end.
    let target = norm_start + norm_len;
    while ni < target {
        if oi >= source.len() {
            return None;
        }
        let oc = source[oi];
        let nc = if ni < normalized.len() { normalized[ni] } else { ' ' };
        if oc.is_whitespace() {
            oi += 1;
            if nc == ' ' {
                ni += 1;
            }
        } else if oc == nc {
            oi += 1;
            ni += 1;
        } else {
            return None;
        }
    }

    Some((start, oi))
}

fn find_subslice(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Levenshtein distance with a rolling two-row table.
fn edit_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Longest common substring of `a` and `b`, as `(start_in_a, length)`.
fn longest_common_substring(a: &[char], b: &[char]) -> (usize, usize) {
    let mut best_len = 0;
    let mut best_end = 0;
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                curr[j + 1] = prev[j] + 1;
                if curr[j + 1] > best_len {
                    best_len = curr[j + 1];
                    best_end = i + 1;
                }
            } else {
                curr[j + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
        curr.fill(0);
    }
    (best_end - best_len, best_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aligner() -> TextAligner {
        TextAligner::default()
    }

    #[test]
    fn test_exact_match_scenario() {
        let interval = aligner().find("甲方：北京科技有限公司", "北京科技有限公司").unwrap();
        assert_eq!((interval.start, interval.end), (3, 11));
        assert_eq!(interval.confidence, 1.0);
        assert_eq!(interval.matched_text, "北京科技有限公司");
    }

    #[test]
    fn test_trimmed_match() {
        let interval = aligner().find("合同金额100万元整", "  100万元  ").unwrap();
        assert_eq!(interval.confidence, 1.0);
        assert_eq!(interval.matched_text, "100万元");
        assert_eq!((interval.start, interval.end), (4, 9));
    }

    #[test]
    fn test_whitespace_normalized_match() {
        let source = "party a:  Beijing   Tech Co";
        let interval = aligner().find(source, "Beijing Tech Co").unwrap();
        assert_eq!(interval.confidence, 0.95);
        assert_eq!(interval.matched_text, "Beijing   Tech Co");
        assert_eq!((interval.start, interval.end), (10, 27));
    }

    #[test]
    fn test_fuzzy_match_tolerates_ocr_noise() {
        // One character of ten mis-recognized: distance 1, within 20%.
        let source = "本合同总金额为壹佰万元整大写";
        let interval = aligner().find(source, "总金额为贰佰万元整").unwrap();
        assert!(interval.confidence <= 0.8);
        assert!(interval.confidence > 0.7);
        assert_eq!(interval.matched_text, "总金额为壹佰万元整");
    }

    #[test]
    fn test_substring_fallback() {
        // Candidate half-present: fuzzy fails (distance too large), LCS of
        // 6/9 chars passes the 50% floor.
        let source = "乙方地址北京市海淀区中关村";
        let interval = aligner().find(source, "海淀区中关村大街1号").unwrap();
        assert!(interval.confidence <= 0.6);
        assert_eq!(interval.matched_text, "海淀区中关村");
    }

    #[test]
    fn test_unlocatable_returns_none() {
        assert!(aligner().find("甲方乙方丙方", "relevant text").is_none());
        assert!(aligner().find("", "anything").is_none());
        assert!(aligner().find("source", "   ").is_none());
    }

    #[test]
    fn test_cascade_confidence_monotonic() {
        // A value locatable exactly must not score below what a later tier
        // would report for the same inputs.
        let source = "总价：100万元";
        let candidate = "100万元";
        let exact = aligner().find(source, candidate).unwrap();
        let fuzzy = aligner()
            .fuzzy_match(&source.chars().collect::<Vec<_>>(), &candidate.chars().collect::<Vec<_>>());
        let lcs = aligner()
            .substring_match(&source.chars().collect::<Vec<_>>(), &candidate.chars().collect::<Vec<_>>());
        assert_eq!(exact.confidence, 1.0);
        if let Some(f) = fuzzy {
            assert!(exact.confidence >= f.confidence);
        }
        if let Some(l) = lcs {
            assert!(exact.confidence >= l.confidence);
        }
    }

    #[test]
    fn test_char_interval_validation() {
        assert!(CharInterval::new(5, 5, "", 1.0).is_err());
        assert!(CharInterval::new(7, 3, "", 1.0).is_err());
        assert!(CharInterval::new(0, 3, "abc", 1.5).is_err());
        assert!(CharInterval::new(0, 3, "abc", f64::NAN).is_err());
    }

    #[test]
    fn test_overlap_ratio() {
        let a = CharInterval::new(10, 20, "aaaaaaaaaa", 0.9).unwrap();
        let b = CharInterval::new(12, 22, "bbbbbbbbbb", 0.6).unwrap();
        let c = CharInterval::new(30, 40, "cccccccccc", 0.5).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!((a.overlap_ratio(&b) - 0.8).abs() < 1e-9);
        assert_eq!(a.overlap_ratio(&c), 0.0);
    }

    #[test]
    fn test_edit_distance() {
        let a: Vec<char> = "kitten".chars().collect();
        let b: Vec<char> = "sitting".chars().collect();
        assert_eq!(edit_distance(&a, &b), 3);
        assert_eq!(edit_distance(&a, &a), 0);
        assert_eq!(edit_distance(&a, &[]), 6);
    }

    #[test]
    fn test_longest_common_substring() {
        let a: Vec<char> = "abcdefg".chars().collect();
        let b: Vec<char> = "xxcdefyy".chars().collect();
        assert_eq!(longest_common_substring(&a, &b), (2, 4));
    }
}
