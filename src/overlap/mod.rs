//! Reconciliation of extraction candidates across multiple passes.
//!
//! Multi-pass extraction (several prompts, several models, or re-runs over
//! overlapping page windows) produces competing candidates for the same
//! field, often anchored to overlapping character ranges. The resolver keeps
//! at most one winner per overlapping cluster, chosen by a fixed tie-break
//! cascade, and leaves non-overlapping candidates untouched.
//!
//! The cascade is deliberately ordered: extraction confidence is the
//! strongest signal, alignment confidence catches ties between equally
//! confident extractions, and length/pass ordering only breaks exact
//! ties. Resolution is deterministic for any input ordering of passes.

use crate::align::CharInterval;
use crate::config::OverlapConfig;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Tolerance for the confidence-gap comparisons: a gap sitting exactly at
/// the configured threshold must not discriminate, and f64 subtraction can
/// land a hair above it.
const GAP_EPSILON: f64 = 1e-9;

/// One extracted field value from one pass, optionally anchored to text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionCandidate {
    /// Stable field identifier (e.g. `"party_a"`, `"total_amount"`)
    pub field_id: String,
    /// Zero-based index of the pass that produced this candidate
    pub pass_index: u32,
    /// The value as extracted, before any alignment
    pub raw_value: String,
    /// Where the value was located in the source text, if alignment succeeded
    pub interval: Option<CharInterval>,
    /// Extraction confidence reported by the producing pass, in `[0, 1]`
    pub confidence: f64,
}

impl ExtractionCandidate {
    /// Alignment confidence, or zero when the candidate is unanchored.
    fn alignment_confidence(&self) -> f64 {
        self.interval.as_ref().map_or(0.0, |i| i.confidence)
    }

    fn value_len(&self) -> usize {
        self.raw_value.chars().count()
    }
}

/// Resolves overlapping candidates into one winner per cluster.
#[derive(Debug, Clone, Default)]
pub struct OverlapResolver {
    config: OverlapConfig,
}

impl OverlapResolver {
    /// Create a resolver with the given thresholds.
    pub fn new(config: OverlapConfig) -> Self {
        Self { config }
    }

    /// Merge candidates from all passes into a conflict-free set.
    ///
    /// Candidates are grouped by `field_id`; within a group, each candidate
    /// is tested against the already accepted ones and either displaces the
    /// overlapping incumbent or is dropped. Candidates in different fields
    /// never conflict. The result is sorted by anchor position, with
    /// unanchored candidates last.
    pub fn merge_passes(
        &self,
        passes: Vec<Vec<ExtractionCandidate>>,
    ) -> Vec<ExtractionCandidate> {
        let mut by_field: IndexMap<String, Vec<ExtractionCandidate>> = IndexMap::new();
        for (pass_index, pass) in passes.into_iter().enumerate() {
            for mut candidate in pass {
                candidate.pass_index = pass_index as u32;
                by_field
                    .entry(candidate.field_id.clone())
                    .or_default()
                    .push(candidate);
            }
        }

        let mut resolved = Vec::new();
        for (field_id, candidates) in by_field {
            let kept = self.resolve_field(&field_id, candidates);
            resolved.extend(kept);
        }

        resolved.sort_by(position_order);
        resolved
    }

    /// Sweep one field's candidates left to right, keeping winners of each
    /// overlap cluster.
    ///
    /// The sweep runs in interval-start order, not submission order. The
    /// tie-break cascade is not transitive, so sweeping in pass order would
    /// let the arrival sequence pick the winner of a mutually overlapping
    /// cluster.
    fn resolve_field(
        &self,
        field_id: &str,
        mut candidates: Vec<ExtractionCandidate>,
    ) -> Vec<ExtractionCandidate> {
        // Stable sort: candidates tied on position keep pass order, which the
        // final first-seen rule depends on.
        candidates.sort_by(position_order);
        let mut accepted: Vec<ExtractionCandidate> = Vec::new();

        for candidate in candidates {
            let overlapping: Vec<usize> = accepted
                .iter()
                .enumerate()
                .filter(|(_, incumbent)| self.overlaps_significantly(incumbent, &candidate))
                .map(|(i, _)| i)
                .collect();

            if overlapping.is_empty() {
                accepted.push(candidate);
                continue;
            }

            // The challenger must beat every incumbent it conflicts with;
            // otherwise displacing one would just reintroduce an overlap
            // with another.
            if overlapping
                .iter()
                .all(|&i| self.prefer_challenger(&accepted[i], &candidate))
            {
                debug!(
                    "field {field_id}: pass {} displaces {} candidate(s)",
                    candidate.pass_index,
                    overlapping.len()
                );
                for &i in overlapping.iter().rev() {
                    accepted.remove(i);
                }
                accepted.push(candidate);
            } else {
                debug!(
                    "field {field_id}: pass {} candidate dropped",
                    candidate.pass_index
                );
            }
        }

        accepted
    }

    /// Whether two candidates compete: both anchored, and the overlap covers
    /// at least the configured fraction of the shorter interval.
    fn overlaps_significantly(
        &self,
        a: &ExtractionCandidate,
        b: &ExtractionCandidate,
    ) -> bool {
        match (&a.interval, &b.interval) {
            (Some(ia), Some(ib)) => ia.overlap_ratio(ib) >= self.config.threshold,
            _ => false,
        }
    }

    /// Decide whether `challenger` displaces `incumbent`.
    ///
    /// Rules apply in order, each only when the previous one cannot
    /// discriminate: extraction confidence gap, alignment confidence gap,
    /// value length gap, lower pass index. A full tie keeps the incumbent,
    /// so resolution is stable under re-ordering within a pass.
    fn prefer_challenger(
        &self,
        incumbent: &ExtractionCandidate,
        challenger: &ExtractionCandidate,
    ) -> bool {
        let conf_gap = challenger.confidence - incumbent.confidence;
        if conf_gap.abs() > self.config.confidence_gap + GAP_EPSILON {
            return conf_gap > 0.0;
        }

        let align_gap = challenger.alignment_confidence() - incumbent.alignment_confidence();
        if align_gap.abs() > self.config.confidence_gap + GAP_EPSILON {
            return align_gap > 0.0;
        }

        let len_a = incumbent.value_len() as i64;
        let len_b = challenger.value_len() as i64;
        if (len_b - len_a).abs() > self.config.length_gap as i64 {
            return len_b > len_a;
        }

        challenger.pass_index < incumbent.pass_index
    }
}

/// Order candidates by `(interval.start, interval.end)`, unanchored last.
fn position_order(a: &ExtractionCandidate, b: &ExtractionCandidate) -> Ordering {
    match (&a.interval, &b.interval) {
        (Some(ia), Some(ib)) => ia.start.cmp(&ib.start).then(ia.end.cmp(&ib.end)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(
        field: &str,
        value: &str,
        interval: Option<(usize, usize, f64)>,
        confidence: f64,
    ) -> ExtractionCandidate {
        ExtractionCandidate {
            field_id: field.to_string(),
            pass_index: 0,
            raw_value: value.to_string(),
            interval: interval
                .map(|(s, e, c)| CharInterval::new(s, e, value, c).unwrap()),
            confidence,
        }
    }

    fn resolver() -> OverlapResolver {
        OverlapResolver::default()
    }

    #[test]
    fn test_higher_confidence_wins() {
        let merged = resolver().merge_passes(vec![
            vec![candidate("amount", "100万元整整整整", Some((10, 20, 0.9)), 0.9)],
            vec![candidate("amount", "100万元整整整整", Some((12, 22, 0.9)), 0.6)],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].pass_index, 0);
        assert_eq!(merged[0].confidence, 0.9);
    }

    #[test]
    fn test_challenger_with_higher_confidence_displaces() {
        let merged = resolver().merge_passes(vec![
            vec![candidate("amount", "100万", Some((10, 20, 0.9)), 0.5)],
            vec![candidate("amount", "100万", Some((12, 22, 0.9)), 0.9)],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].pass_index, 1);
    }

    #[test]
    fn test_alignment_confidence_breaks_confidence_tie() {
        let merged = resolver().merge_passes(vec![
            vec![candidate("party", "北京科技", Some((0, 8, 0.6)), 0.8)],
            vec![candidate("party", "北京科技", Some((0, 8, 0.95)), 0.8)],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].pass_index, 1);
    }

    #[test]
    fn test_length_breaks_double_tie() {
        let merged = resolver().merge_passes(vec![
            vec![candidate("addr", "海淀区", Some((0, 10, 0.9)), 0.8)],
            vec![candidate("addr", "北京市海淀区中关村大街", Some((0, 10, 0.9)), 0.8)],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].raw_value, "北京市海淀区中关村大街");
    }

    #[test]
    fn test_full_tie_keeps_earlier_pass() {
        let merged = resolver().merge_passes(vec![
            vec![candidate("date", "2024年1月", Some((5, 12, 0.9)), 0.8)],
            vec![candidate("date", "2024年2月", Some((5, 12, 0.9)), 0.8)],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].pass_index, 0);
        assert_eq!(merged[0].raw_value, "2024年1月");
    }

    #[test]
    fn test_non_overlapping_candidates_both_kept() {
        let merged = resolver().merge_passes(vec![
            vec![candidate("clause", "第一条", Some((0, 3, 1.0)), 0.9)],
            vec![candidate("clause", "第二条", Some((50, 53, 1.0)), 0.9)],
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].raw_value, "第一条");
        assert_eq!(merged[1].raw_value, "第二条");
    }

    #[test]
    fn test_insignificant_overlap_keeps_both() {
        // 2 chars shared out of a 10-char minimum: ratio 0.2 < 0.3.
        let merged = resolver().merge_passes(vec![
            vec![candidate("a", "aaaaaaaaaa", Some((0, 10, 1.0)), 0.9)],
            vec![candidate("a", "bbbbbbbbbb", Some((8, 18, 1.0)), 0.9)],
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_different_fields_never_conflict() {
        let merged = resolver().merge_passes(vec![vec![
            candidate("party_a", "甲方", Some((0, 5, 1.0)), 0.9),
            candidate("party_b", "乙方", Some((0, 5, 1.0)), 0.9),
        ]]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_unanchored_candidates_sort_last_and_survive() {
        let merged = resolver().merge_passes(vec![vec![
            candidate("x", "unanchored", None, 0.9),
            candidate("y", "anchored", Some((3, 11, 1.0)), 0.5),
        ]]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].raw_value, "anchored");
        assert!(merged[1].interval.is_none());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = resolver().merge_passes(vec![
            vec![candidate("f", "v1", Some((0, 6, 0.9)), 0.9)],
            vec![candidate("f", "v2", Some((2, 8, 0.9)), 0.4)],
        ]);
        let twice = resolver().merge_passes(vec![once.clone()]);
        // Re-merging reassigns pass indexes but keeps the same winners.
        assert_eq!(twice.len(), once.len());
        assert_eq!(twice[0].raw_value, once[0].raw_value);
    }

    #[test]
    fn test_empty_passes() {
        assert!(resolver().merge_passes(vec![]).is_empty());
        assert!(resolver().merge_passes(vec![vec![], vec![]]).is_empty());
    }
}
