//! Alignment cascade tests against realistic contract text.
//!
//! These exercise [`TextAligner`] through its public API with the kind of
//! noise multi-pass extraction actually produces: stray whitespace, one or
//! two OCR character confusions, and paraphrased affixes.

use contract_anchor::{AlignConfig, TextAligner};

const SOURCE: &str = "合同编号：HT-2024-001\n甲方：北京科技有限公司\n乙方：上海贸易有限公司\n总价：100万元整";

#[test]
fn test_exact_value_found_with_full_confidence() {
    let aligner = TextAligner::default();
    let interval = aligner.find(SOURCE, "北京科技有限公司").unwrap();
    assert_eq!(interval.confidence, 1.0);
    assert_eq!(interval.matched_text, "北京科技有限公司");
    let chars: Vec<char> = SOURCE.chars().collect();
    let found: String = chars[interval.start..interval.end].iter().collect();
    assert_eq!(found, "北京科技有限公司");
}

#[test]
fn test_value_with_stray_whitespace_is_trimmed() {
    let aligner = TextAligner::default();
    let interval = aligner.find(SOURCE, " HT-2024-001 ").unwrap();
    assert_eq!(interval.confidence, 1.0);
    assert_eq!(interval.matched_text, "HT-2024-001");
}

#[test]
fn test_internal_whitespace_differences_match_at_095() {
    let source = "付款方式：  分期   付款";
    let aligner = TextAligner::default();
    let interval = aligner.find(source, "分期 付款").unwrap();
    assert_eq!(interval.confidence, 0.95);
    assert_eq!(interval.matched_text, "分期   付款");
}

#[test]
fn test_single_ocr_confusion_matches_fuzzily() {
    // Extraction says 200, page says 100: one substitution in a 7-char value.
    let aligner = TextAligner::default();
    let interval = aligner.find(SOURCE, "总价：200万元整").unwrap();
    assert!(interval.confidence > 0.6 && interval.confidence <= 0.8);
    assert_eq!(interval.matched_text, "总价：100万元整");
}

#[test]
fn test_partially_present_value_falls_back_to_substring() {
    // Only "上海贸易有限公司" exists; the street affix was hallucinated.
    let aligner = TextAligner::default();
    let interval = aligner.find(SOURCE, "上海贸易有限公司南京路分部").unwrap();
    assert!(interval.confidence <= 0.6);
    assert_eq!(interval.matched_text, "上海贸易有限公司");
}

#[test]
fn test_absent_value_returns_none() {
    let aligner = TextAligner::default();
    assert!(aligner.find(SOURCE, "丙方：广州物流公司").is_none());
}

#[test]
fn test_blank_candidate_returns_none() {
    let aligner = TextAligner::default();
    assert!(aligner.find(SOURCE, "").is_none());
    assert!(aligner.find(SOURCE, " \t\n ").is_none());
    assert!(aligner.find("", "anything").is_none());
}

#[test]
fn test_tight_distance_ratio_rejects_noisy_match() {
    // Default 20% tolerance accepts one error in seven chars; a 5% ratio
    // still allows distance 1 (the floor), so drop to a longer candidate
    // with two errors to see the rejection.
    let source = "本合同总金额为壹佰贰拾万元整";
    let candidate = "总金额为贰佰叁拾万元";
    let loose = TextAligner::new(AlignConfig::default());
    assert!(loose.find(source, candidate).is_some());

    let strict = TextAligner::new(AlignConfig {
        max_distance_ratio: 0.05,
        min_lcs_ratio: 0.9,
        min_lcs_len: 10,
    });
    assert!(strict.find(source, candidate).is_none());
}

#[test]
fn test_short_candidates_need_absolute_lcs_floor() {
    // Fuzzy is out of reach (3 errors in 4 chars) and the 1-char overlap
    // "盖" stays under the 3-char LCS floor, so no garbage anchor.
    let aligner = TextAligner::default();
    assert!(aligner.find("甲方盖章处", "印鉴盖戳").is_none());
}

#[test]
fn test_absent_single_char_value_does_not_anchor() {
    // A 1-char candidate always fits the 1-edit distance floor against any
    // window, but a full-length distance means zero confidence, not a match.
    let aligner = TextAligner::default();
    assert!(aligner.find("甲方乙方丙方", "丁").is_none());
    // Present 1-char values still anchor exactly.
    let interval = aligner.find("甲方乙方丙方", "丙").unwrap();
    assert_eq!((interval.start, interval.end), (4, 5));
    assert_eq!(interval.confidence, 1.0);
}

#[test]
fn test_first_occurrence_wins_for_repeated_values() {
    let source = "定金10万元，尾款10万元";
    let aligner = TextAligner::default();
    let interval = aligner.find(source, "10万元").unwrap();
    assert_eq!(interval.start, 2);
}
