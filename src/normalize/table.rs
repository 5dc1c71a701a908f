//! Static substitution table for OCR text canonicalization.
//!
//! Maps CJK punctuation to ASCII equivalents, full-width digits to ASCII
//! digits, and corrects a short list of character confusions the OCR engine
//! is known to produce in Chinese contract text (traditional forms of the
//! formal numerals, mis-recognized ideographs).
//!
//! The table is ordered: multi-character entries come before their
//! single-character prefixes so `——` is rewritten before `—` can split it.
//! Entries are applied as repeated literal replacements, in table order.

/// Ordered substitution pairs, applied first to last.
pub(crate) static SUBSTITUTIONS: &[(&str, &str)] = &[
    // Multi-character entries first
    ("——", "--"),
    ("……", ".."),
    // Common OCR phrase confusions. The 运营商 entry must precede 运营:
    // rewriting 运营 first would leave 经营商 behind, which a second pass
    // would then rewrite again, breaking idempotence.
    ("运营商", "经营者"),
    ("经营商", "经营者"),
    ("运营", "经营"),
    // Brackets
    ("（", "("),
    ("）", ")"),
    ("【", "["),
    ("】", "]"),
    ("｛", "{"),
    ("｝", "}"),
    // Punctuation
    ("：", ":"),
    ("；", ";"),
    ("，", ","),
    ("。", "."),
    ("？", "?"),
    ("！", "!"),
    // Quotes
    ("\u{201c}", "\""),
    ("\u{201d}", "\""),
    ("\u{2018}", "'"),
    ("\u{2019}", "'"),
    ("｀", "`"),
    // Dashes and connectors
    ("—", "-"),
    ("－", "-"),
    ("～", "~"),
    ("…", "."),
    // Other symbols
    ("、", ","),
    ("·", "."),
    ("＊", "*"),
    ("＃", "#"),
    ("＆", "&"),
    ("％", "%"),
    ("＠", "@"),
    ("＋", "+"),
    ("＝", "="),
    ("＜", "<"),
    ("＞", ">"),
    ("｜", "|"),
    ("＼", "\\"),
    ("／", "/"),
    // Full-width digits
    ("０", "0"),
    ("１", "1"),
    ("２", "2"),
    ("３", "3"),
    ("４", "4"),
    ("５", "5"),
    ("６", "6"),
    ("７", "7"),
    ("８", "8"),
    ("９", "9"),
    // Formal numeral confusions in amounts
    ("貳", "贰"),
    ("參", "叁"),
    ("陸", "陆"),
    ("陌", "佰"),
    ("萬", "万"),
    ("億", "亿"),
    // More single-character confusions
    ("購", "购"),
    ("羔", "盖"),
    ("買", "买"),
    ("説", "说"),
];
