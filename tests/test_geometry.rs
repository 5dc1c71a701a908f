//! Geometry validation, reading-order, and range-to-bbox mapping tests.

use contract_anchor::{CharBox, CharGeometryIndex, GeometryMapper, IndexConfig};

fn cb(page: u32, ch: char, x0: f64, y0: f64) -> CharBox {
    CharBox::new(page, ch, [x0, y0, x0 + 10.0, y0 + 12.0], "text").unwrap()
}

#[test]
fn test_char_box_rejects_degenerate_rectangles() {
    assert!(CharBox::new(1, 'a', [10.0, 10.0, 5.0, 20.0], "text").is_err());
    assert!(CharBox::new(1, 'a', [0.0, 20.0, 10.0, 10.0], "text").is_err());
    assert!(CharBox::new(1, 'a', [f64::NAN, 0.0, 10.0, 10.0], "text").is_err());
    assert!(CharBox::new(1, 'a', [0.0, 0.0, f64::INFINITY, 10.0], "text").is_err());
    assert!(CharBox::new(1, 'a', [0.0, 0.0, 10.0, 10.0], "text").is_ok());
}

#[test]
fn test_shuffled_boxes_reconstruct_reading_order() {
    // Two lines on page 1 and one on page 2, delivered out of order.
    let boxes = vec![
        cb(2, '五', 0.0, 50.0),
        cb(1, '三', 0.0, 130.0),
        cb(1, '二', 12.0, 101.0),
        cb(1, '一', 0.0, 99.0),
        cb(1, '四', 12.0, 131.0),
    ];
    let index = CharGeometryIndex::build(&boxes, &IndexConfig::default());
    assert_eq!(index.text(), "一二三四五");
    assert_eq!(index.box_at(4).unwrap().page, 2);
}

#[test]
fn test_mapper_merges_within_line_tolerance() {
    // Top edges drift by up to 4 units: still one line, one merged box.
    let boxes = vec![
        cb(1, '甲', 0.0, 100.0),
        cb(1, '方', 12.0, 102.0),
        cb(1, '：', 24.0, 104.0),
    ];
    let index = CharGeometryIndex::build(&boxes, &IndexConfig::default());
    let merged = GeometryMapper::default().map_range(&index, 0, 3).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].text, "甲方：");
    // Union spans every box, including the drifted edges.
    assert_eq!(merged[0].bbox, [0.0, 100.0, 34.0, 116.0]);
}

#[test]
fn test_mapper_splits_on_line_break_and_page_break() {
    let boxes = vec![
        cb(1, 'a', 0.0, 100.0),
        cb(1, 'b', 0.0, 140.0),
        cb(2, 'c', 0.0, 100.0),
    ];
    let index = CharGeometryIndex::build(&boxes, &IndexConfig::default());
    let merged = GeometryMapper::default().map_range(&index, 0, 3).unwrap();
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].page, 1);
    assert_eq!(merged[2].page, 2);
}

#[test]
fn test_mapper_partial_range() {
    let boxes: Vec<CharBox> = "合同正文内容"
        .chars()
        .enumerate()
        .map(|(i, ch)| cb(1, ch, i as f64 * 10.0, 100.0))
        .collect();
    let index = CharGeometryIndex::build(&boxes, &IndexConfig::default());
    let merged = GeometryMapper::default().map_range(&index, 2, 4).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].text, "正文");
    assert_eq!(merged[0].bbox[0], 20.0);
    assert_eq!(merged[0].bbox[2], 40.0);
}

#[test]
fn test_empty_document_resolves_to_nothing() {
    let index = CharGeometryIndex::build(&[], &IndexConfig::default());
    assert!(index.is_empty());
    let merged = GeometryMapper::default().map_range(&index, 0, 100).unwrap();
    assert!(merged.is_empty());
}

#[test]
fn test_inverted_range_is_an_error() {
    let index = CharGeometryIndex::build(&[cb(1, 'a', 0.0, 0.0)], &IndexConfig::default());
    assert!(index.resolve(5, 2).is_err());
    assert!(GeometryMapper::default().map_range(&index, 5, 2).is_err());
}

#[test]
fn test_custom_line_tolerance_flows_through_mapper() {
    let boxes = vec![cb(1, 'a', 0.0, 100.0), cb(1, 'b', 12.0, 108.0)];
    let config = IndexConfig::new().with_line_tolerance(10.0);
    let index = CharGeometryIndex::build(&boxes, &config);
    let merged = GeometryMapper::new(config).map_range(&index, 0, 2).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].text, "ab");
}
