//! Benchmarks for the diff engine and alignment cascade on contract-sized
//! inputs.

use contract_anchor::{diff, AlignConfig, TextAligner};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Build a synthetic contract body of roughly `clauses` numbered clauses.
fn contract_body(clauses: usize, amount: &str) -> String {
    let mut text = String::from("合同编号：HT-2024-001\n甲方：北京科技有限公司\n乙方：上海贸易有限公司\n");
    for i in 0..clauses {
        text.push_str(&format!(
            "第{}条 双方应按照本合同约定履行各自义务，任何一方违约应承担违约责任。\n",
            i + 1
        ));
    }
    text.push_str(&format!("总价：{amount}万元整\n"));
    text
}

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");

    let small_a = contract_body(5, "100");
    let small_b = contract_body(5, "150");
    group.bench_function("small_contract_one_change", |b| {
        b.iter(|| diff(black_box(&small_a), black_box(&small_b)))
    });

    let large_a = contract_body(200, "100");
    let mut large_b = contract_body(200, "150");
    large_b = large_b.replace("第50条", "第五十条");
    large_b.push_str("补充条款：本合同一式两份。\n");
    group.bench_function("large_contract_scattered_changes", |b| {
        b.iter(|| diff(black_box(&large_a), black_box(&large_b)))
    });

    let disjoint_a = "甲".repeat(2000);
    let disjoint_b = "乙".repeat(2000);
    group.bench_function("disjoint_texts", |b| {
        b.iter(|| diff(black_box(&disjoint_a), black_box(&disjoint_b)))
    });

    group.finish();
}

fn bench_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("alignment");
    let source = contract_body(100, "100");
    let aligner = TextAligner::new(AlignConfig::default());

    group.bench_function("exact_hit", |b| {
        b.iter(|| aligner.find(black_box(&source), black_box("北京科技有限公司")))
    });

    // One character off: falls through to the fuzzy window scan.
    group.bench_function("fuzzy_hit", |b| {
        b.iter(|| aligner.find(black_box(&source), black_box("总价：200万元整")))
    });

    group.bench_function("total_miss", |b| {
        b.iter(|| aligner.find(black_box(&source), black_box("完全不存在的字段值内容")))
    });

    group.finish();
}

criterion_group!(benches, bench_diff, bench_alignment);
criterion_main!(benches);
