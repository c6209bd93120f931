//! Benchmarks for the pattern library and association engine.
//!
//! Run with: cargo bench
//!
//! Uses synthetic schedule text shaped like OCR output of a drawing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rebarex::{AssociationEngine, ExtractOptions, PageText, PatternLibrary, TextSource};

/// Build a synthetic schedule page with `rows` table rows.
fn schedule_text(rows: usize) -> String {
    let mut text = String::new();
    for i in 0..rows {
        let circle = format!("P{}", i % 40 + 1);
        let quantity = i % 60 + 1;
        let diameter = [8, 10, 12, 15][i % 4];
        let length = [1.0, 2.5, 3.5][i % 3];
        text.push_str(&format!(
            "{} {}Rfi{}/{}cm,L={}m\n",
            circle,
            quantity,
            diameter,
            diameter + 2,
            length
        ));
        if i % 7 == 0 {
            text.push_str("bar schedule continued\n");
        }
    }
    text
}

fn bench_pattern_library(c: &mut Criterion) {
    let library = PatternLibrary::new();
    let text = schedule_text(200);

    c.bench_function("scan_segment_200_rows", |b| {
        b.iter(|| {
            for line in text.lines() {
                black_box(library.scan_segment(black_box(line)));
            }
        })
    });

    c.bench_function("material_codes_single_row", |b| {
        b.iter(|| black_box(library.material_codes(black_box("39Rfi12/15cm,L=2.5m"))))
    });
}

fn bench_association_engine(c: &mut Criterion) {
    let engine = AssociationEngine::new(&ExtractOptions::default());
    let pages: Vec<PageText> = (1..=10)
        .map(|number| PageText {
            number,
            text: schedule_text(80),
            source: TextSource::Native,
        })
        .collect();

    c.bench_function("associate_10_pages_80_rows", |b| {
        b.iter(|| black_box(engine.run(black_box(&pages))))
    });
}

criterion_group!(benches, bench_pattern_library, bench_association_engine);
criterion_main!(benches);
