//! Benchmarks for layout analysis performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks run the full pipeline over synthetic pages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pagelayout::{
    Fragment, GraphicKind, GraphicPrimitive, LayoutAnalyzer, LayoutOptions, PageInput, Rect,
};

/// Creates a synthetic two-column page with the given number of text rows
/// per column.
fn create_test_page(number: u32, rows: usize) -> PageInput {
    let mut input = PageInput::new(number, 612.0, 792.0);

    // Column separator down the middle of the page.
    input.graphics.push(GraphicPrimitive::new(
        Rect::new(305.0, 72.0, 307.0, 720.0),
        GraphicKind::Line,
        [0, 0, 0],
    ));

    let words = ["measurement", "content", "for", "layout", "analysis"];
    for column in 0..2 {
        let left = 72.0 + column as f32 * 270.0;
        for row in 0..rows {
            let y = 80.0 + row as f32 * 14.0;
            let mut x = left;
            for word in words {
                let w = word.len() as f32 * 5.5;
                input.fragments.push(Fragment::new(
                    word,
                    "Times",
                    12.0,
                    y + 12.0,
                    Rect::new(x, y, x + w, y + 12.0),
                ));
                x += w + 6.0;
            }
        }
    }
    input
}

fn bench_analyze_page(c: &mut Criterion) {
    let analyzer = LayoutAnalyzer::new(LayoutOptions::default());

    c.bench_function("analyze_page_10_rows", |b| {
        b.iter(|| {
            analyzer
                .analyze_page(black_box(create_test_page(1, 10)))
                .unwrap()
        });
    });

    c.bench_function("analyze_page_40_rows", |b| {
        b.iter(|| {
            analyzer
                .analyze_page(black_box(create_test_page(1, 40)))
                .unwrap()
        });
    });
}

fn bench_analyze_document(c: &mut Criterion) {
    let pages = |count: u32| -> Vec<PageInput> {
        (1..=count).map(|n| create_test_page(n, 40)).collect()
    };

    c.bench_function("analyze_document_8_pages_parallel", |b| {
        let analyzer = LayoutAnalyzer::new(LayoutOptions::default());
        b.iter(|| analyzer.analyze_document(black_box(pages(8))).unwrap());
    });

    c.bench_function("analyze_document_8_pages_sequential", |b| {
        let analyzer = LayoutAnalyzer::new(LayoutOptions::default().sequential());
        b.iter(|| analyzer.analyze_document(black_box(pages(8))).unwrap());
    });
}

criterion_group!(benches, bench_analyze_page, bench_analyze_document);
criterion_main!(benches);
