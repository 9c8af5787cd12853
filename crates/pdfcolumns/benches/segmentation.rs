//! Performance benchmarks for pdfcolumns.
//!
//! Benchmarks cover the whitespace search, column extraction and the combined
//! pipeline on synthetic pages of increasing density:
//! - Sparse: a heading and a few short lines
//! - Two columns: dense prose split by one gutter
//! - Three columns: dense prose split by two gutters

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pdfcolumns::{
    ColumnOptions, ContentItem, Rect, Region, SegmentOptions, WhitespaceOptions,
    extract_column_boundaries, find_whitespace_in_region, segment_region, segment_regions,
};

// ---------------------------------------------------------------------------
// Page fixture generators
// ---------------------------------------------------------------------------

const WORDS: [&str; 6] = ["layout", "column", "gutter", "margin", "reading", "prose"];

/// Fill each `[x0, x1]` range with rows of words from `y = 12` to `y = 790`.
fn prose_page(columns: &[(f64, f64)]) -> Region {
    let mut items = Vec::new();
    for row in 1..=65 {
        let top = row as f64 * 12.0;
        for (c, &(x0, x1)) in columns.iter().enumerate() {
            let mut x = x0;
            let mut width = 30.0 + ((row + c) % 4) as f64 * 13.0;
            let mut k = row;
            while x < x1 {
                let mut end = (x + width).min(x1);
                if x1 - end < 16.0 {
                    end = x1;
                }
                items.push(ContentItem::text(
                    Rect::new(x, top, end, top + 10.0),
                    WORDS[k % WORDS.len()],
                ));
                x = end + 4.0;
                width = 60.0;
                k += 1;
            }
        }
    }
    Region::with_bounds(Rect::new(0.0, 0.0, 600.0, 800.0), items).unwrap()
}

fn sparse_page() -> Region {
    let mut items = vec![ContentItem::text(
        Rect::new(60.0, 40.0, 540.0, 64.0),
        "Segmenting pages into columns",
    )];
    for row in 0..8 {
        let top = 120.0 + row as f64 * 14.0;
        items.push(ContentItem::text(
            Rect::new(60.0, top, 300.0 + row as f64 * 20.0, top + 10.0),
            "a short line of body text",
        ));
    }
    Region::with_bounds(Rect::new(0.0, 0.0, 600.0, 800.0), items).unwrap()
}

fn two_columns() -> Region {
    prose_page(&[(40.0, 290.0), (310.0, 560.0)])
}

fn three_columns() -> Region {
    prose_page(&[(40.0, 190.0), (210.0, 390.0), (410.0, 560.0)])
}

fn search_options() -> WhitespaceOptions {
    WhitespaceOptions {
        wanted: 10,
        ..WhitespaceOptions::default()
    }
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_whitespace_search(c: &mut Criterion) {
    let sparse = sparse_page();
    let two = two_columns();
    let three = three_columns();
    let opts = search_options();

    let mut group = c.benchmark_group("whitespace_search");

    group.bench_function("sparse", |b| {
        b.iter(|| {
            let found = find_whitespace_in_region(&sparse, &opts).unwrap();
            black_box(found.value.len());
        });
    });

    group.bench_function("two_columns", |b| {
        b.iter(|| {
            let found = find_whitespace_in_region(&two, &opts).unwrap();
            black_box(found.value.len());
        });
    });

    group.bench_function("three_columns", |b| {
        b.iter(|| {
            let found = find_whitespace_in_region(&three, &opts).unwrap();
            black_box(found.value.len());
        });
    });

    group.finish();
}

fn bench_column_extraction(c: &mut Criterion) {
    let three = three_columns();
    let found = find_whitespace_in_region(&three, &search_options())
        .unwrap()
        .value;
    let opts = ColumnOptions::default();

    let mut group = c.benchmark_group("column_extraction");

    group.bench_function("three_columns", |b| {
        b.iter(|| {
            let columns = extract_column_boundaries(&three, &found, &opts).unwrap();
            black_box(columns.len());
        });
    });

    group.finish();
}

fn bench_segmentation(c: &mut Criterion) {
    let pages: Vec<Region> = (0..10)
        .map(|i| if i % 2 == 0 { two_columns() } else { three_columns() })
        .collect();
    let opts = SegmentOptions {
        whitespace: search_options(),
        ..SegmentOptions::default()
    };

    let mut group = c.benchmark_group("segmentation");

    group.bench_function("single_page", |b| {
        b.iter(|| {
            let layout = segment_region(&pages[0], &opts).unwrap();
            black_box(layout.value.column_count());
        });
    });

    group.bench_function("ten_pages", |b| {
        b.iter(|| {
            for result in segment_regions(&pages, &opts) {
                black_box(result.unwrap().value.column_count());
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_whitespace_search,
    bench_column_extraction,
    bench_segmentation,
);
criterion_main!(benches);
