//! Property-based tests for the whitespace search.
//!
//! Obstacles are scattered at random over a region and the search results
//! are checked against invariants that must hold for any input.

use pdfcolumns::{ContentItem, Rect, Region, WhitespaceFinder, WhitespaceOptions};
use proptest::prelude::*;

const SIZE: f64 = 200.0;
const EPSILON: f64 = 1e-9;

fn scattered(boxes: &[(f64, f64, f64, f64)]) -> Region {
    let items = boxes
        .iter()
        .map(|&(x, y, w, h)| ContentItem::graphic(Rect::new(x, y, x + w, y + h)))
        .collect();
    Region::with_bounds(Rect::new(0.0, 0.0, SIZE, SIZE), items).unwrap()
}

fn options(wanted: usize) -> WhitespaceOptions {
    WhitespaceOptions {
        wanted,
        min_width: Some(10.0),
        min_height: Some(10.0),
        ..WhitespaceOptions::default()
    }
}

fn obstacles() -> impl Strategy<Value = Vec<(f64, f64, f64, f64)>> {
    prop::collection::vec((0.0..190.0, 0.0..190.0, 10.0..40.0, 10.0..40.0), 0..12)
}

/// Property: no accepted rectangle covers more than the fuzzy allowance of
/// any content item
#[test]
fn proptest_whitespace_is_empty_enough() {
    proptest!(|(boxes in obstacles(), wanted in 0usize..8)| {
        let region = scattered(&boxes);
        let opts = options(wanted);
        let search = WhitespaceFinder::new(&region, &opts).unwrap().search();

        for ws in &search.whitespace {
            for item in region.contents() {
                let overlap = ws.bbox.intersection(&item.bbox).area();
                let allowance = item.bbox.area().min(ws.bbox.area()) * opts.fuzziness;
                prop_assert!(
                    overlap <= allowance + EPSILON,
                    "{:?} overlaps {:?} by {}",
                    ws.bbox,
                    item.bbox,
                    overlap
                );
            }
        }
    });
}

fn word_sized() -> impl Strategy<Value = Vec<(f64, f64, f64, f64)>> {
    prop::collection::vec((0.0..95.0, 0.0..95.0, 1.0..6.0, 1.0..6.0), 0..40)
}

fn axis_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    a1.min(b1) - a0.max(b0)
}

/// Property: with word-sized obstacles, every item the whitespace overlaps by
/// more than `obstacle_overlap` on both axes stays within its fuzzy allowance.
/// Thinner overlaps count as touching.
#[test]
fn proptest_word_sized_obstacles_respect_tolerance() {
    proptest!(|(boxes in word_sized(), wanted in 1usize..12)| {
        let items = boxes
            .iter()
            .map(|&(x, y, w, h)| ContentItem::text(Rect::new(x, y, x + w, y + h), "word"))
            .collect();
        let region = Region::with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0), items).unwrap();
        let opts = WhitespaceOptions {
            wanted,
            min_width: Some(1.0),
            min_height: Some(1.0),
            ..WhitespaceOptions::unfiltered()
        };
        let search = WhitespaceFinder::new(&region, &opts).unwrap().search();

        for ws in &search.whitespace {
            for item in region.contents() {
                let (w, i) = (ws.bbox, item.bbox);
                let dx = axis_overlap(w.x0, w.x1, i.x0, i.x1);
                let dy = axis_overlap(w.top, w.bottom, i.top, i.bottom);
                if dx <= opts.obstacle_overlap || dy <= opts.obstacle_overlap {
                    continue;
                }
                let overlap = w.intersection(&i).area();
                let allowance = i.area().min(w.area()) * opts.fuzziness;
                prop_assert!(
                    overlap <= allowance + EPSILON,
                    "{:?} overlaps {:?} by {}",
                    w,
                    i,
                    overlap
                );
            }
        }
    });
}

/// Property: the search never returns more than was asked for
#[test]
fn proptest_count_bounded_by_wanted() {
    proptest!(|(boxes in obstacles(), wanted in 0usize..8)| {
        let region = scattered(&boxes);
        let search = WhitespaceFinder::new(&region, &options(wanted)).unwrap().search();
        prop_assert!(search.whitespace.len() <= wanted);
    });
}

/// Property: results stay inside the region and respect the minimum size
#[test]
fn proptest_whitespace_inside_region() {
    proptest!(|(boxes in obstacles(), wanted in 1usize..8)| {
        let region = scattered(&boxes);
        let search = WhitespaceFinder::new(&region, &options(wanted)).unwrap().search();

        for ws in &search.whitespace {
            prop_assert!(region.bbox().contains(&ws.bbox));
            prop_assert!(ws.bbox.width() >= 10.0 || ws.bbox == region.bbox());
            prop_assert!(ws.bbox.height() >= 10.0 || ws.bbox == region.bbox());
        }
    });
}

/// Property: the same input always gives the same output
#[test]
fn proptest_search_is_deterministic() {
    proptest!(|(boxes in obstacles())| {
        let region = scattered(&boxes);
        let opts = options(5);
        let a = WhitespaceFinder::new(&region, &opts).unwrap().search();
        let b = WhitespaceFinder::new(&region, &opts).unwrap().search();
        prop_assert_eq!(a, b);
    });
}
