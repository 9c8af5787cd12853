//! Synthetic page fixtures shared by the integration tests.

#![allow(dead_code)]

use pdfcolumns::{ContentItem, Rect, Region};

pub const PAGE_WIDTH: f64 = 600.0;
pub const PAGE_HEIGHT: f64 = 800.0;
pub const LINE_HEIGHT: f64 = 10.0;
pub const LINE_PITCH: f64 = 12.0;

const WORDS: [&str; 10] = [
    "segment",
    "layout",
    "reading",
    "gutter",
    "column",
    "prose",
    "margin",
    "running",
    "words",
    "paragraph",
];

/// Fill `[x0, x1]` at `top` with words separated by four unit gaps.
///
/// The first word's width depends on `stagger` so that gaps on neighbouring
/// lines do not line up into rivers. No word is narrower than 12 units.
pub fn fill_line(items: &mut Vec<ContentItem>, x0: f64, x1: f64, top: f64, stagger: f64) {
    let mut x = x0;
    let mut width = 30.0 + stagger;
    let mut k = (top / LINE_PITCH) as usize;

    while x < x1 {
        let mut end = (x + width).min(x1);
        if x1 - end < 16.0 {
            end = x1;
        }
        items.push(ContentItem::text(
            Rect::new(x, top, end, top + LINE_HEIGHT),
            WORDS[k % WORDS.len()],
        ));
        x = end + 4.0;
        width = 60.0;
        k += 1;
    }
}

/// A page whose text lines fill each `[x0, x1]` range from `y = 12` down to
/// `y = 790`, leaving a strip of whitespace at the top and the bottom.
pub fn columns_page(columns: &[(f64, f64)]) -> Region {
    let mut items = Vec::new();
    for i in 1..=65 {
        let top = i as f64 * LINE_PITCH;
        for (c, &(x0, x1)) in columns.iter().enumerate() {
            let stagger = ((i + c) % 4) as f64 * 13.0;
            fill_line(&mut items, x0, x1, top, stagger);
        }
    }
    Region::with_bounds(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT), items).unwrap()
}

/// Two dense blocks at `x in [0, 290]` and `x in [310, 600]`.
pub fn two_column_page() -> Region {
    columns_page(&[(0.0, 290.0), (310.0, 600.0)])
}

/// Three dense blocks separated by gaps at `x in [190, 210]` and `[390, 410]`.
pub fn three_column_page() -> Region {
    columns_page(&[(0.0, 190.0), (210.0, 390.0), (410.0, 600.0)])
}
