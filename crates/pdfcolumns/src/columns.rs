//! Column boundary extraction.
//!
//! Turns whitespace rectangles into column boundaries in four passes, each of
//! which replaces the working list:
//!
//! 1. [`select_candidates`] keeps tall, narrow rectangles flanked by text.
//! 2. [`adjust_heights`] re-measures each candidate as a thin probe grown to
//!    the real vertical extent of the gap.
//! 3. [`filter_boundaries`] drops candidates that are too short, sit in a
//!    margin, or have too little meaningful text on their left.
//! 4. [`merge_boundaries`] joins candidates that are close on the x axis.
//!
//! Every pass is a pure function of the region and its input list.

use std::cmp::Ordering;

use pdfcolumns_core::{
    ColumnBoundary, ContentItem, Direction, LayoutError, Positioned, Rect, Region, Whitespace,
};

use crate::options::ColumnOptions;

/// Score given to candidates that pass selection.
pub const SELECTED_SCORE: f64 = 500.0;

/// Score given to re-measured and merged boundaries.
pub const BOUNDARY_SCORE: f64 = 1000.0;

/// Characters that carry little information about whether text is prose,
/// such as list markers, numbering and reference labels.
const LOW_INFORMATION_CHARS: &str = "()[]abcdef1234567890o.?* ";

/// Width of the strip left of a probe searched for words it might split.
const LOOK_LEFT: f64 = 10.0;

/// Run all four passes over `whitespace`.
///
/// The output is sorted by `(x0, top, x1, bottom)`.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidOption`] if `opts` fails validation.
pub fn extract_column_boundaries(
    region: &Region,
    whitespace: &[Whitespace],
    opts: &ColumnOptions,
) -> Result<Vec<ColumnBoundary>, LayoutError> {
    opts.validate()?;

    let mut boundaries = select_candidates(region, whitespace, opts);
    if opts.enable_height_adjustment {
        boundaries = adjust_heights(region, &boundaries, opts);
    }
    let boundaries = filter_boundaries(region, &boundaries, opts);
    let mut boundaries = merge_boundaries(region, &boundaries, opts);
    sort_boundaries(&mut boundaries);

    tracing::debug!(
        candidates = whitespace.len(),
        boundaries = boundaries.len(),
        "extracted column boundaries"
    );
    Ok(boundaries)
}

/// Keep whitespace that is tall and narrow, and has text close to its edges.
///
/// At least `min_flanking_text` text items must line up on one side. A side
/// with no text at all needs `one_sided_flanking_text` items on the other.
pub fn select_candidates(
    region: &Region,
    whitespace: &[Whitespace],
    opts: &ColumnOptions,
) -> Vec<ColumnBoundary> {
    let lookahead = opts.flank_lookahead;
    let half = lookahead / 2.0;

    whitespace
        .iter()
        .filter(|ws| {
            let pos = ws.bbox;
            let ratio = pos.height() / pos.width();
            if ratio.is_nan() || ratio <= opts.min_aspect_ratio {
                return false;
            }

            let smaller = pos.adjusted_by(-1.0);
            let left = count_text_near(region, Direction::W, &smaller, lookahead, |c| {
                within(c.bbox.x1, pos.x0 + half, lookahead)
            });
            let right = count_text_near(region, Direction::E, &smaller, lookahead, |c| {
                within(c.bbox.x0, pos.x1 + half, lookahead)
            });

            if left == 0 && right < opts.one_sided_flanking_text {
                return false;
            }
            if right == 0 && left < opts.one_sided_flanking_text {
                return false;
            }
            left >= opts.min_flanking_text || right >= opts.min_flanking_text
        })
        .map(|ws| ws.with_score(SELECTED_SCORE))
        .collect()
}

fn count_text_near(
    region: &Region,
    dir: Direction,
    origin: &Rect,
    lookahead: f64,
    aligned: impl Fn(&ContentItem) -> bool,
) -> usize {
    region
        .search_in_direction(dir, origin, lookahead)
        .into_iter()
        .filter(|c| c.is_text() && aligned(*c))
        .count()
}

fn within(value: f64, target: f64, variance: f64) -> bool {
    value - variance <= target && value + variance >= target
}

/// Replace each candidate with the tallest of three probes placed at its left
/// side, middle and right side. Candidates without any usable probe are
/// dropped; equal results are kept once.
pub fn adjust_heights(
    region: &Region,
    candidates: &[ColumnBoundary],
    opts: &ColumnOptions,
) -> Vec<ColumnBoundary> {
    let w = opts.column_width;
    let mut adjusted_all: Vec<ColumnBoundary> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let pos = candidate.bbox;

        let left_x = (pos.x0 + 1.0).min(pos.x1);
        let mid_x = pos.middle_x();
        let right_end_x = (pos.x1 - 1.0).max(pos.x0);
        let right_x = (right_end_x - w).max(pos.x0);

        let middle = adjust_column(region, &pos, mid_x, opts);
        let left = adjust_column(region, &pos, left_x, opts);
        let right = adjust_column(region, &pos, right_x, opts);

        let height = |b: &Option<ColumnBoundary>| b.map_or(-1.0, |b| b.bbox.height());
        let (lh, mh, rh) = (height(&left), height(&middle), height(&right));

        let adjusted = if lh > mh && lh > rh {
            left
        } else if rh > mh && rh > lh {
            right
        } else {
            middle.or(right).or(left)
        };

        match adjusted {
            Some(b) if !adjusted_all.contains(&b) => adjusted_all.push(b),
            Some(_) => {}
            None => tracing::debug!(?pos, "no probe fits column candidate"),
        }
    }

    adjusted_all
}

/// Grow a probe starting at `start_x` row by row through the region.
///
/// A row is blocked if the nearest content to its right starts at or before
/// the probe, or (with the text split check) ends up closer than
/// `text_split_distance` to a word on the left of the probe.
fn adjust_column(
    region: &Region,
    boundary: &Rect,
    start_x: f64,
    opts: &ColumnOptions,
) -> Option<ColumnBoundary> {
    let r = region.bbox();

    let right_search = Rect::new(start_x, r.top, start_x + r.width(), r.bottom);
    let mut right_of = region.find_intersecting(&right_search);
    right_of.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
    });
    let close_on_left: Vec<&ContentItem> = region
        .find_intersecting(&Rect::new(start_x - LOOK_LEFT, r.top, start_x, r.bottom))
        .into_iter()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut real_y = r.top;
    let mut real_end_y = r.bottom;
    let mut start_found = false;
    let mut boundary_started = false;
    let boundary_top_row = boundary.top.trunc() as i64;

    for y in (r.top.trunc() as i64)..=((r.bottom + 1.0).trunc() as i64) {
        let row = y as f64;
        let Some(blocker) = closest_right_at(&right_of, row, boundary.x1) else {
            continue;
        };

        let blocked = blocker.x0 <= start_x
            || (opts.enable_text_split_check
                && close_on_left.iter().any(|left| {
                    y >= left.bbox.top.trunc() as i64
                        && y <= left.bbox.bottom.trunc() as i64
                        && blocker.x0 - left.bbox.x1 < opts.text_split_distance
                }));

        if blocked {
            if boundary_started {
                break;
            }
            start_found = false;
        } else {
            if !start_found {
                start_found = true;
                real_y = row - 1.0;
            }
            if y > boundary_top_row {
                boundary_started = true;
            }
            real_end_y = row;
        }
    }

    if !start_found {
        return None;
    }

    let top = real_y + 0.5;
    let height = (real_end_y - real_y - 0.5).max(0.1);
    Some(Whitespace::new(
        Rect::from_xywh(start_x, top, opts.column_width, height),
        BOUNDARY_SCORE,
    ))
}

/// Position of the content nearest to the right of `from_x` spanning row `y`.
///
/// `sorted` must be ordered by top. Whitespace and nested regions never block.
fn closest_right_at(sorted: &[&ContentItem], y: f64, from_x: f64) -> Option<Rect> {
    let mut closest = None;
    let mut min_distance = f64::MAX;

    for item in sorted {
        if item.is_whitespace() || item.is_sub_region() {
            continue;
        }
        let pos = item.bbox;
        if pos.bottom < y {
            continue;
        }
        if pos.top > y {
            break;
        }
        let distance = pos.x0 - from_x;
        if distance < min_distance {
            min_distance = distance;
            closest = Some(pos);
        }
    }

    closest
}

/// Drop candidates that are unlikely to separate columns of running text.
///
/// The result is sorted by x.
pub fn filter_boundaries(
    region: &Region,
    candidates: &[ColumnBoundary],
    opts: &ColumnOptions,
) -> Vec<ColumnBoundary> {
    let mut kept = candidates.to_vec();
    sort_boundaries(&mut kept);

    kept.retain(|b| match rejection(region, &b.bbox, opts) {
        Some(reason) => {
            tracing::debug!(pos = ?b.bbox, reason, "removing column boundary");
            false
        }
        None => true,
    });
    kept
}

fn rejection(region: &Region, pos: &Rect, opts: &ColumnOptions) -> Option<&'static str> {
    let r = region.bbox();

    if pos.height() < r.height() * opts.min_height_fraction {
        return Some("too short");
    }

    let window_x0 = r.x0 + opts.left_window_inset;
    if pos.x0 - window_x0 <= 0.0 {
        return Some("no room on the left");
    }

    let window = Rect::new(window_x0, pos.top, pos.x0, pos.bottom);
    let on_left: Vec<&ContentItem> = region
        .find_intersecting(&window)
        .into_iter()
        .filter(|c| !c.is_whitespace())
        .collect();
    if on_left.len() < opts.min_left_contents {
        return Some("too little content on the left");
    }

    let text: String = on_left.iter().filter_map(|c| c.text_content()).collect();
    let total = text.chars().count();
    let informative = text
        .chars()
        .filter(|ch| !LOW_INFORMATION_CHARS.contains(*ch))
        .count();
    if informative < opts.min_informative_chars {
        return Some("left text carries too little information");
    }
    if total < opts.short_text_len && informative < opts.short_text_min_informative {
        return Some("left text carries too little information");
    }

    let margin = r.width() * opts.margin_fraction;
    if pos.x0 < r.x0 + margin || pos.x1 > r.x1 - margin {
        return Some("inside page margin");
    }

    None
}

/// Join neighbours closer than `merge_distance` into one boundary spanning
/// both, provided a free position for it exists.
///
/// The merged boundary sits against the right edge of the pair if that is
/// free of content, otherwise at the larger of the two left edges. Pairs with
/// no free position are left alone.
pub fn merge_boundaries(
    region: &Region,
    boundaries: &[ColumnBoundary],
    opts: &ColumnOptions,
) -> Vec<ColumnBoundary> {
    let mut merged = boundaries.to_vec();
    sort_boundaries(&mut merged);

    let w = opts.column_width;
    let is_free = |pos: &Rect| {
        region
            .find_intersecting(pos)
            .iter()
            .all(|c| c.is_whitespace())
    };

    let mut i = 0;
    while i + 1 < merged.len() {
        let lpos = merged[i].bbox;
        let rpos = merged[i + 1].bbox;

        if (rpos.x0 - lpos.x0).abs() >= opts.merge_distance {
            i += 1;
            continue;
        }

        let top = lpos.top.min(rpos.top);
        let bottom = lpos.bottom.max(rpos.bottom);
        let end_x = lpos.x1.max(rpos.x1);
        let start_x = lpos.x0.max(rpos.x0);

        let right_aligned = Rect::new(end_x - w, top, end_x, bottom);
        let left_aligned = Rect::new(start_x, top, start_x + w, bottom);
        let pos = if is_free(&right_aligned) {
            right_aligned
        } else if is_free(&left_aligned) {
            left_aligned
        } else {
            i += 1;
            continue;
        };

        tracing::info!(left = ?lpos, right = ?rpos, merged = ?pos, "combining column boundaries");
        merged[i] = Whitespace::new(pos, BOUNDARY_SCORE);
        merged.remove(i + 1);
        sort_boundaries(&mut merged);
    }

    merged
}

fn sort_boundaries(boundaries: &mut [ColumnBoundary]) {
    boundaries.sort_by(|a, b| compare_position(&a.bbox, &b.bbox));
}

fn compare_position(a: &Rect, b: &Rect) -> Ordering {
    a.x0.total_cmp(&b.x0)
        .then_with(|| a.top.total_cmp(&b.top))
        .then_with(|| a.x1.total_cmp(&b.x1))
        .then_with(|| a.bottom.total_cmp(&b.bottom))
}
