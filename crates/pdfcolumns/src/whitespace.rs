//! Branch-and-bound search for maximal whitespace rectangles.
//!
//! The search starts with the whole region as a single candidate bound and
//! repeatedly pops the bound of highest quality from a priority queue. A bound
//! that is empty enough is offered to the acceptance filters; any other bound
//! is split around a pivot obstacle into up to four smaller bounds. Every
//! accepted rectangle becomes an obstacle for the bounds still queued, so
//! later results never overlap earlier ones.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{self, AtomicBool};
use std::time::Instant;

use pdfcolumns_core::{
    Direction, LayoutError, Positioned, Rect, Region, SegmentResult, SegmentWarning,
    SegmentWarningCode, Whitespace,
};

use crate::options::WhitespaceOptions;

/// Quality of a candidate bound: its area, weighted towards tall rectangles.
pub fn rectangle_quality(r: &Rect) -> f64 {
    r.area() * (1.0 + r.height() * 0.25)
}

/// How a whitespace search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The wanted number of rectangles was found.
    Satisfied,
    /// The queue ran dry first. Dense regions legitimately end this way.
    Exhausted,
    /// The queue grew past `max_queue_size`.
    QueueOverflow,
    /// `max_iterations` queue entries were examined.
    IterationLimit,
    /// The cancellation flag was raised.
    Cancelled,
    /// `time_limit` elapsed.
    TimedOut,
}

impl SearchOutcome {
    /// True if the search stopped before it could finish.
    pub fn is_aborted(self) -> bool {
        !matches!(self, SearchOutcome::Satisfied | SearchOutcome::Exhausted)
    }

    /// The warning reported for an aborted search.
    pub fn warning(self) -> Option<SegmentWarning> {
        let (code, description) = match self {
            SearchOutcome::Satisfied | SearchOutcome::Exhausted => return None,
            SearchOutcome::QueueOverflow => (
                SegmentWarningCode::QueueOverflow,
                "search queue too long, returning partial whitespace",
            ),
            SearchOutcome::IterationLimit => (
                SegmentWarningCode::IterationLimit,
                "iteration limit reached, returning partial whitespace",
            ),
            SearchOutcome::Cancelled => (
                SegmentWarningCode::Cancelled,
                "search cancelled, returning partial whitespace",
            ),
            SearchOutcome::TimedOut => (
                SegmentWarningCode::TimedOut,
                "time limit elapsed, returning partial whitespace",
            ),
        };
        Some(SegmentWarning::with_code(code, description))
    }
}

/// Result of [`WhitespaceFinder::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct WhitespaceSearch {
    /// Accepted rectangles in acceptance order.
    pub whitespace: Vec<Whitespace>,
    /// Why the search stopped.
    pub outcome: SearchOutcome,
    /// Number of queue entries examined.
    pub iterations: usize,
}

impl WhitespaceSearch {
    /// Convert into a [`SegmentResult`], turning an abort into a warning.
    pub fn into_result(self) -> SegmentResult<Vec<Whitespace>> {
        match self.outcome.warning() {
            Some(warning) => SegmentResult::with_warnings(self.whitespace, vec![warning]),
            None => SegmentResult::ok(self.whitespace),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObstacleId {
    /// Index into the region's content.
    Content(usize),
    /// Index into the accepted whitespace.
    Whitespace(usize),
}

#[derive(Debug, Clone, Copy)]
struct Obstacle {
    pos: Rect,
    id: ObstacleId,
}

/// A candidate bound waiting in the queue, together with the obstacles that
/// intersect it.
#[derive(Debug)]
struct SearchNode {
    bound: Rect,
    obstacles: Vec<Obstacle>,
    quality: f64,
    /// Number of accepted rectangles when the obstacle list was last brought
    /// up to date.
    stamp: usize,
    seq: u64,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on quality; among equals the older node wins.
        self.quality
            .total_cmp(&other.quality)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

enum Step {
    Accepted(Whitespace),
    Stopped(SearchOutcome),
}

/// Incremental whitespace search over one [`Region`].
///
/// A finder runs once; build a new one per search. Independent finders share
/// nothing and may run on separate threads.
pub struct WhitespaceFinder<'r> {
    region: &'r Region,
    wanted: usize,
    min_width: f64,
    min_height: f64,
    opts: WhitespaceOptions,
    queue: BinaryHeap<SearchNode>,
    hold_list: Vec<SearchNode>,
    found: Vec<Whitespace>,
    next_seq: u64,
    iterations: usize,
    cancel: Option<&'r AtomicBool>,
}

impl<'r> WhitespaceFinder<'r> {
    /// Prepare a search. Minimum sizes left unset in `opts` are derived from
    /// the region's typography, never below one unit.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidOption`] if `opts` fails validation.
    pub fn new(region: &'r Region, opts: &WhitespaceOptions) -> Result<Self, LayoutError> {
        opts.validate()?;

        let min_width = opts
            .min_width
            .unwrap_or_else(|| region.min_column_spacing().max(1.0));
        let min_height = opts
            .min_height
            .unwrap_or_else(|| region.min_row_spacing().max(1.0));

        Ok(Self {
            region,
            wanted: opts.wanted,
            min_width,
            min_height,
            opts: opts.clone(),
            queue: BinaryHeap::new(),
            hold_list: Vec::new(),
            found: Vec::with_capacity(opts.wanted.min(1024)),
            next_seq: 0,
            iterations: 0,
            cancel: None,
        })
    }

    /// Stop the search, keeping what was found so far, once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: &'r AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Run the search to completion.
    pub fn search(mut self) -> WhitespaceSearch {
        let started = Instant::now();
        let bound = self.region.bbox();

        if self.wanted > 0 && !bound.is_empty() {
            let obstacles = self
                .region
                .contents()
                .iter()
                .enumerate()
                .map(|(i, item)| Obstacle {
                    pos: item.pos(),
                    id: ObstacleId::Content(i),
                })
                .collect();
            let root = self.node(bound, obstacles);
            self.queue.push(root);
        }

        let outcome = loop {
            if self.found.len() >= self.wanted {
                break SearchOutcome::Satisfied;
            }
            match self.next_whitespace(started) {
                Step::Accepted(ws) => {
                    tracing::debug!(
                        index = self.found.len(),
                        x0 = ws.bbox.x0,
                        top = ws.bbox.top,
                        x1 = ws.bbox.x1,
                        bottom = ws.bbox.bottom,
                        score = ws.score,
                        "accepted whitespace"
                    );
                    self.found.push(ws);
                }
                Step::Stopped(outcome) => break outcome,
            }
        };

        tracing::info!(
            found = self.found.len(),
            wanted = self.wanted,
            iterations = self.iterations,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ?outcome,
            "whitespace search finished"
        );

        WhitespaceSearch {
            whitespace: self.found,
            outcome,
            iterations: self.iterations,
        }
    }

    fn node(&mut self, bound: Rect, obstacles: Vec<Obstacle>) -> SearchNode {
        let seq = self.next_seq;
        self.next_seq += 1;
        SearchNode {
            bound,
            obstacles,
            quality: rectangle_quality(&bound),
            stamp: self.found.len(),
            seq,
        }
    }

    fn next_whitespace(&mut self, started: Instant) -> Step {
        self.queue.extend(self.hold_list.drain(..));

        while !self.queue.is_empty() {
            if let Some(outcome) = self.check_limits(started) {
                return Step::Stopped(outcome);
            }

            let Some(mut current) = self.queue.pop() else {
                break;
            };
            self.iterations += 1;

            if current.stamp != self.found.len() {
                self.refresh_obstacles(&mut current);
            }

            if self.is_empty_enough(&current) {
                let candidate = Whitespace::new(current.bound, current.quality);

                if self.opts.check_connected_to_edge
                    && !self.is_next_to_whitespace_or_edge(&candidate)
                {
                    self.hold_list.push(current);
                    continue;
                }
                if self.opts.check_local_height
                    && self.is_too_short_for_surrounding_text(&candidate)
                {
                    continue;
                }
                if self.opts.check_text_both_sides
                    && self.is_needlessly_separating_text(&candidate)
                {
                    continue;
                }
                return Step::Accepted(candidate);
            }

            let Some(pivot) = choose_pivot(&current) else {
                continue;
            };
            for sub in self.split_around(&current, pivot) {
                self.queue.push(sub);
            }
        }

        Step::Stopped(SearchOutcome::Exhausted)
    }

    fn check_limits(&self, started: Instant) -> Option<SearchOutcome> {
        if self.queue.len() + 4 >= self.opts.max_queue_size {
            tracing::warn!(queue = self.queue.len(), "whitespace search queue too long");
            return Some(SearchOutcome::QueueOverflow);
        }
        if let Some(max) = self.opts.max_iterations {
            if self.iterations >= max {
                return Some(SearchOutcome::IterationLimit);
            }
        }
        if let Some(flag) = self.cancel {
            if flag.load(atomic::Ordering::Relaxed) {
                return Some(SearchOutcome::Cancelled);
            }
        }
        if let Some(limit) = self.opts.time_limit {
            if started.elapsed() >= limit {
                return Some(SearchOutcome::TimedOut);
            }
        }
        None
    }

    /// Add whitespace accepted since `node` was last updated to its obstacles.
    fn refresh_obstacles(&self, node: &mut SearchNode) {
        let overlap = self.opts.obstacle_overlap;
        for (i, ws) in self.found.iter().enumerate().skip(node.stamp) {
            if node.bound.intersects_admitting_overlap(&ws.bbox, overlap) {
                node.obstacles.push(Obstacle {
                    pos: ws.bbox,
                    id: ObstacleId::Whitespace(i),
                });
            }
        }
        node.stamp = self.found.len();
    }

    fn is_empty_enough(&self, node: &SearchNode) -> bool {
        if !self.opts.fuzzy_empty_check || node.obstacles.is_empty() {
            return node.obstacles.is_empty();
        }

        let fuzziness = self.opts.fuzziness;
        let area = node.bound.area();
        let mut overlap_sum = 0.0;

        for obstacle in &node.obstacles {
            let overlap = node.bound.intersection(&obstacle.pos).area();
            if overlap > obstacle.pos.area().min(area) * fuzziness {
                return false;
            }
            overlap_sum += overlap;
        }

        overlap_sum < area * fuzziness
    }

    /// Accepts rectangles touching the region edge or earlier whitespace.
    fn is_next_to_whitespace_or_edge(&self, candidate: &Whitespace) -> bool {
        let l = self.opts.obstacle_overlap;
        let w = candidate.bbox;
        let r = self.region.bbox();

        if w.x0 <= r.x0 + l || w.top <= r.top + l || w.x1 >= r.x1 - l || w.bottom >= r.bottom - l
        {
            return true;
        }

        self.found.iter().any(|existing| w.distance(&existing.bbox) <= l)
    }

    fn is_too_short_for_surrounding_text(&self, candidate: &Whitespace) -> bool {
        let surrounding = self
            .region
            .find_surrounding(candidate, self.opts.local_height_margin);

        let (height_sum, counted) = surrounding
            .iter()
            .filter(|c| c.is_text())
            .fold((0.0, 0usize), |(sum, n), c| (sum + c.bbox.height(), n + 1));
        if counted == 0 {
            return false;
        }

        let average = height_sum / counted as f64;
        self.region.min_row_spacing().max(average) > candidate.bbox.height()
    }

    /// A narrow gap with only one or two words on each side breaks up a
    /// paragraph without revealing any layout.
    fn is_needlessly_separating_text(&self, candidate: &Whitespace) -> bool {
        if candidate.bbox.width() > self.opts.needless_split_max_width {
            return false;
        }

        let search = candidate.bbox.adjusted_by(-1.0);
        let range = self.opts.needless_split_lookahead;
        let count_text = |dir| {
            self.region
                .search_in_direction(dir, &search, range)
                .iter()
                .filter(|c| c.is_text())
                .count()
        };

        matches!(count_text(Direction::E), 1 | 2) && matches!(count_text(Direction::W), 1 | 2)
    }

    /// Split `current` into the parts left of, right of, above and below
    /// `pivot`, keeping only parts larger than the minimum size.
    fn split_around(&mut self, current: &SearchNode, pivot: Obstacle) -> Vec<SearchNode> {
        let bound = current.bound;
        let split = pivot.pos;
        let capacity = current.obstacles.len() + self.wanted.saturating_sub(self.found.len());

        let mut subs = Vec::with_capacity(4);
        if split.x0 > bound.x0 && split.x0 - bound.x0 > self.min_width {
            subs.push(Rect::new(bound.x0, bound.top, split.x0, bound.bottom));
        }
        if split.x1 < bound.x1 && bound.x1 - split.x1 > self.min_width {
            subs.push(Rect::new(split.x1, bound.top, bound.x1, bound.bottom));
        }
        if split.top > bound.top && split.top - bound.top > self.min_height {
            subs.push(Rect::new(bound.x0, bound.top, bound.x1, split.top));
        }
        if split.bottom < bound.bottom && bound.bottom - split.bottom > self.min_height {
            subs.push(Rect::new(bound.x0, split.bottom, bound.x1, bound.bottom));
        }

        let overlap = self.opts.obstacle_overlap;
        subs.into_iter()
            .map(|sub| {
                let mut obstacles = Vec::with_capacity(capacity);
                obstacles.extend(current.obstacles.iter().copied().filter(|o| {
                    o.id != pivot.id && sub.intersects_admitting_overlap(&o.pos, overlap)
                }));
                self.node(sub, obstacles)
            })
            .collect()
    }
}

/// The obstacle closest to the centre of the bound, with distances scaled by
/// the obstacle's height so short nearby obstacles win over tall distant ones.
fn choose_pivot(node: &SearchNode) -> Option<Obstacle> {
    let centre = node.bound.centre();
    node.obstacles
        .iter()
        .map(|o| {
            let d = o.pos.distance_to_point(centre) * 100.0 / o.pos.height().max(0.1);
            (o, d)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(o, _)| *o)
}

/// Find up to `wanted` whitespace rectangles in `region` using the default
/// options and the given minimum sizes.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidOption`] if a minimum size is negative or
/// not finite.
pub fn find_whitespace(
    region: &Region,
    wanted: usize,
    min_width: f64,
    min_height: f64,
) -> Result<Vec<Whitespace>, LayoutError> {
    let opts = WhitespaceOptions {
        wanted,
        min_width: Some(min_width),
        min_height: Some(min_height),
        ..WhitespaceOptions::default()
    };
    Ok(WhitespaceFinder::new(region, &opts)?.search().whitespace)
}

/// Run a whitespace search and report an early stop as a warning.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidOption`] if `opts` fails validation.
pub fn find_whitespace_in_region(
    region: &Region,
    opts: &WhitespaceOptions,
) -> Result<SegmentResult<Vec<Whitespace>>, LayoutError> {
    let search = WhitespaceFinder::new(region, opts)?.search();
    if let Some(warning) = search.outcome.warning() {
        tracing::warn!(
            found = search.whitespace.len(),
            wanted = opts.wanted,
            "{warning}"
        );
    }
    Ok(search.into_result())
}
