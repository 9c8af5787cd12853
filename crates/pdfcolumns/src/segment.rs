//! Whitespace search followed by column extraction, for one region or many,
//! and the recursive division of a region along its column boundaries.

use std::time::Instant;

use pdfcolumns_core::{
    ColumnBoundary, ContentItem, LayoutError, Rect, Region, SegmentResult, SegmentWarning,
    Whitespace,
};

use crate::columns::extract_column_boundaries;
use crate::options::SegmentOptions;
use crate::whitespace::find_whitespace_in_region;

/// Whitespace and column boundaries found in one region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnLayout {
    /// Bounds of the segmented region.
    pub region_bbox: Rect,
    /// Whitespace rectangles in acceptance order.
    pub whitespace: Vec<Whitespace>,
    /// Column boundaries sorted by x.
    pub columns: Vec<ColumnBoundary>,
}

impl ColumnLayout {
    /// Number of columns the boundaries divide the region into.
    pub fn column_count(&self) -> usize {
        self.columns.len() + 1
    }

    /// Index of the column containing `x`, counting from the left.
    pub fn column_index(&self, x: f64) -> usize {
        column_index(x, self.columns.iter())
    }

    /// Like [`column_index`](Self::column_index), but only boundaries whose
    /// vertical extent covers `y` separate columns.
    pub fn column_index_at(&self, x: f64, y: f64) -> usize {
        column_index(
            x,
            self.columns
                .iter()
                .filter(|b| b.bbox.top <= y && y <= b.bbox.bottom),
        )
    }
}

fn column_index<'a>(x: f64, boundaries: impl Iterator<Item = &'a ColumnBoundary>) -> usize {
    boundaries.filter(|b| b.bbox.middle_x() <= x).count()
}

/// Segment one region: find whitespace, then (unless disabled) pick out the
/// column boundaries among it.
///
/// A search that stopped early still produces a layout; the reason is
/// reported in the warnings.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidOption`] if `opts` fails validation.
pub fn segment_region(
    region: &Region,
    opts: &SegmentOptions,
) -> Result<SegmentResult<ColumnLayout>, LayoutError> {
    opts.validate()?;
    let started = Instant::now();

    let found = find_whitespace_in_region(region, &opts.whitespace)?;
    let columns = if opts.detect_columns {
        extract_column_boundaries(region, &found.value, &opts.columns)?
    } else {
        Vec::new()
    };

    tracing::info!(
        whitespace = found.value.len(),
        columns = columns.len(),
        warnings = found.warnings.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "segmented region"
    );

    Ok(found.map(|whitespace| ColumnLayout {
        region_bbox: region.bbox(),
        whitespace,
        columns,
    }))
}

/// A region's layout together with the layouts of the regions split off it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutTree {
    pub layout: ColumnLayout,
    /// Regions right of a column boundary, sorted by x. A region split off
    /// further right is nested inside the one to its left.
    pub children: Vec<LayoutTree>,
}

impl LayoutTree {
    /// Number of levels in the tree, counting this one.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(LayoutTree::depth).max().unwrap_or(0)
    }

    /// Every layout in the tree, parents before their children.
    pub fn layouts(&self) -> Vec<&ColumnLayout> {
        let mut out = vec![&self.layout];
        for child in &self.children {
            out.extend(child.layouts());
        }
        out
    }
}

/// Segment a region, then split off the content right of each column
/// boundary into a region of its own and segment that in turn, down to
/// `opts.max_depth` levels.
///
/// Boundaries are handled from right to left. Each one takes the content
/// not yet split off that intersects the band from the boundary's middle to
/// the region's right edge. A band that would take no content, or all of it,
/// splits nothing. Whitespace found in a region is handed down to the regions
/// split off it, where it acts as content.
///
/// Warnings from every level are collected into the one result.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidOption`] if `opts` fails validation.
pub fn segment_recursively(
    region: &Region,
    opts: &SegmentOptions,
) -> Result<SegmentResult<LayoutTree>, LayoutError> {
    opts.validate()?;
    let mut warnings = Vec::new();
    let tree = divide(region, opts, 0, &mut warnings)?;

    tracing::info!(
        regions = tree.layouts().len(),
        depth = tree.depth(),
        warnings = warnings.len(),
        "divided region"
    );

    Ok(SegmentResult::with_warnings(tree, warnings))
}

fn divide(
    region: &Region,
    opts: &SegmentOptions,
    depth: usize,
    warnings: &mut Vec<SegmentWarning>,
) -> Result<LayoutTree, LayoutError> {
    let segmented = segment_region(region, opts)?;
    warnings.extend(segmented.warnings);
    let layout = segmented.value;

    if depth >= opts.max_depth || layout.columns.is_empty() {
        return Ok(LayoutTree {
            layout,
            children: Vec::new(),
        });
    }

    let mut children: Vec<LayoutTree> = Vec::new();
    for (bound, sub) in split_at_boundaries(region, &layout)? {
        let mut child = divide(&sub, opts, depth + 1, warnings)?;
        let (nested, rest): (Vec<LayoutTree>, Vec<LayoutTree>) = children
            .into_iter()
            .partition(|c| bound.intersects(&c.layout.region_bbox));
        child.children.extend(nested);
        sort_by_x(&mut child.children);
        children = rest;
        children.push(child);
    }
    sort_by_x(&mut children);

    tracing::debug!(
        depth,
        x0 = layout.region_bbox.x0,
        top = layout.region_bbox.top,
        children = children.len(),
        "split region at column boundaries"
    );

    Ok(LayoutTree { layout, children })
}

fn sort_by_x(trees: &mut [LayoutTree]) {
    trees.sort_by(|a, b| a.layout.region_bbox.x0.total_cmp(&b.layout.region_bbox.x0));
}

/// Cut `region` at the column boundaries of `layout`, rightmost boundary
/// first. Returns each band together with the region made of its content.
fn split_at_boundaries(
    region: &Region,
    layout: &ColumnLayout,
) -> Result<Vec<(Rect, Region)>, LayoutError> {
    let mut remaining: Vec<ContentItem> = region.contents().to_vec();
    remaining.extend(
        layout
            .whitespace
            .iter()
            .chain(&layout.columns)
            .copied()
            .map(ContentItem::from),
    );

    let mut boundaries: Vec<&ColumnBoundary> = layout.columns.iter().collect();
    boundaries.sort_by(|a, b| b.bbox.x0.total_cmp(&a.bbox.x0));

    let right = region.bbox().x1;
    let mut split = Vec::with_capacity(boundaries.len());
    for boundary in boundaries {
        let b = boundary.bbox;
        let x0 = b.middle_x();
        let top = b.top + 1.0;
        let bound = Rect::new(x0, top, right.max(x0), b.bottom.max(top));

        let takes = |c: &ContentItem| !c.is_whitespace() && bound.intersects(&c.bbox);
        let moved = remaining.iter().filter(|&c| takes(c)).count();
        let total = remaining.iter().filter(|c| !c.is_whitespace()).count();
        if moved == 0 || moved == total {
            tracing::debug!(x = x0, moved, total, "boundary splits off nothing");
            continue;
        }

        // whitespace stays behind as well as moving with the content
        let contents: Vec<ContentItem> = remaining
            .iter()
            .filter(|c| bound.intersects(&c.bbox))
            .cloned()
            .collect();
        remaining.retain(|c| !takes(c));
        split.push((bound, Region::new(contents)?));
    }
    Ok(split)
}

/// Segment many independent regions, e.g. the pages of a document.
///
/// Results are in input order and warnings carry the index of their region.
/// With the `parallel` feature the regions are processed concurrently using
/// rayon.
pub fn segment_regions(
    regions: &[Region],
    opts: &SegmentOptions,
) -> Vec<Result<SegmentResult<ColumnLayout>, LayoutError>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        regions
            .par_iter()
            .enumerate()
            .map(|(i, region)| segment_indexed(i, region, opts))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        regions
            .iter()
            .enumerate()
            .map(|(i, region)| segment_indexed(i, region, opts))
            .collect()
    }
}

fn segment_indexed(
    index: usize,
    region: &Region,
    opts: &SegmentOptions,
) -> Result<SegmentResult<ColumnLayout>, LayoutError> {
    let mut result = segment_region(region, opts)?;
    result.warnings = result
        .warnings
        .into_iter()
        .map(|w| w.in_region(index))
        .collect();
    Ok(result)
}
