//! pdfcolumns: find whitespace and text column boundaries in page content.
//!
//! Takes positioned content extracted from a page (words, images, ruled lines,
//! nested regions) and finds the largest empty rectangles between it, then
//! picks out the ones that separate columns of text.
//!
//! # Architecture
//!
//! - **pdfcolumns-core**: geometry, content model, regions, errors
//! - **pdfcolumns** (this crate): the whitespace search, column extraction and
//!   the combined pipeline
//!
//! # Example
//!
//! ```
//! use pdfcolumns::{ContentItem, Rect, Region, SegmentOptions, segment_region};
//!
//! let mut items = Vec::new();
//! for i in 0..40 {
//!     let top = i as f64 * 12.0;
//!     items.push(ContentItem::text(Rect::new(40.0, top, 290.0, top + 10.0), "left column"));
//!     items.push(ContentItem::text(Rect::new(310.0, top, 560.0, top + 10.0), "right column"));
//! }
//! let region = Region::with_bounds(Rect::new(0.0, 0.0, 600.0, 800.0), items)?;
//! let layout = segment_region(&region, &SegmentOptions::default())?.value;
//! assert!(!layout.whitespace.is_empty());
//! # Ok::<(), pdfcolumns::LayoutError>(())
//! ```

pub use pdfcolumns_core;
pub use pdfcolumns_core::{
    ColumnBoundary, ContentItem, ContentKind, Direction, LayoutError, Point, Positioned, Rect,
    Region, SegmentResult, SegmentWarning, SegmentWarningCode, Whitespace,
};

pub mod columns;
pub mod options;
pub mod segment;
pub mod whitespace;

pub use columns::{
    BOUNDARY_SCORE, SELECTED_SCORE, adjust_heights, extract_column_boundaries, filter_boundaries,
    merge_boundaries, select_candidates,
};
pub use options::{ColumnOptions, DEFAULT_COLUMN_WIDTH, SegmentOptions, WhitespaceOptions};
pub use segment::{ColumnLayout, LayoutTree, segment_recursively, segment_region, segment_regions};
pub use whitespace::{
    SearchOutcome, WhitespaceFinder, WhitespaceSearch, find_whitespace, find_whitespace_in_region,
    rectangle_quality,
};
