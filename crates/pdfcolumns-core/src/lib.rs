//! pdfcolumns-core: Backend-independent data types for page segmentation.
//!
//! This crate provides the geometry kernel ([`Rect`], [`Point`]), the content
//! model ([`Positioned`], [`ContentItem`], [`Whitespace`]), the spatial
//! [`Region`] that whitespace and column searches query, and the error and
//! warning types shared by the pdfcolumns crates.

pub mod content;
pub mod error;
pub mod geometry;
pub mod region;

pub use content::{ColumnBoundary, ContentItem, ContentKind, Positioned, Whitespace};
pub use error::{LayoutError, SegmentResult, SegmentWarning, SegmentWarningCode};
pub use geometry::{Point, Rect};
pub use region::{Direction, Region};
