//! Tunable parameters for whitespace search and column extraction.
//!
//! Defaults reproduce the constants the heuristics were tuned with; every
//! struct can be checked with `validate()` before a search starts.

use std::time::Duration;

use pdfcolumns_core::LayoutError;

/// Width given to column boundaries produced by height adjustment and merging.
pub const DEFAULT_COLUMN_WIDTH: f64 = 2.0;

/// Options for the whitespace rectangle search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhitespaceOptions {
    /// Number of whitespace rectangles to look for. Default: 50.
    pub wanted: usize,
    /// Narrowest sub-rectangle that is still queued. `None` derives it from
    /// the region's minimum column spacing. Default: `None`.
    pub min_width: Option<f64>,
    /// Lowest sub-rectangle that is still queued. `None` derives it from the
    /// region's minimum row spacing. Default: `None`.
    pub min_height: Option<f64>,
    /// Overlap ignored when splitting obstacles between sub-rectangles, when
    /// refreshing stale queue entries and when testing adjacency. Default: 1.5.
    pub obstacle_overlap: f64,
    /// Fraction of a rectangle that obstacles may cover while it still counts
    /// as empty. Default: 0.2.
    pub fuzziness: f64,
    /// Accept rectangles that are only nearly empty. Default: true.
    pub fuzzy_empty_check: bool,
    /// Only accept whitespace touching the region edge or earlier whitespace;
    /// others are held back and retried after the next acceptance. Default: true.
    pub check_connected_to_edge: bool,
    /// Reject whitespace lower than the surrounding text. Default: true.
    pub check_local_height: bool,
    /// Reject narrow whitespace with only one or two words on each side.
    /// Default: true.
    pub check_text_both_sides: bool,
    /// Queue length at which the search is abandoned. Default: 100,000.
    pub max_queue_size: usize,
    /// Cap on the number of queue entries examined. Default: `None`.
    pub max_iterations: Option<usize>,
    /// Wall-clock budget for one search. Default: `None`.
    pub time_limit: Option<Duration>,
    /// Margin around a candidate searched for neighbouring text when checking
    /// local height. Default: 8.0.
    pub local_height_margin: f64,
    /// Widest candidate the needless-separation check applies to. Default: 30.0.
    pub needless_split_max_width: f64,
    /// How far to either side the needless-separation check looks. Default: 8.0.
    pub needless_split_lookahead: f64,
}

impl Default for WhitespaceOptions {
    fn default() -> Self {
        Self {
            wanted: 50,
            min_width: None,
            min_height: None,
            obstacle_overlap: 1.5,
            fuzziness: 0.2,
            fuzzy_empty_check: true,
            check_connected_to_edge: true,
            check_local_height: true,
            check_text_both_sides: true,
            max_queue_size: 100_000,
            max_iterations: None,
            time_limit: None,
            local_height_margin: 8.0,
            needless_split_max_width: 30.0,
            needless_split_lookahead: 8.0,
        }
    }
}

impl WhitespaceOptions {
    /// Options with every acceptance heuristic switched off, so only
    /// emptiness decides.
    pub fn unfiltered() -> Self {
        Self {
            check_connected_to_edge: false,
            check_local_height: false,
            check_text_both_sides: false,
            ..Self::default()
        }
    }

    /// Check that every value is in its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidOption`] naming the first bad field.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if let Some(min_width) = self.min_width {
            non_negative("min_width", min_width)?;
        }
        if let Some(min_height) = self.min_height {
            non_negative("min_height", min_height)?;
        }
        non_negative("obstacle_overlap", self.obstacle_overlap)?;
        fraction("fuzziness", self.fuzziness)?;
        non_negative("local_height_margin", self.local_height_margin)?;
        non_negative("needless_split_max_width", self.needless_split_max_width)?;
        non_negative("needless_split_lookahead", self.needless_split_lookahead)?;
        if self.max_queue_size < 8 {
            return Err(LayoutError::InvalidOption {
                name: "max_queue_size",
                value: self.max_queue_size as f64,
                reason: "must be at least 8",
            });
        }
        Ok(())
    }
}

/// Options for turning whitespace into column boundaries.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnOptions {
    /// Grow each candidate to the real vertical extent of its gap. Default: true.
    pub enable_height_adjustment: bool,
    /// During height adjustment, stop at rows where the boundary would split
    /// two closely set words. Default: true.
    pub enable_text_split_check: bool,
    /// Minimum height/width ratio of a candidate. Default: 1.5.
    pub min_aspect_ratio: f64,
    /// Width of the window searched for text beside a candidate. Default: 10.0.
    pub flank_lookahead: f64,
    /// Text items needed on at least one side. Default: 3.
    pub min_flanking_text: usize,
    /// Text items needed on the other side when one side has none. Default: 8.
    pub one_sided_flanking_text: usize,
    /// Words closer than this are never split by a boundary. Default: 6.0.
    pub text_split_distance: f64,
    /// Minimum boundary height as a fraction of the region height. Default: 0.15.
    pub min_height_fraction: f64,
    /// Offset from the region's left edge where the left-hand content window
    /// starts. Default: 20.0.
    pub left_window_inset: f64,
    /// Content items required in the left-hand window. Default: 4.
    pub min_left_contents: usize,
    /// Informative characters required in the left-hand text. Default: 5.
    pub min_informative_chars: usize,
    /// Below this many characters of left-hand text, `short_text_min_informative`
    /// applies instead. Default: 20.
    pub short_text_len: usize,
    /// Informative characters required for short left-hand text. Default: 10.
    pub short_text_min_informative: usize,
    /// Fraction of the region width treated as margin on each side. Default: 0.05.
    pub margin_fraction: f64,
    /// Boundaries closer than this on the x axis are merged. Default: 50.0.
    pub merge_distance: f64,
    /// Width of adjusted and merged boundaries. Default: [`DEFAULT_COLUMN_WIDTH`].
    pub column_width: f64,
}

impl Default for ColumnOptions {
    fn default() -> Self {
        Self {
            enable_height_adjustment: true,
            enable_text_split_check: true,
            min_aspect_ratio: 1.5,
            flank_lookahead: 10.0,
            min_flanking_text: 3,
            one_sided_flanking_text: 8,
            text_split_distance: 6.0,
            min_height_fraction: 0.15,
            left_window_inset: 20.0,
            min_left_contents: 4,
            min_informative_chars: 5,
            short_text_len: 20,
            short_text_min_informative: 10,
            margin_fraction: 0.05,
            merge_distance: 50.0,
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

impl ColumnOptions {
    /// Check that every value is in its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidOption`] naming the first bad field.
    pub fn validate(&self) -> Result<(), LayoutError> {
        non_negative("min_aspect_ratio", self.min_aspect_ratio)?;
        non_negative("flank_lookahead", self.flank_lookahead)?;
        non_negative("text_split_distance", self.text_split_distance)?;
        fraction("min_height_fraction", self.min_height_fraction)?;
        non_negative("left_window_inset", self.left_window_inset)?;
        fraction("margin_fraction", self.margin_fraction)?;
        non_negative("merge_distance", self.merge_distance)?;
        if !(self.column_width.is_finite() && self.column_width > 0.0) {
            return Err(LayoutError::InvalidOption {
                name: "column_width",
                value: self.column_width,
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

/// Options for the combined whitespace and column pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentOptions {
    /// Whitespace search options.
    pub whitespace: WhitespaceOptions,
    /// Column extraction options.
    pub columns: ColumnOptions,
    /// Run column extraction after the whitespace search. Default: true.
    pub detect_columns: bool,
    /// How many levels of regions [`segment_recursively`] may split off
    /// below the one it is given. Default: 8.
    ///
    /// [`segment_recursively`]: crate::segment::segment_recursively
    pub max_depth: usize,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            whitespace: WhitespaceOptions::default(),
            columns: ColumnOptions::default(),
            detect_columns: true,
            max_depth: 8,
        }
    }
}

impl SegmentOptions {
    /// Validate both option groups.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidOption`] naming the first bad field.
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.whitespace.validate()?;
        self.columns.validate()
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidOption {
            name,
            value,
            reason: "must be finite and not negative",
        })
    }
}

fn fraction(name: &'static str, value: f64) -> Result<(), LayoutError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(LayoutError::InvalidOption {
            name,
            value,
            reason: "must be within [0, 1]",
        })
    }
}
