//! Error and warning types for pdfcolumns.
//!
//! Provides [`LayoutError`] for precondition violations detected at API
//! boundaries, [`SegmentWarning`] for non-fatal conditions that end a search
//! early but still yield a usable partial result, and [`SegmentResult`] for
//! pairing a value with collected warnings.
//!
//! Running out of candidates before the wanted number of whitespace rectangles
//! has been found is a normal outcome and is reported as neither.

use std::fmt;

use thiserror::Error;

use crate::geometry::Rect;

/// Fatal error types for layout segmentation.
///
/// These indicate malformed input and are returned before any search work
/// starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A rectangle had non-finite coordinates or a negative extent.
    #[error("invalid rectangle {rect:?}: {reason}")]
    InvalidRect {
        /// The offending rectangle.
        rect: Rect,
        /// Which check failed.
        reason: &'static str,
    },
    /// A region was built without any content to derive its bounds from.
    #[error("region has no content to derive bounds from")]
    EmptyRegion,
    /// A configuration value was out of its accepted range.
    #[error("invalid option {name} = {value}: {reason}")]
    InvalidOption {
        /// Name of the option field.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Accepted range or constraint.
        reason: &'static str,
    },
}

/// Machine-readable warning code for a search that ended early.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum SegmentWarningCode {
    /// The search queue grew past its configured maximum size.
    QueueOverflow,
    /// The configured cap on processed search nodes was reached.
    IterationLimit,
    /// The caller raised the cancellation flag.
    Cancelled,
    /// The configured time limit elapsed.
    TimedOut,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl SegmentWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            SegmentWarningCode::QueueOverflow => "QUEUE_OVERFLOW",
            SegmentWarningCode::IterationLimit => "ITERATION_LIMIT",
            SegmentWarningCode::Cancelled => "CANCELLED",
            SegmentWarningCode::TimedOut => "TIMED_OUT",
            SegmentWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for SegmentWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning raised while segmenting a region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentWarning {
    /// Machine-readable warning code.
    pub code: SegmentWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Index of the region in a batch, if applicable.
    pub region: Option<usize>,
}

impl SegmentWarning {
    /// Create a warning with a specific code and description.
    pub fn with_code(code: SegmentWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            region: None,
        }
    }

    /// Create a warning with just a description.
    ///
    /// Uses [`SegmentWarningCode::Other`] as the code.
    pub fn new(description: impl Into<String>) -> Self {
        let desc = description.into();
        Self {
            code: SegmentWarningCode::Other(desc.clone()),
            description: desc,
            region: None,
        }
    }

    /// Attach the batch index of the region, returning the modified warning.
    pub fn in_region(mut self, region: usize) -> Self {
        self.region = Some(region);
        self
    }
}

impl fmt::Display for SegmentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(region) = self.region {
            write!(f, " (region {region})")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected warnings.
#[derive(Debug, Clone)]
pub struct SegmentResult<T> {
    /// The produced value, possibly partial.
    pub value: T,
    /// Warnings collected while producing it.
    pub warnings: Vec<SegmentWarning>,
}

impl<T> SegmentResult<T> {
    /// Create a result with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<SegmentWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transform the value while preserving warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SegmentResult<U> {
        SegmentResult {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_error_invalid_rect_message() {
        let err = LayoutError::InvalidRect {
            rect: Rect::new(0.0, 0.0, -1.0, 1.0),
            reason: "width must not be negative",
        };
        assert!(err.to_string().contains("width must not be negative"));
    }

    #[test]
    fn layout_error_invalid_option_message() {
        let err = LayoutError::InvalidOption {
            name: "fuzziness",
            value: 2.0,
            reason: "must be within [0, 1]",
        };
        assert_eq!(
            err.to_string(),
            "invalid option fuzziness = 2: must be within [0, 1]"
        );
    }

    #[test]
    fn layout_error_implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(LayoutError::EmptyRegion);
        assert_eq!(err.to_string(), "region has no content to derive bounds from");
    }

    #[test]
    fn warning_code_tags() {
        assert_eq!(SegmentWarningCode::QueueOverflow.as_str(), "QUEUE_OVERFLOW");
        assert_eq!(SegmentWarningCode::IterationLimit.as_str(), "ITERATION_LIMIT");
        assert_eq!(SegmentWarningCode::Cancelled.as_str(), "CANCELLED");
        assert_eq!(SegmentWarningCode::TimedOut.as_str(), "TIMED_OUT");
        assert_eq!(format!("{}", SegmentWarningCode::Other("x".into())), "OTHER");
    }

    #[test]
    fn warning_new_defaults_to_other() {
        let w = SegmentWarning::new("odd input");
        assert!(matches!(w.code, SegmentWarningCode::Other(_)));
        assert_eq!(w.region, None);
        assert_eq!(w.to_string(), "[OTHER] odd input");
    }

    #[test]
    fn warning_display_with_region() {
        let w = SegmentWarning::with_code(SegmentWarningCode::QueueOverflow, "queue too long")
            .in_region(3);
        assert_eq!(w.to_string(), "[QUEUE_OVERFLOW] queue too long (region 3)");
    }

    #[test]
    fn segment_result_ok_is_clean() {
        let result = SegmentResult::ok(7);
        assert_eq!(result.value, 7);
        assert!(result.is_clean());
    }

    #[test]
    fn segment_result_map_preserves_warnings() {
        let warnings = vec![SegmentWarning::new("test")];
        let result = SegmentResult::with_warnings(10, warnings);
        let mapped = result.map(|v| v * 2);
        assert_eq!(mapped.value, 20);
        assert_eq!(mapped.warnings.len(), 1);
        assert!(!mapped.is_clean());
    }
}
