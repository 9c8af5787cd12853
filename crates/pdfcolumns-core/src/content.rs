//! Positioned page content: the obstacles a whitespace search works around,
//! and the whitespace rectangles it produces.

use crate::geometry::Rect;

/// Anything that occupies a rectangle on the page.
pub trait Positioned {
    /// Bounding rectangle of the entity.
    fn pos(&self) -> Rect;

    /// True if the entity carries extracted text.
    fn is_text(&self) -> bool {
        false
    }
}

impl Positioned for Rect {
    fn pos(&self) -> Rect {
        *self
    }
}

/// What a piece of page content is.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentKind {
    /// A word or text token.
    Text {
        /// The extracted text.
        text: String,
    },
    /// An image, ruled line or other drawn shape.
    Graphic,
    /// A region segmented out by an earlier layout pass.
    SubRegion,
    /// Whitespace found by an earlier search.
    Whitespace {
        /// Relative confidence of the whitespace.
        score: f64,
    },
}

/// A single item of page content.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentItem {
    /// Bounding box of the item.
    pub bbox: Rect,
    /// What the item is.
    pub kind: ContentKind,
}

impl ContentItem {
    pub fn new(bbox: Rect, kind: ContentKind) -> Self {
        Self { bbox, kind }
    }

    /// A text token.
    pub fn text(bbox: Rect, text: impl Into<String>) -> Self {
        Self::new(bbox, ContentKind::Text { text: text.into() })
    }

    /// An image or drawn shape.
    pub fn graphic(bbox: Rect) -> Self {
        Self::new(bbox, ContentKind::Graphic)
    }

    /// A nested region.
    pub fn sub_region(bbox: Rect) -> Self {
        Self::new(bbox, ContentKind::SubRegion)
    }

    /// Whitespace carried over from an earlier pass.
    pub fn whitespace(bbox: Rect, score: f64) -> Self {
        Self::new(bbox, ContentKind::Whitespace { score })
    }

    /// The text payload, for text items.
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            ContentKind::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, ContentKind::Whitespace { .. })
    }

    pub fn is_sub_region(&self) -> bool {
        matches!(self.kind, ContentKind::SubRegion)
    }
}

impl Positioned for ContentItem {
    fn pos(&self) -> Rect {
        self.bbox
    }

    fn is_text(&self) -> bool {
        matches!(self.kind, ContentKind::Text { .. })
    }
}

/// A rectangle believed to contain no (or negligible) content.
///
/// Produced by the whitespace search. The `score` is a relative ranking only;
/// column boundaries re-score the rectangles they keep.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Whitespace {
    /// Extent of the whitespace.
    pub bbox: Rect,
    /// Relative confidence.
    pub score: f64,
}

/// A whitespace rectangle accepted as the gap between two text columns.
pub type ColumnBoundary = Whitespace;

impl Whitespace {
    pub fn new(bbox: Rect, score: f64) -> Self {
        Self { bbox, score }
    }

    /// The same rectangle with a different score.
    pub fn with_score(self, score: f64) -> Self {
        Self { score, ..self }
    }
}

impl Positioned for Whitespace {
    fn pos(&self) -> Rect {
        self.bbox
    }
}

impl From<Whitespace> for ContentItem {
    fn from(ws: Whitespace) -> Self {
        ContentItem::whitespace(ws.bbox, ws.score)
    }
}
