//! Spatial container for the content of one page (or part of one).
//!
//! A [`Region`] is read-only once built: searches hold indices into its
//! content list, so it offers queries but no way to add or remove items.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::content::{ContentItem, Positioned};
use crate::error::LayoutError;
use crate::geometry::Rect;

/// Compass direction for [`Region::search_in_direction`].
///
/// Page space grows downward, so `N` moves towards the top of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    /// Unit offsets `(dx, dy)` for this direction.
    pub fn offsets(self) -> (f64, f64) {
        match self {
            Direction::N => (0.0, -1.0),
            Direction::NE => (1.0, -1.0),
            Direction::E => (1.0, 0.0),
            Direction::SE => (1.0, 1.0),
            Direction::S => (0.0, 1.0),
            Direction::SW => (-1.0, 1.0),
            Direction::W => (-1.0, 0.0),
            Direction::NW => (-1.0, -1.0),
        }
    }
}

/// Typographic measurements of a region, derived from its text.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RegionStats {
    avg_font_size_x: f64,
    avg_font_size_y: f64,
    median_vertical_distance: i64,
}

/// A bounded collection of positioned content.
#[derive(Debug, Clone)]
pub struct Region {
    bbox: Rect,
    contents: Vec<ContentItem>,
    stats: OnceLock<RegionStats>,
}

impl Region {
    /// Build a region whose bounds enclose all non-whitespace content.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidRect`] if any item has a malformed
    /// bounding box, and [`LayoutError::EmptyRegion`] if there is nothing to
    /// derive the bounds from.
    pub fn new(contents: Vec<ContentItem>) -> Result<Self, LayoutError> {
        validate_contents(&contents)?;

        let bbox = contents
            .iter()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.bbox)
            .reduce(|a, b| a.union(&b))
            .ok_or(LayoutError::EmptyRegion)?;

        Ok(Self {
            bbox,
            contents,
            stats: OnceLock::new(),
        })
    }

    /// Build a region with explicit bounds, e.g. the full page.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidRect`] if the bounds or any item's
    /// bounding box is malformed.
    pub fn with_bounds(bbox: Rect, contents: Vec<ContentItem>) -> Result<Self, LayoutError> {
        let bbox = bbox.validated()?;
        validate_contents(&contents)?;

        Ok(Self {
            bbox,
            contents,
            stats: OnceLock::new(),
        })
    }

    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    pub fn contents(&self) -> &[ContentItem] {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// All items whose bounding box intersects `search`, in content order.
    pub fn find_intersecting(&self, search: &Rect) -> Vec<&ContentItem> {
        self.contents
            .iter()
            .filter(|c| search.intersects(&c.bbox))
            .collect()
    }

    /// Items intersecting `origin` after moving it `distance` units in `dir`.
    ///
    /// Items whose bounding box equals `origin` are left out.
    pub fn search_in_direction(
        &self,
        dir: Direction,
        origin: &Rect,
        distance: f64,
    ) -> Vec<&ContentItem> {
        let (dx, dy) = dir.offsets();
        let search = origin.translated(dx * distance, dy * distance);

        self.contents
            .iter()
            .filter(|c| c.bbox != *origin && search.intersects(&c.bbox))
            .collect()
    }

    /// Items within `margin` of `entity` on any side, excluding the entity.
    pub fn find_surrounding(&self, entity: &impl Positioned, margin: f64) -> Vec<&ContentItem> {
        let pos = entity.pos();
        let search = pos.adjusted_by(margin);

        self.contents
            .iter()
            .filter(|c| c.bbox != pos && search.intersects(&c.bbox))
            .collect()
    }

    /// Items crossing a one unit wide vertical probe at `x`, sorted by top.
    pub fn content_at_x(&self, x: f64) -> Vec<&ContentItem> {
        let x = x.trunc();
        let probe = Rect::new(x, self.bbox.top, x + 1.0, self.bbox.bottom);
        let mut found = self.find_intersecting(&probe);
        found.sort_by(|a, b| a.bbox.top.total_cmp(&b.bbox.top));
        found
    }

    /// Items crossing a one unit high horizontal probe at `y`, sorted by x0.
    pub fn content_at_y(&self, y: f64) -> Vec<&ContentItem> {
        let y = y.trunc();
        let probe = Rect::new(self.bbox.x0, y, self.bbox.x1, y + 1.0);
        let mut found = self.find_intersecting(&probe);
        found.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
        found
    }

    /// Iterate over the text items of the region.
    pub fn text_items(&self) -> impl Iterator<Item = &ContentItem> {
        self.contents.iter().filter(|c| c.is_text())
    }

    /// Average width of a character in the region's text.
    ///
    /// `f64::MIN_POSITIVE` if the region holds no text.
    pub fn avg_font_size_x(&self) -> f64 {
        self.stats().avg_font_size_x
    }

    /// Average height of the region's text, weighted by character count.
    ///
    /// `f64::MIN_POSITIVE` if the region holds no text.
    pub fn avg_font_size_y(&self) -> f64 {
        self.stats().avg_font_size_y
    }

    /// Approximation of the usual vertical gap between lines, in whole units.
    pub fn median_vertical_distance(&self) -> i64 {
        self.stats().median_vertical_distance
    }

    /// Narrowest gap that can separate two columns of this region's text.
    pub fn min_column_spacing(&self) -> f64 {
        self.avg_font_size_x() * 0.8
    }

    /// Lowest gap that can separate two rows of this region's text.
    pub fn min_row_spacing(&self) -> f64 {
        self.median_vertical_distance() as f64 * 1.1
    }

    fn stats(&self) -> RegionStats {
        *self.stats.get_or_init(|| self.compute_stats())
    }

    fn compute_stats(&self) -> RegionStats {
        let mut width_sum = 0.0;
        let mut height_sum = 0.0;
        let mut chars = 0usize;

        for item in self.text_items() {
            let len = item.text_content().map_or(0, |t| t.chars().count());
            if len == 0 {
                continue;
            }
            width_sum += item.bbox.width();
            height_sum += item.bbox.height() * len as f64;
            chars += len;
        }

        let (avg_font_size_x, avg_font_size_y) = if chars == 0 {
            (f64::MIN_POSITIVE, f64::MIN_POSITIVE)
        } else {
            (width_sum / chars as f64, height_sum / chars as f64)
        };

        RegionStats {
            avg_font_size_x,
            avg_font_size_y,
            median_vertical_distance: self.vertical_distance_mode(avg_font_size_y),
        }
    }

    /// Histogram the vertical gaps between consecutive items along four
    /// vertical rays and return the most common one, padded by ten percent.
    ///
    /// Gaps of 0 or 1 units and gaps of three line heights or more are
    /// ignored. Without any usable gap, half the font height is used.
    fn vertical_distance_mode(&self, avg_font_size_y: f64) -> i64 {
        let limit = (avg_font_size_y * 3.0).min(self.bbox.height()).max(0.0) as i64;
        let mut distance_count: BTreeMap<i64, usize> = BTreeMap::new();

        for i in 0..=3 {
            let x = self.bbox.x0 + self.bbox.width() * i as f64 / 3.0;
            let column: Vec<&ContentItem> = self
                .content_at_x(x)
                .into_iter()
                .filter(|c| !c.is_whitespace())
                .collect();

            for pair in column.windows(2) {
                let d = (pair[1].bbox.top - pair[0].bbox.bottom) as i64;
                if d > 0 && d < limit {
                    *distance_count.entry(d).or_default() += 1;
                }
            }
        }

        let mut mode: i64 = -1;
        let mut highest = 0usize;
        for (&d, &count) in distance_count.range(2..) {
            if count >= highest {
                mode = d;
                highest = count;
            }
        }

        let t = mode.max((avg_font_size_y * 0.5) as i64) as f64;
        (t + (t * 0.1).max(1.0)) as i64
    }
}

fn validate_contents(contents: &[ContentItem]) -> Result<(), LayoutError> {
    for item in contents {
        item.bbox.validated()?;
    }
    Ok(())
}
