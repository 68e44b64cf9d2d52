//! Axis-aligned rectangles with exact-bound equality.
//!
//! All coordinates use a top-left origin: x grows to the right, y grows
//! downward. Every operation is pure and returns a new value; no operation
//! mutates an existing rectangle.
//!
//! Equality is exact bound comparison with no epsilon. Two rectangles built
//! from arithmetically equivalent but differently-ordered float expressions
//! may therefore compare unequal; callers that need tolerance should compare
//! areas or distances instead.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 2-D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle with the invariant `min_x <= max_x` and
/// `min_y <= max_y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left bound
    pub min_x: f32,
    /// Top bound
    pub min_y: f32,
    /// Right bound
    pub max_x: f32,
    /// Bottom bound
    pub max_y: f32,
}

impl Rect {
    /// Create a rectangle, normalizing swapped bounds.
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    /// Create a rectangle, rejecting inverted bounds instead of normalizing.
    pub fn try_new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Result<Self> {
        if min_x > max_x || min_y > max_y {
            return Err(Error::InvalidRect {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Center point of the rectangle.
    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Intersection of two rectangles.
    ///
    /// Returns `None` when the rectangles are disjoint on either axis. A
    /// boundary touch yields a degenerate (zero-width or zero-height)
    /// rectangle, which is a valid result under closed-interval semantics.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x.min(other.max_x);
        let max_y = self.max_y.min(other.max_y);
        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some(Rect {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Check horizontal interval overlap. Closed intervals: a shared
    /// boundary x counts as overlapping.
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.min_x <= other.max_x && other.min_x <= self.max_x
    }

    /// Check vertical interval overlap. Closed intervals: a shared
    /// boundary y counts as overlapping.
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.min_y <= other.max_y && other.min_y <= self.max_y
    }

    /// Check overlap on both axes.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_horizontally(other) && self.overlaps_vertically(other)
    }

    /// Overlap area: horizontal overlap length times vertical overlap
    /// length, 0.0 when the rectangles are disjoint on either axis.
    pub fn compute_overlap(&self, other: &Rect) -> f32 {
        let h = (self.max_x.min(other.max_x) - self.min_x.max(other.min_x)).max(0.0);
        let v = (self.max_y.min(other.max_y) - self.min_y.max(other.min_y)).max(0.0);
        h * v
    }

    /// Overlap area divided by the area of `self`.
    ///
    /// Returns `None` when `self` has zero area; the ratio is undefined
    /// there and must never surface as NaN or infinity in later comparisons.
    pub fn overlap_ratio(&self, other: &Rect) -> Option<f32> {
        let area = self.area();
        if area <= 0.0 {
            return None;
        }
        Some(self.compute_overlap(other) / area)
    }

    /// Check whether `other` lies entirely within the bounds of `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    /// Check whether a point lies within the bounds of `self`.
    pub fn contains_point(&self, p: &Point) -> bool {
        self.min_x <= p.x && p.x <= self.max_x && self.min_y <= p.y && p.y <= self.max_y
    }

    /// Cut with a vertical line at `x`, producing the left and right parts.
    ///
    /// Returns `None` when `x` does not fall strictly inside the rectangle.
    pub fn split_vertically(&self, x: f32) -> Option<(Rect, Rect)> {
        if x <= self.min_x || x >= self.max_x {
            return None;
        }
        Some((
            Rect::new(self.min_x, self.min_y, x, self.max_y),
            Rect::new(x, self.min_y, self.max_x, self.max_y),
        ))
    }

    /// Cut with a horizontal line at `y`, producing the top and bottom parts.
    ///
    /// Returns `None` when `y` does not fall strictly inside the rectangle.
    pub fn split_horizontally(&self, y: f32) -> Option<(Rect, Rect)> {
        if y <= self.min_y || y >= self.max_y {
            return None;
        }
        Some((
            Rect::new(self.min_x, self.min_y, self.max_x, y),
            Rect::new(self.min_x, y, self.max_x, self.max_y),
        ))
    }

    /// Carve the rectangle at the horizontal midpoints of the given
    /// rectangles, left to right. Midpoints outside `self` are ignored.
    pub fn split_vertically_at_midpoints(&self, cuts: &[Rect]) -> Vec<Rect> {
        let mut xs: Vec<f32> = cuts
            .iter()
            .map(|r| r.midpoint().x)
            .filter(|x| *x > self.min_x && *x < self.max_x)
            .collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        xs.dedup();

        let mut parts = Vec::with_capacity(xs.len() + 1);
        let mut left = self.min_x;
        for x in xs {
            parts.push(Rect::new(left, self.min_y, x, self.max_y));
            left = x;
        }
        parts.push(Rect::new(left, self.min_y, self.max_x, self.max_y));
        parts
    }

    /// Carve the rectangle at the vertical midpoints of the given
    /// rectangles, top to bottom. Midpoints outside `self` are ignored.
    pub fn split_horizontally_at_midpoints(&self, cuts: &[Rect]) -> Vec<Rect> {
        let mut ys: Vec<f32> = cuts
            .iter()
            .map(|r| r.midpoint().y)
            .filter(|y| *y > self.min_y && *y < self.max_y)
            .collect();
        ys.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        ys.dedup();

        let mut parts = Vec::with_capacity(ys.len() + 1);
        let mut top = self.min_y;
        for y in ys {
            parts.push(Rect::new(self.min_x, top, self.max_x, y));
            top = y;
        }
        parts.push(Rect::new(self.min_x, top, self.max_x, self.max_y));
        parts
    }
}
