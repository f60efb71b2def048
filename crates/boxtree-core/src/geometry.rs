#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All lengths are signed pixels. Resize deltas can be negative, and a
//! region that was shrunk past its gaps is allowed to report a negative
//! extent rather than silently saturating.

use std::fmt;
use std::str::FromStr;

/// Orientation along which sibling areas are stacked.
///
/// A `Row` spans its parent's full width and takes a share of the
/// parent's height; siblings of a row stack top to bottom. A `Column`
/// is the transpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Full width, allocated height.
    Row,
    /// Full height, allocated width.
    Column,
}

impl Axis {
    /// Short label for logs and error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }

    /// The other axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Axis::Row => Axis::Column,
            Axis::Column => Axis::Row,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A rectangle in pixels, either absolute or relative to a local frame.
///
/// Field order follows the rule-sink property order (`top`, `left`,
/// `width`, `height`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Region {
    /// Top edge.
    pub top: i32,
    /// Left edge.
    pub left: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Region {
    /// Create a new region.
    #[inline]
    pub const fn new(top: i32, left: i32, width: i32, height: i32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Create a region anchored at the origin.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// Check if the region has no positive area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Length along the direction siblings of `axis` stack in.
    ///
    /// Rows stack vertically, so a row's extent is its height.
    #[inline]
    pub const fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Row => self.height,
            Axis::Column => self.width,
        }
    }

    /// Same region with its origin moved to (0, 0).
    #[inline]
    pub const fn local(&self) -> Self {
        Self::from_size(self.width, self.height)
    }

    /// Shrink the region by `gap` on every side.
    pub fn inset(&self, gap: Gap) -> Region {
        Region {
            top: self.top.saturating_add(gap.top),
            left: self.left.saturating_add(gap.left),
            width: self.width.saturating_sub(gap.width()),
            height: self.height.saturating_sub(gap.height()),
        }
    }

    /// Grow the region by `gap` on every side. Inverse of [`Region::inset`].
    pub fn outset(&self, gap: Gap) -> Region {
        Region {
            top: self.top.saturating_sub(gap.top),
            left: self.left.saturating_sub(gap.left),
            width: self.width.saturating_add(gap.width()),
            height: self.height.saturating_add(gap.height()),
        }
    }

    /// Move the region along the stacking direction of `axis`.
    #[inline]
    pub fn shifted(&self, axis: Axis, by: i32) -> Region {
        let mut out = *self;
        match axis {
            Axis::Row => out.top = out.top.saturating_add(by),
            Axis::Column => out.left = out.left.saturating_add(by),
        }
        out
    }

    /// Add a resize delta to the size, leaving the origin untouched.
    #[inline]
    pub fn grow(&mut self, dx: i32, dy: i32) {
        self.width = self.width.saturating_add(dx);
        self.height = self.height.saturating_add(dy);
    }
}

/// Four-sided inset between a solved rectangle and its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Gap {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Gap {
    /// No inset.
    pub const ZERO: Self = Self::all(0);

    /// Equal inset on every side.
    pub const fn all(val: i32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create a gap with explicit sides.
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Parse a CSS-margin-shorthand list.
    ///
    /// | len | meaning                    |
    /// |-----|----------------------------|
    /// | 1   | all sides                  |
    /// | 2   | vertical, horizontal       |
    /// | 3   | top, horizontal, bottom    |
    /// | 4   | top, right, bottom, left   |
    ///
    /// # Example
    ///
    /// ```
    /// use boxtree_core::geometry::Gap;
    ///
    /// let gap = Gap::parse(&[4, 8]).unwrap();
    /// assert_eq!(gap, Gap::new(4, 8, 4, 8));
    /// assert_eq!(gap.width(), 16);
    /// ```
    pub fn parse(values: &[i32]) -> Result<Self, GapParseError> {
        let gap = match *values {
            [all] => Self::all(all),
            [vertical, horizontal] => Self::new(vertical, horizontal, vertical, horizontal),
            [top, horizontal, bottom] => Self::new(top, horizontal, bottom, horizontal),
            [top, right, bottom, left] => Self::new(top, right, bottom, left),
            _ => return Err(GapParseError::Length { len: values.len() }),
        };
        if let Some(&value) = [gap.top, gap.right, gap.bottom, gap.left]
            .iter()
            .find(|v| **v < 0)
        {
            return Err(GapParseError::Negative { value });
        }
        Ok(gap)
    }

    /// Horizontal consumption (`left + right`).
    #[inline]
    pub const fn width(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// Vertical consumption (`top + bottom`).
    #[inline]
    pub const fn height(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }

    /// Consumption along the stacking direction of `axis`.
    #[inline]
    pub const fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Row => self.height(),
            Axis::Column => self.width(),
        }
    }

    /// Check if every side is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.top == 0 && self.right == 0 && self.bottom == 0 && self.left == 0
    }
}

impl From<i32> for Gap {
    fn from(val: i32) -> Self {
        Self::all(val)
    }
}

impl From<(i32, i32)> for Gap {
    fn from((vertical, horizontal): (i32, i32)) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }
}

impl From<(i32, i32, i32, i32)> for Gap {
    fn from((top, right, bottom, left): (i32, i32, i32, i32)) -> Self {
        Self::new(top, right, bottom, left)
    }
}

impl FromStr for Gap {
    type Err = GapParseError;

    /// Parse whitespace-separated shorthand such as `"4 8"` or `"2px 0 4px"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = Vec::with_capacity(4);
        for token in s.split_whitespace() {
            let digits = token.strip_suffix("px").unwrap_or(token);
            let value = digits
                .parse::<i32>()
                .map_err(|_| GapParseError::Token(token.to_string()))?;
            values.push(value);
        }
        Self::parse(&values)
    }
}

/// Reasons a gap shorthand can be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GapParseError {
    /// Zero or more than four values.
    Length { len: usize },
    /// A side below zero.
    Negative { value: i32 },
    /// A token that is not an integer pixel length.
    Token(String),
}

impl fmt::Display for GapParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { len } => {
                write!(f, "gap shorthand takes 1 to 4 values, got {len}")
            }
            Self::Negative { value } => write!(f, "gap side {value} is negative"),
            Self::Token(token) => write!(f, "gap value {token:?} is not a pixel length"),
        }
    }
}

impl std::error::Error for GapParseError {}

#[cfg(test)]
mod tests {
    use super::{Axis, Gap, GapParseError, Region};

    #[test]
    fn gap_shorthand_one_value() {
        assert_eq!(Gap::parse(&[3]), Ok(Gap::new(3, 3, 3, 3)));
    }

    #[test]
    fn gap_shorthand_two_values() {
        let gap = Gap::parse(&[1, 2]).unwrap();
        assert_eq!(gap, Gap::new(1, 2, 1, 2));
        assert_eq!(gap.width(), 4);
        assert_eq!(gap.height(), 2);
    }

    #[test]
    fn gap_shorthand_three_values() {
        assert_eq!(Gap::parse(&[1, 2, 3]), Ok(Gap::new(1, 2, 3, 2)));
    }

    #[test]
    fn gap_shorthand_four_values() {
        let gap = Gap::parse(&[1, 2, 3, 4]).unwrap();
        assert_eq!(gap, Gap::new(1, 2, 3, 4));
        assert_eq!(gap.width(), 6);
        assert_eq!(gap.height(), 4);
    }

    #[test]
    fn gap_shorthand_rejects_bad_lengths() {
        assert_eq!(Gap::parse(&[]), Err(GapParseError::Length { len: 0 }));
        assert_eq!(
            Gap::parse(&[1, 2, 3, 4, 5]),
            Err(GapParseError::Length { len: 5 })
        );
    }

    #[test]
    fn gap_rejects_negative_side() {
        assert_eq!(
            Gap::parse(&[0, -2]),
            Err(GapParseError::Negative { value: -2 })
        );
    }

    #[test]
    fn gap_from_str_accepts_px_suffix() {
        assert_eq!("4px 8".parse::<Gap>(), Ok(Gap::new(4, 8, 4, 8)));
        assert!(matches!("4 wide".parse::<Gap>(), Err(GapParseError::Token(_))));
        assert_eq!("".parse::<Gap>(), Err(GapParseError::Length { len: 0 }));
    }

    #[test]
    fn inset_and_outset_are_inverse() {
        let region = Region::new(10, 20, 300, 200);
        let gap = Gap::new(1, 2, 3, 4);
        let inner = region.inset(gap);
        assert_eq!(inner, Region::new(11, 24, 294, 196));
        assert_eq!(inner.outset(gap), region);
    }

    #[test]
    fn extent_follows_stacking_direction() {
        let region = Region::from_size(640, 480);
        assert_eq!(region.extent(Axis::Row), 480);
        assert_eq!(region.extent(Axis::Column), 640);
        assert_eq!(Gap::new(1, 2, 3, 4).along(Axis::Row), 4);
        assert_eq!(Gap::new(1, 2, 3, 4).along(Axis::Column), 6);
    }

    #[test]
    fn shifted_moves_origin_only() {
        let region = Region::new(5, 5, 10, 10);
        assert_eq!(region.shifted(Axis::Row, 7), Region::new(12, 5, 10, 10));
        assert_eq!(region.shifted(Axis::Column, -5), Region::new(5, 0, 10, 10));
    }

    #[test]
    fn grow_applies_signed_delta() {
        let mut region = Region::new(0, 0, 1000, 800);
        region.grow(0, 100);
        assert_eq!(region, Region::new(0, 0, 1000, 900));
        region.grow(-50, -900);
        assert_eq!(region.height, 0);
        assert!(region.is_empty());
    }

    #[test]
    fn shifting_and_growing_saturate_at_the_pixel_range() {
        let region = Region::new(2_000_000_000, 0, 10, 2_000_000_000);
        assert_eq!(region.shifted(Axis::Row, 2_000_000_000).top, i32::MAX);
        let mut grown = region;
        grown.grow(0, 2_000_000_000);
        assert_eq!(grown.height, i32::MAX);
    }
}
