//! Box constraints and their resolution against size declarations.
//!
//! Constraints flow down the element tree. Each element first tightens the
//! constraint it received using its own width and height declarations, then
//! lays out its children inside the result.

use crate::layout::{Direction, Padding, Size};
use crate::math::Dimensions;

/// Min/max bounds for an element's size, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxConstraint {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl BoxConstraint {
    /// Zero minimum, infinite maximum.
    pub const UNBOUNDED: Self = Self {
        min_width: 0.0,
        max_width: f32::INFINITY,
        min_height: 0.0,
        max_height: f32::INFINITY,
    };

    /// Exactly `width` x `height`.
    #[inline]
    pub fn tight(width: f32, height: f32) -> Self {
        Self {
            min_width: width,
            max_width: width,
            min_height: height,
            max_height: height,
        }
    }

    /// Anything from zero up to `max_width` x `max_height`.
    #[inline]
    pub fn loose(max_width: f32, max_height: f32) -> Self {
        Self {
            min_width: 0.0,
            max_width,
            min_height: 0.0,
            max_height,
        }
    }

    /// Builds a constraint from main/cross bounds of `direction`.
    pub fn from_axes(direction: Direction, main: (f32, f32), cross: (f32, f32)) -> Self {
        let (width, height) = match direction {
            Direction::Horizontal => (main, cross),
            Direction::Vertical => (cross, main),
        };
        Self {
            min_width: width.0,
            max_width: width.1,
            min_height: height.0,
            max_height: height.1,
        }
    }

    /// Clamps `size` into the bounds. The minimum wins when the bounds cross.
    #[inline(always)]
    pub fn constrain(&self, size: Dimensions) -> Dimensions {
        debug_assert!(!size.width.is_nan(), "NaN width in layout");
        debug_assert!(!size.height.is_nan(), "NaN height in layout");
        Dimensions {
            width: size.width.min(self.max_width).max(self.min_width),
            height: size.height.min(self.max_height).max(self.min_height),
        }
    }

    #[inline]
    pub fn is_width_tight(&self) -> bool {
        self.min_width == self.max_width
    }

    #[inline]
    pub fn is_height_tight(&self) -> bool {
        self.min_height == self.max_height
    }

    #[inline]
    pub fn is_tight(&self) -> bool {
        self.is_width_tight() && self.is_height_tight()
    }

    /// Shrinks the bounds by `padding`, never below zero.
    #[inline]
    pub fn deflate(&self, padding: &Padding) -> Self {
        let horizontal = padding.left + padding.right;
        let vertical = padding.top + padding.bottom;
        Self {
            min_width: (self.min_width - horizontal).max(0.0),
            max_width: (self.max_width - horizontal).max(0.0),
            min_height: (self.min_height - vertical).max(0.0),
            max_height: (self.max_height - vertical).max(0.0),
        }
    }

    pub fn main_min(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Horizontal => self.min_width,
            Direction::Vertical => self.min_height,
        }
    }

    pub fn main_max(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Horizontal => self.max_width,
            Direction::Vertical => self.max_height,
        }
    }

    pub fn cross_min(&self, direction: Direction) -> f32 {
        self.main_min(direction.cross())
    }

    pub fn cross_max(&self, direction: Direction) -> f32 {
        self.main_max(direction.cross())
    }

    pub fn is_main_tight(&self, direction: Direction) -> bool {
        self.main_min(direction) == self.main_max(direction)
    }

    pub fn is_cross_tight(&self, direction: Direction) -> bool {
        self.is_main_tight(direction.cross())
    }

    /// Largest finite size allowed; unbounded axes report zero.
    pub fn biggest(&self) -> Dimensions {
        Dimensions {
            width: if self.max_width.is_finite() { self.max_width } else { 0.0 },
            height: if self.max_height.is_finite() { self.max_height } else { 0.0 },
        }
    }
}

impl Default for BoxConstraint {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Tightens `constraint` with an element's own declarations.
///
/// Axes that are already tight are left alone: a parent that fixed the size
/// has the final say.
pub fn resolve(constraint: BoxConstraint, width: Size, height: Size, scale: f32) -> BoxConstraint {
    let mut resolved = constraint;
    if !constraint.is_width_tight() {
        (resolved.min_width, resolved.max_width) =
            resolve_axis(constraint.min_width, constraint.max_width, width, scale);
    }
    if !constraint.is_height_tight() {
        (resolved.min_height, resolved.max_height) =
            resolve_axis(constraint.min_height, constraint.max_height, height, scale);
    }
    resolved
}

fn resolve_axis(min: f32, max: f32, size: Size, scale: f32) -> (f32, f32) {
    match size {
        Size::Pixel(value) => {
            let value = Size::dpi_aware(value, scale);
            (value, value)
        }
        Size::Percent(percent) if max.is_finite() => {
            let value = max * percent / 100.0;
            (value, value)
        }
        Size::Percent(percent) => {
            tracing::trace!(percent, "percentage of an unbounded axis left to the parent");
            (min, max)
        }
        Size::Shrink { min: floor } => (floor, max.max(floor)),
    }
}
