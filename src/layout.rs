use crate::errors::Error;
use crate::math::Vector2;

/// Discriminant of a [`Size`] declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SizeKind {
    Pixel,
    Percent,
    Shrink,
}

impl TryFrom<u8> for SizeKind {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::Pixel),
            1 => Ok(Self::Percent),
            2 => Ok(Self::Shrink),
            _ => Err(Error::UnknownDiscriminant {
                kind: "SizeKind",
                value,
            }),
        }
    }
}

/// Declared size of an element along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Size {
    /// A fixed length in logical pixels, scaled by the display scale.
    Pixel(f32),
    /// A share of the parent's space, on a `0..=100` scale.
    Percent(f32),
    /// Sized by content, never smaller than `min`.
    Shrink { min: f32 },
}

impl Size {
    pub const FULL: Self = Size::Percent(100.0);
    pub const SHRINK: Self = Size::Shrink { min: 0.0 };

    pub fn kind(&self) -> SizeKind {
        match self {
            Size::Pixel(_) => SizeKind::Pixel,
            Size::Percent(_) => SizeKind::Percent,
            Size::Shrink { .. } => SizeKind::Shrink,
        }
    }

    /// Rebuilds a declaration from its raw parts.
    pub fn from_raw(kind: u8, value: f32) -> Result<Self, Error> {
        Ok(match SizeKind::try_from(kind)? {
            SizeKind::Pixel => Size::Pixel(value),
            SizeKind::Percent => Size::Percent(value),
            SizeKind::Shrink => Size::Shrink { min: value },
        })
    }

    #[inline]
    pub fn is_shrink(&self) -> bool {
        matches!(self, Size::Shrink { .. })
    }

    #[inline]
    pub fn is_percent(&self) -> bool {
        matches!(self, Size::Percent(_))
    }

    /// A pixel value converted to physical pixels.
    #[inline]
    pub fn dpi_aware(value: f32, scale: f32) -> f32 {
        value * scale
    }
}

impl Default for Size {
    fn default() -> Self {
        Size::FULL
    }
}

/// Main axis of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    /// Children flow left to right.
    Horizontal,
    /// Children flow top to bottom.
    #[default]
    Vertical,
}

impl Direction {
    /// The perpendicular direction.
    #[inline]
    pub fn cross(self) -> Self {
        match self {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::Horizontal),
            1 => Ok(Self::Vertical),
            _ => Err(Error::UnknownDiscriminant {
                kind: "Direction",
                value,
            }),
        }
    }
}

/// Represents padding values for each side of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Padding {
    /// Creates a new `Padding` with individual values for each side.
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Sets the same padding value for all sides.
    pub const fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Same padding left and right, zero top and bottom.
    pub const fn horizontal(value: f32) -> Self {
        Self::new(value, value, 0.0, 0.0)
    }

    /// Same padding top and bottom, zero left and right.
    pub const fn vertical(value: f32) -> Self {
        Self::new(0.0, 0.0, value, value)
    }

    /// Sum of the two paddings on the main axis of `direction`.
    pub fn main(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Horizontal => self.left + self.right,
            Direction::Vertical => self.top + self.bottom,
        }
    }

    pub fn cross(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Horizontal => self.top + self.bottom,
            Direction::Vertical => self.left + self.right,
        }
    }

    /// Offset from the outer box origin to the content box origin.
    pub fn origin(&self) -> Vector2 {
        Vector2::new(self.left, self.top)
    }
}

impl From<f32> for Padding {
    fn from(value: f32) -> Self {
        Self::all(value)
    }
}

impl From<(f32, f32, f32, f32)> for Padding {
    /// Creates padding from a tuple in CSS order: (top, right, bottom, left).
    fn from((top, right, bottom, left): (f32, f32, f32, f32)) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// Which box an absolutely positioned container is laid out against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbsoluteAnchor {
    /// The container holding the element.
    #[default]
    Parent,
    /// The closest ancestor marked as an anchor, or the parent when there is none.
    NearestAnchor,
}

/// Placement of an element taken out of the flow.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbsolutePlacement {
    /// Offsets from the anchor's edges. `right` and `bottom` are added to the
    /// far edges to give the element's left and top edge, and win over `left`
    /// and `top` when both are set.
    Offsets {
        left: Option<f32>,
        right: Option<f32>,
        top: Option<f32>,
        bottom: Option<f32>,
    },
    /// Placed at the given screen position, ignoring the anchor.
    Manual(Vector2),
}

impl Default for AbsolutePlacement {
    fn default() -> Self {
        AbsolutePlacement::Offsets {
            left: None,
            right: None,
            top: None,
            bottom: None,
        }
    }
}

/// Out-of-flow positioning of a container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbsolutePosition {
    pub anchor: AbsoluteAnchor,
    pub placement: AbsolutePlacement,
}

impl AbsolutePosition {
    /// Pinned to the anchor's top-left corner.
    pub fn top_left(left: f32, top: f32) -> Self {
        Self {
            anchor: AbsoluteAnchor::Parent,
            placement: AbsolutePlacement::Offsets {
                left: Some(left),
                right: None,
                top: Some(top),
                bottom: None,
            },
        }
    }

    /// Positioned from the anchor's top-right corner. The element's left edge
    /// sits at the right edge plus `right`.
    pub fn top_right(right: f32, top: f32) -> Self {
        Self {
            anchor: AbsoluteAnchor::Parent,
            placement: AbsolutePlacement::Offsets {
                left: None,
                right: Some(right),
                top: Some(top),
                bottom: None,
            },
        }
    }

    pub fn manual(position: Vector2) -> Self {
        Self {
            anchor: AbsoluteAnchor::Parent,
            placement: AbsolutePlacement::Manual(position),
        }
    }

    /// Lays out against the nearest anchor ancestor instead of the parent.
    pub fn relative_to_nearest_anchor(mut self) -> Self {
        self.anchor = AbsoluteAnchor::NearestAnchor;
        self
    }
}

/// Shorthand macro for [`Size::Pixel`].
#[macro_export]
macro_rules! px {
    ($val:expr) => {
        $crate::layout::Size::Pixel($val)
    };
}

/// Shorthand macro for [`Size::Percent`], on a `0..=100` scale.
#[macro_export]
macro_rules! pct {
    ($percent:expr) => {{
        const _: () = assert!($percent >= 0.0, "Percent value must not be negative!");
        $crate::layout::Size::Percent($percent)
    }};
}

/// Shorthand macro for [`Size::Shrink`]. Defaults the minimum to `0.0` if omitted.
#[macro_export]
macro_rules! shrink {
    ($min:expr) => {
        $crate::layout::Size::Shrink { min: $min }
    };
    () => {
        $crate::shrink!(0.0)
    };
}
