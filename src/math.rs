use crate::layout::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Builds a point from a main/cross pair, oriented by `direction`.
    pub fn from_axes(direction: Direction, main: f32, cross: f32) -> Self {
        match direction {
            Direction::Horizontal => Self::new(main, cross),
            Direction::Vertical => Self::new(cross, main),
        }
    }
}

impl From<(f32, f32)> for Vector2 {
    fn from(value: (f32, f32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<Vector2> for glam::Vec2 {
    fn from(value: Vector2) -> Self {
        glam::Vec2::new(value.x, value.y)
    }
}

impl From<glam::Vec2> for Vector2 {
    fn from(value: glam::Vec2) -> Self {
        Self::new(value.x, value.y)
    }
}

impl core::ops::Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl core::ops::Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Length along the main axis of `direction`.
    #[inline]
    pub fn main(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Horizontal => self.width,
            Direction::Vertical => self.height,
        }
    }

    /// Length along the cross axis of `direction`.
    #[inline]
    pub fn cross(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Horizontal => self.height,
            Direction::Vertical => self.width,
        }
    }

    pub fn from_axes(direction: Direction, main: f32, cross: f32) -> Self {
        match direction {
            Direction::Horizontal => Self::new(main, cross),
            Direction::Vertical => Self::new(cross, main),
        }
    }
}

impl From<(f32, f32)> for Dimensions {
    fn from(value: (f32, f32)) -> Self {
        Self::new(value.0, value.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(position: Vector2, size: Dimensions) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    #[inline]
    pub fn position(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive on all four edges.
    pub fn contains_point(&self, point: Vector2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Overlapping region of two boxes; zero-sized when they do not overlap.
    pub fn intersect(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        BoundingBox::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
    }

    /// True when the box lies entirely outside `viewport`.
    pub fn is_outside(&self, viewport: Dimensions) -> bool {
        self.x > viewport.width
            || self.y > viewport.height
            || self.right() < 0.0
            || self.bottom() < 0.0
    }
}
