//! Axis-agnostic flex math.
//!
//! Everything here works on plain lengths along one axis, so the same code
//! serves horizontal and vertical containers.

use crate::align::{CrossAxisAlignment, MainAxisAlignment};

/// Total length taken by gaps between `count` flow children.
#[inline]
pub fn total_gap(gap: f32, count: usize) -> f32 {
    if count > 1 {
        gap * (count - 1) as f32
    } else {
        0.0
    }
}

/// Main-axis space left after fixed-length children and gaps.
#[inline]
pub fn remaining_space(main_length: f32, fixed_length: f32, gap: f32, count: usize) -> f32 {
    main_length - fixed_length - total_gap(gap, count)
}

/// Length granted per percentage point.
///
/// Totals up to 100 leave the rest of `remaining` unallocated; totals above
/// 100 are normalized so the children fill `remaining` exactly.
#[inline]
pub fn percent_unit(remaining: f32, total_percent: f32) -> f32 {
    remaining.max(0.0) / total_percent.max(100.0)
}

/// Walks the main axis, handing out the start offset of each flow child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MainAxisCursor {
    offset: f32,
    /// Added after every child on top of its length.
    step: f32,
}

impl MainAxisCursor {
    /// `remaining` is the main length minus every child's length and the gaps.
    pub fn new(align: MainAxisAlignment, remaining: f32, count: usize, gap: f32) -> Self {
        let (leading, between) = match align {
            MainAxisAlignment::FlexStart => (0.0, 0.0),
            MainAxisAlignment::FlexEnd => (remaining, 0.0),
            MainAxisAlignment::Center => (remaining / 2.0, 0.0),
            MainAxisAlignment::SpaceBetween if count > 1 => (0.0, remaining / (count - 1) as f32),
            MainAxisAlignment::SpaceBetween => {
                tracing::debug!(count, "space-between with fewer than two children, packing at start");
                (0.0, 0.0)
            }
            MainAxisAlignment::SpaceAround if count > 0 => {
                let half = remaining / count as f32 / 2.0;
                (half, half * 2.0)
            }
            MainAxisAlignment::SpaceEvenly => {
                let space = remaining / (count + 1) as f32;
                (space, space)
            }
            MainAxisAlignment::SpaceAround => (0.0, 0.0),
        };
        Self {
            offset: leading,
            step: gap + between,
        }
    }

    /// Offset for the next child of main length `length`.
    #[inline]
    pub fn place(&mut self, length: f32) -> f32 {
        let start = self.offset;
        self.offset += length + self.step;
        start
    }
}

/// Offset of a child along the cross axis.
#[inline]
pub fn cross_offset(align: CrossAxisAlignment, cross_length: f32, child_cross_length: f32) -> f32 {
    match align {
        CrossAxisAlignment::FlexStart => 0.0,
        CrossAxisAlignment::FlexEnd => cross_length - child_cross_length,
        CrossAxisAlignment::Center => (cross_length - child_cross_length) / 2.0,
    }
}
