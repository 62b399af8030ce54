use crate::errors::Error;

/// How children are distributed along a container's main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MainAxisAlignment {
    /// Packed at the start.
    #[default]
    FlexStart,
    /// Packed at the end.
    FlexEnd,
    /// Packed around the middle.
    Center,
    /// First child at the start, last child at the end, equal space between.
    SpaceBetween,
    /// Equal space on both sides of every child.
    SpaceAround,
    /// Equal space before, between and after the children.
    SpaceEvenly,
}

/// Where each child sits along a container's cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CrossAxisAlignment {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
}

impl TryFrom<u8> for MainAxisAlignment {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::FlexStart),
            1 => Ok(Self::FlexEnd),
            2 => Ok(Self::Center),
            3 => Ok(Self::SpaceBetween),
            4 => Ok(Self::SpaceAround),
            5 => Ok(Self::SpaceEvenly),
            _ => Err(Error::UnknownDiscriminant {
                kind: "MainAxisAlignment",
                value,
            }),
        }
    }
}

impl TryFrom<u8> for CrossAxisAlignment {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::FlexStart),
            1 => Ok(Self::FlexEnd),
            2 => Ok(Self::Center),
            _ => Err(Error::UnknownDiscriminant {
                kind: "CrossAxisAlignment",
                value,
            }),
        }
    }
}
