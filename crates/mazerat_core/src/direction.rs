//! # Facing Directions
//!
//! The four discrete facings a rat or missile can have, and the movement
//! convention tied to them.
//!
//! ## Convention
//!
//! "North" is the positive-x axis. North/south motion changes x; east/west
//! motion changes y. This is a maze-layout convention, not a compass, and
//! every position delta in the game goes through [`Direction::step_x`] /
//! [`Direction::step_y`] so the convention lives in exactly one place.

/// A facing direction.
///
/// The discriminants are the 2-bit wire encoding used by the packed
/// position/direction field; changing them is a protocol change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// Positive-x axis.
    North = 0,
    /// Negative-x axis.
    South = 1,
    /// Positive-y axis.
    East = 2,
    /// Negative-y axis.
    West = 3,
}

impl Direction {
    /// Decodes a facing from the low 2 bits of a wire field.
    ///
    /// Total over all inputs: every 2-bit pattern is a valid facing.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0x3 {
            0 => Self::North,
            1 => Self::South,
            2 => Self::East,
            _ => Self::West,
        }
    }

    /// Returns the 2-bit wire encoding of this facing.
    #[inline]
    #[must_use]
    pub const fn as_bits(self) -> u32 {
        self as u32
    }

    /// Advances an x coordinate one cell along this facing.
    ///
    /// Only north/south motion changes x. Arithmetic wraps; live entities
    /// never reach the numeric edge because real mazes are wall-enclosed.
    #[inline]
    #[must_use]
    pub const fn step_x(self, x: u16) -> u16 {
        match self {
            Self::North => x.wrapping_add(1),
            Self::South => x.wrapping_sub(1),
            Self::East | Self::West => x,
        }
    }

    /// Advances a y coordinate one cell along this facing.
    ///
    /// Only east/west motion changes y.
    #[inline]
    #[must_use]
    pub const fn step_y(self, y: u16) -> u16 {
        match self {
            Self::East => y.wrapping_add(1),
            Self::West => y.wrapping_sub(1),
            Self::North | Self::South => y,
        }
    }
}
