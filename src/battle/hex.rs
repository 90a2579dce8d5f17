//! Hex coordinate system for battlefields (axial coordinates)
//!
//! Uses axial coordinates (q, r) on a pointy-top layout. Rectangular boards
//! are addressed in odd-row offset coordinates and converted on the way in.

use derive_more::{Add, Sub};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axial hex coordinate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default, Add, Sub,
)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Cube coordinates (x, y, z) with x + y + z = 0
    pub const fn cube(&self) -> (i32, i32, i32) {
        (self.q, self.s(), self.r)
    }

    /// Hex-grid step count between two coordinates
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        dq.max(dr).max(ds) as u32
    }

    /// All 6 neighboring coordinates, East first, counter-clockwise
    pub fn neighbors(&self) -> [AxialCoord; 6] {
        HexDirection::ALL.map(|dir| *self + dir.offset())
    }

    pub fn neighbor(&self, direction: HexDirection) -> AxialCoord {
        *self + direction.offset()
    }

    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.distance(other) == 1
    }

    pub fn key(&self) -> HexKey {
        HexKey::from(*self)
    }

    /// Convert to odd-row offset coordinates (odd rows shoved right)
    pub fn to_offset(&self) -> OffsetCoord {
        OffsetCoord {
            row: self.r,
            col: self.q + (self.r - (self.r & 1)) / 2,
        }
    }

    /// Convert from odd-row offset coordinates
    pub fn from_offset(offset: OffsetCoord) -> Self {
        Self::new(offset.col - (offset.row - (offset.row & 1)) / 2, offset.row)
    }
}

impl fmt::Display for AxialCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Free-function form of `a + b`
pub fn add(a: AxialCoord, b: AxialCoord) -> AxialCoord {
    a + b
}

pub fn neighbors(a: AxialCoord) -> [AxialCoord; 6] {
    a.neighbors()
}

pub fn distance(a: AxialCoord, b: AxialCoord) -> u32 {
    a.distance(&b)
}

pub fn equals(a: AxialCoord, b: AxialCoord) -> bool {
    a == b
}

/// Row/column address on a rectangular board laid out in odd-row offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct OffsetCoord {
    pub row: i32,
    pub col: i32,
}

impl OffsetCoord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn to_axial(self) -> AxialCoord {
        AxialCoord::from_offset(self)
    }
}

impl From<OffsetCoord> for AxialCoord {
    fn from(offset: OffsetCoord) -> Self {
        AxialCoord::from_offset(offset)
    }
}

impl From<AxialCoord> for OffsetCoord {
    fn from(coord: AxialCoord) -> Self {
        coord.to_offset()
    }
}

/// Unique key for a coordinate, used by visited and open-set lookups.
///
/// Packs q into the high 32 bits and r into the low 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexKey(i64);

impl HexKey {
    pub fn coord(self) -> AxialCoord {
        AxialCoord::new((self.0 >> 32) as i32, self.0 as i32)
    }

    pub fn raw(self) -> i64 {
        self.0
    }
}

impl From<AxialCoord> for HexKey {
    fn from(coord: AxialCoord) -> Self {
        HexKey(((coord.q as i64) << 32) | (coord.r as u32 as i64))
    }
}

impl fmt::Display for HexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coord = self.coord();
        write!(f, "{},{}", coord.q, coord.r)
    }
}

/// Direction enum for the six hex sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    pub const ALL: [HexDirection; 6] = [
        HexDirection::East,
        HexDirection::NorthEast,
        HexDirection::NorthWest,
        HexDirection::West,
        HexDirection::SouthWest,
        HexDirection::SouthEast,
    ];

    /// Get the hex offset for this direction
    pub const fn offset(&self) -> AxialCoord {
        match self {
            HexDirection::East => AxialCoord::new(1, 0),
            HexDirection::NorthEast => AxialCoord::new(1, -1),
            HexDirection::NorthWest => AxialCoord::new(0, -1),
            HexDirection::West => AxialCoord::new(-1, 0),
            HexDirection::SouthWest => AxialCoord::new(-1, 1),
            HexDirection::SouthEast => AxialCoord::new(0, 1),
        }
    }

    /// Get opposite direction
    pub fn opposite(&self) -> Self {
        match self {
            HexDirection::East => HexDirection::West,
            HexDirection::NorthEast => HexDirection::SouthWest,
            HexDirection::NorthWest => HexDirection::SouthEast,
            HexDirection::West => HexDirection::East,
            HexDirection::SouthWest => HexDirection::NorthEast,
            HexDirection::SouthEast => HexDirection::NorthWest,
        }
    }
}
