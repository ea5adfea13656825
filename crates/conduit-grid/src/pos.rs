//! Integer cell coordinates.

use std::ops::{Add, Neg, Sub};

use crate::{Face, FACES_PER_CELL};

/// A cell on the 3D integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPos {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl GridPos {
    /// Origin of the coordinate system.
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    /// Create a new position.
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// The adjacent cell behind `face`.
    ///
    /// Overflows at the edge of the coordinate range; see
    /// [`GridPos::checked_offset`].
    #[inline]
    pub const fn offset(self, face: Face) -> Self {
        let d = face.direction();
        Self {
            x: self.x + d.x,
            y: self.y + d.y,
            z: self.z + d.z,
        }
    }

    /// The adjacent cell behind `face`, or `None` past the edge of the
    /// coordinate range.
    #[inline]
    pub const fn checked_offset(self, face: Face) -> Option<Self> {
        let d = face.direction();
        match (
            self.x.checked_add(d.x),
            self.y.checked_add(d.y),
            self.z.checked_add(d.z),
        ) {
            (Some(x), Some(y), Some(z)) => Some(Self { x, y, z }),
            _ => None,
        }
    }

    /// The six face-adjacent cells, in [`Face::ALL`] order.
    pub fn neighbors(self) -> [Self; FACES_PER_CELL] {
        Face::ALL.map(|f| self.offset(f))
    }

    /// Sum of absolute per-axis differences.
    pub fn manhattan_distance(&self, other: &Self) -> u64 {
        (self.x - other.x).unsigned_abs()
            + (self.y - other.y).unsigned_abs()
            + (self.z - other.z).unsigned_abs()
    }

    /// The face of `self` that `other` sits behind, if the two are adjacent.
    pub fn face_towards(&self, other: &Self) -> Option<Face> {
        Face::from_direction(*other - *self)
    }
}

impl From<(i64, i64, i64)> for GridPos {
    fn from((x, y, z): (i64, i64, i64)) -> Self {
        Self { x, y, z }
    }
}

impl Add for GridPos {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Add<Face> for GridPos {
    type Output = Self;

    #[inline]
    fn add(self, face: Face) -> Self {
        self.offset(face)
    }
}

impl Sub for GridPos {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for GridPos {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Check if two positions share a face.
pub fn are_adjacent(a: GridPos, b: GridPos) -> bool {
    a.face_towards(&b).is_some()
}

/// Count how many of a cell's six neighbours satisfy `is_present`.
pub fn count_present_neighbors<F>(pos: GridPos, is_present: F) -> usize
where
    F: Fn(GridPos) -> bool,
{
    pos.neighbors().iter().filter(|&&n| is_present(n)).count()
}
