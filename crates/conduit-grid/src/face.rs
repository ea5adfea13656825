//! The six axis-aligned faces of a grid cell.

use crate::{GridPos, FACES_PER_CELL};

/// Coordinate axis a face lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One face of a cell.
///
/// The declaration order is the sweep order used everywhere a cell's faces
/// are enumerated: down, up, north, south, west, east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Face {
    /// -Y
    Down,
    /// +Y
    Up,
    /// -Z
    North,
    /// +Z
    South,
    /// -X
    West,
    /// +X
    East,
}

impl Face {
    /// All faces in sweep order.
    pub const ALL: [Face; FACES_PER_CELL] = [
        Face::Down,
        Face::Up,
        Face::North,
        Face::South,
        Face::West,
        Face::East,
    ];

    /// The face pointing the other way along the same axis.
    pub const fn opposite(self) -> Face {
        match self {
            Face::Down => Face::Up,
            Face::Up => Face::Down,
            Face::North => Face::South,
            Face::South => Face::North,
            Face::West => Face::East,
            Face::East => Face::West,
        }
    }

    /// Unit step from a cell to the neighbour behind this face.
    pub const fn direction(self) -> GridPos {
        match self {
            Face::Down => GridPos::new(0, -1, 0),
            Face::Up => GridPos::new(0, 1, 0),
            Face::North => GridPos::new(0, 0, -1),
            Face::South => GridPos::new(0, 0, 1),
            Face::West => GridPos::new(-1, 0, 0),
            Face::East => GridPos::new(1, 0, 0),
        }
    }

    pub const fn axis(self) -> Axis {
        match self {
            Face::Down | Face::Up => Axis::Y,
            Face::North | Face::South => Axis::Z,
            Face::West | Face::East => Axis::X,
        }
    }

    /// Position in [`Face::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Face::direction`]. Returns `None` for anything that is
    /// not a unit axis step.
    pub fn from_direction(step: GridPos) -> Option<Face> {
        Face::ALL.into_iter().find(|f| f.direction() == step)
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Face::Down => "down",
            Face::Up => "up",
            Face::North => "north",
            Face::South => "south",
            Face::West => "west",
            Face::East => "east",
        };
        f.write_str(name)
    }
}
