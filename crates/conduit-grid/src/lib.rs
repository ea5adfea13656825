//! Conduit Grid
//!
//! Integer grid geometry for Conduit networks.
//!
//! # Coordinates
//!
//! Every cell of the world is addressed by a [`GridPos`], an `(x, y, z)`
//! integer triple. Cells touch through exactly six axis-aligned [`Face`]s:
//!
//! - 2 vertical faces (down/up along Y)
//! - 2 faces along Z (north/south)
//! - 2 faces along X (west/east)
//!
//! Traversal always enters a cell *through* a face, so the face a probe is
//! sent along and the face it arrives on are opposites of each other.

mod face;
mod pos;

pub use face::{Axis, Face};
pub use pos::{are_adjacent, count_present_neighbors, GridPos};

/// Number of faces per cell (invariant: always 6)
pub const FACES_PER_CELL: usize = 6;

/// Faces along each of the three axes
pub const FACES_PER_AXIS: usize = 2;

// Compile-time assertion of the six-face invariant
const _: () = assert!(FACES_PER_AXIS * 3 == FACES_PER_CELL);
