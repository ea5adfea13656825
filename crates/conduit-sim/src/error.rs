//! Error types for conduit-sim.

use conduit_grid::GridPos;
use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or building a simulated world.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Layout JSON could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Two things claim the same cell
    #[error("cell {0} is occupied more than once")]
    DuplicateCell(GridPos),

    /// Two nodes share an id
    #[error("node id {0:?} is declared more than once")]
    DuplicateNode(String),

    /// A node without any cells
    #[error("node {0:?} has no cells")]
    EmptyNode(String),

    /// Layout is structurally invalid
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}
