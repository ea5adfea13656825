//! The host world as seen by a rebuild.
//!
//! A rebuild only ever reads the world, with one exception: evicting a
//! duplicate controller clears its cell and drops it as an item.

use std::sync::Arc;

use conduit_grid::{Face, GridPos};
use serde::{Deserialize, Serialize};

use crate::node::NetworkNodeProxy;

/// Grid lookup and the few writes eviction needs.
///
/// Implementations are shared between threads, so writes go through
/// interior mutability.
pub trait World: Send + Sync {
    /// The tile occupying `pos`, if any.
    fn tile_at(&self, pos: GridPos) -> Option<Arc<dyn TileEntity>>;

    /// Block state at `pos`. Only consulted when evicting a controller.
    fn block_state(&self, pos: GridPos) -> BlockState;

    /// Clear the cell at `pos`.
    fn set_empty(&self, pos: GridPos);

    /// Drop `item` into the world at `pos`.
    fn spawn_item(&self, pos: GridPos, item: ItemStack);
}

/// Whatever occupies a cell.
pub trait TileEntity: Send + Sync {
    /// `Some` if this tile is a network controller.
    fn as_controller(&self) -> Option<&dyn ControllerTile> {
        None
    }

    /// The node proxy exposed on `side`, if the tile has one there.
    fn node_proxy(&self, side: Face) -> Option<&dyn NetworkNodeProxy> {
        let _ = side;
        None
    }
}

/// A controller's tile, as found by another controller's traversal.
pub trait ControllerTile {
    /// Configuration carried over into the item when this controller is
    /// evicted.
    fn persisted_data(&self) -> serde_json::Value;
}

/// Opaque block state blob.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockState {
    /// Block identifier, e.g. `"controller"`.
    pub block: String,
    /// Variant number (creative vs. normal controller and the like).
    pub variant: u32,
}

impl BlockState {
    pub fn new(block: impl Into<String>, variant: u32) -> Self {
        Self {
            block: block.into(),
            variant,
        }
    }

    /// The state of an empty cell.
    pub fn air() -> Self {
        Self::new("air", 0)
    }

    pub fn is_air(&self) -> bool {
        self.block == "air"
    }
}

/// An inventory item dropped into the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: String,
    pub count: u32,
    pub metadata: u32,
    /// Persisted data travelling with the item.
    #[serde(default)]
    pub tag: serde_json::Value,
}

impl ItemStack {
    pub fn new(item: impl Into<String>, count: u32, metadata: u32) -> Self {
        Self {
            item: item.into(),
            count,
            metadata,
            tag: serde_json::Value::Null,
        }
    }

    pub fn with_tag(mut self, tag: serde_json::Value) -> Self {
        self.tag = tag;
        self
    }

    pub fn has_tag(&self) -> bool {
        !self.tag.is_null()
    }
}
