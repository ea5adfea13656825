//! In-memory grid world.

use std::collections::HashMap;
use std::sync::Arc;

use conduit_grid::GridPos;
use conduit_network::{BlockState, ItemStack, TileEntity, World};
use parking_lot::{Mutex, RwLock};
use tracing::debug;

struct Cell {
    state: BlockState,
    tile: Option<Arc<dyn TileEntity>>,
}

/// A sparse grid of cells, safe to share between threads.
#[derive(Default)]
pub struct GridWorld {
    cells: RwLock<HashMap<GridPos, Cell>>,
    spawned: Mutex<Vec<(GridPos, ItemStack)>>,
}

impl GridWorld {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Put a block (and optionally its tile) at `pos`, replacing whatever
    /// was there.
    pub fn place(&self, pos: GridPos, state: BlockState, tile: Option<Arc<dyn TileEntity>>) {
        self.cells.write().insert(pos, Cell { state, tile });
    }

    /// Put a tile at `pos` under a block named `block`.
    pub fn place_tile(&self, pos: GridPos, block: &str, tile: Arc<dyn TileEntity>) {
        self.place(pos, BlockState::new(block, 0), Some(tile));
    }

    /// Clear `pos`. Returns whether anything was there.
    pub fn remove(&self, pos: GridPos) -> bool {
        self.cells.write().remove(&pos).is_some()
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.cells.read().contains_key(&pos)
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.read().len()
    }

    /// Items dropped into the world so far.
    pub fn spawned_items(&self) -> Vec<(GridPos, ItemStack)> {
        self.spawned.lock().clone()
    }
}

impl World for GridWorld {
    fn tile_at(&self, pos: GridPos) -> Option<Arc<dyn TileEntity>> {
        self.cells.read().get(&pos).and_then(|c| c.tile.clone())
    }

    fn block_state(&self, pos: GridPos) -> BlockState {
        self.cells
            .read()
            .get(&pos)
            .map(|c| c.state.clone())
            .unwrap_or_else(BlockState::air)
    }

    fn set_empty(&self, pos: GridPos) {
        if self.remove(pos) {
            debug!(%pos, "cell cleared");
        }
    }

    fn spawn_item(&self, pos: GridPos, item: ItemStack) {
        debug!(%pos, item = %item.item, "item spawned");
        self.spawned.lock().push((pos, item));
    }
}
