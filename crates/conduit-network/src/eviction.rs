//! Eviction of duplicate controllers.
//!
//! Two controllers may never share a network. When a rebuild reaches a
//! second controller, that controller is broken back into an item carrying
//! its persisted configuration and dropped where it stood. The controller
//! running the rebuild always wins.

use conduit_grid::GridPos;
use tracing::warn;

use crate::world::{BlockState, ControllerTile, ItemStack, World};

/// Item id every evicted controller drops as.
pub const CONTROLLER_ITEM: &str = "controller";

/// The item an evicted controller turns into.
///
/// The block variant becomes the item metadata, so a creative controller
/// stays a creative controller whatever the host calls its block.
pub fn controller_item(state: &BlockState, persisted: serde_json::Value) -> ItemStack {
    ItemStack::new(CONTROLLER_ITEM, 1, state.variant).with_tag(persisted)
}

/// Evict the controller at `pos` unless it is the anchoring controller at
/// `anchor`. Returns whether anything was evicted.
pub(crate) fn remove_other_controller(
    anchor: GridPos,
    world: &dyn World,
    pos: GridPos,
    other: &dyn ControllerTile,
) -> bool {
    if pos == anchor {
        return false;
    }

    let state = world.block_state(pos);
    let item = controller_item(&state, other.persisted_data());

    world.set_empty(pos);
    world.spawn_item(pos, item);

    warn!(%pos, %anchor, block = %state.block, "evicted duplicate controller");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_keeps_variant_and_data() {
        let state = BlockState::new("controller", 1);
        let item = controller_item(&state, json!({ "energy": 500 }));

        assert_eq!(item.item, "controller");
        assert_eq!(item.count, 1);
        assert_eq!(item.metadata, 1);
        assert_eq!(item.tag, json!({ "energy": 500 }));
    }

    #[test]
    fn item_id_does_not_follow_block_name() {
        let state = BlockState::new("mymod:creative_controller", 3);
        let item = controller_item(&state, json!(null));

        assert_eq!(item.item, CONTROLLER_ITEM);
        assert_eq!(item.metadata, 3);
    }
}
