//! Expansion of a single discovered node.

use std::sync::Arc;

use conduit_grid::{Face, GridPos};

use crate::node::NodeRef;
use crate::operator::Operator;
use crate::world::{TileEntity, World};

/// A queued expansion step: `node` was reached at `pos` through `side`.
pub(crate) struct Visit {
    node: NodeRef,
    world: Arc<dyn World>,
    pos: GridPos,
    side: Face,
    tile: Arc<dyn TileEntity>,
}

impl Visit {
    pub(crate) fn new(
        node: NodeRef,
        world: Arc<dyn World>,
        pos: GridPos,
        side: Face,
        tile: Arc<dyn TileEntity>,
    ) -> Self {
        Self {
            node,
            world,
            pos,
            side,
            tile,
        }
    }

    pub(crate) fn visit(&self, operator: &mut dyn Operator) {
        if let Some(visitor) = self.node.visitor() {
            visitor.visit(operator);
            return;
        }

        for face in Face::ALL {
            // Never walk back out the way we came in
            if face == self.side {
                continue;
            }

            let same_node = self
                .tile
                .node_proxy(face)
                .and_then(|proxy| proxy.node())
                .is_some_and(|other| other == self.node);

            // Only faces that belong to this very node carry adjacency
            if same_node {
                if let Some(next) = self.pos.checked_offset(face) {
                    operator.apply(&self.world, next, face.opposite());
                }
            }
        }
    }
}
