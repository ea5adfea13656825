//! Simulated controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use conduit_grid::GridPos;
use conduit_network::{
    BlockState, Controller, ControllerTile, DataManager, GraphConfig, NetworkNodeGraph, RebuildReport,
    TileEntity, World,
};
use tracing::info;

use crate::events::EventLog;
use crate::world::GridWorld;

/// Block id controllers are placed under.
pub const CONTROLLER_BLOCK: &str = "controller";

/// A controller placed in a [`GridWorld`], owning its network graph.
pub struct SimController {
    pos: GridPos,
    world: Arc<GridWorld>,
    can_run: AtomicBool,
    data: serde_json::Value,
    log: EventLog,
    graph: NetworkNodeGraph,
}

impl SimController {
    /// Create a controller and place its block at `pos`.
    pub fn spawn(
        world: &Arc<GridWorld>,
        pos: GridPos,
        variant: u32,
        data: serde_json::Value,
        config: GraphConfig,
        log: EventLog,
    ) -> Arc<Self> {
        let controller = Arc::new_cyclic(|weak: &Weak<SimController>| {
            let anchor: Weak<dyn Controller> = weak.clone();
            SimController {
                pos,
                world: world.clone(),
                can_run: AtomicBool::new(true),
                data,
                log,
                graph: NetworkNodeGraph::with_config(anchor, config),
            }
        });

        let block: Arc<dyn TileEntity> = Arc::new(ControllerBlock {
            controller: Arc::downgrade(&controller),
            data: controller.data.clone(),
        });
        world.place(pos, BlockState::new(CONTROLLER_BLOCK, variant), Some(block));

        controller
    }

    pub fn graph(&self) -> &NetworkNodeGraph {
        &self.graph
    }

    pub fn rebuild(&self) -> RebuildReport {
        self.graph.rebuild()
    }

    pub fn set_can_run(&self, can_run: bool) {
        self.can_run.store(can_run, Ordering::SeqCst);
    }

    /// Configuration this controller would carry into an item.
    pub fn persisted_data(&self) -> &serde_json::Value {
        &self.data
    }

    /// Break the controller: disconnect its network and clear its cell.
    pub fn remove(&self) -> RebuildReport {
        let report = self.graph.disconnect_all();
        self.world.set_empty(self.pos);
        info!(pos = %self.pos, disconnected = report.disconnected, "controller removed");
        report
    }
}

impl Controller for SimController {
    fn position(&self) -> GridPos {
        self.pos
    }

    fn world(&self) -> Arc<dyn World> {
        self.world.clone()
    }

    fn can_run(&self) -> bool {
        self.can_run.load(Ordering::SeqCst)
    }

    fn data_manager(&self) -> &dyn DataManager {
        self
    }
}

impl DataManager for SimController {
    fn notify_node_set_changed(&self) {
        self.log.node_set_changed(self.pos);
    }
}

/// The controller's footprint in the world.
///
/// Holds the controller weakly so the world does not keep it alive.
struct ControllerBlock {
    controller: Weak<SimController>,
    data: serde_json::Value,
}

impl TileEntity for ControllerBlock {
    fn as_controller(&self) -> Option<&dyn ControllerTile> {
        Some(self)
    }
}

impl ControllerTile for ControllerBlock {
    fn persisted_data(&self) -> serde_json::Value {
        match self.controller.upgrade() {
            Some(controller) => controller.data.clone(),
            None => self.data.clone(),
        }
    }
}
