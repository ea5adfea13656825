//! A world with one anchoring controller and a registry of named nodes.

use std::sync::Arc;

use conduit_grid::{Face, GridPos};
use conduit_network::{Controller, GraphConfig, NodeRef, RebuildReport};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::controller::SimController;
use crate::error::{Error, Result};
use crate::events::{EventLog, NetworkEvent};
use crate::nodes::{Link, NodeKind, NodeTile, SimNode};
use crate::world::GridWorld;

/// Block id node tiles are placed under.
pub const NODE_BLOCK: &str = "node";

/// Everything needed to drive one network end to end.
pub struct Simulation {
    world: Arc<GridWorld>,
    controller: Arc<SimController>,
    rivals: Vec<Arc<SimController>>,
    nodes: IndexMap<String, Arc<SimNode>>,
    log: EventLog,
}

impl Simulation {
    /// Create an empty world with a running controller at `pos`.
    pub fn new(pos: GridPos, config: GraphConfig) -> Self {
        Self::with_controller(pos, 0, serde_json::Value::Null, config)
    }

    pub fn with_controller(pos: GridPos, variant: u32, data: serde_json::Value, config: GraphConfig) -> Self {
        let world = GridWorld::new();
        let log = EventLog::new();
        let controller = SimController::spawn(&world, pos, variant, data, config, log.clone());
        Self {
            world,
            controller,
            rivals: Vec::new(),
            nodes: IndexMap::new(),
            log,
        }
    }

    /// Add a node occupying `cells`, exposed on every face of each cell.
    pub fn add_node(&mut self, id: &str, kind: NodeKind, cells: Vec<GridPos>) -> Result<Arc<SimNode>> {
        self.add_node_with(id, kind, cells, &Face::ALL, Vec::new())
    }

    /// Add a node exposed only on `faces`, probing `links` if it is a bridge.
    pub fn add_node_with(
        &mut self,
        id: &str,
        kind: NodeKind,
        cells: Vec<GridPos>,
        faces: &[Face],
        links: Vec<Link>,
    ) -> Result<Arc<SimNode>> {
        if self.nodes.contains_key(id) {
            return Err(Error::DuplicateNode(id.to_string()));
        }
        if cells.is_empty() {
            return Err(Error::EmptyNode(id.to_string()));
        }
        for (i, &cell) in cells.iter().enumerate() {
            if self.world.is_occupied(cell) || cells[..i].contains(&cell) {
                return Err(Error::DuplicateCell(cell));
            }
        }

        let node = SimNode::with_links(id, kind, cells.clone(), links, self.log.clone());
        let handle = NodeRef::from_arc(node.clone());
        for cell in cells {
            let tile = NodeTile::on_faces(handle.clone(), faces);
            self.world.place_tile(cell, NODE_BLOCK, tile);
        }

        debug!(node = id, ?kind, "node added");
        self.nodes.insert(id.to_string(), node.clone());
        Ok(node)
    }

    /// Add a single-cell cable.
    pub fn add_cable(&mut self, id: &str, pos: GridPos) -> Result<Arc<SimNode>> {
        self.add_node(id, NodeKind::Cable, vec![pos])
    }

    /// Add a bridge at `pos` that probes `links`.
    pub fn add_bridge(&mut self, id: &str, pos: GridPos, links: Vec<Link>) -> Result<Arc<SimNode>> {
        self.add_node_with(id, NodeKind::Bridge, vec![pos], &Face::ALL, links)
    }

    /// Place a second controller. It is not rebuilt by [`Simulation::rebuild`].
    pub fn add_rival_controller(&mut self, pos: GridPos, variant: u32, data: serde_json::Value) -> Result<Arc<SimController>> {
        if self.world.is_occupied(pos) {
            return Err(Error::DuplicateCell(pos));
        }
        let rival = SimController::spawn(
            &self.world,
            pos,
            variant,
            data,
            self.controller.graph().config().clone(),
            self.log.clone(),
        );
        self.rivals.push(rival.clone());
        Ok(rival)
    }

    /// Clear a cell, whatever is in it.
    pub fn remove_cell(&mut self, pos: GridPos) -> bool {
        self.world.remove(pos)
    }

    /// Rebuild the anchoring controller's network.
    pub fn rebuild(&self) -> RebuildReport {
        self.controller.rebuild()
    }

    pub fn world(&self) -> &Arc<GridWorld> {
        &self.world
    }

    pub fn controller(&self) -> &Arc<SimController> {
        &self.controller
    }

    pub fn rivals(&self) -> &[Arc<SimController>] {
        &self.rivals
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn node(&self, id: &str) -> Option<&Arc<SimNode>> {
        self.nodes.get(id)
    }

    /// Identity handle for a named node.
    pub fn node_ref(&self, id: &str) -> Option<NodeRef> {
        self.nodes.get(id).map(|n| NodeRef::from_arc(n.clone()))
    }

    /// Ids of the current members, sorted.
    pub fn members(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .controller
            .graph()
            .all()
            .iter()
            .map(|n| n.describe())
            .collect();
        ids.sort();
        ids
    }

    pub fn is_member(&self, id: &str) -> bool {
        self.node_ref(id)
            .is_some_and(|n| self.controller.graph().contains(&n))
    }

    /// Current state for display.
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            controller: self.controller.graph().world().map(|_| self.controller.position()),
            members: self.members(),
            occupied_cells: self.world.occupied_cells(),
            spawned_items: self.world.spawned_items().len(),
            events: self.log.events(),
        }
    }
}

/// Serializable view of a simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// Anchoring controller, if it is still alive.
    pub controller: Option<GridPos>,
    pub members: Vec<String>,
    pub occupied_cells: usize,
    pub spawned_items: usize,
    pub events: Vec<NetworkEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i64, y: i64, z: i64) -> GridPos {
        GridPos::new(x, y, z)
    }

    #[test]
    fn simulation_starts_with_controller_only() {
        let sim = Simulation::new(GridPos::ORIGIN, GraphConfig::default());
        assert_eq!(sim.world().occupied_cells(), 1);
        assert!(sim.members().is_empty());
        assert!(sim.log().is_empty());
    }

    #[test]
    fn duplicate_ids_and_cells_are_rejected() {
        let mut sim = Simulation::new(GridPos::ORIGIN, GraphConfig::default());
        sim.add_cable("a", pos(1, 0, 0)).unwrap();

        assert!(matches!(sim.add_cable("a", pos(2, 0, 0)), Err(Error::DuplicateNode(_))));
        assert!(matches!(sim.add_cable("b", pos(1, 0, 0)), Err(Error::DuplicateCell(_))));
        assert!(matches!(sim.add_cable("c", GridPos::ORIGIN), Err(Error::DuplicateCell(_))));
        assert!(matches!(
            sim.add_node("d", NodeKind::Device, vec![]),
            Err(Error::EmptyNode(_))
        ));
        assert!(matches!(
            sim.add_node("e", NodeKind::Device, vec![pos(5, 0, 0), pos(5, 0, 0)]),
            Err(Error::DuplicateCell(_))
        ));
    }

    #[test]
    fn chain_members_after_rebuild() {
        let mut sim = Simulation::new(GridPos::ORIGIN, GraphConfig::default());
        sim.add_cable("a", pos(1, 0, 0)).unwrap();
        sim.add_cable("b", pos(2, 0, 0)).unwrap();

        let report = sim.rebuild();

        assert_eq!(report.connected, 2);
        assert_eq!(sim.members(), vec!["a", "b"]);
        assert!(sim.is_member("a"));
        assert_eq!(sim.node("a").unwrap().controller(), Some(GridPos::ORIGIN));
    }

    #[test]
    fn device_walks_around_all_its_cells() {
        let mut sim = Simulation::new(GridPos::ORIGIN, GraphConfig::default());
        // L-shaped device; only its far cell touches the cable
        sim.add_node("dev", NodeKind::Device, vec![pos(1, 0, 0), pos(1, 1, 0), pos(1, 2, 0)])
            .unwrap();
        sim.add_cable("top", pos(2, 2, 0)).unwrap();

        sim.rebuild();

        assert_eq!(sim.members(), vec!["dev", "top"]);
        assert_eq!(sim.log().connects_of("dev"), 1);
    }

    #[test]
    fn rebuild_at_the_edge_of_the_grid() {
        let edge = pos(i64::MAX, 0, 0);
        let mut sim = Simulation::new(edge, GraphConfig::default());
        sim.add_cable("west", pos(i64::MAX - 1, 0, 0)).unwrap();
        sim.add_cable("up", pos(i64::MAX, 1, 0)).unwrap();
        sim.add_node("dev", NodeKind::Device, vec![pos(i64::MAX, 2, 0), pos(i64::MAX, 3, 0)])
            .unwrap();

        let report = sim.rebuild();

        assert_eq!(report.connected, 3);
        assert_eq!(sim.members(), vec!["dev", "up", "west"]);
        assert!(!sim.rebuild().changed);
    }

    #[test]
    fn snapshot_reflects_members() {
        let mut sim = Simulation::new(GridPos::ORIGIN, GraphConfig::default());
        sim.add_cable("a", pos(0, 0, 1)).unwrap();
        sim.rebuild();

        let snap = sim.snapshot();
        assert_eq!(snap.controller, Some(GridPos::ORIGIN));
        assert_eq!(snap.members, vec!["a"]);
        assert_eq!(snap.occupied_cells, 2);
        // connect + notification
        assert_eq!(snap.events.len(), 2);
    }
}
