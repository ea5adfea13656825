//! Reconciliation context for a single rebuild.
//!
//! The operator owns everything that only lives for one rebuild: the set
//! being built, the shrinking set of nodes that were members before and
//! have not been reached again yet, the FIFO of pending visits and the
//! changed flag.

use std::collections::VecDeque;
use std::sync::Arc;

use conduit_grid::{Face, GridPos};
use tracing::trace;

use crate::controller::Controller;
use crate::eviction::remove_other_controller;
use crate::node::{fire_connected, NodeSet};
use crate::visitor::Visit;
use crate::world::World;
use crate::RebuildReport;

/// What a visitor sees of the rebuild in progress.
pub trait Operator {
    /// Probe the cell at `pos`, entering it through `side`.
    ///
    /// Empty cells, tiles without a proxy on `side` and proxies without a
    /// node are skipped. A controller other than the anchoring one is
    /// evicted. A node not yet reached in this rebuild joins the new set
    /// and is queued for expansion.
    fn apply(&mut self, world: &Arc<dyn World>, pos: GridPos, side: Face);

    /// The world the rebuild started in.
    fn world(&self) -> Arc<dyn World>;
}

pub(crate) struct GraphOperator<'a> {
    controller: &'a dyn Controller,
    world: Arc<dyn World>,
    /// Membership before this rebuild.
    nodes: &'a NodeSet,
    new_nodes: NodeSet,
    previous_nodes: NodeSet,
    to_check: VecDeque<Visit>,
    changed: bool,
    report: RebuildReport,
}

impl<'a> GraphOperator<'a> {
    pub(crate) fn new(controller: &'a dyn Controller, world: Arc<dyn World>, nodes: &'a NodeSet) -> Self {
        Self {
            controller,
            world,
            nodes,
            new_nodes: NodeSet::new(),
            previous_nodes: nodes.clone(),
            to_check: VecDeque::new(),
            changed: false,
            report: RebuildReport::default(),
        }
    }

    /// Probe the six cells around the controller.
    pub(crate) fn seed(&mut self, origin: GridPos) {
        let world = self.world.clone();
        for face in Face::ALL {
            // Past the edge of the grid there is no cell to probe
            if let Some(next) = origin.checked_offset(face) {
                self.apply(&world, next, face.opposite());
            }
        }
    }

    /// Expand queued visits until none are left.
    pub(crate) fn drain(&mut self) {
        while let Some(visit) = self.to_check.pop_front() {
            visit.visit(self);
        }
    }

    /// Hand back the reached set, the nodes that dropped out, and the
    /// accounting so far.
    pub(crate) fn finish(self) -> (NodeSet, NodeSet, RebuildReport) {
        let mut report = self.report;
        report.changed = self.changed;
        (self.new_nodes, self.previous_nodes, report)
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> usize {
        self.to_check.len()
    }
}

impl Operator for GraphOperator<'_> {
    fn apply(&mut self, world: &Arc<dyn World>, pos: GridPos, side: Face) {
        let Some(tile) = world.tile_at(pos) else {
            return;
        };

        if let Some(other) = tile.as_controller() {
            if remove_other_controller(self.controller.position(), world.as_ref(), pos, other) {
                self.report.evicted.push(pos);
            }
            return;
        }

        let Some(node) = tile.node_proxy(side).and_then(|proxy| proxy.node()) else {
            return;
        };

        if !self.new_nodes.insert(node.clone()) {
            return;
        }

        if !self.nodes.contains(&node) {
            trace!(node = %node.describe(), %pos, %side, "node connected");
            fire_connected(&node, self.controller, &mut self.report);
            self.changed = true;
        }

        self.previous_nodes.swap_remove(&node);

        self.to_check.push_back(Visit::new(node, world.clone(), pos, side, tile));
    }

    fn world(&self) -> Arc<dyn World> {
        self.world.clone()
    }
}
