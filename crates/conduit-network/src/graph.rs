//! The controller's node graph.
//!
//! # Rebuild
//!
//! Membership is never maintained incrementally. Every [`rebuild`] walks
//! the world outwards from the controller's six neighbour cells and
//! reconciles what it reaches against the previous membership:
//!
//! 1. Nodes reached for the first time get `on_connected`
//! 2. Nodes reached again get nothing
//! 3. Nodes no longer reached get `on_disconnected`, after all connects
//! 4. Watchers are notified once, after all callbacks, if anything moved
//!
//! # Readers
//!
//! The membership set is published as an immutable snapshot. A rebuild
//! builds the next set on the side and swaps it in at the end, so readers
//! on other threads never see a half-built set.
//!
//! [`rebuild`]: NetworkNodeGraph::rebuild

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, debug_span, trace, warn};

use crate::config::GraphConfig;
use crate::controller::Controller;
use crate::node::{fire_disconnected, NodeRef, NodeSet};
use crate::operator::GraphOperator;
use crate::world::World;

/// Accounting for one rebuild or disconnect pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RebuildReport {
    /// `on_connected` calls made.
    pub connected: usize,
    /// `on_disconnected` calls made.
    pub disconnected: usize,
    /// Cells whose duplicate controller was evicted.
    pub evicted: Vec<conduit_grid::GridPos>,
    /// Hooks that returned an error.
    pub hook_failures: usize,
    /// Membership size once the pass finished.
    pub node_count: usize,
    /// Whether watchers were told the set changed.
    pub changed: bool,
}

/// Membership of a controller's network.
pub struct NetworkNodeGraph {
    controller: Weak<dyn Controller>,
    nodes: RwLock<Arc<NodeSet>>,
    /// Held for the duration of a rebuild or disconnect pass.
    rebuilding: Mutex<()>,
    config: GraphConfig,
}

impl NetworkNodeGraph {
    /// Create an empty graph for `controller`.
    ///
    /// The graph does not keep its controller alive.
    pub fn new(controller: Weak<dyn Controller>) -> Self {
        Self::with_config(controller, GraphConfig::default())
    }

    pub fn with_config(controller: Weak<dyn Controller>, config: GraphConfig) -> Self {
        Self {
            controller,
            nodes: RwLock::new(Arc::new(NodeSet::new())),
            rebuilding: Mutex::new(()),
            config,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Re-discover the network and reconcile membership.
    ///
    /// Never fails. Empty cells, missing proxies and failing hooks are
    /// skipped; whatever does not converge now converges on the next
    /// rebuild. Calling this from inside a lifecycle hook is ignored.
    pub fn rebuild(&self) -> RebuildReport {
        let Some(_guard) = self.rebuilding.try_lock() else {
            warn!("rebuild requested while the graph is busy; ignoring");
            return RebuildReport::default();
        };

        let Some(controller) = self.controller.upgrade() else {
            debug!("controller is gone; nothing to rebuild");
            return RebuildReport::default();
        };
        let controller = &*controller;

        let origin = controller.position();
        let _span = debug_span!("rebuild", controller = %origin).entered();

        if !controller.can_run() {
            if self.is_empty() {
                return RebuildReport::default();
            }
            debug!("controller cannot run; disconnecting all nodes");
            return self.disconnect_locked(controller);
        }

        let current = self.all();
        let mut operator = GraphOperator::new(controller, controller.world(), &current);
        operator.seed(origin);
        operator.drain();

        let (new_nodes, previous_nodes, mut report) = operator.finish();
        report.node_count = new_nodes.len();

        *self.nodes.write() = Arc::new(new_nodes);

        for node in &previous_nodes {
            trace!(node = %node.describe(), "node disconnected");
            fire_disconnected(node, controller, &mut report);
            report.changed = true;
        }

        if report.changed {
            controller.data_manager().notify_node_set_changed();
        }

        if report.node_count > self.config.warn_node_count {
            warn!(
                nodes = report.node_count,
                limit = self.config.warn_node_count,
                "network is unusually large; consider throttling rebuilds"
            );
        }

        debug!(
            connected = report.connected,
            disconnected = report.disconnected,
            evicted = report.evicted.len(),
            nodes = report.node_count,
            "rebuild finished"
        );

        report
    }

    /// Snapshot of the current members. Cheap; safe on any thread.
    pub fn all(&self) -> Arc<NodeSet> {
        self.nodes.read().clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    pub fn contains(&self, node: &NodeRef) -> bool {
        self.nodes.read().contains(node)
    }

    /// Disconnect every member and empty the graph.
    ///
    /// Used on teardown. Call it while the controller is still alive;
    /// once the controller is gone the set is cleared without callbacks.
    pub fn disconnect_all(&self) -> RebuildReport {
        let Some(_guard) = self.rebuilding.try_lock() else {
            warn!("disconnect requested while the graph is busy; ignoring");
            return RebuildReport::default();
        };

        match self.controller.upgrade() {
            Some(controller) => self.disconnect_locked(&*controller),
            None => {
                let dropped = std::mem::take(&mut *self.nodes.write());
                if !dropped.is_empty() {
                    warn!(nodes = dropped.len(), "controller is gone; dropping nodes without callbacks");
                }
                RebuildReport::default()
            }
        }
    }

    /// The controller's world, while the controller is alive.
    pub fn world(&self) -> Option<Arc<dyn World>> {
        self.controller.upgrade().map(|c| c.world())
    }

    fn disconnect_locked(&self, controller: &dyn Controller) -> RebuildReport {
        let old = std::mem::take(&mut *self.nodes.write());

        let mut report = RebuildReport::default();
        for node in old.iter() {
            trace!(node = %node.describe(), "node disconnected");
            fire_disconnected(node, controller, &mut report);
        }

        controller.data_manager().notify_node_set_changed();
        report.changed = true;

        debug!(disconnected = report.disconnected, "disconnected all nodes");
        report
    }
}

impl fmt::Debug for NetworkNodeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkNodeGraph")
            .field("nodes", &self.len())
            .field("config", &self.config)
            .finish()
    }
}
