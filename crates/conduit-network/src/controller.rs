//! The controller that anchors a network.

use std::sync::Arc;

use conduit_grid::GridPos;

use crate::world::World;

/// Owner of a [`NetworkNodeGraph`](crate::NetworkNodeGraph).
///
/// Power, redstone and the run-enabled bit all live behind [`can_run`].
///
/// [`can_run`]: Controller::can_run
pub trait Controller: Send + Sync {
    fn position(&self) -> GridPos;

    fn world(&self) -> Arc<dyn World>;

    /// Whether the controller is allowed to hold a network right now.
    fn can_run(&self) -> bool;

    /// Channel used to tell watchers the node set changed.
    fn data_manager(&self) -> &dyn DataManager;
}

/// Fire-and-forget notification channel to remote observers.
pub trait DataManager: Send + Sync {
    fn notify_node_set_changed(&self);
}
