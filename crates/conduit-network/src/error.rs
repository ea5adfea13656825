//! Error types for conduit-network.

use thiserror::Error;

/// Failure reported by a node's lifecycle hook.
///
/// A failing hook never aborts a rebuild. The graph logs it, counts it in
/// the [`RebuildReport`](crate::RebuildReport) and carries on, so the
/// membership set still converges to what is reachable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// The node refused the transition.
    #[error("hook rejected: {0}")]
    Rejected(String),

    /// The node could not be reached (unloaded, mid-teardown).
    #[error("node unavailable")]
    Unavailable,
}
