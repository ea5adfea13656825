//! Graph configuration.

use serde::{Deserialize, Serialize};

/// Tunables for a [`NetworkNodeGraph`](crate::NetworkNodeGraph).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// A rebuild that ends with more nodes than this logs a warning.
    /// Rebuilds always run to completion; throttling them is up to the
    /// caller.
    pub warn_node_count: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            warn_node_count: 4096,
        }
    }
}
