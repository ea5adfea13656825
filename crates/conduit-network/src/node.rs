//! Network nodes and their identity.
//!
//! A node is anything that can belong to a controller's network. Nodes are
//! owned by the world's tiles; the graph only holds [`NodeRef`] handles to
//! them. Two handles are the same node iff they point at the same
//! allocation, no matter which cell or face they were obtained from.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use indexmap::IndexSet;
use tracing::warn;

use crate::controller::Controller;
use crate::error::HookError;
use crate::operator::Operator;
use crate::RebuildReport;

/// A member of a controller's network.
///
/// Lifecycle hooks run synchronously inside a rebuild. They may read the
/// graph (`all()`), but must not rebuild or disconnect it; such calls are
/// rejected while a rebuild is running.
pub trait NetworkNode: Send + Sync {
    /// Called once when the node joins `controller`'s network.
    fn on_connected(&self, controller: &dyn Controller) -> Result<(), HookError> {
        let _ = controller;
        Ok(())
    }

    /// Called once when the node leaves `controller`'s network.
    fn on_disconnected(&self, controller: &dyn Controller) -> Result<(), HookError> {
        let _ = controller;
        Ok(())
    }

    /// Custom traversal. `None` means the default face walk applies.
    fn visitor(&self) -> Option<&dyn NodeVisitor> {
        None
    }

    /// Short label used in log output.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// The visitor capability: a node that decides for itself which cells a
/// rebuild should probe after reaching it.
///
/// Bridges probe remote cells, multi-cell cables iterate their own cells,
/// terminals probe nothing at all.
pub trait NodeVisitor {
    fn visit(&self, operator: &mut dyn Operator);
}

/// Per-face adapter from a tile to the node reachable through that face.
pub trait NetworkNodeProxy {
    fn node(&self) -> Option<NodeRef>;
}

/// Shared handle to a node with identity semantics.
#[derive(Clone)]
pub struct NodeRef(Arc<dyn NetworkNode>);

impl NodeRef {
    /// Wrap a freshly created node.
    pub fn new<N: NetworkNode + 'static>(node: N) -> Self {
        Self(Arc::new(node))
    }

    /// Wrap an existing shared node.
    pub fn from_arc(node: Arc<dyn NetworkNode>) -> Self {
        Self(node)
    }

    /// Stable identity token (the allocation address).
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    /// Whether two handles refer to the same node.
    pub fn same_node(&self, other: &NodeRef) -> bool {
        self.id() == other.id()
    }

    /// The underlying shared node.
    pub fn as_arc(&self) -> &Arc<dyn NetworkNode> {
        &self.0
    }
}

impl From<Arc<dyn NetworkNode>> for NodeRef {
    fn from(node: Arc<dyn NetworkNode>) -> Self {
        Self(node)
    }
}

impl Deref for NodeRef {
    type Target = dyn NetworkNode;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.same_node(other)
    }
}

impl Eq for NodeRef {}

impl Hash for NodeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({} @ {:#x})", self.0.describe(), self.id())
    }
}

/// A set of nodes keyed on identity, iterated in insertion order.
pub type NodeSet = IndexSet<NodeRef>;

pub(crate) fn fire_connected(node: &NodeRef, controller: &dyn Controller, report: &mut RebuildReport) {
    report.connected += 1;
    if let Err(e) = node.on_connected(controller) {
        warn!(node = %node.describe(), error = %e, "on_connected hook failed");
        report.hook_failures += 1;
    }
}

pub(crate) fn fire_disconnected(node: &NodeRef, controller: &dyn Controller, report: &mut RebuildReport) {
    report.disconnected += 1;
    if let Err(e) = node.on_disconnected(controller) {
        warn!(node = %node.describe(), error = %e, "on_disconnected hook failed");
        report.hook_failures += 1;
    }
}
