//! Conduit Network
//!
//! Membership of a controller-anchored network of grid nodes.
//!
//! # Model
//!
//! A controller sits on a cell of the grid. Its network is every node that
//! can be reached from the controller's six neighbour cells, where each
//! step enters a cell through one face and asks the tile there which node
//! it exposes on that face.
//!
//! - Nodes are identified by reference, not by position: one node may span
//!   many cells and one cell may expose different nodes per face
//! - Nodes expand through the faces that expose the same node, unless they
//!   carry the visitor capability and choose for themselves
//! - A second controller reached by traversal is evicted from the world
//!
//! # Usage
//!
//! ```ignore
//! let graph = NetworkNodeGraph::new(Arc::downgrade(&controller) as Weak<dyn Controller>);
//! let report = graph.rebuild();
//! for node in graph.all().iter() {
//!     println!("{}", node.describe());
//! }
//! ```

mod config;
mod controller;
mod error;
mod eviction;
mod graph;
mod node;
mod operator;
mod visitor;
mod world;

#[cfg(test)]
mod testing;

pub use config::GraphConfig;
pub use controller::{Controller, DataManager};
pub use error::HookError;
pub use eviction::{controller_item, CONTROLLER_ITEM};
pub use graph::{NetworkNodeGraph, RebuildReport};
pub use node::{NetworkNode, NetworkNodeProxy, NodeRef, NodeSet, NodeVisitor};
pub use operator::Operator;
pub use world::{BlockState, ControllerTile, ItemStack, TileEntity, World};

pub use conduit_grid::{Face, GridPos};
