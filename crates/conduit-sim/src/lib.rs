//! Conduit Simulation
//!
//! An in-memory grid world for driving network rebuilds end to end.
//!
//! # Architecture
//!
//! - **World**: sparse map of cells, each with a block state and optional tile
//! - **Nodes**: cables, multi-cell devices, bridges and terminals
//! - **Controller**: owns a [`NetworkNodeGraph`](conduit_network::NetworkNodeGraph)
//! - **Events**: timeline of connect, disconnect and change notifications
//! - **Layout**: JSON world descriptions, loaded and built into a [`Simulation`]
//!
//! # Usage
//!
//! ```ignore
//! let mut sim = Simulation::new(GridPos::ORIGIN, GraphConfig::default());
//! sim.add_cable("a", GridPos::new(1, 0, 0))?;
//! let report = sim.rebuild();
//! assert_eq!(sim.members(), vec!["a"]);
//! ```

mod controller;
mod error;
mod events;
mod layout;
mod nodes;
mod simulation;
mod world;

pub use controller::{SimController, CONTROLLER_BLOCK};
pub use error::{Error, Result};
pub use events::{EventLog, NetworkEvent};
pub use layout::{ControllerSpec, NodeSpec, WorldLayout};
pub use nodes::{Link, NodeKind, NodeTile, SimNode};
pub use simulation::{NetworkSnapshot, Simulation, NODE_BLOCK};
pub use world::GridWorld;
