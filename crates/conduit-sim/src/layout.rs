//! JSON world layouts.
//!
//! A layout names the anchoring controller, any rival controllers, and the
//! nodes with the cells they occupy:
//!
//! ```json
//! {
//!   "controller": { "pos": { "x": 0, "y": 0, "z": 0 } },
//!   "nodes": [
//!     { "id": "a", "cells": [{ "x": 1, "y": 0, "z": 0 }] },
//!     { "id": "hub", "kind": "bridge", "cells": [{ "x": 2, "y": 0, "z": 0 }],
//!       "links": [{ "pos": { "x": 9, "y": 0, "z": 0 }, "side": "west" }] }
//!   ],
//!   "graph": { "warn_node_count": 1024 }
//! }
//! ```

use std::path::Path;

use conduit_grid::{Face, GridPos};
use conduit_network::GraphConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::nodes::{Link, NodeKind};
use crate::simulation::Simulation;

/// A controller to place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSpec {
    pub pos: GridPos,
    #[serde(default)]
    pub variant: u32,
    /// Persisted configuration, carried over if the controller is evicted.
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default = "default_can_run")]
    pub can_run: bool,
}

fn default_can_run() -> bool {
    true
}

/// A node to place. Cells listing the same node share its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(default)]
    pub kind: NodeKind,
    pub cells: Vec<GridPos>,
    /// Faces exposing the node; every face when absent.
    #[serde(default)]
    pub faces: Option<Vec<Face>>,
    /// Cells a bridge probes.
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub fail_hooks: bool,
}

/// A complete world description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldLayout {
    pub controller: ControllerSpec,
    /// Further controllers sharing the world.
    #[serde(default)]
    pub controllers: Vec<ControllerSpec>,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub graph: GraphConfig,
}

impl WorldLayout {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let layout = Self::from_json(&text)?;
        info!(path = %path.display(), nodes = layout.nodes.len(), "layout loaded");
        Ok(layout)
    }

    /// Place everything into a fresh world.
    pub fn build(&self) -> Result<Simulation> {
        let spec = &self.controller;
        let mut sim = Simulation::with_controller(spec.pos, spec.variant, spec.data.clone(), self.graph.clone());
        sim.controller().set_can_run(spec.can_run);

        for rival in &self.controllers {
            let controller = sim.add_rival_controller(rival.pos, rival.variant, rival.data.clone())?;
            controller.set_can_run(rival.can_run);
        }

        for node in &self.nodes {
            if !node.links.is_empty() && node.kind != NodeKind::Bridge {
                return Err(Error::InvalidLayout(format!(
                    "node {:?} has links but is a {:?}",
                    node.id, node.kind
                )));
            }

            let faces = node.faces.as_deref().unwrap_or(&Face::ALL);
            let built = sim.add_node_with(&node.id, node.kind, node.cells.clone(), faces, node.links.clone())?;
            built.set_fail_hooks(node.fail_hooks);
        }

        Ok(sim)
    }
}
