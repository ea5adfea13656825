//! Simulated network nodes and the tiles that expose them.
//!
//! Four kinds cover the traversal shapes a network has to handle:
//!
//! - **Cable**: default face walk through its own faces
//! - **Device**: spans several cells and probes around all of them itself
//! - **Bridge**: probes a fixed list of (possibly distant) cells
//! - **Terminal**: joins the network but never expands it

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use conduit_grid::{Face, GridPos};
use conduit_network::{
    Controller, HookError, NetworkNode, NetworkNodeProxy, NodeRef, NodeVisitor, Operator, TileEntity,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::events::EventLog;

/// Traversal behaviour of a simulated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Cable,
    Device,
    Bridge,
    Terminal,
}

impl NodeKind {
    /// Whether this kind decides its own expansion.
    pub fn has_visitor(self) -> bool {
        !matches!(self, NodeKind::Cable)
    }
}

/// A cell a bridge probes, and the face it enters through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub pos: GridPos,
    pub side: Face,
}

/// A node living in a [`GridWorld`](crate::GridWorld).
pub struct SimNode {
    id: String,
    kind: NodeKind,
    cells: Vec<GridPos>,
    links: Vec<Link>,
    log: EventLog,
    fail_hooks: AtomicBool,
    controller: Mutex<Option<GridPos>>,
}

impl SimNode {
    pub fn new(id: impl Into<String>, kind: NodeKind, cells: Vec<GridPos>, log: EventLog) -> Arc<Self> {
        Self::with_links(id, kind, cells, Vec::new(), log)
    }

    pub fn with_links(
        id: impl Into<String>,
        kind: NodeKind,
        cells: Vec<GridPos>,
        links: Vec<Link>,
        log: EventLog,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            kind,
            cells,
            links,
            log,
            fail_hooks: AtomicBool::new(false),
            controller: Mutex::new(None),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn cells(&self) -> &[GridPos] {
        &self.cells
    }

    /// Make both lifecycle hooks report failure from now on.
    pub fn set_fail_hooks(&self, fail: bool) {
        self.fail_hooks.store(fail, Ordering::SeqCst);
    }

    /// Position of the controller this node currently belongs to.
    pub fn controller(&self) -> Option<GridPos> {
        *self.controller.lock()
    }

    fn outcome(&self) -> Result<(), HookError> {
        if self.fail_hooks.load(Ordering::SeqCst) {
            Err(HookError::Rejected(format!("{} refuses", self.id)))
        } else {
            Ok(())
        }
    }
}

impl NetworkNode for SimNode {
    fn on_connected(&self, controller: &dyn Controller) -> Result<(), HookError> {
        let pos = controller.position();
        *self.controller.lock() = Some(pos);
        self.log.node_connected(&self.id, pos);
        self.outcome()
    }

    fn on_disconnected(&self, controller: &dyn Controller) -> Result<(), HookError> {
        let pos = controller.position();
        {
            let mut current = self.controller.lock();
            if *current == Some(pos) {
                *current = None;
            }
        }
        self.log.node_disconnected(&self.id, pos);
        self.outcome()
    }

    fn visitor(&self) -> Option<&dyn NodeVisitor> {
        if self.kind.has_visitor() {
            Some(self)
        } else {
            None
        }
    }

    fn describe(&self) -> String {
        self.id.clone()
    }
}

impl NodeVisitor for SimNode {
    fn visit(&self, operator: &mut dyn Operator) {
        let world = operator.world();
        match self.kind {
            NodeKind::Device => {
                for &cell in &self.cells {
                    for face in Face::ALL {
                        let Some(next) = cell.checked_offset(face) else {
                            continue;
                        };
                        if !self.cells.contains(&next) {
                            operator.apply(&world, next, face.opposite());
                        }
                    }
                }
            }
            NodeKind::Bridge => {
                for link in &self.links {
                    operator.apply(&world, link.pos, link.side);
                }
            }
            NodeKind::Cable | NodeKind::Terminal => {}
        }
    }
}

struct FaceProxy(NodeRef);

impl NetworkNodeProxy for FaceProxy {
    fn node(&self) -> Option<NodeRef> {
        Some(self.0.clone())
    }
}

/// Tile exposing a node on some (by default all) of its faces.
pub struct NodeTile {
    faces: [Option<FaceProxy>; 6],
}

impl NodeTile {
    pub fn new(node: NodeRef) -> Arc<Self> {
        Self::on_faces(node, &Face::ALL)
    }

    pub fn on_faces(node: NodeRef, faces: &[Face]) -> Arc<Self> {
        let proxies = Face::ALL.map(|f| faces.contains(&f).then(|| FaceProxy(node.clone())));
        Arc::new(Self { faces: proxies })
    }

    /// Different nodes per face, indexed by [`Face::index`].
    pub fn per_face(nodes: [Option<NodeRef>; 6]) -> Arc<Self> {
        Arc::new(Self {
            faces: nodes.map(|n| n.map(FaceProxy)),
        })
    }
}

impl TileEntity for NodeTile {
    fn node_proxy(&self, side: Face) -> Option<&dyn NetworkNodeProxy> {
        self.faces[side.index()]
            .as_ref()
            .map(|p| p as &dyn NetworkNodeProxy)
    }
}
