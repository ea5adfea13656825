//! In-crate fixtures for graph tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use conduit_grid::{Face, GridPos};
use parking_lot::{Mutex, RwLock};

use crate::*;

#[derive(Default)]
pub struct TestWorld {
    tiles: RwLock<HashMap<GridPos, Arc<dyn TileEntity>>>,
    spawned: Mutex<Vec<(GridPos, ItemStack)>>,
}

impl TestWorld {
    pub fn place(&self, pos: GridPos, tile: Arc<dyn TileEntity>) {
        self.tiles.write().insert(pos, tile);
    }

    pub fn remove(&self, pos: GridPos) {
        self.tiles.write().remove(&pos);
    }

    pub fn spawned(&self) -> Vec<(GridPos, ItemStack)> {
        self.spawned.lock().clone()
    }
}

impl World for TestWorld {
    fn tile_at(&self, pos: GridPos) -> Option<Arc<dyn TileEntity>> {
        self.tiles.read().get(&pos).cloned()
    }

    fn block_state(&self, pos: GridPos) -> BlockState {
        match self.tiles.read().get(&pos) {
            Some(tile) if tile.as_controller().is_some() => BlockState::new("controller", 0),
            Some(_) => BlockState::new("cable", 0),
            None => BlockState::air(),
        }
    }

    fn set_empty(&self, pos: GridPos) {
        self.remove(pos);
    }

    fn spawn_item(&self, pos: GridPos, item: ItemStack) {
        self.spawned.lock().push((pos, item));
    }
}

#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: String) {
        self.0.lock().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

pub struct TestNode {
    name: String,
    log: EventLog,
    fail: bool,
    targets: Option<Vec<(GridPos, Face)>>,
}

impl TestNode {
    fn build(name: &str, log: &EventLog, fail: bool, targets: Option<Vec<(GridPos, Face)>>) -> NodeRef {
        NodeRef::new(Self {
            name: name.to_string(),
            log: log.clone(),
            fail,
            targets,
        })
    }

    pub fn plain(name: &str, log: &EventLog) -> NodeRef {
        Self::build(name, log, false, None)
    }

    pub fn failing(name: &str, log: &EventLog) -> NodeRef {
        Self::build(name, log, true, None)
    }

    /// A node with the visitor capability probing exactly `targets`.
    pub fn bridge(name: &str, log: &EventLog, targets: Vec<(GridPos, Face)>) -> NodeRef {
        Self::build(name, log, false, Some(targets))
    }

    fn outcome(&self) -> Result<(), HookError> {
        if self.fail {
            Err(HookError::Rejected(self.name.clone()))
        } else {
            Ok(())
        }
    }
}

impl NetworkNode for TestNode {
    fn on_connected(&self, _controller: &dyn Controller) -> Result<(), HookError> {
        self.log.push(format!("+{}", self.name));
        self.outcome()
    }

    fn on_disconnected(&self, _controller: &dyn Controller) -> Result<(), HookError> {
        self.log.push(format!("-{}", self.name));
        self.outcome()
    }

    fn visitor(&self) -> Option<&dyn NodeVisitor> {
        self.targets.as_ref().map(|_| self as &dyn NodeVisitor)
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

impl NodeVisitor for TestNode {
    fn visit(&self, operator: &mut dyn Operator) {
        let world = operator.world();
        for &(pos, side) in self.targets.iter().flatten() {
            operator.apply(&world, pos, side);
        }
    }
}

/// Calls back into its own graph from `on_connected`.
pub struct ReentrantNode {
    graph: Weak<NetworkNodeGraph>,
    nested: Mutex<Option<RebuildReport>>,
    seen: Mutex<Option<usize>>,
}

impl ReentrantNode {
    pub fn new(graph: &Arc<NetworkNodeGraph>) -> Arc<Self> {
        Arc::new(Self {
            graph: Arc::downgrade(graph),
            nested: Mutex::new(None),
            seen: Mutex::new(None),
        })
    }

    pub fn nested_report(&self) -> Option<RebuildReport> {
        self.nested.lock().clone()
    }

    pub fn seen_len(&self) -> Option<usize> {
        *self.seen.lock()
    }
}

impl NetworkNode for ReentrantNode {
    fn on_connected(&self, _controller: &dyn Controller) -> Result<(), HookError> {
        let graph = self.graph.upgrade().ok_or(HookError::Unavailable)?;
        *self.seen.lock() = Some(graph.len());
        *self.nested.lock() = Some(graph.rebuild());
        Ok(())
    }
}

struct FaceProxy(NodeRef);

impl NetworkNodeProxy for FaceProxy {
    fn node(&self) -> Option<NodeRef> {
        Some(self.0.clone())
    }
}

/// Proxy that exists but yields no node.
struct EmptyProxy;

impl NetworkNodeProxy for EmptyProxy {
    fn node(&self) -> Option<NodeRef> {
        None
    }
}

pub struct NodeTile {
    faces: [Option<FaceProxy>; 6],
    empty: EmptyProxy,
}

impl NodeTile {
    pub fn uniform(node: NodeRef) -> Arc<Self> {
        Self::per_face(Face::ALL.map(|_| Some(node.clone())))
    }

    /// Faces set to `None` still expose a proxy, just one without a node.
    pub fn per_face(nodes: [Option<NodeRef>; 6]) -> Arc<Self> {
        Arc::new(Self {
            faces: nodes.map(|n| n.map(FaceProxy)),
            empty: EmptyProxy,
        })
    }
}

impl TileEntity for NodeTile {
    fn node_proxy(&self, side: Face) -> Option<&dyn NetworkNodeProxy> {
        match &self.faces[side.index()] {
            Some(proxy) => Some(proxy),
            None => Some(&self.empty),
        }
    }
}

pub struct ControllerBlock {
    data: serde_json::Value,
}

impl ControllerBlock {
    pub fn new(data: serde_json::Value) -> Arc<Self> {
        Arc::new(Self { data })
    }
}

impl TileEntity for ControllerBlock {
    fn as_controller(&self) -> Option<&dyn ControllerTile> {
        Some(self)
    }
}

impl ControllerTile for ControllerBlock {
    fn persisted_data(&self) -> serde_json::Value {
        self.data.clone()
    }
}

pub struct TestController {
    pos: GridPos,
    world: Arc<TestWorld>,
    can_run: AtomicBool,
    notifications: AtomicUsize,
}

impl TestController {
    pub fn set_can_run(&self, can_run: bool) {
        self.can_run.store(can_run, Ordering::SeqCst);
    }

    pub fn notifications(&self) -> usize {
        self.notifications.load(Ordering::SeqCst)
    }
}

impl Controller for TestController {
    fn position(&self) -> GridPos {
        self.pos
    }

    fn world(&self) -> Arc<dyn World> {
        self.world.clone()
    }

    fn can_run(&self) -> bool {
        self.can_run.load(Ordering::SeqCst)
    }

    fn data_manager(&self) -> &dyn DataManager {
        self
    }
}

impl DataManager for TestController {
    fn notify_node_set_changed(&self) {
        self.notifications.fetch_add(1, Ordering::SeqCst);
    }
}

/// A running controller at the origin of an empty world.
pub fn setup() -> (Arc<TestWorld>, Arc<TestController>, NetworkNodeGraph) {
    setup_with(GraphConfig::default())
}

pub fn setup_with(config: GraphConfig) -> (Arc<TestWorld>, Arc<TestController>, NetworkNodeGraph) {
    let world = Arc::new(TestWorld::default());
    let controller = Arc::new(TestController {
        pos: GridPos::ORIGIN,
        world: world.clone(),
        can_run: AtomicBool::new(true),
        notifications: AtomicUsize::new(0),
    });
    let weak: Weak<dyn Controller> = Arc::downgrade(&controller) as Weak<dyn Controller>;
    let graph = NetworkNodeGraph::with_config(weak, config);
    (world, controller, graph)
}

/// Place a default-walk cable at `pos`.
pub fn cable(world: &TestWorld, log: &EventLog, name: &str, pos: GridPos) -> NodeRef {
    let node = TestNode::plain(name, log);
    world.place(pos, NodeTile::uniform(node.clone()));
    node
}
