//! Network events recorded for inspection.

use std::sync::Arc;

use conduit_grid::GridPos;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Events observed while a network is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NetworkEvent {
    /// A node joined a controller's network
    NodeConnected {
        node: String,
        controller: GridPos,
        seq: u64,
    },

    /// A node left a controller's network
    NodeDisconnected {
        node: String,
        controller: GridPos,
        seq: u64,
    },

    /// A controller told its watchers the node set changed
    NodeSetChanged { controller: GridPos, seq: u64 },
}

impl NetworkEvent {
    /// Get the sequence number for this event.
    pub fn seq(&self) -> u64 {
        match self {
            NetworkEvent::NodeConnected { seq, .. } => *seq,
            NetworkEvent::NodeDisconnected { seq, .. } => *seq,
            NetworkEvent::NodeSetChanged { seq, .. } => *seq,
        }
    }

    /// The node this event is about, if any.
    pub fn node(&self) -> Option<&str> {
        match self {
            NetworkEvent::NodeConnected { node, .. } | NetworkEvent::NodeDisconnected { node, .. } => {
                Some(node)
            }
            NetworkEvent::NodeSetChanged { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
struct Timeline {
    events: Vec<NetworkEvent>,
    next_seq: u64,
}

/// Shared, append-only event timeline.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Timeline>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_connected(&self, node: &str, controller: GridPos) {
        self.record(|seq| NetworkEvent::NodeConnected {
            node: node.to_string(),
            controller,
            seq,
        });
    }

    pub fn node_disconnected(&self, node: &str, controller: GridPos) {
        self.record(|seq| NetworkEvent::NodeDisconnected {
            node: node.to_string(),
            controller,
            seq,
        });
    }

    pub fn node_set_changed(&self, controller: GridPos) {
        self.record(|seq| NetworkEvent::NodeSetChanged { controller, seq });
    }

    fn record(&self, event: impl FnOnce(u64) -> NetworkEvent) {
        let mut timeline = self.0.lock();
        let seq = timeline.next_seq;
        timeline.next_seq += 1;
        timeline.events.push(event(seq));
    }

    /// Everything recorded so far, oldest first.
    pub fn events(&self) -> Vec<NetworkEvent> {
        self.0.lock().events.clone()
    }

    /// Events recorded at or after `seq`.
    pub fn since(&self, seq: u64) -> Vec<NetworkEvent> {
        self.0
            .lock()
            .events
            .iter()
            .filter(|e| e.seq() >= seq)
            .cloned()
            .collect()
    }

    /// Sequence number the next event will get.
    pub fn mark(&self) -> u64 {
        self.0.lock().next_seq
    }

    pub fn len(&self) -> usize {
        self.0.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().events.is_empty()
    }

    /// How many times `node` was connected.
    pub fn connects_of(&self, node: &str) -> usize {
        self.count(|e| matches!(e, NetworkEvent::NodeConnected { node: n, .. } if n == node))
    }

    /// How many times `node` was disconnected.
    pub fn disconnects_of(&self, node: &str) -> usize {
        self.count(|e| matches!(e, NetworkEvent::NodeDisconnected { node: n, .. } if n == node))
    }

    /// How many change notifications were sent.
    pub fn notifications(&self) -> usize {
        self.count(|e| matches!(e, NetworkEvent::NodeSetChanged { .. }))
    }

    fn count(&self, pred: impl Fn(&NetworkEvent) -> bool) -> usize {
        self.0.lock().events.iter().filter(|e| pred(e)).count()
    }
}
