//! Helpers shared by the end-to-end scenarios in `tests/`.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use conduit_grid::GridPos;
use conduit_sim::{EventLog, NetworkEvent};

/// Per-node callback counts for the events recorded after a mark.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transitions {
    pub connects: BTreeMap<String, usize>,
    pub disconnects: BTreeMap<String, usize>,
    pub notifications: usize,
}

impl Transitions {
    /// Tally everything recorded in `log` at or after `mark`.
    pub fn since(log: &EventLog, mark: u64) -> Self {
        let mut t = Self::default();
        for event in log.since(mark) {
            match event {
                NetworkEvent::NodeConnected { node, .. } => *t.connects.entry(node).or_default() += 1,
                NetworkEvent::NodeDisconnected { node, .. } => *t.disconnects.entry(node).or_default() += 1,
                NetworkEvent::NodeSetChanged { .. } => t.notifications += 1,
            }
        }
        t
    }

    pub fn callbacks(&self) -> usize {
        self.connects.values().sum::<usize>() + self.disconnects.values().sum::<usize>()
    }

    pub fn connects_of(&self, node: &str) -> usize {
        self.connects.get(node).copied().unwrap_or(0)
    }

    pub fn disconnects_of(&self, node: &str) -> usize {
        self.disconnects.get(node).copied().unwrap_or(0)
    }
}

/// Cells reachable from `origin` through face-adjacent occupied cells.
/// `origin` itself is excluded.
pub fn reachable_cells(origin: GridPos, occupied: &HashSet<GridPos>) -> BTreeSet<GridPos> {
    let mut seen = BTreeSet::new();
    let mut queue: VecDeque<GridPos> = origin.neighbors().into_iter().collect();

    while let Some(pos) = queue.pop_front() {
        if pos == origin || !occupied.contains(&pos) || !seen.insert(pos) {
            continue;
        }
        queue.extend(pos.neighbors());
    }
    seen
}

/// Cable id used for the cell at `pos`.
pub fn cable_id(pos: GridPos) -> String {
    format!("c{}.{}.{}", pos.x, pos.y, pos.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachable_follows_adjacency_only() {
        let occupied: HashSet<GridPos> = [
            GridPos::new(1, 0, 0),
            GridPos::new(2, 0, 0),
            GridPos::new(4, 0, 0),
        ]
        .into_iter()
        .collect();

        let reached = reachable_cells(GridPos::ORIGIN, &occupied);
        assert_eq!(
            reached,
            [GridPos::new(1, 0, 0), GridPos::new(2, 0, 0)].into_iter().collect()
        );
    }

    #[test]
    fn transitions_tally_by_node() {
        let log = EventLog::new();
        log.node_connected("a", GridPos::ORIGIN);
        let mark = log.mark();
        log.node_connected("b", GridPos::ORIGIN);
        log.node_disconnected("a", GridPos::ORIGIN);
        log.node_set_changed(GridPos::ORIGIN);

        let t = Transitions::since(&log, mark);
        assert_eq!(t.connects_of("a"), 0);
        assert_eq!(t.connects_of("b"), 1);
        assert_eq!(t.disconnects_of("a"), 1);
        assert_eq!(t.notifications, 1);
        assert_eq!(t.callbacks(), 2);
    }
}
