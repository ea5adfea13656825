//! Randomised checks over cable layouts in a small box around the controller.

use std::collections::{BTreeSet, HashSet};

use conduit_grid::GridPos;
use conduit_integration_tests::{cable_id, reachable_cells, Transitions};
use conduit_network::GraphConfig;
use conduit_sim::Simulation;
use proptest::prelude::*;

fn cell() -> impl Strategy<Value = GridPos> {
    (-3i64..=3, -3i64..=3, -3i64..=3).prop_map(|(x, y, z)| GridPos::new(x, y, z))
}

fn cells() -> impl Strategy<Value = HashSet<GridPos>> {
    prop::collection::hash_set(cell(), 0..120)
        .prop_map(|mut set| {
            set.remove(&GridPos::ORIGIN);
            set
        })
}

fn build(cells: &HashSet<GridPos>) -> Simulation {
    let mut sim = Simulation::new(GridPos::ORIGIN, GraphConfig::default());
    for &pos in cells {
        sim.add_cable(&cable_id(pos), pos).unwrap();
    }
    sim
}

fn expected_members(cells: &HashSet<GridPos>) -> Vec<String> {
    let mut ids: Vec<String> = reachable_cells(GridPos::ORIGIN, cells)
        .into_iter()
        .map(cable_id)
        .collect();
    ids.sort();
    ids
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rebuild_reaches_exactly_the_connected_component(cells in cells()) {
        let sim = build(&cells);
        sim.rebuild();
        prop_assert_eq!(sim.members(), expected_members(&cells));
    }

    #[test]
    fn second_rebuild_is_a_no_op(cells in cells()) {
        let sim = build(&cells);
        sim.rebuild();
        let before = sim.members();
        let mark = sim.log().mark();

        let report = sim.rebuild();

        prop_assert!(!report.changed);
        prop_assert_eq!(sim.members(), before);
        prop_assert_eq!(Transitions::since(sim.log(), mark), Transitions::default());
    }

    #[test]
    fn transitions_fire_exactly_once(cells in cells(), cut in prop::collection::vec(cell(), 0..20)) {
        let mut sim = build(&cells);
        sim.rebuild();
        let before: BTreeSet<String> = sim.members().into_iter().collect();

        let mut remaining = cells.clone();
        for pos in &cut {
            if remaining.remove(pos) {
                sim.remove_cell(*pos);
            }
        }
        let mark = sim.log().mark();
        let report = sim.rebuild();
        let after: BTreeSet<String> = sim.members().into_iter().collect();
        let t = Transitions::since(sim.log(), mark);

        prop_assert_eq!(after.iter().cloned().collect::<Vec<_>>(), expected_members(&remaining));
        for id in before.union(&after) {
            let (was, is) = (before.contains(id), after.contains(id));
            prop_assert_eq!(t.connects_of(id), usize::from(!was && is), "connects of {}", id);
            prop_assert_eq!(t.disconnects_of(id), usize::from(was && !is), "disconnects of {}", id);
        }
        prop_assert_eq!(t.callbacks(), report.connected + report.disconnected);
    }

    #[test]
    fn notification_iff_callbacks(cells in cells(), cut in prop::collection::vec(cell(), 0..20)) {
        let mut sim = build(&cells);
        sim.rebuild();
        for pos in cut.iter().filter(|p| **p != GridPos::ORIGIN) {
            sim.remove_cell(*pos);
        }
        let mark = sim.log().mark();

        let report = sim.rebuild();
        let t = Transitions::since(sim.log(), mark);

        prop_assert_eq!(report.changed, t.callbacks() > 0);
        prop_assert_eq!(t.notifications, usize::from(t.callbacks() > 0));
    }
}
