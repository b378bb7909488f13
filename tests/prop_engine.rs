//! Property-based tests for the decision engine and wire protocol.
//!
//! These drive the full pipeline over generated scenarios and assert the
//! structural guarantees the engine makes about its plans.
//!
//! Run with: cargo test --release prop_engine

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use scrapper::engine::{Assignment, Engine, NullTrace};
use scrapper::game::GameState;
use scrapper::protocol;
use scrapper::scenario::{generate_match, generate_scenario};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Committed walks stay within depth, never revisit a cell, and step
    /// one tile at a time from the robot's own cell.
    #[test]
    fn prop_walks_are_short_simple_and_adjacent(
        seed in any::<u64>(),
        width in 4u16..16,
        height in 1u16..8,
    ) {
        let snapshot = generate_scenario(seed, width, height).unwrap();
        let mut state = GameState::new(width, height).unwrap();
        state.update(&snapshot).unwrap();
        let engine = Engine::default();
        let plan = engine.analyze(&mut state, &mut NullTrace);

        for robot in &plan.robots {
            let Assignment::Pathed { path, score, .. } = &robot.assignment else {
                continue;
            };
            prop_assert!(*score > 0.0);
            prop_assert!(path.len() >= 2);
            prop_assert!(path.len() <= engine.config().path_depth);
            prop_assert_eq!(path[0], robot.origin.id);

            let mut seen = path.clone();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), path.len());

            for pair in path.windows(2) {
                let a = state.board().cell(pair[0]).unwrap();
                let b = state.board().cell(pair[1]).unwrap();
                prop_assert_eq!(a.distance_to(b), 1);
            }
        }
    }

    /// Holds sit under threat and fallbacks march for the outer border.
    #[test]
    fn prop_assignments_match_their_triggers(
        seed in any::<u64>(),
        width in 4u16..16,
        height in 1u16..8,
    ) {
        let snapshot = generate_scenario(seed, width, height).unwrap();
        let mut state = GameState::new(width, height).unwrap();
        state.update(&snapshot).unwrap();
        let plan = Engine::default().analyze(&mut state, &mut NullTrace);

        for robot in &plan.robots {
            match &robot.assignment {
                Assignment::Hold => {
                    let cell = state.board().cell(robot.origin.id).unwrap();
                    prop_assert!(cell.attacked > 0);
                }
                Assignment::Fallback { target } => {
                    let cell = state.board().cell(target.id).unwrap();
                    prop_assert!(cell.outer_border);
                }
                Assignment::Pathed { .. } | Assignment::Unassigned => {}
            }
        }
    }

    /// Traffic coefficients stay in [0, 1] however many robots share lanes.
    #[test]
    fn prop_traffic_coefficients_stay_bounded(
        seed in any::<u64>(),
        width in 4u16..16,
        height in 1u16..8,
    ) {
        let snapshots = generate_match(seed, width, height, 3).unwrap();
        let mut state = GameState::new(width, height).unwrap();
        let engine = Engine::default();

        for snapshot in &snapshots {
            state.update(snapshot).unwrap();
            let _plan = engine.analyze(&mut state, &mut NullTrace);
            for (_, cell) in state.board().iter() {
                prop_assert!(cell.traffic_coef >= 0.0);
                prop_assert!(cell.traffic_coef <= 1.0);
            }
        }
    }

    /// Every committed action deducts exactly one price from the bank.
    #[test]
    fn prop_matter_ledger_is_exact(
        seed in any::<u64>(),
        width in 4u16..16,
        height in 1u16..8,
    ) {
        let snapshots = generate_match(seed, width, height, 4).unwrap();
        let mut state = GameState::new(width, height).unwrap();
        let engine = Engine::default();

        for snapshot in &snapshots {
            state.update(snapshot).unwrap();
            let before = state.my_matter();
            let plan = engine.analyze(&mut state, &mut NullTrace);

            let builds = u32::try_from(plan.builds.len()).unwrap();
            let spawned: u32 = plan.spawns.iter().map(|spawn| spawn.amount).sum();
            let spent = (builds + spawned) * engine.config().build_cost;
            prop_assert_eq!(state.my_matter(), before - spent);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Snapshot render and parse are inverses over generated scenarios.
    #[test]
    fn prop_wire_round_trip(
        seed in any::<u64>(),
        width in 4u16..16,
        height in 1u16..8,
    ) {
        let snapshot = generate_scenario(seed, width, height).unwrap();
        let text = protocol::render_snapshot(&snapshot);
        let parsed = protocol::parse_snapshot(&text, width, height).unwrap();
        prop_assert_eq!(parsed, snapshot);
    }

    /// The parser settles every input with Ok or Err, never a panic.
    #[test]
    fn prop_parser_total_on_noise(
        text in "[ -~\\n]{0,300}",
        width in 0u16..5,
        height in 0u16..5,
    ) {
        let _ = protocol::parse_snapshot(&text, width, height);
    }

    /// Command lines always close with the scoreboard message and contain
    /// only known verbs.
    #[test]
    fn prop_commands_end_with_message(
        seed in any::<u64>(),
        width in 4u16..16,
        height in 1u16..8,
    ) {
        let snapshot = generate_scenario(seed, width, height).unwrap();
        let mut state = GameState::new(width, height).unwrap();
        state.update(&snapshot).unwrap();
        let plan = Engine::default().analyze(&mut state, &mut NullTrace);
        let commands = protocol::render_commands(&plan, state.turn());

        let parts: Vec<&str> = commands.split(';').collect();
        prop_assert!(!parts.is_empty());
        prop_assert!(parts.last().unwrap().starts_with("MESSAGE Units: "));
        for part in &parts[..parts.len() - 1] {
            let known = part.starts_with("BUILD ")
                || part.starts_with("SPAWN ")
                || part.starts_with("MOVE 1 ");
            prop_assert!(known, "unexpected command {part}");
        }
    }
}
