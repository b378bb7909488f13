#![no_main]

//! Full engine turn fuzzer.
//!
//! Builds a short stream of structured snapshots on a small grid and runs
//! each through ingestion and the decision engine:
//! 1. Apply the snapshot and refresh the board analytics
//! 2. Produce a turn plan
//! 3. Check the board bookkeeping invariants
//! 4. Check the exact matter ledger against the plan
//! 5. Render the command line
//!
//! This catches integration bugs that the per-module tests miss.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scrapper::engine::{Engine, NullTrace};
use scrapper::game::{check_invariants, CellSnapshot, GameState, Owner, TurnSnapshot};
use scrapper::protocol;

/// A fuzzer-generated cell.
#[derive(Arbitrary, Debug, Clone, Copy)]
struct FuzzCell {
    scrap: u8,
    owner: i8,
    units: u8,
    recycler: bool,
    can_build: bool,
    can_spawn: bool,
    in_range: bool,
}

/// Structured input for engine turn fuzzing.
#[derive(Arbitrary, Debug)]
struct EngineTurnInput {
    /// Grid width seed (capped to keep boards small).
    width: u8,
    /// Grid height seed.
    height: u8,
    /// Matter bank reported every turn.
    my_matter: u16,
    /// Opponent bank reported every turn.
    opp_matter: u16,
    /// One cell list per turn.
    turns: Vec<Vec<FuzzCell>>,
}

fuzz_target!(|input: EngineTurnInput| {
    // Cap grid and match length to keep single runs fast
    let width = u16::from(input.width % 8) + 2;
    let height = u16::from(input.height % 4) + 1;
    let size = usize::from(width) * usize::from(height);
    let turn_lists: Vec<_> = input.turns.into_iter().take(6).collect();

    let mut state = match GameState::new(width, height) {
        Some(state) => state,
        None => return,
    };
    let engine = Engine::default();

    for (turn_index, cells) in turn_lists.into_iter().enumerate() {
        let first = turn_index == 0;
        let mut snapshot = TurnSnapshot::empty(width, height);
        snapshot.my_matter = u32::from(input.my_matter).min(500);
        snapshot.opp_matter = u32::from(input.opp_matter).min(500);
        for (slot, fuzz) in snapshot.cells.iter_mut().zip(cells.into_iter().take(size)) {
            *slot = build_cell(fuzz, first);
        }
        if first {
            // The spawn pass needs exactly one zero-unit owned cell per side
            snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 0);
            snapshot.cells[size - 1] = CellSnapshot::owned(Owner::Foe, 5, 0);
        }

        if state.update(&snapshot).is_err() {
            return;
        }

        let before = state.my_matter();
        let plan = engine.analyze(&mut state, &mut NullTrace);

        let violations = check_invariants(&state);
        assert!(
            violations.is_empty(),
            "Invariants violated on turn {}: {:?}",
            turn_index + 1,
            violations
        );

        let builds = plan.builds.len() as u32;
        let spawned: u32 = plan.spawns.iter().map(|spawn| spawn.amount).sum();
        let spent = (builds + spawned) * engine.config().build_cost;
        let remaining = before
            .checked_sub(spent)
            .expect("plan spent more matter than the bank held");
        assert_eq!(remaining, state.my_matter(), "matter ledger drift");

        // The status message closes every command line, idle turns included.
        let commands = protocol::render_commands(&plan, state.turn());
        assert!(commands.contains("MESSAGE Units:"));
    }
});

/// Shape one fuzzed cell into something the wire could carry.
///
/// Grass never carries units, and on the first turn every owned cell gets a
/// unit so the stamped spawn cells stay unique.
fn build_cell(fuzz: FuzzCell, first: bool) -> CellSnapshot {
    let scrap = u32::from(fuzz.scrap % 32);
    if scrap == 0 {
        return CellSnapshot::grass();
    }
    let owner = match fuzz.owner.rem_euclid(3) {
        1 => Owner::Mine,
        2 => Owner::Foe,
        _ => Owner::Neutral,
    };
    let mut units = u32::from(fuzz.units % 8);
    if owner == Owner::Neutral {
        units = 0;
    } else if first {
        units = units.max(1);
    }
    let mut cell = CellSnapshot::owned(owner, scrap, units);
    cell.recycler = fuzz.recycler && owner != Owner::Neutral && units == 0;
    cell.can_build = fuzz.can_build && owner == Owner::Mine && units == 0 && !cell.recycler;
    cell.can_spawn = fuzz.can_spawn && owner == Owner::Mine && !cell.recycler;
    cell.in_range_of_recycler = fuzz.in_range;
    cell
}
