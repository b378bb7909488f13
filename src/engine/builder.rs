//! Build allocation: blockers against enemy pushes, miners for matter.
//!
//! Both categories are single-candidate greedy: filter, sort by fixed keys,
//! commit the best cell or nothing. Budget shortfall is a silent skip.

use crate::engine::{
    BuildAction, BuildKind, CellNote, CellRef, EngineConfig, TraceEvent, TraceSink, TurnPlan,
};
use crate::game::{AreaOwner, Cell, CellId, GameState};

/// Place one blocking recycler on the most threatened inner border cell.
///
/// A cell qualifies when the largest adjacent enemy stack exceeds the threat
/// threshold for its territory: friendly ground tolerates more before a
/// build answers it than contested ground does. Returns `true` on commit.
pub(crate) fn place_blocker(
    config: &EngineConfig,
    state: &mut GameState,
    trace: &mut dyn TraceSink,
    plan: &mut TurnPlan,
) -> bool {
    let board = state.board();
    let mut candidates: Vec<CellId> = board
        .inner_border()
        .iter()
        .copied()
        .filter(|&id| {
            let cell = &board.cells()[id];
            cell.can_build && cell.attacked_max_stack > blocker_threshold(config, cell.area_owner)
        })
        .collect();
    if candidates.is_empty() {
        return false;
    }

    candidates.sort_by(|&a, &b| {
        let (ca, cb) = (&board.cells()[a], &board.cells()[b]);
        cb.attacked_max_stack
            .cmp(&ca.attacked_max_stack)
            .then_with(|| ca.distance_to_my_spawn.cmp(&cb.distance_to_my_spawn))
            .then_with(|| ca.distance_to_center.cmp(&cb.distance_to_center))
    });

    if trace.enabled() {
        let notes = candidates
            .iter()
            .take(3)
            .map(|&id| {
                let cell = &board.cells()[id];
                CellNote::new(
                    cell,
                    format!(
                        "stack={} spawn={} center={}",
                        cell.attacked_max_stack, cell.distance_to_my_spawn, cell.distance_to_center
                    ),
                )
            })
            .collect();
        trace.record(TraceEvent::BuildCandidates {
            kind: BuildKind::Blocker,
            candidates: notes,
        });
    }

    commit_build(config, state, trace, plan, candidates[0], BuildKind::Blocker)
}

/// Place one harvesting recycler on the best cost/benefit cell.
///
/// Runs only while the front is active (a warzone exists or an inner border
/// cell still touches unclaimed ground) and never on a turn that already
/// answered a push with a blocker. Returns `true` on commit.
pub(crate) fn place_miner(
    config: &EngineConfig,
    state: &mut GameState,
    trace: &mut dyn TraceSink,
    plan: &mut TurnPlan,
    blocker_placed: bool,
) -> bool {
    if blocker_placed {
        return false;
    }
    let board = state.board();
    let front_active = !board.warzone().is_empty()
        || board
            .inner_border()
            .iter()
            .any(|&id| board.cells()[id].adjacent_uncaptured > 0);
    if !front_active {
        return false;
    }

    let mut candidates: Vec<CellId> = board
        .iter()
        .filter(|(_, cell)| cell.can_build && miner_worthwhile(config, cell))
        .map(|(id, _)| id)
        .collect();
    if candidates.is_empty() {
        return false;
    }

    candidates.sort_by(|&a, &b| {
        let (ca, cb) = (&board.cells()[a], &board.cells()[b]);
        ca.tiles_to_recycle
            .cmp(&cb.tiles_to_recycle)
            .then_with(|| cb.scrap_to_recycle.cmp(&ca.scrap_to_recycle))
            .then_with(|| ca.distance_to_opp_spawn.cmp(&cb.distance_to_opp_spawn))
    });

    if trace.enabled() {
        let notes = candidates
            .iter()
            .take(3)
            .map(|&id| {
                let cell = &board.cells()[id];
                CellNote::new(
                    cell,
                    format!(
                        "tiles={} scrap={} opp={}",
                        cell.tiles_to_recycle, cell.scrap_to_recycle, cell.distance_to_opp_spawn
                    ),
                )
            })
            .collect();
        trace.record(TraceEvent::BuildCandidates {
            kind: BuildKind::Miner,
            candidates: notes,
        });
    }

    commit_build(config, state, trace, plan, candidates[0], BuildKind::Miner)
}

/// Threat a blocker candidate must exceed, by territory.
const fn blocker_threshold(config: &EngineConfig, area: AreaOwner) -> u32 {
    match area {
        AreaOwner::Mine => config.blocker_threat_friendly,
        AreaOwner::Foe | AreaOwner::Midline => config.blocker_threat_contested,
    }
}

/// Cost/benefit rule for a miner spot: consume little, recover a lot.
const fn miner_worthwhile(config: &EngineConfig, cell: &Cell) -> bool {
    (cell.tiles_to_recycle <= config.miner_tight_tiles
        && cell.scrap_to_recycle >= config.miner_tight_scrap)
        || (cell.tiles_to_recycle <= config.miner_loose_tiles
            && cell.scrap_to_recycle >= config.miner_loose_scrap)
}

/// Spend the build cost and mark the cell used for the rest of the turn.
fn commit_build(
    config: &EngineConfig,
    state: &mut GameState,
    trace: &mut dyn TraceSink,
    plan: &mut TurnPlan,
    id: CellId,
    kind: BuildKind,
) -> bool {
    let Some(target) = state.board().cell(id) else {
        return false;
    };
    let cell = CellRef::new(id, target);
    if !state.try_spend(config.build_cost) {
        return false;
    }
    if let Some(target) = state.board_mut().cell_mut(id) {
        target.can_build = false;
        target.can_spawn = false;
    }
    trace.record(TraceEvent::BuildCommitted {
        kind,
        x: cell.x,
        y: cell.y,
    });
    plan.builds.push(BuildAction { kind, cell });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NullTrace;
    use crate::game::{CellSnapshot, Owner, TurnSnapshot};

    /// A 5x1 front with the buildable cell on the midline, where the
    /// contested threshold applies: our spawn, a held cell, the buildable
    /// border cell, a foe stack, the foe spawn.
    fn front_state(stack: u32, matter: u32) -> GameState {
        let mut snapshot = TurnSnapshot::empty(5, 1);
        snapshot.my_matter = matter;
        snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 0);
        snapshot.cells[1] = CellSnapshot::owned(Owner::Mine, 5, 1);
        snapshot.cells[2] = CellSnapshot {
            can_build: true,
            can_spawn: true,
            ..CellSnapshot::owned(Owner::Mine, 5, 1)
        };
        snapshot.cells[3] = CellSnapshot::owned(Owner::Foe, 5, stack);
        snapshot.cells[4] = CellSnapshot::owned(Owner::Foe, 5, 0);

        let mut state = GameState::new(5, 1).unwrap();
        state.update(&snapshot).unwrap();
        state
    }

    #[test]
    fn test_blocker_answers_a_heavy_push() {
        let mut state = front_state(2, 30);
        let mut plan = TurnPlan::default();

        // The buildable cell is equidistant from both spawns: contested
        // ground, threshold 1, so a stack of 2 crosses it.
        let committed =
            place_blocker(&EngineConfig::default(), &mut state, &mut NullTrace, &mut plan);
        assert!(committed);
        assert_eq!(plan.builds.len(), 1);
        assert_eq!(plan.builds[0].kind, BuildKind::Blocker);
        assert_eq!((plan.builds[0].cell.x, plan.builds[0].cell.y), (2, 0));
        assert_eq!(state.my_matter(), 20);

        // The cell is spent for the rest of the turn.
        let cell = state.board().cell(plan.builds[0].cell.id).unwrap();
        assert!(!cell.can_build && !cell.can_spawn);
    }

    #[test]
    fn test_blocker_ignores_a_light_poke() {
        let mut state = front_state(1, 30);
        let mut plan = TurnPlan::default();

        let committed =
            place_blocker(&EngineConfig::default(), &mut state, &mut NullTrace, &mut plan);
        assert!(!committed);
        assert!(plan.builds.is_empty());
        assert_eq!(state.my_matter(), 30);
    }

    #[test]
    fn test_friendly_ground_tolerates_more() {
        // The threatened cell sits right next to our spawn: friendly ground,
        // threshold 3.
        let mut snapshot = TurnSnapshot::empty(5, 1);
        snapshot.my_matter = 30;
        snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 0);
        snapshot.cells[1] = CellSnapshot {
            can_build: true,
            ..CellSnapshot::owned(Owner::Mine, 5, 1)
        };
        snapshot.cells[2] = CellSnapshot::owned(Owner::Foe, 5, 2);
        snapshot.cells[3] = CellSnapshot::owned(Owner::Foe, 5, 1);
        snapshot.cells[4] = CellSnapshot::owned(Owner::Foe, 5, 0);
        let mut state = GameState::new(5, 1).unwrap();
        state.update(&snapshot).unwrap();
        let mut plan = TurnPlan::default();

        let committed =
            place_blocker(&EngineConfig::default(), &mut state, &mut NullTrace, &mut plan);
        assert!(!committed, "a stack of 2 on friendly ground is tolerated");

        snapshot.cells[2].units = 4;
        state.update(&snapshot).unwrap();
        let committed =
            place_blocker(&EngineConfig::default(), &mut state, &mut NullTrace, &mut plan);
        assert!(committed, "a stack of 4 is not");
    }

    #[test]
    fn test_blocker_respects_budget() {
        let mut state = front_state(2, 9);
        let mut plan = TurnPlan::default();

        let committed =
            place_blocker(&EngineConfig::default(), &mut state, &mut NullTrace, &mut plan);
        assert!(!committed);
        assert!(plan.builds.is_empty());
        assert_eq!(state.my_matter(), 9);
    }

    #[test]
    fn test_miner_commits_on_tight_spot() {
        // The buildable cell is walled in by grass: one tile consumed, its
        // own scrap the whole harvest. A neutral pocket by our spawn keeps
        // the frontier gate open.
        let mut snapshot = TurnSnapshot::empty(6, 1);
        snapshot.my_matter = 30;
        snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 0);
        snapshot.cells[1] = CellSnapshot::neutral(3);
        snapshot.cells[2] = CellSnapshot::grass();
        snapshot.cells[3] = CellSnapshot {
            can_build: true,
            ..CellSnapshot::owned(Owner::Mine, 19, 1)
        };
        snapshot.cells[4] = CellSnapshot::grass();
        snapshot.cells[5] = CellSnapshot::owned(Owner::Foe, 5, 0);
        let mut state = GameState::new(6, 1).unwrap();
        state.update(&snapshot).unwrap();
        let mut plan = TurnPlan::default();

        let cell = state.board().cell(3).unwrap();
        assert_eq!(cell.tiles_to_recycle, 1);
        assert_eq!(cell.scrap_to_recycle, 19);
        let committed =
            place_miner(&EngineConfig::default(), &mut state, &mut NullTrace, &mut plan, false);
        assert!(!committed, "19 scrap misses the single-tile floor");

        snapshot.cells[3].scrap_amount = 20;
        state.update(&snapshot).unwrap();
        let committed =
            place_miner(&EngineConfig::default(), &mut state, &mut NullTrace, &mut plan, false);
        assert!(committed);
        assert_eq!(plan.builds[0].kind, BuildKind::Miner);
        assert_eq!((plan.builds[0].cell.x, plan.builds[0].cell.y), (3, 0));
        assert_eq!(state.my_matter(), 20);
    }

    #[test]
    fn test_miner_loose_rule_needs_bigger_harvest() {
        // Two tiles go: the cell itself plus a poorer neighbor.
        let mut snapshot = TurnSnapshot::empty(6, 1);
        snapshot.my_matter = 30;
        snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 0);
        snapshot.cells[1] = CellSnapshot::neutral(3);
        snapshot.cells[2] = CellSnapshot::grass();
        snapshot.cells[3] = CellSnapshot {
            can_build: true,
            ..CellSnapshot::owned(Owner::Mine, 15, 1)
        };
        snapshot.cells[4] = CellSnapshot::neutral(4);
        snapshot.cells[5] = CellSnapshot::owned(Owner::Foe, 5, 0);
        let mut state = GameState::new(6, 1).unwrap();
        state.update(&snapshot).unwrap();
        let mut plan = TurnPlan::default();

        let cell = state.board().cell(3).unwrap();
        assert_eq!(cell.tiles_to_recycle, 2);
        assert_eq!(cell.scrap_to_recycle, 19);
        let committed =
            place_miner(&EngineConfig::default(), &mut state, &mut NullTrace, &mut plan, false);
        assert!(!committed);

        // A richer pocket clears the two-tile floor of 25.
        snapshot.cells[4].scrap_amount = 10;
        state.update(&snapshot).unwrap();
        let cell = state.board().cell(3).unwrap();
        assert_eq!(cell.scrap_to_recycle, 25);
        let committed =
            place_miner(&EngineConfig::default(), &mut state, &mut NullTrace, &mut plan, false);
        assert!(committed);
        assert_eq!(state.my_matter(), 20);
    }

    #[test]
    fn test_miner_defers_to_blocker() {
        let mut snapshot = TurnSnapshot::empty(6, 1);
        snapshot.my_matter = 30;
        snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 0);
        snapshot.cells[1] = CellSnapshot::neutral(3);
        snapshot.cells[2] = CellSnapshot::grass();
        snapshot.cells[3] = CellSnapshot {
            can_build: true,
            ..CellSnapshot::owned(Owner::Mine, 20, 1)
        };
        snapshot.cells[4] = CellSnapshot::grass();
        snapshot.cells[5] = CellSnapshot::owned(Owner::Foe, 5, 0);
        let mut state = GameState::new(6, 1).unwrap();
        state.update(&snapshot).unwrap();
        let mut plan = TurnPlan::default();

        let committed =
            place_miner(&EngineConfig::default(), &mut state, &mut NullTrace, &mut plan, true);
        assert!(!committed);
        assert_eq!(state.my_matter(), 30);
    }

    #[test]
    fn test_miner_stays_quiet_without_a_front() {
        // Turn one leaves a foe spawn to satisfy the spawn pass; turn two
        // settles the whole strip as ours, closing every border.
        let mut snapshot = TurnSnapshot::empty(5, 1);
        snapshot.my_matter = 30;
        snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 0);
        snapshot.cells[1] = CellSnapshot::grass();
        snapshot.cells[2] = CellSnapshot {
            can_build: true,
            ..CellSnapshot::owned(Owner::Mine, 20, 1)
        };
        snapshot.cells[3] = CellSnapshot::grass();
        snapshot.cells[4] = CellSnapshot::owned(Owner::Foe, 5, 0);
        let mut state = GameState::new(5, 1).unwrap();
        state.update(&snapshot).unwrap();

        let mut settled = snapshot.clone();
        settled.cells[4] = CellSnapshot::owned(Owner::Mine, 5, 0);
        state.update(&settled).unwrap();
        assert!(state.board().warzone().is_empty());
        assert!(state.board().inner_border().is_empty());

        // The spot itself would clear the single-tile rule.
        let cell = state.board().cell(2).unwrap();
        assert_eq!(cell.tiles_to_recycle, 1);
        assert_eq!(cell.scrap_to_recycle, 20);

        let mut plan = TurnPlan::default();
        let committed =
            place_miner(&EngineConfig::default(), &mut state, &mut NullTrace, &mut plan, false);
        assert!(!committed);
        assert_eq!(state.my_matter(), 30);
    }
}
