//! Spawn allocation: defenders, explorers, attackers.
//!
//! Same single-candidate greedy shape as the build side. Each call commits
//! at most one unit; the engine sweeps the three categories a configured
//! number of rounds per turn.

use crate::engine::{
    CellNote, CellRef, EngineConfig, SpawnAction, SpawnKind, TraceEvent, TraceSink, TurnPlan,
};
use crate::game::{Board, Cell, CellId, GameState};

/// Spawn one defender on the inner border cell whose threat outruns the
/// defense already committed there this turn.
///
/// Returns `true` on commit.
pub(crate) fn spawn_defender(
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
            cell.can_spawn && cell.attacked > cell.defense_committed()
        })
        .collect();
    if candidates.is_empty() {
        return false;
    }

    candidates.sort_by(|&a, &b| {
        let (ca, cb) = (&board.cells()[a], &board.cells()[b]);
        ca.defense_committed()
            .cmp(&cb.defense_committed())
            .then_with(|| cb.distance_to_my_spawn.cmp(&ca.distance_to_my_spawn))
            .then_with(|| cb.distance_to_center.cmp(&ca.distance_to_center))
    });

    if trace.enabled() {
        record_candidates(board, trace, SpawnKind::Defender, &candidates, |cell| {
            format!("threat={} committed={}", cell.attacked, cell.defense_committed())
        });
    }

    commit_spawn(config, state, trace, plan, candidates[0], SpawnKind::Defender)
}

/// Spawn one explorer next to unclaimed ground.
///
/// Suppressed entirely while any warzone cell exists: frontline pressure
/// outranks land-grabbing. Returns `true` on commit.
pub(crate) fn spawn_explorer(
    config: &EngineConfig,
    state: &mut GameState,
    trace: &mut dyn TraceSink,
    plan: &mut TurnPlan,
) -> bool {
    let board = state.board();
    if !board.warzone().is_empty() {
        return false;
    }
    let mut candidates: Vec<CellId> = board
        .inner_border()
        .iter()
        .copied()
        .filter(|&id| {
            let cell = &board.cells()[id];
            cell.can_spawn && cell.adjacent_uncaptured > 0
        })
        .collect();
    if candidates.is_empty() {
        return false;
    }

    candidates.sort_by(|&a, &b| {
        let (ca, cb) = (&board.cells()[a], &board.cells()[b]);
        cb.distance_coef
            .total_cmp(&ca.distance_coef)
            .then_with(|| cb.distance_to_my_spawn.cmp(&ca.distance_to_my_spawn))
    });

    if trace.enabled() {
        record_candidates(board, trace, SpawnKind::Explorer, &candidates, |cell| {
            format!("coef={:.3} spawn={}", cell.distance_coef, cell.distance_to_my_spawn)
        });
    }

    commit_spawn(config, state, trace, plan, candidates[0], SpawnKind::Explorer)
}

/// Spawn one attacker on the border, warzone cells first.
///
/// Returns `true` on commit.
pub(crate) fn spawn_attacker(
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
        .filter(|&id| board.cells()[id].can_spawn)
        .collect();
    if candidates.is_empty() {
        return false;
    }

    candidates.sort_by(|&a, &b| {
        let (ca, cb) = (&board.cells()[a], &board.cells()[b]);
        cb.warzone
            .cmp(&ca.warzone)
            .then_with(|| ca.units.cmp(&cb.units))
            .then_with(|| ca.attacked.cmp(&cb.attacked))
            .then_with(|| ca.distance_to_opp_spawn.cmp(&cb.distance_to_opp_spawn))
    });

    if trace.enabled() {
        record_candidates(board, trace, SpawnKind::Attacker, &candidates, |cell| {
            format!(
                "warzone={} units={} threat={}",
                cell.warzone, cell.units, cell.attacked
            )
        });
    }

    commit_spawn(config, state, trace, plan, candidates[0], SpawnKind::Attacker)
}

/// Record the top candidates for one category.
fn record_candidates(
    board: &Board,
    trace: &mut dyn TraceSink,
    kind: SpawnKind,
    candidates: &[CellId],
    describe: impl Fn(&Cell) -> String,
) {
    let notes = candidates
        .iter()
        .take(3)
        .map(|&id| {
            let cell = &board.cells()[id];
            CellNote::new(cell, describe(cell))
        })
        .collect();
    trace.record(TraceEvent::SpawnCandidates { kind, candidates: notes });
}

/// Spend the cost, bump the cell's committed-defense counter, and mark it
/// used for the rest of the turn.
fn commit_spawn(
    config: &EngineConfig,
    state: &mut GameState,
    trace: &mut dyn TraceSink,
    plan: &mut TurnPlan,
    id: CellId,
    kind: SpawnKind,
) -> bool {
    let Some(target) = state.board().cell(id) else {
        return false;
    };
    let cell = CellRef::new(id, target);
    if !state.try_spend(config.build_cost) {
        return false;
    }
    if let Some(target) = state.board_mut().cell_mut(id) {
        target.can_spawn = false;
        target.spawned_here += 1;
    }
    trace.record(TraceEvent::SpawnCommitted {
        kind,
        x: cell.x,
        y: cell.y,
        amount: 1,
    });
    plan.spawns.push(SpawnAction { kind, cell, amount: 1 });
    true
}
