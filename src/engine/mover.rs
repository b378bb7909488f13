//! Robot movement: hold rules, walk commits, border fallbacks.
//!
//! Stacks decompose into one robot per unit. Coordination between robots is
//! indirect: each committed walk eats traffic capacity on its cells, which
//! reshapes the search for every robot processed after it.

use crate::engine::{
    paths, Assignment, CellRef, EngineConfig, RobotAction, TraceEvent, TraceSink, TurnPlan,
};
use crate::game::{Cell, CellId, GameState};

/// Decompose unit stacks into robots and give each one an assignment.
///
/// Origins run rearmost first, farthest from the opponent's spawn, so the
/// back line claims corridor capacity before the front line searches.
pub(crate) fn assign_robots(
    config: &EngineConfig,
    state: &mut GameState,
    trace: &mut dyn TraceSink,
    plan: &mut TurnPlan,
) {
    let board = state.board();
    let mut origins: Vec<CellId> = board
        .iter()
        .filter(|(_, cell)| cell.is_mine() && cell.units > 0)
        .map(|(id, _)| id)
        .collect();
    origins.sort_by(|&a, &b| {
        let (ca, cb) = (&board.cells()[a], &board.cells()[b]);
        cb.distance_to_opp_spawn.cmp(&ca.distance_to_opp_spawn)
    });

    let mut robots: Vec<CellRef> = Vec::new();
    for &id in &origins {
        let cell = &board.cells()[id];
        for _ in 0..cell.units {
            robots.push(CellRef::new(id, cell));
        }
    }

    for origin in robots {
        let action = assign_one(config, state, trace, origin);
        plan.robots.push(action);
    }
}

/// Decide one robot: hold, walk, fall back, or give up.
fn assign_one(
    config: &EngineConfig,
    state: &mut GameState,
    trace: &mut dyn TraceSink,
    origin: CellRef,
) -> RobotAction {
    // A threatened cell keeps one unit back unless defense is already
    // committed there.
    let must_hold = state
        .board()
        .cell(origin.id)
        .is_some_and(|cell| cell.attacked > 0 && cell.defense_committed() == 0);
    if must_hold {
        if let Some(cell) = state.board_mut().cell_mut(origin.id) {
            cell.moved_here += 1;
        }
        trace.record(TraceEvent::RobotHeld {
            x: origin.x,
            y: origin.y,
        });
        return RobotAction {
            origin,
            assignment: Assignment::Hold,
        };
    }

    let walk = paths::best_walk(config, state.board(), origin.id);
    if walk.score > 0.0 && walk.path.len() >= 2 {
        return commit_walk(config, state, trace, origin, walk);
    }

    fallback(state, trace, origin)
}

/// Take the walk: cut traffic along it and step onto its first cell.
fn commit_walk(
    config: &EngineConfig,
    state: &mut GameState,
    trace: &mut dyn TraceSink,
    origin: CellRef,
    walk: paths::ScoredWalk,
) -> RobotAction {
    let target_id = walk.path[1];
    let Some(target_cell) = state.board().cell(target_id) else {
        return RobotAction {
            origin,
            assignment: Assignment::Unassigned,
        };
    };
    let target = CellRef::new(target_id, target_cell);

    // Cuts depend on the cells as the walk saw them; fix them first.
    let cuts: Vec<(CellId, f64)> = walk.path[1..]
        .iter()
        .filter_map(|&id| state.board().cell(id).map(|cell| (id, traffic_cut(config, cell))))
        .collect();
    let board = state.board_mut();
    for (id, cut) in cuts {
        if let Some(cell) = board.cell_mut(id) {
            cell.traffic_coef = (cell.traffic_coef - cut).max(0.0);
        }
    }
    if let Some(cell) = board.cell_mut(target_id) {
        cell.moved_here += 1;
    }

    trace.record(TraceEvent::RobotPathed {
        x: origin.x,
        y: origin.y,
        target_x: target.x,
        target_y: target.y,
        score: walk.score,
    });
    RobotAction {
        origin,
        assignment: Assignment::Pathed {
            target,
            path: walk.path,
            score: walk.score,
        },
    }
}

/// March for the outer border when no walk is worth taking.
fn fallback(state: &mut GameState, trace: &mut dyn TraceSink, origin: CellRef) -> RobotAction {
    let board = state.board();
    let mut targets: Vec<CellId> = board.outer_border().to_vec();
    if targets.is_empty() {
        trace.record(TraceEvent::RobotStranded {
            x: origin.x,
            y: origin.y,
        });
        return RobotAction {
            origin,
            assignment: Assignment::Unassigned,
        };
    }

    targets.sort_by(|&a, &b| {
        let (ca, cb) = (&board.cells()[a], &board.cells()[b]);
        cb.is_foe()
            .cmp(&ca.is_foe())
            .then_with(|| origin_distance(ca, origin).cmp(&origin_distance(cb, origin)))
            .then_with(|| ca.distance_to_center.cmp(&cb.distance_to_center))
    });
    let best = targets[0];
    let target = CellRef::new(best, &board.cells()[best]);

    if let Some(cell) = state.board_mut().cell_mut(best) {
        cell.moved_here += 1;
    }
    trace.record(TraceEvent::RobotFallback {
        x: origin.x,
        y: origin.y,
        target_x: target.x,
        target_y: target.y,
    });
    RobotAction {
        origin,
        assignment: Assignment::Fallback { target },
    }
}

/// Traffic a committed step takes from a cell.
const fn traffic_cut(config: &EngineConfig, cell: &Cell) -> f64 {
    if cell.attacked > 0 {
        config.traffic_cut_attacked
    } else if cell.is_foe() {
        config.traffic_cut_foe
    } else {
        config.traffic_cut_default
    }
}

/// Manhattan distance from a robot's origin.
fn origin_distance(cell: &Cell, origin: CellRef) -> u32 {
    u32::from(cell.x.abs_diff(origin.x)) + u32::from(cell.y.abs_diff(origin.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NullTrace;
    use crate::game::{CellSnapshot, Owner, TurnSnapshot};

    fn assign_all(state: &mut GameState) -> TurnPlan {
        let mut plan = TurnPlan::default();
        assign_robots(&EngineConfig::default(), state, &mut NullTrace, &mut plan);
        plan
    }

    #[test]
    fn test_threatened_stack_holds_one_unit() {
        // Two units on a threatened cell: the first holds, the second is
        // free to walk.
        let mut snapshot = TurnSnapshot::empty(4, 1);
        snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 0);
        snapshot.cells[1] = CellSnapshot::owned(Owner::Mine, 5, 2);
        snapshot.cells[2] = CellSnapshot::owned(Owner::Foe, 5, 1);
        snapshot.cells[3] = CellSnapshot::owned(Owner::Foe, 5, 0);
        let mut state = GameState::new(4, 1).unwrap();
        state.update(&snapshot).unwrap();

        let plan = assign_all(&mut state);
        assert_eq!(plan.robots.len(), 2);
        assert!(matches!(plan.robots[0].assignment, Assignment::Hold));
        assert!(matches!(
            plan.robots[1].assignment,
            Assignment::Pathed { target, .. } if (target.x, target.y) == (2, 0)
        ));
        // The hold itself counts as committed defense.
        assert_eq!(state.board().cell(1).unwrap().moved_here, 1);
        assert_eq!(state.board().cell(2).unwrap().moved_here, 1);
    }

    #[test]
    fn test_rearmost_robot_moves_first() {
        let mut snapshot = TurnSnapshot::empty(5, 1);
        snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 0);
        snapshot.cells[1] = CellSnapshot::owned(Owner::Mine, 5, 1);
        snapshot.cells[2] = CellSnapshot::owned(Owner::Mine, 5, 1);
        snapshot.cells[3] = CellSnapshot::neutral(5);
        snapshot.cells[4] = CellSnapshot::owned(Owner::Foe, 5, 0);
        let mut state = GameState::new(5, 1).unwrap();
        state.update(&snapshot).unwrap();

        let plan = assign_all(&mut state);
        assert_eq!(plan.robots.len(), 2);
        assert_eq!(plan.robots[0].origin.x, 1, "rear robot decides first");
        assert_eq!(plan.robots[1].origin.x, 2);
    }

    #[test]
    fn test_corridor_stack_shares_one_lane() {
        let mut snapshot = TurnSnapshot::empty(4, 1);
        snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 0);
        snapshot.cells[1] = CellSnapshot::owned(Owner::Mine, 5, 2);
        snapshot.cells[2] = CellSnapshot::neutral(5);
        snapshot.cells[3] = CellSnapshot::owned(Owner::Foe, 5, 0);
        let mut state = GameState::new(4, 1).unwrap();
        state.update(&snapshot).unwrap();

        let plan = assign_all(&mut state);
        assert_eq!(plan.robots.len(), 2);
        for robot in &plan.robots {
            assert!(matches!(
                robot.assignment,
                Assignment::Pathed { target, .. } if (target.x, target.y) == (2, 0)
            ));
        }

        // Both walks crossed the same two cells: the neutral lane is fully
        // consumed, the foe spawn twice cut by the foe rate.
        let lane = state.board().cell(2).unwrap();
        assert!((lane.traffic_coef - 0.0).abs() < 1e-9);
        assert_eq!(lane.moved_here, 2);
        let foe_spawn = state.board().cell(3).unwrap();
        assert!((foe_spawn.traffic_coef - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_enclosed_robot_falls_back_to_outer_border() {
        // The robot's pocket is walled off; the only outer border cell sits
        // across the wall next to our other territory.
        let mut snapshot = TurnSnapshot::empty(5, 1);
        snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 1);
        snapshot.cells[1] = CellSnapshot::grass();
        snapshot.cells[2] = CellSnapshot::owned(Owner::Mine, 5, 0);
        snapshot.cells[3] = CellSnapshot::neutral(5);
        snapshot.cells[4] = CellSnapshot::owned(Owner::Foe, 5, 0);
        let mut state = GameState::new(5, 1).unwrap();
        state.update(&snapshot).unwrap();

        let plan = assign_all(&mut state);
        assert_eq!(plan.robots.len(), 1);
        assert!(matches!(
            plan.robots[0].assignment,
            Assignment::Fallback { target } if (target.x, target.y) == (3, 0)
        ));
        assert_eq!(state.board().cell(3).unwrap().moved_here, 1);
    }

    #[test]
    fn test_fallback_prefers_foe_outer_cells() {
        // Both a neutral and a foe outer border cell exist; the foe one
        // wins even though it is farther from the robot.
        let mut snapshot = TurnSnapshot::empty(6, 1);
        snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 1);
        snapshot.cells[1] = CellSnapshot::grass();
        snapshot.cells[2] = CellSnapshot::neutral(5);
        snapshot.cells[3] = CellSnapshot::owned(Owner::Mine, 5, 0);
        snapshot.cells[4] = CellSnapshot::owned(Owner::Foe, 5, 1);
        snapshot.cells[5] = CellSnapshot::owned(Owner::Foe, 5, 0);
        let mut state = GameState::new(6, 1).unwrap();
        state.update(&snapshot).unwrap();

        let plan = assign_all(&mut state);
        assert!(matches!(
            plan.robots[0].assignment,
            Assignment::Fallback { target } if (target.x, target.y) == (4, 0)
        ));
    }

    #[test]
    fn test_robot_with_nowhere_to_go_is_unassigned() {
        let mut snapshot = TurnSnapshot::empty(5, 1);
        snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 1);
        snapshot.cells[1] = CellSnapshot::grass();
        snapshot.cells[2] = CellSnapshot::owned(Owner::Mine, 5, 0);
        snapshot.cells[3] = CellSnapshot::grass();
        snapshot.cells[4] = CellSnapshot::owned(Owner::Foe, 5, 0);
        let mut state = GameState::new(5, 1).unwrap();
        state.update(&snapshot).unwrap();

        assert!(state.board().outer_border().is_empty());
        let plan = assign_all(&mut state);
        assert_eq!(plan.robots.len(), 1);
        assert!(matches!(plan.robots[0].assignment, Assignment::Unassigned));
    }
}
