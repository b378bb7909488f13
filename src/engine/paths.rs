//! Bounded-depth walk enumeration and scoring.
//!
//! Not a shortest-path search: every maximal simple walk up to the depth cap
//! is enumerated by backtracking and scored as a whole. The cap keeps the
//! cost at O(branching^depth) per robot, which is what the per-turn clock
//! allows on arena-sized boards.

use crate::engine::EngineConfig;
use crate::game::{Board, Cell, CellId};

/// The best walk found from one origin. The origin is the first cell.
#[derive(Debug, Clone)]
pub(crate) struct ScoredWalk {
    /// Visited cells in order, starting at the origin.
    pub(crate) path: Vec<CellId>,
    /// Summed step scores; 0 for the bare origin.
    pub(crate) score: f64,
}

/// Enumerate every maximal simple walk of up to `config.path_depth` cells
/// from `origin` and return the best-scoring one.
///
/// A walk is maximal when it hits the depth cap or has no legal extension:
/// only orthogonal neighbors that are movable and not already on the walk
/// qualify. When nothing scores above zero the bare `[origin]` walk comes
/// back with score 0.
pub(crate) fn best_walk(config: &EngineConfig, board: &Board, origin: CellId) -> ScoredWalk {
    let mut best = ScoredWalk {
        path: vec![origin],
        score: 0.0,
    };
    let mut walk = Vec::with_capacity(config.path_depth);
    walk.push(origin);
    extend(config, board, &mut walk, 0.0, &mut best);
    best
}

/// Depth-first extension of `walk`, finalizing at every maximal prefix.
fn extend(
    config: &EngineConfig,
    board: &Board,
    walk: &mut Vec<CellId>,
    score: f64,
    best: &mut ScoredWalk,
) {
    let Some(&head) = walk.last() else { return };
    let mut extended = false;

    if walk.len() < config.path_depth {
        if let Some(cell) = board.cell(head) {
            for &next in cell.adjacent() {
                let Some(target) = board.cell(next) else {
                    continue;
                };
                if !target.can_move_here || walk.contains(&next) {
                    continue;
                }
                extended = true;
                let gained = step_score(config, target, walk.len() - 1);
                walk.push(next);
                extend(config, board, walk, score + gained, best);
                walk.pop();
            }
        }
    }

    if !extended && score.total_cmp(&best.score).is_gt() {
        best.path.clear();
        best.path.extend_from_slice(walk);
        best.score = score;
    }
}

/// Value of stepping onto `cell` as step `index` of a walk, 0 being the
/// first step after the origin.
///
/// Own cells are worth nothing; neutral cells beat foe cells. The value is
/// then shaded by the cell's positional bias, by whatever traffic capacity
/// earlier robots left on it, and by a front-loaded decay over the walk.
fn step_score(config: &EngineConfig, cell: &Cell, index: usize) -> f64 {
    let base = if cell.is_mine() {
        0.0
    } else if cell.is_foe() {
        config.base_score_foe
    } else {
        config.base_score_neutral
    };
    let decay = config.step_decay[index.min(config.step_decay.len() - 1)];
    base * cell.distance_coef * cell.traffic_coef * decay
}
