//! Tunable constants of the decision engine.
//!
//! Every threshold and weight the engine consults lives here, with the
//! hand-tuned values as defaults. They are configuration, not law; the
//! defaults are the ones that played well, with no deeper derivation.

/// All knobs of the decision engine in one place.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Matter price of one recycler or one spawned unit.
    pub build_cost: u32,
    /// How many passes over the spawn categories run per turn. Each pass
    /// commits at most one spawn per category.
    pub spawn_rounds: u32,
    /// Maximum cells in a scored walk, origin included.
    pub path_depth: usize,
    /// Per-step weight by walk position; the last entry covers every deeper
    /// step.
    pub step_decay: [f64; 6],
    /// Base value of stepping onto a neutral cell.
    pub base_score_neutral: f64,
    /// Base value of stepping onto a foe cell. Lower than neutral: grabbing
    /// land beats seeking combat.
    pub base_score_foe: f64,
    /// Adjacent enemy stack a cell in friendly territory tolerates before a
    /// blocker goes up.
    pub blocker_threat_friendly: u32,
    /// Adjacent enemy stack tolerated on contested or enemy-side ground.
    pub blocker_threat_contested: u32,
    /// Tiles a cheap miner spot may consume.
    pub miner_tight_tiles: u32,
    /// Minimum harvest for a cheap miner spot.
    pub miner_tight_scrap: u32,
    /// Tiles an expensive miner spot may consume.
    pub miner_loose_tiles: u32,
    /// Minimum harvest for an expensive miner spot.
    pub miner_loose_scrap: u32,
    /// Traffic taken by a committed step onto an attacked cell.
    pub traffic_cut_attacked: f64,
    /// Traffic taken by a committed step onto a foe cell.
    pub traffic_cut_foe: f64,
    /// Traffic taken by any other committed step.
    pub traffic_cut_default: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            build_cost: 10,
            spawn_rounds: 2,
            path_depth: 7,
            step_decay: [1.0, 0.9, 0.8, 0.7, 0.6, 0.35],
            base_score_neutral: 1.0,
            base_score_foe: 0.6,
            blocker_threat_friendly: 3,
            blocker_threat_contested: 1,
            miner_tight_tiles: 1,
            miner_tight_scrap: 20,
            miner_loose_tiles: 2,
            miner_loose_scrap: 25,
            traffic_cut_attacked: 0.2,
            traffic_cut_foe: 0.3,
            traffic_cut_default: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = EngineConfig::default();
        assert!(config.build_cost > 0);
        assert!(config.spawn_rounds > 0);
        assert!(config.path_depth >= 2);
        assert!(config.base_score_neutral > config.base_score_foe);
        assert!(config.blocker_threat_friendly > config.blocker_threat_contested);
        assert!(config.miner_loose_scrap > config.miner_tight_scrap);
    }

    #[test]
    fn test_step_decay_is_front_loaded() {
        let config = EngineConfig::default();
        for pair in config.step_decay.windows(2) {
            assert!(pair[0] >= pair[1], "decay must never grow with depth");
        }
        assert!(config.step_decay[0] >= 1.0 - f64::EPSILON);
    }
}
