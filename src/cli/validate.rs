//! Validation command implementation.
//!
//! Runs the engine over many generated scenarios in parallel and checks
//! every turn against the board bookkeeping invariants and the exact
//! matter ledger.

use super::CliError;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use scrapper::engine::{Engine, NullTrace, TurnPlan};
use scrapper::game::{check_invariants, GameState};
use scrapper::scenario::generate_match;
use std::time::Instant;

/// Keep the failure report readable on very bad runs.
const MAX_REPORTED_FAILURES: usize = 20;

/// Aggregated validation outcome across seeds.
#[derive(Debug)]
struct ValidationStats {
    seeds_run: u64,
    seeds_failed: u64,
    turns_checked: u64,
    /// First few failure messages, in seed order per worker.
    failures: Vec<String>,
}

impl ValidationStats {
    fn new() -> Self {
        Self {
            seeds_run: 0,
            seeds_failed: 0,
            turns_checked: 0,
            failures: Vec::new(),
        }
    }

    fn add_pass(&mut self, turns: u64) {
        self.seeds_run += 1;
        self.turns_checked += turns;
    }

    fn add_failure(&mut self, message: String) {
        self.seeds_run += 1;
        self.seeds_failed += 1;
        if self.failures.len() < MAX_REPORTED_FAILURES {
            self.failures.push(message);
        }
    }

    fn merge(&mut self, other: Self) {
        self.seeds_run += other.seeds_run;
        self.seeds_failed += other.seeds_failed;
        self.turns_checked += other.turns_checked;
        for failure in other.failures {
            if self.failures.len() < MAX_REPORTED_FAILURES {
                self.failures.push(failure);
            }
        }
    }
}

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if any seed fails validation.
pub(crate) fn execute(
    seeds: u64,
    start_seed: u64,
    width: u16,
    height: u16,
    turns: u32,
    threads: Option<usize>,
    progress: bool,
) -> Result<(), CliError> {
    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(seeds);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} seeds ({per_sec})",
                )
                .expect("valid template")
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each worker accumulates into its own stats, merged at the end
    let stats = (0..seeds)
        .into_par_iter()
        .fold(ValidationStats::new, |mut local, i| {
            let seed = start_seed.wrapping_add(i);
            match run_seed(width, height, turns, seed) {
                Ok(turns_checked) => local.add_pass(turns_checked),
                Err(message) => local.add_failure(message),
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(ValidationStats::new, |mut a, b| {
            a.merge(b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();

    println!();
    println!(
        "Validated {} seeds, {} engine turns in {:.2}s",
        stats.seeds_run,
        stats.turns_checked,
        duration.as_secs_f64()
    );

    if stats.seeds_failed > 0 {
        println!();
        println!("{} seeds FAILED:", stats.seeds_failed);
        for failure in &stats.failures {
            println!("  {failure}");
        }
        return Err(CliError::new(format!(
            "{} of {} seeds failed validation",
            stats.seeds_failed, stats.seeds_run
        )));
    }

    println!("All seeds passed");
    Ok(())
}

/// Run the engine over one generated match and check every turn.
///
/// Returns the number of turns checked, or a description of the first
/// violation hit.
fn run_seed(width: u16, height: u16, turns: u32, seed: u64) -> Result<u64, String> {
    let snapshots =
        generate_match(seed, width, height, turns).map_err(|e| format!("seed {seed}: {e}"))?;
    let Some(mut state) = GameState::new(width, height) else {
        return Err(format!(
            "seed {seed}: unusable board size {width}x{height}"
        ));
    };

    let engine = Engine::default();
    let mut checked = 0_u64;
    for snapshot in &snapshots {
        state
            .update(snapshot)
            .map_err(|e| format!("seed {seed}: {e}"))?;
        let before = state.my_matter();
        let plan = engine.analyze(&mut state, &mut NullTrace);

        if let Some(violation) = check_invariants(&state).first() {
            return Err(format!("seed {seed} turn {}: {violation}", state.turn()));
        }

        let spent = matter_spent(&plan, engine.config().build_cost);
        if before.saturating_sub(spent) != state.my_matter() {
            return Err(format!(
                "seed {seed} turn {}: ledger drift, {before} - {spent} != {}",
                state.turn(),
                state.my_matter()
            ));
        }
        checked += 1;
    }
    Ok(checked)
}

/// Matter a plan should have deducted: one price for every recycler and
/// every spawned unit.
fn matter_spent(plan: &TurnPlan, cost: u32) -> u32 {
    let builds = u32::try_from(plan.builds.len()).unwrap_or(u32::MAX);
    let spawned: u32 = plan.spawns.iter().map(|spawn| spawn.amount).sum();
    (builds + spawned) * cost
}
