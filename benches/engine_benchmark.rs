//! Benchmarks for the per-turn decision pipeline.
//!
//! This times the path the arena deadline bounds: snapshot parsing, state
//! ingestion, and full plan construction on a tournament-sized board.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use scrapper::engine::{Engine, NullTrace};
use scrapper::game::GameState;
use scrapper::protocol;
use scrapper::scenario::generate_scenario;

const WIDTH: u16 = 24;
const HEIGHT: u16 = 12;

/// A ready-to-analyze state on the benchmark board.
fn prepared_state() -> GameState {
    let snapshot = generate_scenario(42, WIDTH, HEIGHT).expect("benchmark scenario");
    let mut state = GameState::new(WIDTH, HEIGHT).expect("benchmark board");
    state.update(&snapshot).expect("benchmark ingestion");
    state
}

fn bench_scenario_generation(c: &mut Criterion) {
    c.bench_function("generate_scenario_24x12", |b| {
        b.iter(|| {
            let snapshot = generate_scenario(black_box(42), WIDTH, HEIGHT);
            black_box(snapshot)
        });
    });
}

fn bench_snapshot_parse(c: &mut Criterion) {
    let snapshot = generate_scenario(42, WIDTH, HEIGHT).expect("benchmark scenario");
    let text = protocol::render_snapshot(&snapshot);

    c.bench_function("parse_snapshot_24x12", |b| {
        b.iter(|| {
            let parsed = protocol::parse_snapshot(black_box(&text), WIDTH, HEIGHT);
            black_box(parsed)
        });
    });
}

fn bench_state_update(c: &mut Criterion) {
    let snapshot = generate_scenario(42, WIDTH, HEIGHT).expect("benchmark scenario");
    let mut state = prepared_state();

    c.bench_function("state_update_24x12", |b| {
        b.iter(|| {
            state
                .update(black_box(&snapshot))
                .expect("benchmark ingestion");
        });
    });
}

fn bench_analyze(c: &mut Criterion) {
    let state = prepared_state();
    let engine = Engine::default();

    c.bench_function("analyze_24x12", |b| {
        b.iter_batched(
            || state.clone(),
            |mut state| {
                let plan = engine.analyze(&mut state, &mut NullTrace);
                black_box(plan)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_full_turn(c: &mut Criterion) {
    let snapshot = generate_scenario(42, WIDTH, HEIGHT).expect("benchmark scenario");
    let engine = Engine::default();
    let mut state = prepared_state();

    c.bench_function("full_turn_24x12", |b| {
        b.iter(|| {
            state
                .update(black_box(&snapshot))
                .expect("benchmark ingestion");
            let plan = engine.analyze(&mut state, &mut NullTrace);
            black_box(plan)
        });
    });
}

criterion_group!(
    benches,
    bench_scenario_generation,
    bench_snapshot_parse,
    bench_state_update,
    bench_analyze,
    bench_full_turn
);
criterion_main!(benches);
