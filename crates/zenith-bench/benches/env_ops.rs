//! Criterion benchmarks for the full environment step and its encoders.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indexmap::IndexMap;
use zenith_bench::{synthetic_episode, SyntheticEngine};
use zenith_core::{AgentId, ArenaConstants};
use zenith_env::{EnvConfig, LookupTable, MatchEnv, ObsEncoder, RepeatAction};

fn bench_env_step_2v2(c: &mut Criterion) {
    let mut env = MatchEnv::new(EnvConfig::default(), SyntheticEngine::new(42)).unwrap();
    env.reset().unwrap();

    let mut i = 0usize;
    c.bench_function("env_step_2v2", |b| {
        b.iter(|| {
            let actions: IndexMap<AgentId, usize> = env
                .agents()
                .iter()
                .map(|&a| (a, (i + a.0 as usize * 7) % 90))
                .collect();
            i += 1;
            let t = env.step(&actions).unwrap();
            if t.is_done() {
                env.reset().unwrap();
            }
            black_box(&t);
        });
    });
}

fn bench_obs_encode_2v2(c: &mut Criterion) {
    let episode = synthetic_episode(42, 2, 200, 4);
    let agents = episode.agents();
    let encoder = ObsEncoder::new(ArenaConstants::standard(), 2);

    let mut i = 0;
    c.bench_function("obs_encode_2v2", |b| {
        b.iter(|| {
            let state = &episode.states[i % episode.states.len()];
            i += 1;
            let obs = encoder.encode(&agents, state).unwrap();
            black_box(&obs);
        });
    });
}

fn bench_action_decode_2v2(c: &mut Criterion) {
    let parser = RepeatAction::new(LookupTable::standard(), 4).unwrap();
    let actions: IndexMap<AgentId, usize> =
        (0..4u32).map(|a| (AgentId(a), 17 * a as usize)).collect();

    c.bench_function("action_decode_2v2", |b| {
        b.iter(|| {
            let frames = parser.decode(black_box(&actions)).unwrap();
            black_box(&frames);
        });
    });
}

criterion_group!(
    benches,
    bench_env_step_2v2,
    bench_obs_encode_2v2,
    bench_action_decode_2v2
);
criterion_main!(benches);
