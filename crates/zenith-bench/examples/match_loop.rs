//! End-to-end match loop example.
//!
//! Demonstrates: build config → MatchEnv → pick actions → step → read
//! rewards → reset → repeat, then prints which mechanics fired.

use indexmap::IndexMap;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use zenith_bench::SyntheticEngine;
use zenith_core::AgentId;
use zenith_env::{EnvConfig, MatchEnv};

fn main() {
    println!("=== Zenith Match Loop Example ===\n");

    let config = EnvConfig::default();
    let mut env = MatchEnv::new(config, SyntheticEngine::new(42)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for episode in 1..=3 {
        let obs = env.reset().unwrap();
        println!(
            "Episode {episode}: {} agents, observation length {}",
            obs.len(),
            env.obs_len()
        );

        let mut returns: IndexMap<AgentId, f32> =
            env.agents().iter().map(|&a| (a, 0.0)).collect();
        let mut steps = 0;
        loop {
            let actions: IndexMap<AgentId, usize> = env
                .agents()
                .iter()
                .map(|&a| (a, rng.random_range(0..env.action_count())))
                .collect();
            let t = env.step(&actions).unwrap();
            for (agent, r) in t.rewards.totals() {
                returns[agent] += r;
            }
            steps += 1;
            if t.is_done() || steps == 2000 {
                let why = if t.terminated.values().any(|&d| d) {
                    "goal"
                } else if t.is_done() {
                    "timeout"
                } else {
                    "step cap"
                };
                println!("  ended after {steps} steps ({why})");
                break;
            }
        }
        for (agent, r) in &returns {
            println!("  agent {agent}: return {r:.1}");
        }

        let mut fired: Vec<_> = env
            .tally()
            .iter()
            .filter(|(_, t)| t.fires > 0)
            .map(|(name, t)| (name.to_string(), t.fires, t.weighted_sum))
            .collect();
        fired.sort_by(|a, b| b.2.abs().total_cmp(&a.2.abs()));
        println!("  mechanics fired:");
        for (name, fires, weighted) in fired.iter().take(8) {
            println!("    {name:<24} {fires:>6} fires  {weighted:>10.1}");
        }
        println!();
    }
}
