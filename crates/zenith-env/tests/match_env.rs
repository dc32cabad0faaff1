//! End-to-end tests of `MatchEnv` against the test-utils engines.

use indexmap::IndexMap;
use proptest::prelude::*;
use zenith_core::{AgentId, GameState, Team};
use zenith_env::{
    EnvConfig, EnvError, EpisodeError, EpisodePhase, LookupTable, MatchConfig, MatchEnv,
    TransitionEngine,
};
use zenith_mechanics::MechanicKind;
use zenith_test_utils::engine::kickoff;
use zenith_test_utils::{GameStateBuilder, IdleEngine, ScriptedEngine};

fn config(team_size: usize) -> EnvConfig {
    EnvConfig {
        rules: MatchConfig {
            team_size,
            ..MatchConfig::default()
        },
        ..EnvConfig::default()
    }
}

fn same_action<E: TransitionEngine>(env: &MatchEnv<E>, index: usize) -> IndexMap<AgentId, usize> {
    env.agents().iter().map(|&a| (a, index)).collect()
}

fn goal_index() -> usize {
    MechanicKind::ALL
        .iter()
        .position(|&k| k == MechanicKind::Goal)
        .unwrap()
}

#[test]
fn idle_match_truncates_after_no_touch_timeout() {
    let mut env = MatchEnv::new(EnvConfig::default(), IdleEngine::new()).unwrap();
    let obs = env.reset().unwrap();
    assert_eq!(obs.len(), 4);
    assert!(obs.values().all(|o| o.len() == env.obs_len()));
    assert_eq!(env.obs_len(), 9 + 4 * 19);
    assert_eq!(env.action_count(), 90);

    // 20 s at 120 Hz, 4 ticks per step.
    let mut steps = 0;
    loop {
        let t = env.step(&same_action(&env, 0)).unwrap();
        steps += 1;
        assert!(t.rewards.totals().values().all(|r| r.is_finite()));
        if t.is_done() {
            assert!(t.truncated.values().all(|&d| d));
            assert!(t.terminated.values().all(|&d| !d));
            break;
        }
        assert!(steps < 1000, "never truncated");
    }
    assert_eq!(steps, 600);
    assert_eq!(env.engine().steps, 2400);
    assert_eq!(env.phase(), EpisodePhase::Truncated);
    assert_eq!(env.tally().steps(), 600);

    let err = env.step(&same_action(&env, 0)).unwrap_err();
    assert!(matches!(
        err,
        EnvError::Episode(EpisodeError::EpisodeFinished {
            phase: EpisodePhase::Truncated
        })
    ));

    env.reset().unwrap();
    assert_eq!(env.phase(), EpisodePhase::Ready);
    assert_eq!(env.engine().resets, 2);
}

#[test]
fn goal_terminates_and_pays_the_scorer() {
    let initial = kickoff(1, 1);
    let quiet = GameStateBuilder::from_state(&initial);
    let frames: Vec<GameState> = (1..=4u64)
        .map(|tick| {
            let b = quiet.clone().tick(tick);
            let b = if tick == 4 { b.goal(Team::Blue) } else { b };
            b.build()
        })
        .collect();
    let mut env = MatchEnv::new(config(1), ScriptedEngine::new(initial, frames)).unwrap();
    env.reset().unwrap();

    let t = env.step(&same_action(&env, 0)).unwrap();
    assert!(t.terminated.values().all(|&d| d));
    assert_eq!(env.phase(), EpisodePhase::Terminated);

    let goal = t.rewards.raw(goal_index()).unwrap();
    assert_eq!(goal[&AgentId(0)], 10.0);
    assert_eq!(goal[&AgentId(1)], -10.0);
}

#[test]
fn goal_mid_repeat_ends_the_step_early() {
    let initial = kickoff(1, 1);
    let quiet = GameStateBuilder::from_state(&initial);
    let frames: Vec<GameState> = (1..=4u64)
        .map(|tick| {
            let b = quiet.clone().tick(tick);
            let b = if tick == 2 { b.goal(Team::Orange) } else { b };
            b.build()
        })
        .collect();
    let mut env = MatchEnv::new(config(1), ScriptedEngine::new(initial, frames)).unwrap();
    env.reset().unwrap();

    let t = env.step(&same_action(&env, 0)).unwrap();
    assert!(t.terminated.values().all(|&d| d));
    assert_eq!(env.phase(), EpisodePhase::Terminated);
    assert_eq!(env.engine().cursor(), 2);
    assert_eq!(env.engine().received.len(), 2);
    assert_eq!(env.state().unwrap().tick_count, 2);

    let goal = t.rewards.raw(goal_index()).unwrap();
    assert_eq!(goal[&AgentId(0)], -10.0);
    assert_eq!(goal[&AgentId(1)], 10.0);
}

#[test]
fn chosen_controls_are_held_for_action_repeat_ticks() {
    let initial = kickoff(1, 1);
    let mut env = MatchEnv::new(config(1), ScriptedEngine::new(initial, Vec::new())).unwrap();
    env.reset().unwrap();

    let actions: IndexMap<AgentId, usize> = [(AgentId(1), 70), (AgentId(0), 12)].into();
    env.step(&actions).unwrap();

    let table = LookupTable::standard();
    let received = &env.engine().received;
    assert_eq!(received.len(), 4);
    for controls in received {
        // Keyed in agent order, not request order.
        let keys: Vec<_> = controls.keys().copied().collect();
        assert_eq!(keys, vec![AgentId(0), AgentId(1)]);
        assert_eq!(controls[&AgentId(0)], *table.get(12).unwrap());
        assert_eq!(controls[&AgentId(1)], *table.get(70).unwrap());
    }
}

#[test]
fn bad_actions_never_reach_the_engine() {
    let engine = ScriptedEngine::new(kickoff(1, 1), Vec::new());
    let mut env = MatchEnv::new(config(1), engine).unwrap();

    let err = env.step(&IndexMap::new()).unwrap_err();
    assert!(matches!(err, EnvError::Episode(EpisodeError::NotReset)));

    env.reset().unwrap();
    let missing: IndexMap<AgentId, usize> = [(AgentId(0), 1)].into();
    assert!(matches!(
        env.step(&missing),
        Err(EnvError::MissingAction { agent: AgentId(1) })
    ));

    let stranger: IndexMap<AgentId, usize> =
        [(AgentId(0), 1), (AgentId(1), 1), (AgentId(7), 1)].into();
    assert!(matches!(
        env.step(&stranger),
        Err(EnvError::UnknownAgent { agent: AgentId(7) })
    ));

    let out_of_range = same_action(&env, 90);
    assert!(matches!(env.step(&out_of_range), Err(EnvError::Action(_))));

    assert!(env.engine().received.is_empty());
    assert_eq!(env.phase(), EpisodePhase::Ready);
}

#[test]
fn solo_match_from_toml() {
    let config = EnvConfig::from_toml_str(
        "[match]\nteam_size = 1\nspawn_opponents = false\naction_repeat = 8\n",
    )
    .unwrap();
    let mut env = MatchEnv::new(config, IdleEngine::new()).unwrap();
    let obs = env.reset().unwrap();
    assert_eq!(env.agents(), &[AgentId(0)]);
    assert_eq!(obs[&AgentId(0)].len(), 9 + 2 * 19);

    env.step(&same_action(&env, 5)).unwrap();
    assert_eq!(env.engine().steps, 8);
    assert_eq!(env.state().unwrap().tick_count, 8);
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let err = MatchEnv::new(config(0), IdleEngine::new()).unwrap_err();
    assert!(matches!(err, EnvError::Config(_)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn random_actions_keep_rewards_finite(
        actions in proptest::collection::vec(
            (0usize..90, 0usize..90, 0usize..90, 0usize..90),
            1..40,
        ),
    ) {
        let mut env = MatchEnv::new(EnvConfig::default(), IdleEngine::new()).unwrap();
        env.reset().unwrap();
        for (a, b, c, d) in actions {
            let chosen: IndexMap<AgentId, usize> = env
                .agents()
                .iter()
                .copied()
                .zip([a, b, c, d])
                .collect();
            let t = env.step(&chosen).unwrap();
            prop_assert!(t.rewards.totals().values().all(|r| r.is_finite()));
            prop_assert_eq!(t.observations.len(), 4);
        }
    }
}
