//! Property tests over the detector bank.

use std::fmt::Debug;

use proptest::prelude::*;
use zenith_core::{AgentId, ArenaConstants, GameState};
use zenith_mechanics::*;
use zenith_reward::{Detector, RewardCombiner};
use zenith_test_utils::{flags, CarBuilder, DetectorHarness, GameStateBuilder};

const A: AgentId = AgentId(0);
const B: AgentId = AgentId(1);

fn coord() -> impl Strategy<Value = f32> {
    -6000.0f32..6000.0
}

fn speed() -> impl Strategy<Value = f32> {
    -3000.0f32..3000.0
}

fn vec3(xy: f32, z_max: f32) -> impl Strategy<Value = (f32, f32, f32)> {
    (-xy..xy, -xy..xy, -z_max..z_max)
}

prop_compose! {
    fn arb_car(orange: bool)(
        (x, y, z) in (coord(), coord(), 0.0f32..2044.0),
        (vx, vy, vz) in vec3(3000.0, 3000.0),
        (pitch, yaw, roll) in (-1.5f32..1.5, -3.1f32..3.1, -3.1f32..3.1),
        (wx, wy, wz) in vec3(6.0, 6.0),
        (on_ground, has_flip, boosting, handbrake) in any::<(bool, bool, bool, bool)>(),
        touches in 0u32..3,
    ) -> CarBuilder {
        let base = if orange { CarBuilder::orange() } else { CarBuilder::blue() };
        base.position(x, y, z)
            .velocity(vx, vy, vz)
            .euler(pitch, yaw, roll)
            .angular_velocity(wx, wy, wz)
            .on_ground(on_ground)
            .has_flip(has_flip)
            .boosting(boosting)
            .handbrake(handbrake)
            .touches(touches)
    }
}

prop_compose! {
    fn arb_state()(
        (bx, by, bz) in (coord(), coord(), 0.0f32..2044.0),
        (bvx, bvy, bvz) in vec3(3000.0, 3000.0),
        blue in arb_car(false),
        orange in arb_car(true),
    ) -> GameState {
        GameStateBuilder::new()
            .ball_position(bx, by, bz)
            .ball_velocity(bvx, bvy, bvz)
            .car(A, blue)
            .car(B, orange)
            .build()
    }
}

/// Raise touch counts so they never drop within the stream.
fn monotone_touches(initial: &GameState, states: &mut [GameState]) {
    for agent in initial.agent_ids() {
        let mut floor = initial.cars[&agent].ball_touches;
        for state in states.iter_mut() {
            if let Some(car) = state.cars.get_mut(&agent) {
                car.ball_touches = car.ball_touches.max(floor);
                floor = car.ball_touches;
            }
        }
    }
}

fn standard_bank() -> RewardCombiner {
    WeightTable::standard()
        .build_combiner(ArenaConstants::standard())
        .unwrap()
}

fn standalone_bank(initial: &GameState) -> Vec<DetectorHarness<Box<dyn Detector>>> {
    MechanicKind::ALL
        .iter()
        .map(|k| DetectorHarness::new(k.build(ArenaConstants::standard()), initial))
        .collect()
}

proptest! {
    #[test]
    fn bank_output_is_always_finite(
        initial in arb_state(),
        mut states in proptest::collection::vec(arb_state(), 1..8),
    ) {
        let mut combiner = standard_bank();
        let agents = initial.agent_ids();
        let done = flags(&agents, false);
        combiner.reset(&agents, &initial).unwrap();

        monotone_touches(&initial, &mut states);
        for state in &states {
            let out = combiner.step(&agents, state, &done, &done).unwrap();
            prop_assert!(out.totals().values().all(|r| r.is_finite()));
        }
    }

    #[test]
    fn every_detector_scores_the_same_inside_the_bank(
        initial in arb_state(),
        mut states in proptest::collection::vec(arb_state(), 1..16),
    ) {
        let mut combiner = standard_bank();
        let agents = initial.agent_ids();
        let done = flags(&agents, false);
        combiner.reset(&agents, &initial).unwrap();
        let mut alone = standalone_bank(&initial);

        monotone_touches(&initial, &mut states);
        for state in &states {
            let out = combiner.step(&agents, state, &done, &done).unwrap();
            for (index, (kind, harness)) in MechanicKind::ALL.iter().zip(&mut alone).enumerate() {
                let standalone = harness.step(state);
                prop_assert_eq!(out.raw(index), Some(&standalone), "{}", kind);
            }
        }
    }

    #[test]
    fn car_on_ball_centre_short_circuits(
        x in coord(), y in coord(), z in 0.0f32..2044.0,
        vx in speed(), vy in speed(), vz in speed(),
        jitter in -5e-7f32..5e-7,
    ) {
        let state = GameStateBuilder::new()
            .ball_position(x + jitter, y, z)
            .car(A, CarBuilder::blue().position(x, y, z).velocity(vx, vy, vz))
            .build();
        let arena = ArenaConstants::standard();
        let mut approach = DetectorHarness::new(VelocityPlayerToBall::new(arena), &state);
        let mut face = DetectorHarness::new(FaceBall::new(), &state);
        prop_assert_eq!(approach.reward(&state, A), 0.0);
        prop_assert_eq!(face.reward(&state, A), 0.0);
    }

    #[test]
    fn car_on_ball_centre_keeps_every_detector_finite(
        initial in arb_state(),
        mut states in proptest::collection::vec(arb_state(), 1..8),
    ) {
        for state in states.iter_mut() {
            let ball = state.ball.position;
            if let Some(car) = state.cars.get_mut(&A) {
                car.physics.position = ball;
            }
        }
        monotone_touches(&initial, &mut states);

        let mut alone = standalone_bank(&initial);
        for state in &states {
            for (kind, harness) in MechanicKind::ALL.iter().zip(&mut alone) {
                let reward = harness.reward(state, A);
                prop_assert!(reward.is_finite(), "{} returned {}", kind, reward);
            }
        }
    }
}

// ── Reset idempotence ──────────────────────────────────────────────

fn busy_episode() -> (GameState, Vec<GameState>) {
    let initial = GameStateBuilder::new()
        .car(A, CarBuilder::blue())
        .car(B, CarBuilder::orange().position(0.0, 3000.0, 17.0))
        .build();
    let states = (1..=40u32)
        .map(|i| {
            let t = i as f32;
            GameStateBuilder::new()
                .ball_position(0.0, 50.0 * t, 93.0 + 40.0 * t)
                .ball_velocity(0.0, 100.0 * t, 300.0 - 20.0 * t)
                .car(
                    A,
                    CarBuilder::blue()
                        .position(0.0, 50.0 * t - 60.0, 40.0 * t)
                        .velocity(1900.0, 0.0, 1200.0)
                        .euler(-0.05 * t, 0.1 * t, 0.0)
                        .angular_velocity(0.0, 4.0 - 0.2 * t, 6.0)
                        .on_ground(i % 7 == 0)
                        .has_flip(i % 3 == 0)
                        .boosting(i % 2 == 0)
                        .touches(i / 4),
                )
                .car(
                    B,
                    CarBuilder::orange()
                        .position(0.0, 3000.0, 17.0)
                        .upside_down()
                        .touches(i / 9),
                )
                .build()
        })
        .collect();
    (initial, states)
}

fn assert_reset_idempotent<D>(detector: D)
where
    D: Detector + Clone + PartialEq + Debug,
{
    let (initial, states) = busy_episode();
    let fresh = DetectorHarness::new(detector.clone(), &initial).into_inner();

    let mut used = DetectorHarness::new(detector, &initial);
    for state in &states {
        used.step(state);
    }
    used.reset(&initial);
    assert_eq!(used.detector(), &fresh);
}

#[test]
fn every_detector_resets_to_a_fresh_state() {
    let arena = ArenaConstants::standard();
    assert_reset_idempotent(VelocityPlayerToBall::new(arena));
    assert_reset_idempotent(FaceBall::new());
    assert_reset_idempotent(VelocityBallToGoal::new(arena));
    assert_reset_idempotent(Powershot::new());
    assert_reset_idempotent(Backboard::new(arena));
    assert_reset_idempotent(AdvancedDribbling::new());
    assert_reset_idempotent(BounceDribble::new());
    assert_reset_idempotent(AirDribble::new());
    assert_reset_idempotent(FastAerial::new());
    assert_reset_idempotent(FlipReset::new());
    assert_reset_idempotent(MustyAerial::new());
    assert_reset_idempotent(HeliReset::new());
    assert_reset_idempotent(CeilingShot::new());
    assert_reset_idempotent(DoubleTap::new());
    assert_reset_idempotent(Wavedash::new());
    assert_reset_idempotent(ChainDash::new());
    assert_reset_idempotent(HalfFlip::new());
    assert_reset_idempotent(Redirect::new(arena));
    assert_reset_idempotent(Pinch::new());
    assert_reset_idempotent(ShadowDefense::new(arena));
    assert_reset_idempotent(FlipCancel::new());
    assert_reset_idempotent(Turtle::new());
    assert_reset_idempotent(Stall::new());
    assert_reset_idempotent(CeilingShuffle::new());
    assert_reset_idempotent(Goal::new());
}

#[test]
fn busy_episode_exercises_the_bank() {
    let (initial, states) = busy_episode();
    let mut combiner = WeightTable::standard()
        .build_combiner(ArenaConstants::standard())
        .unwrap();
    let agents = initial.agent_ids();
    let done = flags(&agents, false);
    combiner.reset(&agents, &initial).unwrap();
    for state in &states {
        combiner.step(&agents, state, &done, &done).unwrap();
    }

    let tally = combiner.tally();
    assert_eq!(tally.steps(), states.len() as u64);
    let fired = MechanicKind::ALL
        .iter()
        .filter(|k| tally.get(k.name()).is_some_and(|t| t.fires > 0))
        .count();
    assert!(fired >= 5, "only {fired} detectors fired");
}
