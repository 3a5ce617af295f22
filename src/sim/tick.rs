//! Per-frame simulation tick
//!
//! One tick always runs to completion in a fixed order:
//! advance -> lookup -> collision -> feedback -> run transition.

use glam::Vec2;

use super::collision::{self, CollisionResult};
use super::feedback::{self, DangerFeedback};
use super::scroll::PathSample;
use super::state::{CorridorEvent, CorridorState, RunTransition};
use crate::consts::{MAX_FRAME_MS, NOMINAL_FRAME_MS};
use crate::lerp;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer sample; only x steers the player
    pub pointer: Option<Vec2>,
    /// Demo mode: steer toward the corridor center ahead of the player
    pub autopilot: bool,
}

/// Everything one tick produced
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub sample: Option<PathSample>,
    pub collision: Option<CollisionResult>,
    /// Present on every running tick, lethal or not
    pub feedback: Option<DangerFeedback>,
    pub transition: Option<RunTransition>,
    pub events: Vec<CorridorEvent>,
}

impl TickReport {
    /// The tick was ignored because the run is over
    pub fn is_idle(&self) -> bool {
        self.sample.is_none()
    }
}

/// Advance the corridor by one frame.
///
/// `delta_normalized` is the frame's elapsed time divided by the nominal frame
/// period, so a 60 Hz host passes 1.0 and a 30 Hz host passes 2.0. Ticking a
/// finished run does nothing.
pub fn tick(state: &mut CorridorState, input: &TickInput, delta_normalized: f32) -> TickReport {
    if state.run.is_over() {
        return TickReport::default();
    }
    let config = &state.config;
    let mut report = TickReport::default();

    if input.autopilot {
        let x = autopilot_target(state);
        state.player.target_lateral_position = x;
    } else if let Some(pointer) = input.pointer {
        state
            .player
            .set_target(pointer.x, 0.0, config.playfield_width);
    }

    state.scroll.advance(config.speed, delta_normalized);
    state.run.update_score(state.scroll.cumulative_distance());
    state.player.follow(config.follow_rate, delta_normalized);

    let sample = state.scroll.lookup(&state.path);
    if sample.wrapped {
        report.events.push(CorridorEvent::Wrapped {
            lap: state.scroll.laps(),
        });
    }

    let hit = collision::evaluate(
        state.player.lateral_position,
        sample.center_x,
        config.path_width,
    );
    report.feedback = Some(feedback::map_offset(
        hit.offset,
        config.path_width,
        config.danger_quiet_db,
        config.danger_loud_db,
    ));

    if hit.is_lethal() {
        report.events.push(CorridorEvent::Death { offset: hit.offset });
        let transition = state.run.on_lethal();
        match transition {
            RunTransition::Respawned { lives_remaining } => {
                let respawn_x = state
                    .path
                    .get(sample.index)
                    .map_or(sample.center_x, |w| w.lateral_position);
                state.player.place(respawn_x);
                log::debug!(
                    "Life lost at offset {:.1}, {} left, respawn at x={:.1}",
                    hit.offset,
                    lives_remaining,
                    respawn_x
                );
                report.events.push(CorridorEvent::LifeLost {
                    lives_remaining,
                    respawn_x,
                });
            }
            RunTransition::GameOver => {
                log::info!("Game over, score {}", state.run.score);
                report.events.push(CorridorEvent::GameOver {
                    score: state.run.score,
                });
            }
            RunTransition::Ignored => {}
        }
        report.transition = Some(transition);
    }

    report.sample = Some(sample);
    report.collision = Some(hit);
    report
}

/// Corridor center one waypoint ahead of the player, which roughly cancels
/// the follow lag
fn autopilot_target(state: &CorridorState) -> f32 {
    let path = state.path();
    let step = path.step();
    let loop_len = path.len().saturating_sub(1).max(1);
    let index = state.scroll.path_index(step) + 1;
    let fraction = state.scroll.fraction(step);
    let a = path.get(index % loop_len);
    let b = path.get((index + 1) % loop_len);
    match (a, b) {
        (Some(a), Some(b)) => lerp(a.lateral_position, b.lateral_position, fraction),
        _ => state.player.lateral_position,
    }
}

/// Turns host frame timestamps into normalized tick deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized delta since the previous frame. The first frame yields 0,
    /// stalls are capped and a clock running backwards yields 0.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let delta = match self.last_ms {
            Some(last) if now_ms > last => (now_ms - last).min(MAX_FRAME_MS),
            _ => 0.0,
        };
        if self.last_ms.is_none_or(|last| now_ms > last) {
            self.last_ms = Some(now_ms);
        }
        (delta / NOMINAL_FRAME_MS) as f32
    }

    /// Forget the previous frame (after a pause or scene switch)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::config::CorridorConfig;
    use crate::seed::Seed;
    use crate::sim::state::RunPhase;

    fn straight(len: usize) -> CorridorState {
        let config = CorridorConfig {
            generation_length: len,
            max_wiggle: 0,
            ..Default::default()
        };
        CorridorState::new(config, Seed::from("week_2024_5")).expect("valid config")
    }

    fn pointer(x: f32) -> TickInput {
        TickInput {
            pointer: Some(Vec2::new(x, 500.0)),
            autopilot: false,
        }
    }

    #[test]
    fn test_straight_corridor_never_kills_centered_player() {
        let mut state = straight(5);
        let center = state.config.center_x();
        let input = pointer(center);

        // 50 ticks at speed 2 = 100 distance units, wrapping once at 80
        let mut wrapped = 0;
        for _ in 0..50 {
            let report = tick(&mut state, &input, 1.0);
            assert!(report.transition.is_none());
            wrapped += report
                .events
                .iter()
                .filter(|e| matches!(e, CorridorEvent::Wrapped { .. }))
                .count();
        }

        assert_eq!(wrapped, 1);
        assert_eq!(state.run.lives, 3);
        assert_eq!(state.run.phase, RunPhase::Running);
        assert!((state.scroll.cumulative_distance() - 100.0).abs() < 1e-9);
        assert_eq!(state.run.score, state.scroll.cumulative_distance().floor() as u64);
    }

    #[test]
    fn test_single_tick_excursion_with_last_life_ends_run() {
        let config = CorridorConfig {
            max_wiggle: 0,
            starting_lives: 1,
            follow_rate: 1.0,
            ..Default::default()
        };
        let mut state = CorridorState::new(config, Seed::from("week_2024_5")).expect("valid");
        let center = state.config.center_x();

        let report = tick(&mut state, &pointer(center + 61.0), 1.0);
        assert_eq!(report.collision.map(|c| c.offset), Some(61.0));
        assert_eq!(report.transition, Some(RunTransition::GameOver));
        assert_eq!(state.run.phase, RunPhase::GameOver);
        assert_eq!(state.run.lives, 0);
        assert!(matches!(
            report.events.as_slice(),
            [CorridorEvent::Death { .. }, CorridorEvent::GameOver { .. }]
        ));

        let distance = state.scroll.distance();
        let report = tick(&mut state, &pointer(center), 1.0);
        assert!(report.is_idle());
        assert_eq!(state.run.phase, RunPhase::GameOver);
        assert_eq!(state.scroll.distance(), distance);
    }

    #[test]
    fn test_edge_of_corridor_is_safe() {
        let config = CorridorConfig {
            max_wiggle: 0,
            follow_rate: 1.0,
            ..Default::default()
        };
        let mut state = CorridorState::new(config, Seed::from("edge")).expect("valid");
        let center = state.config.center_x();
        let report = tick(&mut state, &pointer(center - 60.0), 1.0);
        assert!(report.transition.is_none());
        let fb = report.feedback.expect("running ticks carry feedback");
        assert_eq!(fb.volume_db, -10.0);
        assert_eq!(fb.distortion, 1.0);
    }

    #[test]
    fn test_respawn_on_centerline_and_one_life_per_hit() {
        let config = CorridorConfig {
            follow_rate: 1.0,
            ..Default::default()
        };
        let mut state = CorridorState::new(config, Seed::from("respawn")).expect("valid");

        let report = tick(&mut state, &pointer(0.0), 1.0);
        let sample = report.sample.expect("running tick samples the path");
        let expected_x = state.path().waypoints()[sample.index].lateral_position;
        assert_eq!(
            report.transition,
            Some(RunTransition::Respawned { lives_remaining: 2 })
        );
        assert_eq!(state.run.lives, 2);
        assert_eq!(state.player.lateral_position, expected_x);
        assert_eq!(state.player.target_lateral_position, expected_x);
        assert!(report.events.iter().any(|e| matches!(
            e,
            CorridorEvent::LifeLost { lives_remaining: 2, .. }
        )));
    }

    #[test]
    fn test_feedback_every_running_tick() {
        let mut state = straight(100);
        let center = state.config.center_x();
        let report = tick(&mut state, &pointer(center), 1.0);
        let fb = report.feedback.expect("feedback while running");
        assert_eq!(fb.volume_db, -100.0);
        assert_eq!(fb.distortion, 0.0);
    }

    #[test]
    fn test_pointer_outside_playfield_is_clamped() {
        let mut state = straight(100);
        tick(&mut state, &pointer(-1_000.0), 1.0);
        assert_eq!(state.player.target_lateral_position, 0.0);
    }

    #[test]
    fn test_autopilot_survives_winding_corridor() {
        let mut state = CorridorState::new(CorridorConfig::default(), Seed::from("week_2024_5"))
            .expect("valid");
        let input = TickInput {
            pointer: None,
            autopilot: true,
        };
        // Well short of the 9990-frame loop
        for _ in 0..5_000 {
            let report = tick(&mut state, &input, 1.0);
            assert!(report.transition.is_none(), "autopilot left the corridor");
        }
        assert_eq!(state.run.lives, 3);
        assert_eq!(state.run.score, 10_000);
    }

    #[test]
    fn test_determinism() {
        let seed = Seed::from("week_2025_12");
        let mut a = CorridorState::new(CorridorConfig::default(), seed.clone()).expect("valid");
        let mut b = CorridorState::new(CorridorConfig::default(), seed).expect("valid");
        let inputs = [pointer(900.0), pointer(1000.0), pointer(400.0), pointer(960.0)];

        for _ in 0..100 {
            for input in &inputs {
                tick(&mut a, input, 1.0);
                tick(&mut b, input, 1.0);
            }
        }
        assert_eq!(a.run, b.run);
        assert_eq!(a.scroll, b.scroll);
        assert_eq!(a.player, b.player);
    }

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1_000.0), 0.0);
        assert!((clock.delta(1_000.0 + NOMINAL_FRAME_MS) - 1.0).abs() < 1e-5);
        // Stall of two seconds is capped at 100 ms
        let capped = clock.delta(3_000.0);
        assert!((capped - (MAX_FRAME_MS / NOMINAL_FRAME_MS) as f32).abs() < 1e-4);
        // Clock going backwards
        assert_eq!(clock.delta(2_000.0), 0.0);
        assert!((clock.delta(3_000.0 + NOMINAL_FRAME_MS) - 1.0).abs() < 1e-5);

        clock.reset();
        assert_eq!(clock.delta(9_000.0), 0.0);
    }

    proptest! {
        #[test]
        fn lives_only_fall_and_game_over_absorbs(
            xs in prop::collection::vec(0.0_f32..1920.0, 1..400),
            dts in prop::collection::vec(0.0_f32..6.0, 1..400),
        ) {
            let mut state = CorridorState::new(CorridorConfig::default(), Seed::from("prop"))
                .expect("valid");
            let mut lives = state.run.lives;
            let mut frozen: Option<(u64, u32, f64)> = None;

            for (x, dt) in xs.iter().zip(dts.iter().cycle()) {
                let report = tick(&mut state, &pointer(*x), *dt);
                if let Some((score, lives_at_end, distance)) = frozen {
                    prop_assert!(report.is_idle());
                    prop_assert_eq!(state.run.score, score);
                    prop_assert_eq!(state.run.lives, lives_at_end);
                    prop_assert_eq!(state.scroll.distance(), distance);
                    continue;
                }

                let deaths = report
                    .events
                    .iter()
                    .filter(|e| matches!(e, CorridorEvent::Death { .. }))
                    .count() as u32;
                prop_assert!(state.run.lives <= lives);
                prop_assert_eq!(lives - state.run.lives, deaths);
                lives = state.run.lives;

                if state.run.is_over() {
                    prop_assert_eq!(state.run.lives, 0);
                    frozen = Some((state.run.score, state.run.lives, state.scroll.distance()));
                }
            }
        }
    }
}
