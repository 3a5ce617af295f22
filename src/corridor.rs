//! Impossible Corridor minigame
//!
//! Glues the deterministic simulation to the frame clock and the audio
//! boundary, and exposes the read-only views the renderer needs.

use glam::Vec2;

use crate::audio::{AudioBoundary, AudioSink};
use crate::config::CorridorConfig;
use crate::consts::{HUM_VOLUME_DB, OVERLAY_SLACK};
use crate::error::ConfigError;
use crate::scene::{FrameInput, Minigame, MinigameStatus, SceneCommand};
use crate::seed::Seed;
use crate::settings::Settings;
use crate::sim::{
    CorridorEvent, CorridorState, FrameClock, RunPhase, TickInput, TickReport, Waypoint, tick,
};

pub const CORRIDOR_ID: &str = "impossible-corridor";

pub struct Corridor<S: AudioSink> {
    state: CorridorState,
    audio: AudioBoundary<S>,
    clock: FrameClock,
    settings: Settings,
    autopilot: bool,
    exit_requested: bool,
    last_report: TickReport,
}

impl<S: AudioSink> Corridor<S> {
    pub fn new(
        config: CorridorConfig,
        seed: Seed,
        settings: Settings,
        sink: S,
    ) -> Result<Self, ConfigError> {
        let quiet_db = config.danger_quiet_db;
        let state = CorridorState::new(config, seed)?;
        let audio = AudioBoundary::new(sink, &settings, quiet_db, HUM_VOLUME_DB);
        Ok(Self {
            state,
            audio,
            clock: FrameClock::new(),
            settings,
            autopilot: false,
            exit_requested: false,
            last_report: TickReport::default(),
        })
    }

    pub fn state(&self) -> &CorridorState {
        &self.state
    }

    pub fn audio(&self) -> &AudioBoundary<S> {
        &self.audio
    }

    pub fn last_report(&self) -> &TickReport {
        &self.last_report
    }

    pub fn last_events(&self) -> &[CorridorEvent] {
        &self.last_report.events
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    pub fn toggle_debug_overlay(&mut self) -> bool {
        self.state.debug_overlay = !self.state.debug_overlay;
        self.state.debug_overlay
    }

    /// Ask the scene manager to leave this minigame on the next frame
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Waypoints currently on screen, for the debug overlay
    pub fn visible_waypoints(&self) -> &[Waypoint] {
        self.state.path().visible_window(
            self.state.scroll.distance(),
            self.state.config.playfield_height,
            OVERLAY_SLACK,
        )
    }

    /// Screen-space y of a waypoint at the current scroll
    pub fn screen_y(&self, waypoint: &Waypoint) -> f32 {
        waypoint.vertical_offset + self.state.scroll.distance() as f32
    }

    /// Start over after game over. Returns false while a run is still going.
    pub fn restart(&mut self, seed: Seed) -> bool {
        if self.state.run.phase != RunPhase::GameOver {
            return false;
        }
        self.state.restart(seed);
        self.clock.reset();
        self.audio.start_voices();
        self.last_report = TickReport::default();
        true
    }

    /// Run one tick with an explicit normalized delta
    pub fn step(&mut self, pointer: Option<Vec2>, delta_normalized: f32) -> &TickReport {
        let input = TickInput {
            pointer,
            autopilot: self.autopilot,
        };
        let report = tick(&mut self.state, &input, delta_normalized);
        if let Some(feedback) = report.feedback {
            self.audio.apply(feedback);
        }
        self.audio.handle_events(&report.events);
        self.last_report = report;
        &self.last_report
    }
}

impl<S: AudioSink> Minigame for Corridor<S> {
    fn id(&self) -> &'static str {
        CORRIDOR_ID
    }

    fn initialize(&mut self) {
        self.exit_requested = false;
        self.state.debug_overlay = self.settings.debug_overlay;
        self.clock.reset();
        if !self.state.run.is_over() {
            self.audio.start_voices();
        }
        log::info!(
            "Corridor ready: seed {}, {} waypoints",
            self.state.seed,
            self.state.path().len()
        );
    }

    fn tick(&mut self, input: &FrameInput) -> SceneCommand {
        if self.exit_requested {
            return SceneCommand::Exit;
        }
        let delta = self.clock.delta(input.now_ms);
        self.step(input.pointer, delta);
        SceneCommand::Continue
    }

    fn teardown(&mut self) {
        self.audio.stop_voices();
        log::info!("Corridor torn down at score {}", self.state.run.score);
    }

    fn status(&self) -> MinigameStatus {
        MinigameStatus {
            score: self.state.run.score,
            lives: Some(self.state.run.lives),
            over: self.state.run.is_over(),
        }
    }

    fn event_lines(&self) -> Vec<String> {
        self.last_events()
            .iter()
            .filter_map(|event| match event.to_json_line() {
                Ok(line) => Some(line),
                Err(e) => {
                    log::warn!("Dropping unserializable event {:?}: {}", event, e);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullSink;
    use crate::consts::NOMINAL_FRAME_MS;

    fn corridor(config: CorridorConfig) -> Corridor<NullSink> {
        Corridor::new(config, Seed::from("week_2024_5"), Settings::default(), NullSink)
            .expect("valid config")
    }

    fn frame(n: u32, x: f32) -> FrameInput {
        FrameInput {
            now_ms: f64::from(n) * NOMINAL_FRAME_MS,
            pointer: Some(Vec2::new(x, 0.0)),
        }
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = CorridorConfig {
            generation_length: 0,
            ..Default::default()
        };
        assert!(Corridor::new(config, Seed::from("x"), Settings::default(), NullSink).is_err());
    }

    #[test]
    fn test_initialize_starts_voices_and_teardown_releases() {
        let mut game = corridor(CorridorConfig::default());
        assert!(!game.audio().is_live());
        game.initialize();
        assert!(game.audio().is_live());
        game.teardown();
        assert!(!game.audio().is_live());
    }

    #[test]
    fn test_frames_drive_the_scroll() {
        let mut game = corridor(CorridorConfig {
            max_wiggle: 0,
            ..Default::default()
        });
        game.initialize();
        for n in 0..=60 {
            assert_eq!(game.tick(&frame(n, 960.0)), SceneCommand::Continue);
        }
        // First frame only primes the clock
        let distance = game.state().scroll.cumulative_distance();
        assert!((distance - 120.0).abs() < 1e-3, "distance {distance}");
        assert_eq!(game.status().score, distance.floor() as u64);
        assert_eq!(game.status().lives, Some(3));
    }

    #[test]
    fn test_request_exit() {
        let mut game = corridor(CorridorConfig::default());
        game.initialize();
        game.request_exit();
        assert_eq!(game.tick(&frame(1, 960.0)), SceneCommand::Exit);
        assert_eq!(game.state().scroll.distance(), 0.0);
    }

    #[test]
    fn test_game_over_silences_and_restart_revives() {
        let config = CorridorConfig {
            starting_lives: 1,
            follow_rate: 1.0,
            ..Default::default()
        };
        let mut game = corridor(config);
        game.initialize();
        let path = game.state().path().clone();

        assert!(!game.restart(Seed::from("week_2024_5")), "cannot restart mid-run");

        game.step(Some(Vec2::new(0.0, 0.0)), 1.0);
        assert!(game.status().over);
        assert!(!game.audio().is_live());
        assert!(matches!(
            game.last_events().last(),
            Some(CorridorEvent::GameOver { .. })
        ));
        let lines = game.event_lines();
        assert!(lines[0].contains(r#""kind":"Death""#));
        assert!(lines.iter().any(|l| l.contains(r#""kind":"GameOver""#)));

        assert!(game.restart(Seed::from("week_2024_5")));
        assert!(game.audio().is_live());
        assert_eq!(game.status().lives, Some(1));
        assert_eq!(game.status().score, 0);
        assert_eq!(game.state().path(), &path);
    }

    #[test]
    fn test_debug_overlay_window() {
        let mut game = corridor(CorridorConfig::default());
        game.initialize();
        assert!(!game.state().debug_overlay);
        assert!(game.toggle_debug_overlay());

        game.set_autopilot(true);
        for _ in 0..100 {
            game.step(None, 1.0);
        }
        assert_eq!(game.status().lives, Some(3));
        let window = game.visible_waypoints();
        assert!(!window.is_empty());
        for w in window {
            let y = game.screen_y(w);
            assert!(y > -OVERLAY_SLACK && y < 1080.0 + OVERLAY_SLACK);
        }
    }
}
