//! Minigame lifecycle and the hub
//!
//! Every minigame implements the same small lifecycle. The scene manager owns
//! the settings, starts one minigame at a time and drops back to the hub when
//! the active one asks to leave.

use glam::Vec2;

use crate::audio::AudioSink;
use crate::config::CorridorConfig;
use crate::corridor::Corridor;
use crate::error::ConfigError;
use crate::seed::Seed;
use crate::settings::{Settings, Theme};

/// One host frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Host timestamp in milliseconds
    pub now_ms: f64,
    pub pointer: Option<Vec2>,
}

/// What the active minigame wants after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    Continue,
    /// Tear down and return to the hub
    Exit,
}

/// HUD summary any minigame can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinigameStatus {
    pub score: u64,
    /// `None` for games without lives
    pub lives: Option<u32>,
    pub over: bool,
}

pub trait Minigame {
    fn id(&self) -> &'static str;
    /// Acquire resources and reset per-visit state
    fn initialize(&mut self);
    fn tick(&mut self, input: &FrameInput) -> SceneCommand;
    /// Release everything acquired in `initialize`
    fn teardown(&mut self);
    fn status(&self) -> MinigameStatus;
    /// Events from the last frame, one JSON object per line
    fn event_lines(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Hub plus at most one running minigame
pub struct SceneManager {
    settings: Settings,
    active: Option<Box<dyn Minigame>>,
}

impl SceneManager {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            active: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn theme(&self) -> &'static Theme {
        self.settings.theme()
    }

    pub fn cycle_theme(&mut self) -> &'static Theme {
        let theme = self.settings.cycle_theme();
        log::info!("Theme: {}", theme.name);
        theme
    }

    pub fn in_hub(&self) -> bool {
        self.active.is_none()
    }

    pub fn active_id(&self) -> Option<&'static str> {
        self.active.as_ref().map(|game| game.id())
    }

    pub fn status(&self) -> Option<MinigameStatus> {
        self.active.as_ref().map(|game| game.status())
    }

    pub fn event_lines(&self) -> Vec<String> {
        self.active
            .as_ref()
            .map(|game| game.event_lines())
            .unwrap_or_default()
    }

    /// Switch to `game`, tearing down whatever was running
    pub fn enter(&mut self, mut game: Box<dyn Minigame>) {
        self.exit();
        log::info!("Entering {}", game.id());
        game.initialize();
        self.active = Some(game);
    }

    /// Build a corridor with the current settings and enter it
    pub fn launch_corridor<S: AudioSink + 'static>(
        &mut self,
        config: CorridorConfig,
        seed: Seed,
        sink: S,
    ) -> Result<(), ConfigError> {
        let corridor = Corridor::new(config, seed, self.settings.clone(), sink)?;
        self.enter(Box::new(corridor));
        Ok(())
    }

    /// Tear down the active minigame and return to the hub
    pub fn exit(&mut self) {
        if let Some(mut game) = self.active.take() {
            game.teardown();
            log::info!("Back to hub from {}", game.id());
        }
    }

    /// Forward a frame to the active minigame. Returns the command it gave;
    /// the hub itself never exits.
    pub fn tick(&mut self, input: &FrameInput) -> SceneCommand {
        let Some(game) = self.active.as_mut() else {
            return SceneCommand::Continue;
        };
        let command = game.tick(input);
        if command == SceneCommand::Exit {
            self.exit();
        }
        command
    }
}

impl Drop for SceneManager {
    fn drop(&mut self) {
        self.exit();
    }
}
