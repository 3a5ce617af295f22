//! Game state and core simulation types
//!
//! Everything a corridor run mutates lives here, owned by one `CorridorState`.
//! The path is generated once and only ever read afterwards.

use serde::{Deserialize, Serialize};

use super::path::Path;
use super::rng::DeterministicRng;
use super::scroll::ScrollState;
use crate::config::CorridorConfig;
use crate::error::ConfigError;
use crate::seed::Seed;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Running,
    /// Run ended; ticks are ignored until an explicit restart
    GameOver,
}

/// What a lethal hit did to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunTransition {
    /// A life was spent and the player respawned on the centerline this tick
    Respawned { lives_remaining: u32 },
    GameOver,
    /// Hit arrived after the run had already ended
    Ignored,
}

/// Lateral player position, eased toward the latest input sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub lateral_position: f32,
    pub target_lateral_position: f32,
}

impl PlayerState {
    pub fn new(x: f32) -> Self {
        Self {
            lateral_position: x,
            target_lateral_position: x,
        }
    }

    /// Aim at a pointer x, clamped into the playfield
    pub fn set_target(&mut self, x: f32, min: f32, max: f32) {
        if x.is_finite() {
            self.target_lateral_position = x.clamp(min, max);
        }
    }

    /// Close `rate` of the remaining gap per nominal frame
    pub fn follow(&mut self, rate: f32, delta_normalized: f32) {
        let alpha = 1.0 - (1.0 - rate).powf(delta_normalized.max(0.0));
        self.lateral_position += (self.target_lateral_position - self.lateral_position) * alpha;
    }

    /// Snap position and target together (respawn)
    pub fn place(&mut self, x: f32) {
        self.lateral_position = x;
        self.target_lateral_position = x;
    }
}

/// Lives, score and phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub lives: u32,
    pub starting_lives: u32,
    pub score: u64,
    pub phase: RunPhase,
}

impl RunState {
    pub fn new(starting_lives: u32) -> Self {
        Self {
            lives: starting_lives,
            starting_lives,
            score: 0,
            phase: RunPhase::Running,
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == RunPhase::GameOver
    }

    /// Score is whole distance units travelled; it never goes down
    pub fn update_score(&mut self, cumulative_distance: f64) {
        if self.is_over() {
            return;
        }
        let score = cumulative_distance.max(0.0).floor() as u64;
        self.score = self.score.max(score);
    }

    /// Spend one life for a lethal hit
    pub fn on_lethal(&mut self) -> RunTransition {
        if self.is_over() || self.lives == 0 {
            return RunTransition::Ignored;
        }
        self.lives -= 1;
        if self.lives == 0 {
            self.phase = RunPhase::GameOver;
            RunTransition::GameOver
        } else {
            RunTransition::Respawned {
                lives_remaining: self.lives,
            }
        }
    }
}

/// Discrete run events, consumed by the audio cues and the host UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CorridorEvent {
    /// The player left the corridor this tick
    Death { offset: f32 },
    LifeLost { lives_remaining: u32, respawn_x: f32 },
    GameOver { score: u64 },
    /// The scroll ran off the end of the path and restarted
    Wrapped { lap: u32 },
}

impl CorridorEvent {
    /// One JSON object per line for the host UI
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Complete corridor state for one level instance
#[derive(Debug, Clone)]
pub struct CorridorState {
    pub config: CorridorConfig,
    pub seed: Seed,
    pub(super) path: Path,
    pub scroll: ScrollState,
    pub player: PlayerState,
    pub run: RunState,
    /// Render the corridor walls on top of the scene
    pub debug_overlay: bool,
}

impl CorridorState {
    /// Validate the tuning and generate the path for `seed`
    pub fn new(config: CorridorConfig, seed: Seed) -> Result<Self, ConfigError> {
        config.validate()?;
        let path = Self::generate_path(&config, &seed);
        Ok(Self {
            player: PlayerState::new(config.center_x()),
            run: RunState::new(config.starting_lives),
            scroll: ScrollState::new(),
            config,
            seed,
            path,
            debug_overlay: false,
        })
    }

    fn generate_path(config: &CorridorConfig, seed: &Seed) -> Path {
        log::info!("Generating corridor for seed {}", seed);
        let mut rng = DeterministicRng::new(seed);
        Path::generate(&mut rng, config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a fresh run. The path is kept unless the seed changed, which only
    /// happens when a restart straddles a week boundary.
    pub fn restart(&mut self, seed: Seed) {
        if seed != self.seed {
            self.path = Self::generate_path(&self.config, &seed);
            self.seed = seed;
        }
        self.scroll = ScrollState::new();
        self.player = PlayerState::new(self.config.center_x());
        self.run = RunState::new(self.config.starting_lives);
        log::info!("Run restarted with seed {}", self.seed);
    }
}
