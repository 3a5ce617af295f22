//! Error types

use thiserror::Error;

/// Rejected corridor tuning. Raised at construction, never mid-run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("generation length {0} is too short, the corridor needs at least 2 waypoints")]
    GenerationTooShort(usize),
    #[error("path width must be positive, got {0}")]
    NonPositivePathWidth(f32),
    #[error("path step must be positive, got {0}")]
    NonPositiveStep(f32),
    #[error("scroll speed must be finite and non-negative, got {0}")]
    InvalidSpeed(f32),
    #[error("max wiggle must be non-negative, got {0}")]
    NegativeWiggle(i32),
    #[error("starting lives must be at least 1")]
    NoLives,
    #[error("playfield {width}x{height} leaves no room inside a {margin} margin")]
    PlayfieldTooSmall { width: f32, height: f32, margin: f32 },
    #[error("follow rate {0} must lie in (0, 1]")]
    InvalidFollowRate(f32),
    #[error("danger volume range {quiet}..{loud} dB is inverted")]
    InvertedVolumeRange { quiet: f32, loud: f32 },
    #[error("malformed config: {0}")]
    Parse(String),
}

/// Settings that could not be read or written
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("theme index {0} is out of range")]
    UnknownTheme(usize),
}
