//! PL4Y - Impossible Corridor
//!
//! Core modules:
//! - `seed`: Weekly seed derivation from the wall clock
//! - `sim`: Deterministic simulation (path generation, scrolling, collision, lives)
//! - `audio`: Audio boundary (voice lifecycle, parameter cache, cues)
//! - `scene`: Minigame lifecycle and the hub scene manager
//! - `settings`: Player preferences and hub themes
//! - `config`: Corridor tuning with fail-fast validation
//! - `corridor`: The corridor minigame tying the above together

pub mod audio;
pub mod config;
pub mod corridor;
pub mod error;
pub mod scene;
pub mod seed;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::CorridorConfig;
pub use corridor::Corridor;
pub use error::{ConfigError, SettingsError};
pub use seed::{CalendarDate, Seed};
pub use settings::{Settings, THEMES, Theme};

/// Game configuration constants
pub mod consts {
    /// Nominal frame period the scroll speed is tuned against (60 Hz)
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Longest frame the clock will report (prevents tunnelling after a stall)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 1920.0;
    pub const PLAYFIELD_HEIGHT: f32 = 1080.0;

    /// Path generation
    pub const GENERATION_LENGTH: usize = 1000;
    /// Vertical distance between successive waypoints
    pub const PATH_STEP: f32 = 20.0;
    pub const MAX_WIGGLE: i32 = 20;
    /// Horizontal keep-out on both sides of the playfield
    pub const PLAYFIELD_MARGIN: f32 = 50.0;

    /// Corridor half-width (safe radius around the centerline)
    pub const PATH_WIDTH: f32 = 60.0;
    /// Distance units per nominal frame
    pub const SCROLL_SPEED: f32 = 2.0;
    pub const STARTING_LIVES: u32 = 3;
    /// Fraction of the remaining gap the player closes per nominal frame
    pub const FOLLOW_RATE: f32 = 0.1;
    /// Player spawn height above the bottom edge
    pub const SPAWN_OFFSET: f32 = 100.0;

    /// Danger voice range (decibels)
    pub const DANGER_QUIET_DB: f32 = -100.0;
    pub const DANGER_LOUD_DB: f32 = -10.0;
    /// Steady hum level while running (decibels)
    pub const HUM_VOLUME_DB: f32 = -10.0;

    /// Debug overlay slack above and below the viewport (pixels)
    pub const OVERLAY_SLACK: f32 = 50.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Map `value` from `[in_min, in_max]` onto `[out_min, out_max]`, saturating at both ends
#[inline]
pub fn map_clamped(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let t = ((value - in_min) / (in_max - in_min)).clamp(0.0, 1.0);
    lerp(out_min, out_max, t)
}
