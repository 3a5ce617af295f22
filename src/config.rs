//! Corridor tuning
//!
//! Passed explicitly into the corridor at construction. Every value is checked
//! up front so a bad tuning fails before the first tick instead of producing a
//! degenerate run.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorConfig {
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Number of waypoints generated per seed
    pub generation_length: usize,
    /// Vertical spacing between waypoints
    pub step: f32,
    /// Largest lateral jump between neighbouring waypoints
    pub max_wiggle: i32,
    pub margin: f32,
    /// Corridor half-width
    pub path_width: f32,
    /// Distance units per nominal frame
    pub speed: f32,
    pub starting_lives: u32,
    pub follow_rate: f32,
    pub spawn_offset: f32,
    pub danger_quiet_db: f32,
    pub danger_loud_db: f32,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            generation_length: GENERATION_LENGTH,
            step: PATH_STEP,
            max_wiggle: MAX_WIGGLE,
            margin: PLAYFIELD_MARGIN,
            path_width: PATH_WIDTH,
            speed: SCROLL_SPEED,
            starting_lives: STARTING_LIVES,
            follow_rate: FOLLOW_RATE,
            spawn_offset: SPAWN_OFFSET,
            danger_quiet_db: DANGER_QUIET_DB,
            danger_loud_db: DANGER_LOUD_DB,
        }
    }
}

impl CorridorConfig {
    /// Parse a JSON tuning file; missing fields fall back to the defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation_length < 2 {
            return Err(ConfigError::GenerationTooShort(self.generation_length));
        }
        // Negated comparisons so NaN is rejected too
        if !(self.path_width > 0.0) {
            return Err(ConfigError::NonPositivePathWidth(self.path_width));
        }
        if !(self.step > 0.0) {
            return Err(ConfigError::NonPositiveStep(self.step));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        if self.max_wiggle < 0 {
            return Err(ConfigError::NegativeWiggle(self.max_wiggle));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if !(self.playfield_width >= 2.0 * self.margin)
            || self.margin < 0.0
            || !(self.playfield_height > self.spawn_offset)
        {
            return Err(ConfigError::PlayfieldTooSmall {
                width: self.playfield_width,
                height: self.playfield_height,
                margin: self.margin,
            });
        }
        if !(self.follow_rate > 0.0 && self.follow_rate <= 1.0) {
            return Err(ConfigError::InvalidFollowRate(self.follow_rate));
        }
        if !(self.danger_quiet_db < self.danger_loud_db) {
            return Err(ConfigError::InvertedVolumeRange {
                quiet: self.danger_quiet_db,
                loud: self.danger_loud_db,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.playfield_width / 2.0
    }

    /// Screen-space y of the player, and of waypoint 0
    #[inline]
    pub fn spawn_y(&self) -> f32 {
        self.playfield_height - self.spawn_offset
    }

    #[inline]
    pub fn margin_left(&self) -> f32 {
        self.margin
    }

    #[inline]
    pub fn margin_right(&self) -> f32 {
        self.playfield_width - self.margin
    }

    /// Distance after which the scroll wraps back to waypoint 0
    #[inline]
    pub fn loop_length(&self) -> f64 {
        (self.generation_length - 1) as f64 * self.step as f64
    }
}
