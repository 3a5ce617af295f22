//! Corridor path generation
//!
//! The corridor is a fixed column of waypoints, one every `step` units of
//! height, generated once per seed before the first tick.

use serde::{Deserialize, Serialize};

use super::rng::DeterministicRng;
use crate::config::CorridorConfig;

/// One corridor centerline sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub index: usize,
    /// Centerline x
    pub lateral_position: f32,
    /// World-space y; waypoint 0 sits at the player's spawn height
    pub vertical_offset: f32,
}

/// Immutable waypoint sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    waypoints: Vec<Waypoint>,
    step: f32,
}

impl Path {
    /// Walk upward from the spawn point, nudging x by a bounded random amount
    /// per step and keeping it inside the playfield margins.
    pub fn generate(rng: &mut DeterministicRng, config: &CorridorConfig) -> Self {
        let len = config.generation_length;
        let (left, right) = (config.margin_left(), config.margin_right());

        let mut waypoints = Vec::with_capacity(len);
        let mut x = config.center_x();
        let mut y = config.spawn_y();

        for index in 0..len {
            waypoints.push(Waypoint {
                index,
                lateral_position: x,
                vertical_offset: y,
            });
            y -= config.step;
            let wiggle = rng.between(-config.max_wiggle, config.max_wiggle);
            x = (x + wiggle as f32).clamp(left, right);
        }

        log::info!(
            "Generated corridor: {} waypoints, step {}, wiggle ±{}",
            len,
            config.step,
            config.max_wiggle
        );

        Self {
            waypoints,
            step: config.step,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Waypoints whose scrolled screen position lies within the viewport,
    /// padded by `slack` above and below. Screen y is
    /// `vertical_offset + distance`.
    pub fn visible_window(&self, distance: f64, viewport_height: f32, slack: f32) -> &[Waypoint] {
        let distance = distance as f32;
        let screen_y = |w: &Waypoint| w.vertical_offset + distance;
        // Screen y falls monotonically with index
        let start = self
            .waypoints
            .partition_point(|w| screen_y(w) >= viewport_height + slack);
        let end = self.waypoints.partition_point(|w| screen_y(w) > -slack);
        &self.waypoints[start..end.max(start)]
    }
}
