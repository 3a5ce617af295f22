//! Virtual scroll over the static path
//!
//! The player never moves vertically. Instead a distance counter walks an
//! index through the waypoint array and the corridor center at the player's
//! height is interpolated between the two neighbouring waypoints.

use serde::{Deserialize, Serialize};

use super::path::Path;
use crate::lerp;

/// Result of a path lookup at the current scroll position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub index: usize,
    /// Progress from waypoint `index` toward `index + 1`, in `[0, 1)`
    pub fraction: f32,
    /// Interpolated corridor center at the player's height
    pub center_x: f32,
    /// The scroll ran off the end of the path and restarted at waypoint 0
    pub wrapped: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    /// Distance into the current lap, always below the loop length after a lookup
    distance: f64,
    /// Distance across all laps (drives the score)
    cumulative: f64,
    laps: u32,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move forward by `speed` distance units per nominal frame.
    /// `delta_normalized` is elapsed time over the nominal frame period.
    pub fn advance(&mut self, speed: f32, delta_normalized: f32) {
        let delta = f64::from(speed) * f64::from(delta_normalized);
        if delta.is_finite() && delta > 0.0 {
            self.distance += delta;
            self.cumulative += delta;
        }
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn cumulative_distance(&self) -> f64 {
        self.cumulative
    }

    #[inline]
    pub fn laps(&self) -> u32 {
        self.laps
    }

    #[inline]
    pub fn path_index(&self, step: f32) -> usize {
        (self.distance / f64::from(step)).floor() as usize
    }

    #[inline]
    pub fn fraction(&self, step: f32) -> f32 {
        let step = f64::from(step);
        ((self.distance.rem_euclid(step)) / step) as f32
    }

    /// Locate the corridor center at the current distance.
    ///
    /// Once the index reaches the last waypoint the distance wraps back to
    /// waypoint 0 and the same waypoints are reused, so the corridor repeats
    /// rather than ends. Overshoot is carried into the new lap but reduced to
    /// less than one step, so the lap always starts on the first segment.
    pub fn lookup(&mut self, path: &Path) -> PathSample {
        let step = path.step();
        let last = path.len().saturating_sub(1);
        let loop_length = last as f64 * f64::from(step);

        let mut wrapped = false;
        if self.path_index(step) >= last && loop_length > 0.0 {
            let laps = (self.distance / loop_length).floor().max(1.0);
            let overshoot = (self.distance - laps * loop_length).max(0.0);
            self.distance = overshoot.rem_euclid(f64::from(step));
            self.laps = self.laps.saturating_add(laps as u32);
            wrapped = true;
            log::debug!("Corridor wrapped, lap {}", self.laps);
        }

        // Guards against float rounding leaving the index on the last waypoint
        let index = self.path_index(step).min(last.saturating_sub(1));
        let fraction = self.fraction(step);
        let waypoints = path.waypoints();
        let center_x = match (waypoints.get(index), waypoints.get(index + 1)) {
            (Some(a), Some(b)) => lerp(a.lateral_position, b.lateral_position, fraction),
            (Some(a), None) => a.lateral_position,
            _ => 0.0,
        };

        PathSample {
            index,
            fraction,
            center_x,
            wrapped,
        }
    }
}
