//! Distance-from-centerline collision
//!
//! A 1-D test once per tick: how far the player sits from the interpolated
//! corridor center. There is no grace window; one tick outside the corridor
//! is a hit.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proximity {
    Safe,
    Lethal,
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Absolute lateral distance from the corridor center
    pub offset: f32,
    pub proximity: Proximity,
}

impl CollisionResult {
    #[inline]
    pub fn is_lethal(&self) -> bool {
        self.proximity == Proximity::Lethal
    }
}

/// Classify the player's position against the corridor.
/// `path_width` is the corridor half-width; the edge itself is still safe.
pub fn evaluate(player_x: f32, center_x: f32, path_width: f32) -> CollisionResult {
    let offset = (player_x - center_x).abs();
    let proximity = if offset <= path_width {
        Proximity::Safe
    } else {
        Proximity::Lethal
    };
    CollisionResult { offset, proximity }
}
