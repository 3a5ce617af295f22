//! Proximity-to-danger audio parameters

use serde::{Deserialize, Serialize};

use crate::map_clamped;

/// Continuous danger voice controls for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DangerFeedback {
    /// Danger voice level in decibels
    pub volume_db: f32,
    /// Distortion amount, 0 = clean, 1 = fully driven
    pub distortion: f32,
}

impl DangerFeedback {
    /// Fully quiet danger voice
    pub fn silent(quiet_db: f32) -> Self {
        Self {
            volume_db: quiet_db,
            distortion: 0.0,
        }
    }
}

/// Map the centerline offset onto the danger voice. Zero offset is silent and
/// clean, the corridor edge is loudest and fully distorted; offsets past
/// either end saturate.
pub fn map_offset(offset: f32, path_width: f32, quiet_db: f32, loud_db: f32) -> DangerFeedback {
    DangerFeedback {
        volume_db: map_clamped(offset, 0.0, path_width, quiet_db, loud_db),
        distortion: map_clamped(offset, 0.0, path_width, 0.0, 1.0),
    }
}
