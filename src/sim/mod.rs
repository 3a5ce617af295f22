//! Deterministic simulation module
//!
//! All corridor gameplay lives here. This module must be pure and deterministic:
//! - Seeded RNG only, consumed once at path generation
//! - Path is immutable after generation
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod feedback;
pub mod path;
pub mod rng;
pub mod scroll;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, Proximity, evaluate};
pub use feedback::{DangerFeedback, map_offset};
pub use path::{Path, Waypoint};
pub use rng::DeterministicRng;
pub use scroll::{PathSample, ScrollState};
pub use state::{CorridorEvent, CorridorState, PlayerState, RunPhase, RunState, RunTransition};
pub use tick::{FrameClock, TickInput, TickReport, tick};
