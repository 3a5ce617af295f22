//! Browser bindings
//!
//! The host page owns the canvas and the animation frame loop; it feeds
//! timestamps and pointer positions in and reads the state back out.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::audio::web::WebAudioSink;
use crate::config::CorridorConfig;
use crate::corridor::Corridor;
use crate::scene::{FrameInput, Minigame, SceneCommand};
use crate::seed::Seed;
use crate::settings::Settings;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
}

/// Corridor handle for a browser host
#[wasm_bindgen]
pub struct CorridorGame {
    corridor: Corridor<WebAudioSink>,
    pointer: Option<Vec2>,
}

#[wasm_bindgen]
impl CorridorGame {
    /// Build a corridor for this week's seed, or `seed` when given.
    /// `config_json` overrides the default tuning.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<String>, config_json: Option<String>) -> Result<CorridorGame, JsError> {
        let config = match config_json {
            Some(json) => CorridorConfig::from_json(&json)?,
            None => CorridorConfig::default(),
        };
        let seed = seed.map_or_else(Seed::this_week, Seed::new);
        let settings = Settings::load();
        let mut corridor = Corridor::new(config, seed, settings, WebAudioSink::new())?;
        corridor.initialize();
        Ok(Self {
            corridor,
            pointer: None,
        })
    }

    /// Pointer position in playfield coordinates
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer = Some(Vec2::new(x, y));
    }

    /// Browsers keep audio suspended until a user gesture
    pub fn resume_audio(&self) {
        self.corridor.audio().sink().resume();
    }

    /// Advance one animation frame. Returns false once the game wants to leave.
    pub fn frame(&mut self, time_ms: f64) -> bool {
        let input = FrameInput {
            now_ms: time_ms,
            pointer: self.pointer,
        };
        match self.corridor.tick(&input) {
            SceneCommand::Continue => true,
            SceneCommand::Exit => {
                self.corridor.teardown();
                false
            }
        }
    }

    /// Start over with the same or a new seed after game over
    pub fn restart(&mut self, seed: Option<String>) -> bool {
        let seed = seed
            .map(Seed::new)
            .unwrap_or_else(|| self.corridor.state().seed.clone());
        self.corridor.restart(seed)
    }

    pub fn request_exit(&mut self) {
        self.corridor.request_exit();
    }

    pub fn score(&self) -> f64 {
        self.corridor.status().score as f64
    }

    pub fn lives(&self) -> u32 {
        self.corridor.state().run.lives
    }

    pub fn is_over(&self) -> bool {
        self.corridor.status().over
    }

    pub fn seed(&self) -> String {
        self.corridor.state().seed.to_string()
    }

    pub fn player_x(&self) -> f32 {
        self.corridor.state().player.lateral_position
    }

    pub fn player_y(&self) -> f32 {
        self.corridor.state().config.spawn_y()
    }

    pub fn path_width(&self) -> f32 {
        self.corridor.state().config.path_width
    }

    pub fn toggle_debug_overlay(&mut self) -> bool {
        self.corridor.toggle_debug_overlay()
    }

    pub fn debug_overlay(&self) -> bool {
        self.corridor.state().debug_overlay
    }

    /// Visible centerline as flat `[x0, y0, x1, y1, ...]` in screen space
    pub fn visible_centerline(&self) -> Vec<f32> {
        self.corridor
            .visible_waypoints()
            .iter()
            .flat_map(|w| [w.lateral_position, self.corridor.screen_y(w)])
            .collect()
    }

    /// Last frame's events as JSON lines
    pub fn events_json(&self) -> String {
        self.corridor.event_lines().join("\n")
    }
}
