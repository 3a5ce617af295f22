//! Player preferences and hub themes
//!
//! Passed by value into each minigame when it is created; nothing reads
//! settings from a global. Persisted as JSON (LocalStorage on the web, a file
//! natively).

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Hub colour palette (0xRRGGBB)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub background: u32,
    pub portal: u32,
    pub text: u32,
    pub accent: u32,
}

pub const THEMES: [Theme; 5] = [
    Theme {
        name: "Muted",
        background: 0xF4F4F9,
        portal: 0xA8B5E2,
        text: 0x2D3748,
        accent: 0xF7FAFC,
    },
    Theme {
        name: "Neon",
        background: 0x0A0A0A,
        portal: 0x00FFFF,
        text: 0xFF00FF,
        accent: 0xFFFFFF,
    },
    Theme {
        name: "Purple",
        background: 0x1A0033,
        portal: 0x663399,
        text: 0xE6CCFF,
        accent: 0xFF69B4,
    },
    Theme {
        name: "Gold",
        background: 0x1A0D00,
        portal: 0xFFD700,
        text: 0x8B4513,
        accent: 0xFF1493,
    },
    Theme {
        name: "Mono",
        background: 0xFFFFFF,
        portal: 0x000000,
        text: 0x000000,
        accent: 0x808080,
    },
];

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
    /// Index into `THEMES`
    pub theme: usize,
    /// Start runs with the corridor walls drawn
    pub debug_overlay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            muted: false,
            theme: 0,
            debug_overlay: false,
        }
    }
}

impl Settings {
    /// Parse settings, clamping out-of-range values instead of failing
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    fn sanitize(&mut self) {
        self.master_volume = if self.master_volume.is_finite() {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            Self::default().master_volume
        };
        if self.theme >= THEMES.len() {
            self.theme = 0;
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol;
        self.sanitize();
    }

    pub fn theme(&self) -> &'static Theme {
        &THEMES[self.theme % THEMES.len()]
    }

    pub fn set_theme(&mut self, index: usize) -> Result<(), SettingsError> {
        if index >= THEMES.len() {
            return Err(SettingsError::UnknownTheme(index));
        }
        self.theme = index;
        Ok(())
    }

    /// Advance to the next theme, wrapping around
    pub fn cycle_theme(&mut self) -> &'static Theme {
        self.theme = (self.theme + 1) % THEMES.len();
        self.theme()
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pl4y_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), SettingsError> {
        let json = self.to_json()?;
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
        Ok(())
    }

    /// Load settings from a JSON file, falling back to defaults when it is
    /// missing or unreadable
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
