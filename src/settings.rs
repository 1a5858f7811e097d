//! Game settings and preferences
//!
//! Persisted as JSON in LocalStorage. Native builds always use defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    /// Bubbles kept on the board (refill target after each match)
    pub bubble_count: usize,
    /// Smallest bubble value (inclusive)
    pub min_value: u32,
    /// Largest bubble value (inclusive)
    pub max_value: u32,
    /// Grid cell edge length in pixels (bubble + gap)
    pub cell_size: f32,

    // === Gesture ===
    /// Max distance between consecutive selected bubbles
    pub link_distance: f32,

    // === Round ===
    /// Round length in seconds
    pub time_limit: i32,

    // === Debug ===
    /// Outline every hitbox while dragging
    pub show_hitboxes: bool,

    // === Leaderboard ===
    /// Realtime database root, e.g. `https://<project>.firebaseio.com`
    pub leaderboard_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bubble_count: BUBBLE_COUNT,
            min_value: MIN_VALUE,
            max_value: MAX_VALUE,
            cell_size: CELL_SIZE,

            link_distance: LINK_DISTANCE,

            time_limit: TIME_LIMIT,

            show_hitboxes: true,

            leaderboard_url: None,
        }
    }
}

impl Settings {
    /// Clamp values that would break the game loop
    pub fn sanitized(mut self) -> Self {
        if self.max_value < self.min_value {
            std::mem::swap(&mut self.max_value, &mut self.min_value);
        }
        self.min_value = self.min_value.max(1);
        self.max_value = self.max_value.max(self.min_value);
        if !(self.cell_size >= 1.0) {
            self.cell_size = CELL_SIZE;
        }
        if !(self.link_distance > 0.0) {
            self.link_distance = LINK_DISTANCE;
        }
        self.time_limit = self.time_limit.max(1);
        self.bubble_count = self.bubble_count.max(2);
        self.leaderboard_url = self
            .leaderboard_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        self
    }

    /// Parse settings JSON, falling back to defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sum_bubbles_settings";

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
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
