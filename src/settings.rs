//! Game settings and preferences
//!
//! Persisted as JSON in LocalStorage. Unknown or missing fields fall back
//! to defaults so older saves keep loading.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all audio
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Leaderboard ===
    /// POST endpoint for score submissions
    pub submit_url: String,
    /// GET endpoint for the leaderboard
    pub leaderboard_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,

            show_fps: false,

            submit_url: "/submit_score".to_string(),
            leaderboard_url: "/get_leaderboard".to_string(),
        }
    }
}

impl Settings {
    /// Effective sound effect volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Clamp values a hand-edited save might have pushed out of range
    pub fn sanitize(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        if self.submit_url.trim().is_empty() {
            self.submit_url = Self::default().submit_url;
        }
        if self.leaderboard_url.trim().is_empty() {
            self.leaderboard_url = Self::default().leaderboard_url;
        }
    }

    /// Parse a stored settings blob
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "kaspa_flap_settings";

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
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_same_origin() {
        let s = Settings::default();
        assert_eq!(s.submit_url, "/submit_score");
        assert_eq!(s.leaderboard_url, "/get_leaderboard");
        assert!((s.effective_volume() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_muted_volume_is_zero() {
        let s = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(s.effective_volume(), 0.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{"muted":true}"#).unwrap();
        assert!(s.muted);
        assert_eq!(s.submit_url, "/submit_score");
        assert!(s.mute_on_blur);
    }

    #[test]
    fn test_sanitize_clamps_and_restores() {
        let s = Settings::from_json(r#"{"master_volume":3.0,"sfx_volume":-1.0,"submit_url":"  "}"#)
            .unwrap();
        assert_eq!(s.master_volume, 1.0);
        assert_eq!(s.sfx_volume, 0.0);
        assert_eq!(s.submit_url, "/submit_score");
    }

    #[test]
    fn test_round_trip_preserves_custom_endpoint() {
        let s = Settings {
            leaderboard_url: "https://scores.example/top".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), s);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(Settings::from_json("not json").is_err());
    }
}
