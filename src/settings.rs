//! Game settings and tuning
//!
//! Overrides are read from LocalStorage on the web; anything missing or
//! invalid falls back to the defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Why a settings blob was rejected
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Herding tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Horses spawned per session
    pub horse_count: usize,
    /// Horse footprint (width, height) in container pixels
    pub horse_size: Vec2,
    /// Per-axis wander speed range in pixels per tick
    pub min_speed: f32,
    pub max_speed: f32,
    /// Motion timer interval
    pub tick_interval_ms: u32,
    /// Inset of the barn area used for snapping corralled horses
    pub snap_padding: f32,
    /// Container size used before the real container is measured
    pub fallback_container: Vec2,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            horse_count: DEFAULT_HORSE_COUNT,
            horse_size: Vec2::new(HORSE_WIDTH, HORSE_HEIGHT),
            min_speed: MIN_WANDER_SPEED,
            max_speed: MAX_WANDER_SPEED,
            tick_interval_ms: 1000 / TICKS_PER_SECOND,
            snap_padding: SNAP_PADDING,
            fallback_container: Vec2::new(FALLBACK_CONTAINER_WIDTH, FALLBACK_CONTAINER_HEIGHT),
        }
    }
}

impl Settings {
    /// Parse and validate a JSON override blob
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.horse_size.x > 0.0 && self.horse_size.y > 0.0) {
            return Err(SettingsError::Invalid {
                field: "horse_size",
                reason: "must be positive on both axes",
            });
        }
        if !(self.min_speed > 0.0) {
            return Err(SettingsError::Invalid {
                field: "min_speed",
                reason: "must be positive",
            });
        }
        if self.max_speed < self.min_speed {
            return Err(SettingsError::Invalid {
                field: "max_speed",
                reason: "must be at least min_speed",
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "tick_interval_ms",
                reason: "must be non-zero",
            });
        }
        if self.snap_padding < 0.0 {
            return Err(SettingsError::Invalid {
                field: "snap_padding",
                reason: "must not be negative",
            });
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "horse_corral_settings";

    /// Load settings overrides from LocalStorage (WASM only)
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

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
