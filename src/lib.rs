//! Horse Corral - herd the wandering horses into the barn
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, drag, containment, win)
//! - `platform`: Browser seams (layout rectangles, pointer capture, timers)
//! - `settings`: Data-driven tuning with LocalStorage overrides

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Nominal motion tick rate (ticks per second)
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Maximum ticks replayed in a single timer callback (throttled tabs)
    pub const MAX_CATCHUP_TICKS: u32 = 8;

    /// Default number of horses per session
    pub const DEFAULT_HORSE_COUNT: usize = 4;
    /// Default horse footprint in container pixels
    pub const HORSE_WIDTH: f32 = 72.0;
    pub const HORSE_HEIGHT: f32 = 72.0;

    /// Per-axis wander speed range (pixels per tick)
    pub const MIN_WANDER_SPEED: f32 = 0.6;
    pub const MAX_WANDER_SPEED: f32 = 1.8;

    /// Inset applied to the barn before picking a snap point
    pub const SNAP_PADDING: f32 = 8.0;

    /// Container size assumed until the real one is measured
    pub const FALLBACK_CONTAINER_WIDTH: f32 = 800.0;
    pub const FALLBACK_CONTAINER_HEIGHT: f32 = 520.0;
}

/// Clamp a coordinate to `[0, max]`, treating a negative `max` as 0
#[inline]
pub fn clamp_axis(value: f32, max: f32) -> f32 {
    value.clamp(0.0, max.max(0.0))
}
