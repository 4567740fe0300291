//! Deterministic simulation module
//!
//! All herding logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only
//! - Stable iteration order (by actor ID)
//! - No DOM or platform dependencies beyond the `platform` traits

pub mod containment;
pub mod drag;
pub mod geom;
pub mod state;
pub mod tick;

pub use containment::{all_contained, is_contained};
pub use drag::{PointerSample, ReleaseOutcome, cancel, drag_to, grab, release};
pub use geom::{Bounds, Rect};
pub use state::{Actor, ActorView, Drag, Herd, RngState};
pub use tick::{Ticker, rescale, resize, tick};
