//! Platform abstraction layer
//!
//! The simulation only sees these seams:
//! - Layout rectangles (corral container, barn) in screen space
//! - Pointer capture, which may be unsupported
//!
//! The browser implementations live in `web` (wasm32 only).

#[cfg(target_arch = "wasm32")]
pub mod web;

use thiserror::Error;

use crate::sim::Rect;

/// Layout snapshot taken when an event arrives
///
/// `None` means the element is not mounted (or has no box) yet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Layout {
    pub container: Option<Rect>,
    pub barn: Option<Rect>,
}

/// Something that can measure the corral and the barn right now
pub trait LayoutSource {
    fn layout(&self) -> Layout;
}

/// Why pointer capture could not be changed
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("pointer capture is not supported here")]
    Unsupported,
    #[error("pointer capture failed for pointer {pointer_id}: {reason}")]
    Failed { pointer_id: i32, reason: String },
}

/// Routes a pointer's events to one target for the length of a drag
pub trait PointerCapture {
    fn capture(&self, pointer_id: i32) -> Result<(), CaptureError>;
    fn release(&self, pointer_id: i32) -> Result<(), CaptureError>;
}

/// Environments without capture
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn capture(&self, _pointer_id: i32) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }

    fn release(&self, _pointer_id: i32) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }
}
