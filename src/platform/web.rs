//! Browser implementations of the platform seams

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Window};

use super::{CaptureError, Layout, LayoutSource, PointerCapture};
use crate::sim::Rect;

fn element_rect(el: &Element) -> Option<Rect> {
    let r = el.get_bounding_client_rect();
    if r.width() <= 0.0 && r.height() <= 0.0 {
        return None;
    }
    Some(Rect::from_edges(
        r.left() as f32,
        r.top() as f32,
        r.right() as f32,
        r.bottom() as f32,
    ))
}

/// Measures `#corral` and `#barn` on every call
pub struct DomLayout {
    document: Document,
    container_id: &'static str,
    barn_id: &'static str,
}

impl DomLayout {
    pub fn new(document: Document, container_id: &'static str, barn_id: &'static str) -> Self {
        Self {
            document,
            container_id,
            barn_id,
        }
    }
}

impl LayoutSource for DomLayout {
    fn layout(&self) -> Layout {
        let measure = |id: &str| {
            self.document
                .get_element_by_id(id)
                .and_then(|el| element_rect(&el))
        };
        Layout {
            container: measure(self.container_id),
            barn: measure(self.barn_id),
        }
    }
}

/// Pointer capture on a DOM element
pub struct ElementCapture<'a>(pub &'a Element);

impl PointerCapture for ElementCapture<'_> {
    fn capture(&self, pointer_id: i32) -> Result<(), CaptureError> {
        self.0
            .set_pointer_capture(pointer_id)
            .map_err(|e| CaptureError::Failed {
                pointer_id,
                reason: format!("{:?}", e),
            })
    }

    fn release(&self, pointer_id: i32) -> Result<(), CaptureError> {
        if !self.0.has_pointer_capture(pointer_id) {
            return Ok(());
        }
        self.0
            .release_pointer_capture(pointer_id)
            .map_err(|e| CaptureError::Failed {
                pointer_id,
                reason: format!("{:?}", e),
            })
    }
}

/// A `setInterval` timer; dropping it stops the callbacks
pub struct IntervalTimer {
    window: Window,
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl IntervalTimer {
    pub fn start(
        window: &Window,
        interval_ms: u32,
        callback: impl FnMut() + 'static,
    ) -> Option<Self> {
        let closure = Closure::<dyn FnMut()>::new(callback);
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                interval_ms as i32,
            )
            .map_err(|e| log::error!("Failed to start motion timer: {:?}", e))
            .ok()?;
        Some(Self {
            window: window.clone(),
            handle,
            _closure: closure,
        })
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.window.clear_interval_with_handle(self.handle);
        log::info!("Motion timer stopped");
    }
}
