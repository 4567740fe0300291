//! Pointer drag on top of autonomous motion
//!
//! A horse is free, held, or contained. Grabbing takes it out of the motion
//! tick; releasing either puts it back or corrals it for good. Only one horse
//! can be held, and only the pointer that grabbed it can move or drop it.

use glam::Vec2;
use rand::Rng;

use super::containment::is_contained;
use super::geom::Rect;
use super::state::{Drag, Herd};
use super::tick::resize;
use crate::platform::{Layout, PointerCapture};

/// A pointer event reduced to what the drag needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pointer_id: i32,
    /// Screen coordinates (client space)
    pub screen: Vec2,
}

impl PointerSample {
    pub fn new(pointer_id: i32, x: f32, y: f32) -> Self {
        Self {
            pointer_id,
            screen: Vec2::new(x, y),
        }
    }

    fn local(&self, container: Rect) -> Vec2 {
        self.screen - container.origin()
    }
}

/// How a drag ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Dropped in the barn; the horse is now contained
    Corralled { id: u32 },
    /// Dropped outside; the horse wanders again
    Escaped { id: u32 },
}

/// Pointer-down on a horse. Returns true if the horse is now held.
///
/// Ignored while another horse is held, for contained or unknown horses, and
/// before the container has a box.
pub fn grab(
    herd: &mut Herd,
    actor_id: u32,
    pointer: PointerSample,
    container: Option<Rect>,
    capture: &impl PointerCapture,
) -> bool {
    if herd.drag.is_some() {
        return false;
    }
    let Some(container) = container else {
        return false;
    };
    resize(herd, container.size());
    let Some(actor) = herd.actor(actor_id).filter(|a| !a.contained) else {
        return false;
    };

    let offset = pointer.local(container) - actor.pos;
    herd.drag = Some(Drag {
        actor_id,
        pointer_id: pointer.pointer_id,
        offset,
    });

    if let Err(e) = capture.capture(pointer.pointer_id) {
        log::debug!("Drag continues without capture: {}", e);
    }
    log::debug!("Grabbed horse {}", actor_id);
    true
}

/// Pointer-move while holding: follow the pointer, keeping the grab offset
///
/// Bounds are refitted to `container` first, so a corral that changed size
/// since the last tick still clamps the horse.
pub fn drag_to(herd: &mut Herd, pointer: PointerSample, container: Option<Rect>) {
    let Some(drag) = herd.drag.filter(|d| d.pointer_id == pointer.pointer_id) else {
        return;
    };
    let Some(container) = container else {
        return;
    };
    resize(herd, container.size());

    let bounds = herd.bounds;
    if let Some(actor) = herd.actor_mut(drag.actor_id) {
        actor.pos = bounds.clamp(pointer.local(container) - drag.offset);
    }
}

/// Pointer-up while holding: corral the horse if its center is in the barn
pub fn release(
    herd: &mut Herd,
    pointer: PointerSample,
    layout: Layout,
    capture: &impl PointerCapture,
) -> Option<ReleaseOutcome> {
    let drag = herd.drag.filter(|d| d.pointer_id == pointer.pointer_id)?;
    herd.drag = None;

    if let Err(e) = capture.release(pointer.pointer_id) {
        log::debug!("Capture release skipped: {}", e);
    }

    if let Some(container) = layout.container {
        resize(herd, container.size());
    }
    let footprint = herd.footprint();
    let pos = herd.actor(drag.actor_id)?.pos;
    let barn = match (layout.barn, layout.container) {
        (Some(barn), Some(container)) if is_contained(pos, footprint, barn, container) => {
            barn.translated_into(container.origin())
        }
        _ => {
            log::debug!("Horse {} escaped", drag.actor_id);
            return Some(ReleaseOutcome::Escaped { id: drag.actor_id });
        }
    };

    let snap = snap_point(herd, barn);
    if let Some(actor) = herd.actor_mut(drag.actor_id) {
        actor.corral(snap);
    }
    log::debug!(
        "Horse {} corralled ({}/{})",
        drag.actor_id,
        herd.contained_count(),
        herd.actors.len()
    );
    if herd.won() {
        log::info!("All {} horses corralled", herd.actors.len());
    }
    Some(ReleaseOutcome::Corralled { id: drag.actor_id })
}

/// Pointer-cancel: resolved exactly like a release
pub fn cancel(
    herd: &mut Herd,
    pointer: PointerSample,
    layout: Layout,
    capture: &impl PointerCapture,
) -> Option<ReleaseOutcome> {
    release(herd, pointer, layout, capture)
}

/// Random top-left inside the padded barn (container-local); corralled horses
/// may overlap
fn snap_point(herd: &mut Herd, barn: Rect) -> Vec2 {
    let area = barn.shrunk(herd.settings.snap_padding);
    let center = Vec2::new(
        area.left + herd.rng.random_range(0.0..=area.width),
        area.top + herd.rng.random_range(0.0..=area.height),
    );
    herd.bounds.clamp(center - herd.footprint() * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{CaptureError, NoCapture};
    use crate::settings::Settings;
    use crate::sim::{resize, tick};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingCapture {
        calls: RefCell<Vec<(&'static str, i32)>>,
    }

    impl PointerCapture for RecordingCapture {
        fn capture(&self, pointer_id: i32) -> Result<(), CaptureError> {
            self.calls.borrow_mut().push(("capture", pointer_id));
            Ok(())
        }

        fn release(&self, pointer_id: i32) -> Result<(), CaptureError> {
            self.calls.borrow_mut().push(("release", pointer_id));
            Ok(())
        }
    }

    fn layout() -> Layout {
        Layout {
            container: Some(Rect::new(0.0, 0.0, 800.0, 520.0)),
            barn: Some(Rect::from_edges(300.0, 200.0, 380.0, 340.0)),
        }
    }

    fn herd() -> Herd {
        let mut herd = Herd::new(Settings::default(), 2024, Vec2::new(800.0, 520.0));
        for (i, actor) in herd.actors.iter_mut().enumerate() {
            actor.pos = Vec2::new(20.0 + 100.0 * i as f32, 20.0);
        }
        herd
    }

    fn grab_at(herd: &mut Herd, id: u32, pointer_id: i32, x: f32, y: f32) -> bool {
        let pointer = PointerSample::new(pointer_id, x, y);
        grab(herd, id, pointer, layout().container, &NoCapture)
    }

    fn move_to(herd: &mut Herd, pointer_id: i32, x: f32, y: f32) {
        drag_to(herd, PointerSample::new(pointer_id, x, y), layout().container);
    }

    fn drop_at(herd: &mut Herd, pointer_id: i32, x: f32, y: f32) -> Option<ReleaseOutcome> {
        release(herd, PointerSample::new(pointer_id, x, y), layout(), &NoCapture)
    }

    #[test]
    fn test_grab_keeps_offset() {
        let mut herd = herd();
        let id = herd.actors[0].id;
        // pointer 10px right, 5px down of the horse origin
        assert!(grab_at(&mut herd, id, 1, 30.0, 25.0));
        assert_eq!(herd.drag().unwrap().offset, Vec2::new(10.0, 5.0));

        move_to(&mut herd, 1, 210.0, 125.0);
        assert_eq!(herd.actor(id).unwrap().pos, Vec2::new(200.0, 120.0));
    }

    #[test]
    fn test_drag_clamps_to_bounds() {
        let mut herd = herd();
        let id = herd.actors[0].id;
        grab_at(&mut herd, id, 1, 20.0, 20.0);
        move_to(&mut herd, 1, -50.0, 900.0);
        assert_eq!(herd.actor(id).unwrap().pos, Vec2::new(0.0, 448.0));
    }

    #[test]
    fn test_drag_refits_fallback_bounds_to_measured_container() {
        let mut herd = Herd::with_fallback_container(Settings::default(), 1);
        assert_eq!(herd.bounds().max, Vec2::new(728.0, 448.0));
        let measured = Some(Rect::new(0.0, 0.0, 400.0, 300.0));
        let id = herd.actors[0].id;

        let grip = herd.actor(id).unwrap().pos;
        let pointer = PointerSample::new(1, grip.x, grip.y);
        assert!(grab(&mut herd, id, pointer, measured, &NoCapture));
        assert_eq!(herd.bounds().max, Vec2::new(328.0, 228.0));

        let grip = herd.actor(id).unwrap().pos;
        drag_to(&mut herd, PointerSample::new(1, grip.x + 790.0, grip.y + 510.0), measured);
        assert_eq!(herd.actor(id).unwrap().pos, Vec2::new(328.0, 228.0));

        for _ in 0..10 {
            tick(&mut herd);
        }
        for actor in herd.actors() {
            assert!(herd.bounds().contains(actor.pos), "{:?} escaped", actor.pos);
        }
    }

    #[test]
    fn test_resize_while_held_keeps_offset() {
        let mut herd = herd();
        let id = herd.actors[0].id;
        grab_at(&mut herd, id, 1, 30.0, 25.0);
        move_to(&mut herd, 1, 710.0, 445.0);
        assert_eq!(herd.actor(id).unwrap().pos, Vec2::new(700.0, 440.0));

        resize(&mut herd, Vec2::new(400.0, 300.0));
        assert_eq!(herd.actor(id).unwrap().pos, Vec2::new(328.0, 228.0));
        assert_eq!(herd.held_id(), Some(id));

        let small = Some(Rect::new(0.0, 0.0, 400.0, 300.0));
        drag_to(&mut herd, PointerSample::new(1, 210.0, 125.0), small);
        assert_eq!(herd.actor(id).unwrap().pos, Vec2::new(200.0, 120.0));
        drag_to(&mut herd, PointerSample::new(1, 1000.0, 1000.0), small);
        assert_eq!(herd.actor(id).unwrap().pos, Vec2::new(328.0, 228.0));

        tick(&mut herd);
        assert_eq!(herd.actor(id).unwrap().pos, Vec2::new(328.0, 228.0));
    }

    #[test]
    fn test_second_grab_is_ignored() {
        let mut herd = herd();
        let (first, second) = (herd.actors[0].id, herd.actors[1].id);
        let second_before = herd.actors[1].clone();

        assert!(grab_at(&mut herd, first, 1, 20.0, 20.0));
        assert!(!grab_at(&mut herd, second, 2, 120.0, 20.0));

        assert_eq!(herd.held_id(), Some(first));
        assert_eq!(herd.actor(second), Some(&second_before));
    }

    #[test]
    fn test_other_pointer_cannot_move_or_drop() {
        let mut herd = herd();
        let id = herd.actors[0].id;
        grab_at(&mut herd, id, 1, 20.0, 20.0);

        move_to(&mut herd, 7, 300.0, 300.0);
        assert_eq!(herd.actor(id).unwrap().pos, Vec2::new(20.0, 20.0));
        assert_eq!(drop_at(&mut herd, 7, 0.0, 0.0), None);
        assert_eq!(herd.held_id(), Some(id));
    }

    #[test]
    fn test_release_in_barn_corrals() {
        let mut herd = herd();
        let id = herd.actors[0].id;
        let capture = RecordingCapture::default();
        let pointer = PointerSample::new(3, 20.0, 20.0);
        grab(&mut herd, id, pointer, layout().container, &capture);
        // horse origin (304, 234) => center (340, 270)
        move_to(&mut herd, 3, 304.0, 234.0);

        let pointer = PointerSample::new(3, 304.0, 234.0);
        let outcome = release(&mut herd, pointer, layout(), &capture);

        assert_eq!(outcome, Some(ReleaseOutcome::Corralled { id }));
        let actor = herd.actor(id).unwrap();
        assert!(actor.contained);
        assert_eq!(actor.vel, Vec2::ZERO);
        let center = actor.pos + herd.footprint() * 0.5;
        let padded = Rect::from_edges(308.0, 208.0, 372.0, 332.0).shrunk(-0.001);
        assert!(padded.contains_strict(center));
        assert_eq!(herd.drag(), None);
        assert_eq!(*capture.calls.borrow(), vec![("capture", 3), ("release", 3)]);
    }

    #[test]
    fn test_release_outside_barn_resumes_wandering() {
        let mut herd = herd();
        let id = herd.actors[0].id;
        let vel = herd.actors[0].vel;
        grab_at(&mut herd, id, 1, 20.0, 20.0);
        // center (381, 270), one pixel past the right edge
        move_to(&mut herd, 1, 345.0, 234.0);

        let outcome = drop_at(&mut herd, 1, 345.0, 234.0);
        assert_eq!(outcome, Some(ReleaseOutcome::Escaped { id }));
        assert!(!herd.actor(id).unwrap().contained);

        tick(&mut herd);
        assert_eq!(herd.actor(id).unwrap().pos, Vec2::new(345.0, 234.0) + vel);
    }

    #[test]
    fn test_contained_horse_cannot_be_grabbed() {
        let mut herd = herd();
        let id = herd.actors[0].id;
        herd.actors[0].corral(Vec2::new(310.0, 220.0));
        let before = herd.actors[0].clone();

        assert!(!grab_at(&mut herd, id, 1, 320.0, 230.0));
        move_to(&mut herd, 1, 0.0, 0.0);
        tick(&mut herd);

        assert_eq!(herd.actors[0], before);
        assert_eq!(herd.drag(), None);
    }

    #[test]
    fn test_missing_layout_degrades_to_noop() {
        let mut herd = herd();
        let id = herd.actors[0].id;
        let pointer = PointerSample::new(1, 20.0, 20.0);
        assert!(!grab(&mut herd, id, pointer, None, &NoCapture));

        grab_at(&mut herd, id, 1, 20.0, 20.0);
        move_to(&mut herd, 1, 304.0, 234.0);
        let no_barn = Layout {
            barn: None,
            ..layout()
        };
        let pointer = PointerSample::new(1, 304.0, 234.0);
        let outcome = release(&mut herd, pointer, no_barn, &NoCapture);
        assert_eq!(outcome, Some(ReleaseOutcome::Escaped { id }));
    }

    #[test]
    fn test_cancel_evaluates_containment() {
        let mut herd = herd();
        let id = herd.actors[0].id;
        grab_at(&mut herd, id, 1, 20.0, 20.0);
        move_to(&mut herd, 1, 304.0, 234.0);
        let pointer = PointerSample::new(1, 304.0, 234.0);
        let outcome = cancel(&mut herd, pointer, layout(), &NoCapture);
        assert_eq!(outcome, Some(ReleaseOutcome::Corralled { id }));
    }

    #[test]
    fn test_release_without_hold_is_ignored() {
        let mut herd = herd();
        let before = herd.actors().to_vec();
        assert_eq!(drop_at(&mut herd, 1, 0.0, 0.0), None);
        move_to(&mut herd, 1, 10.0, 10.0);
        assert_eq!(herd.actors(), &before[..]);
    }
}
