//! Barn containment and the win predicate

use glam::Vec2;

use super::geom::Rect;
use super::state::Actor;

/// Does a horse at `actor_pos` (container-local top-left) sit in the barn?
///
/// Both rectangles are in screen space. The horse's center must be strictly
/// inside the barn once the barn is expressed relative to the container.
/// Always evaluated against the rectangles passed in; layouts move.
pub fn is_contained(actor_pos: Vec2, footprint: Vec2, barn: Rect, container: Rect) -> bool {
    let center = actor_pos + footprint * 0.5;
    barn.translated_into(container.origin()).contains_strict(center)
}

/// Win predicate: at least one horse, and every horse corralled
pub fn all_contained(actors: &[Actor]) -> bool {
    !actors.is_empty() && actors.iter().all(|a| a.contained)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOOTPRINT: Vec2 = Vec2::new(72.0, 72.0);

    fn barn() -> Rect {
        Rect::from_edges(300.0, 200.0, 380.0, 340.0)
    }

    fn container() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 520.0)
    }

    #[test]
    fn test_center_inside_barn() {
        // center (340, 270)
        assert!(is_contained(Vec2::new(304.0, 234.0), FOOTPRINT, barn(), container()));
    }

    #[test]
    fn test_center_one_pixel_past_right_edge() {
        // center (381, 270)
        assert!(!is_contained(Vec2::new(345.0, 234.0), FOOTPRINT, barn(), container()));
    }

    #[test]
    fn test_center_on_edge_is_outside() {
        // center (380, 270)
        assert!(!is_contained(Vec2::new(344.0, 234.0), FOOTPRINT, barn(), container()));
    }

    #[test]
    fn test_offset_container_origin() {
        let container = Rect::new(100.0, 50.0, 800.0, 520.0);
        let barn = Rect::from_edges(400.0, 250.0, 480.0, 390.0);
        // local barn is (300,200)-(380,340)
        assert!(is_contained(Vec2::new(304.0, 234.0), FOOTPRINT, barn, container));
        assert!(!is_contained(Vec2::new(404.0, 284.0), FOOTPRINT, barn, container));
    }

    #[test]
    fn test_all_contained() {
        let actor = |id, contained| Actor {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            contained,
        };
        assert!(!all_contained(&[]));
        assert!(all_contained(&[actor(1, true), actor(2, true)]));
        assert!(!all_contained(&[actor(1, true), actor(2, false)]));
    }
}
