//! Axis-aligned geometry for the corral
//!
//! Screen rectangles come from the layout collaborator; everything the
//! simulation stores is in container-local pixels with the origin at the
//! container's top-left corner and y pointing down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_axis;

/// An axis-aligned rectangle (screen or container-local pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Build from edge coordinates (as reported by `getBoundingClientRect`)
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.origin() + self.size() * 0.5
    }

    /// Same rectangle expressed relative to `origin`
    pub fn translated_into(&self, origin: Vec2) -> Self {
        Self::new(self.left - origin.x, self.top - origin.y, self.width, self.height)
    }

    /// True iff `p` lies strictly inside on both axes (edges excluded)
    pub fn contains_strict(&self, p: Vec2) -> bool {
        p.x > self.left && p.x < self.right() && p.y > self.top && p.y < self.bottom()
    }

    /// Inset every edge by `padding`; collapses to the center instead of
    /// going negative
    pub fn shrunk(&self, padding: f32) -> Self {
        let w = (self.width - 2.0 * padding).max(0.0);
        let h = (self.height - 2.0 * padding).max(0.0);
        let c = self.center();
        Self::new(c.x - w / 2.0, c.y - h / 2.0, w, h)
    }
}

/// Valid top-left positions for an actor: `[0, max.x] × [0, max.y]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub max: Vec2,
}

impl Bounds {
    pub const ZERO: Self = Self { max: Vec2::ZERO };

    /// Interior size minus actor footprint, floored at zero per axis
    pub fn for_container(container_size: Vec2, footprint: Vec2) -> Self {
        Self {
            max: (container_size - footprint).max(Vec2::ZERO),
        }
    }

    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        Vec2::new(clamp_axis(pos.x, self.max.x), clamp_axis(pos.y, self.max.y))
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        (0.0..=self.max.x).contains(&pos.x) && (0.0..=self.max.y).contains(&pos.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_floor_at_zero() {
        let bounds = Bounds::for_container(Vec2::new(50.0, 800.0), Vec2::new(72.0, 72.0));
        assert_eq!(bounds.max, Vec2::new(0.0, 728.0));
        assert_eq!(bounds.clamp(Vec2::new(30.0, -4.0)), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_contains_strict_excludes_edges() {
        let barn = Rect::from_edges(300.0, 200.0, 380.0, 340.0);
        assert!(barn.contains_strict(Vec2::new(340.0, 270.0)));
        assert!(!barn.contains_strict(Vec2::new(380.0, 270.0)));
        assert!(!barn.contains_strict(Vec2::new(340.0, 200.0)));
        assert!(!barn.contains_strict(Vec2::new(381.0, 270.0)));
    }

    #[test]
    fn test_translated_into_container_space() {
        let barn = Rect::from_edges(340.0, 260.0, 420.0, 400.0);
        let local = barn.translated_into(Vec2::new(40.0, 60.0));
        assert_eq!(local, Rect::from_edges(300.0, 200.0, 380.0, 340.0));
    }

    #[test]
    fn test_shrunk_never_negative() {
        let r = Rect::new(0.0, 0.0, 10.0, 40.0).shrunk(8.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 24.0);
        assert_eq!(r.center(), Vec2::new(5.0, 20.0));
    }
}
