//! Axis-aligned rectangles for blocks and hit regions

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle described by its center and full size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Rectangle from its bottom-left corner
    pub fn from_corner(min: Vec2, size: Vec2) -> Self {
        Self {
            center: min + size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size / 2.0
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents()
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents()
    }

    /// Inclusive point containment
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        let h = self.half_extents();
        d.x <= h.x && d.y <= h.y
    }

    /// Closest point of the rectangle (or its interior) to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min(), self.max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_constructor() {
        let r = Rect::from_corner(Vec2::new(5.0, 5.0), Vec2::new(10.0, 4.0));
        assert_eq!(r.center, Vec2::new(10.0, 7.0));
        assert_eq!(r.min(), Vec2::new(5.0, 5.0));
        assert_eq!(r.max(), Vec2::new(15.0, 9.0));
    }

    #[test]
    fn test_contains_edges() {
        let r = Rect::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        assert!(r.contains(Vec2::new(1.0, 1.0)));
        assert!(r.contains(Vec2::ZERO));
        assert!(!r.contains(Vec2::new(1.01, 0.0)));
    }

    #[test]
    fn test_closest_point_clamps() {
        let r = Rect::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        assert_eq!(r.closest_point(Vec2::new(5.0, 0.5)), Vec2::new(1.0, 0.5));
        assert_eq!(r.closest_point(Vec2::new(0.2, 0.3)), Vec2::new(0.2, 0.3));
    }
}
