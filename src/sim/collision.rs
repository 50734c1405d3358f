//! Dot versus block collision detection
//!
//! Dots are circles, blocks are axis-aligned rectangles. Only the first
//! contact of a session counts; everything after it is slow-motion scenery.

use glam::Vec2;

use super::obstacles::Block;
use super::player::Dot;
use super::rect::Rect;

/// First contact between a dot and a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// Index into the player's outer dots
    pub dot: usize,
    pub block: u32,
}

/// True when a circle and a rectangle share interior area
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    (center - closest).length_squared() < radius * radius
}

/// Scan dots against blocks in order; the first overlap wins
pub fn first_contact(dots: &[Dot], dot_radius: f32, blocks: &[Block]) -> Option<Contact> {
    dots.iter().enumerate().find_map(|(i, dot)| {
        blocks
            .iter()
            .find(|block| circle_rect_overlap(dot.pos, dot_radius, &block.rect()))
            .map(|block| Contact {
                dot: i,
                block: block.id,
            })
    })
}

/// Reports at most one contact per session
#[derive(Debug, Clone, Default)]
pub struct CollisionDetector {
    contact: Option<Contact>,
}

impl CollisionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test this tick's positions. Returns the contact only on the tick it
    /// first happens.
    pub fn check(&mut self, dots: &[Dot], dot_radius: f32, blocks: &[Block]) -> Option<Contact> {
        if self.contact.is_some() {
            return None;
        }
        self.contact = first_contact(dots, dot_radius, blocks);
        self.contact
    }

    /// The session's contact, if any
    pub fn contact(&self) -> Option<Contact> {
        self.contact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Color;
    use proptest::prelude::*;

    fn block(id: u32, x: f32, y: f32) -> Block {
        Block::new(id, Vec2::new(x, y), Vec2::new(10.0, 60.0), Color::RED, 100.0)
    }

    fn dot(x: f32, y: f32) -> Dot {
        Dot {
            pos: Vec2::new(x, y),
            flagged: false,
        }
    }

    #[test]
    fn test_circle_rect_side_overlap() {
        let rect = Rect::new(Vec2::ZERO, Vec2::new(10.0, 60.0));
        assert!(circle_rect_overlap(Vec2::new(8.0, 0.0), 4.0, &rect));
        assert!(!circle_rect_overlap(Vec2::new(9.5, 0.0), 4.0, &rect));
    }

    #[test]
    fn test_circle_rect_corner() {
        let rect = Rect::new(Vec2::ZERO, Vec2::new(10.0, 60.0));
        // Corner at (5, 30); diagonal distance 2.83 < 4
        assert!(circle_rect_overlap(Vec2::new(7.0, 32.0), 4.0, &rect));
        // Inside the bounding box of the expanded rect, but past the corner arc
        assert!(!circle_rect_overlap(Vec2::new(8.0, 33.0), 4.0, &rect));
    }

    #[test]
    fn test_center_inside_rect() {
        let rect = Rect::new(Vec2::ZERO, Vec2::new(10.0, 60.0));
        assert!(circle_rect_overlap(Vec2::new(1.0, 1.0), 0.5, &rect));
    }

    #[test]
    fn test_first_contact_order() {
        let dots = [dot(0.0, 0.0), dot(100.0, 0.0)];
        let blocks = [block(7, 100.0, 0.0), block(3, 0.0, 0.0)];
        assert_eq!(
            first_contact(&dots, 4.0, &blocks),
            Some(Contact { dot: 0, block: 3 })
        );
    }

    #[test]
    fn test_detector_fires_once() {
        let dots = [dot(0.0, 0.0)];
        let blocks = [block(1, 0.0, 0.0)];
        let mut detector = CollisionDetector::new();
        assert_eq!(
            detector.check(&dots, 4.0, &blocks),
            Some(Contact { dot: 0, block: 1 })
        );
        assert_eq!(detector.check(&dots, 4.0, &blocks), None);
        assert_eq!(detector.contact(), Some(Contact { dot: 0, block: 1 }));
    }

    #[test]
    fn test_no_blocks_no_contact() {
        let mut detector = CollisionDetector::new();
        assert_eq!(detector.check(&[dot(0.0, 0.0)], 4.0, &[]), None);
        assert_eq!(detector.contact(), None);
    }

    proptest! {
        #[test]
        fn prop_overlap_matches_distance(
            cx in -50.0f32..50.0, cy in -50.0f32..50.0, r in 0.5f32..10.0,
        ) {
            let rect = Rect::new(Vec2::ZERO, Vec2::new(10.0, 60.0));
            let c = Vec2::new(cx, cy);
            let dx = (cx.abs() - 5.0).max(0.0);
            let dy = (cy.abs() - 30.0).max(0.0);
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < r - 1e-3 {
                prop_assert!(circle_rect_overlap(c, r, &rect));
            } else if dist > r + 1e-3 {
                prop_assert!(!circle_rect_overlap(c, r, &rect));
            }
        }
    }
}
