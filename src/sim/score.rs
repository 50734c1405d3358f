//! Score keeping
//!
//! One point per block that gets past the player, counted once per block.

use super::obstacles::Block;

#[derive(Debug, Clone, Default)]
pub struct ScoreTracker {
    score: u32,
    finalized: bool,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Stop counting; the score is final from here on
    pub fn finalize(&mut self) -> u32 {
        self.finalized = true;
        self.score
    }

    /// Clear every uncleared block left of `line`. Returns (block id, score
    /// after that block) for each point awarded, in block order.
    pub fn collect(&mut self, blocks: &mut [Block], line: f32) -> Vec<(u32, u32)> {
        if self.finalized {
            return Vec::new();
        }
        let mut awarded = Vec::new();
        for block in blocks.iter_mut().filter(|b| !b.cleared && b.pos.x < line) {
            block.cleared = true;
            self.score += 1;
            awarded.push((block.id, self.score));
        }
        awarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Color;
    use glam::Vec2;

    fn block(id: u32, x: f32) -> Block {
        Block::new(id, Vec2::new(x, 0.0), Vec2::new(9.0, 60.0), Color::BLUE, 100.0)
    }

    #[test]
    fn test_clears_once() {
        let mut tracker = ScoreTracker::new();
        let mut blocks = vec![block(1, 24.0)];
        assert_eq!(tracker.collect(&mut blocks, 25.0), vec![(1, 1)]);
        assert!(blocks[0].cleared);
        assert!(tracker.collect(&mut blocks, 25.0).is_empty());
        assert_eq!(tracker.score(), 1);
    }

    #[test]
    fn test_right_of_line_not_counted() {
        let mut tracker = ScoreTracker::new();
        let mut blocks = vec![block(1, 25.0), block(2, 300.0)];
        assert!(tracker.collect(&mut blocks, 25.0).is_empty());
        assert_eq!(tracker.score(), 0);
    }

    #[test]
    fn test_several_in_one_tick_count_individually() {
        let mut tracker = ScoreTracker::new();
        let mut blocks = vec![block(1, 0.0), block(2, 10.0), block(3, 20.0)];
        assert_eq!(
            tracker.collect(&mut blocks, 25.0),
            vec![(1, 1), (2, 2), (3, 3)]
        );
    }

    #[test]
    fn test_finalized_is_frozen() {
        let mut tracker = ScoreTracker::new();
        let mut blocks = vec![block(1, 0.0), block(2, 500.0)];
        tracker.collect(&mut blocks, 25.0);
        assert_eq!(tracker.finalize(), 1);
        blocks[1].pos.x = 0.0;
        assert!(tracker.collect(&mut blocks, 25.0).is_empty());
        assert!(!blocks[1].cleared);
        assert_eq!(tracker.score(), 1);
    }
}
