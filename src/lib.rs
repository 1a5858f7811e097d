//! Sum Bubbles - drag across numbered bubbles to hit a target sum
//!
//! Core modules:
//! - `sim`: Deterministic game logic (grid, bubbles, selection, scoring, clock)
//! - `renderer`: Draw commands for the selection path overlay
//! - `platform`: Browser glue (input normalization, DOM view, storage)
//! - `leaderboard`: Ranked score records in an external store
//! - `settings`: Tunable game configuration

pub mod leaderboard;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use leaderboard::{Leaderboard, LeaderboardError, ScoreRecord};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Visual bubble diameter (pixels)
    pub const BUBBLE_SIZE: f32 = 50.0;
    /// Gap between neighbouring grid cells
    pub const BUBBLE_GAP: f32 = 10.0;
    /// Grid cell edge length
    pub const CELL_SIZE: f32 = BUBBLE_SIZE + BUBBLE_GAP;
    pub const BUBBLE_RADIUS: f32 = BUBBLE_SIZE / 2.0;

    /// Square hitbox half-width. Bubbles collide as squares, not circles.
    pub const HITBOX_HALF: f32 = 25.0;
    /// Max center distance between consecutive bubbles in one gesture
    pub const LINK_DISTANCE: f32 = 300.0;
    /// Selection beam stroke width
    pub const PATH_WIDTH: f32 = 10.0;

    /// Bubbles kept on the board
    pub const BUBBLE_COUNT: usize = 35;
    pub const MIN_VALUE: u32 = 1;
    pub const MAX_VALUE: u32 = 9;

    /// Round length in clock ticks (seconds)
    pub const TIME_LIMIT: i32 = 60;
    pub const CLOCK_INTERVAL_MS: f64 = 1000.0;

    /// Points per unit of matched sum
    pub const SCORE_PER_POINT: u64 = 10;

    /// Matched bubbles linger this long before the view drops them
    pub const POP_REMOVE_DELAY_MS: f64 = 200.0;
    /// Delay between a match and the board refill
    pub const REPLENISH_DELAY_MS: f64 = 300.0;
    /// How long the failure shake stays on
    pub const FAIL_MARK_MS: f64 = 300.0;

    /// Target generator: bubbles summed per attempt (inclusive range)
    pub const TARGET_MIN_TERMS: usize = 2;
    pub const TARGET_MAX_TERMS: usize = 4;
    pub const TARGET_ATTEMPTS: usize = 5;
    pub const TARGET_FALLBACK: u32 = 10;
    /// Bubbles added when the board is too sparse to build a target
    pub const TARGET_TOP_UP: usize = 5;

    /// Leaderboard rows shown
    pub const LEADERBOARD_SIZE: usize = 10;
}

/// Axis-aligned square containment test (strict on the edges)
#[inline]
pub fn in_square(point: Vec2, center: Vec2, half: f32) -> bool {
    let d = (point - center).abs();
    d.x < half && d.y < half
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_square_edges_are_exclusive() {
        let c = Vec2::new(100.0, 100.0);
        assert!(in_square(Vec2::new(124.9, 75.1), c, 25.0));
        assert!(!in_square(Vec2::new(125.0, 100.0), c, 25.0));
        assert!(!in_square(Vec2::new(100.0, 75.0), c, 25.0));
    }

    #[test]
    fn test_cell_size_matches_bubble_plus_gap() {
        assert_eq!(consts::CELL_SIZE, 60.0);
        assert_eq!(consts::BUBBLE_RADIUS, consts::HITBOX_HALF);
    }
}
