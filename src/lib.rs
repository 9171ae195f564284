//! Cannon Rush - a lane-based arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (difficulty, items, cannons, bullets, collisions, round state)
//! - `platform`: Monotonic clock abstraction
//! - `persistence`: Best-effort key/value storage for the leaderboard
//! - `session`: Frame driver wiring the simulation to its collaborators

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::Leaderboard;
pub use session::Session;
pub use settings::{Settings, Variant};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 1024.0;
    pub const FIELD_HEIGHT: f32 = 768.0;
    pub const FIELD_MARGIN: f32 = 48.0;

    /// Number of spawn lanes, evenly spaced between the margins
    pub const LANE_COUNT: usize = 6;

    /// Items reaching this y count as a miss
    pub const DANGER_LINE_Y: f32 = FIELD_HEIGHT * 0.88;

    /// Item defaults
    pub const ITEM_RADIUS: f32 = 32.0;
    pub const BASE_FALL_SPEED: f32 = 150.0;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 700.0;
    pub const BULLET_RADIUS: f32 = 4.0;
    pub const TRAIL_LENGTH: usize = 5;
    /// Bullets are pruned once they leave the field expanded by this much
    pub const BULLET_BOUNDS_MARGIN: f32 = 20.0;

    /// Distance from cannon pivot to muzzle
    pub const MUZZLE_OFFSET: f32 = 80.0;
    /// Muzzle flash decrement per tick
    pub const MUZZLE_FLASH_DECAY: f32 = 0.25;
    /// Degrees turned per tick while a turn key is held
    pub const KEY_AIM_STEP: f32 = 3.0;

    /// Largest step the simulation accepts (seconds)
    pub const MAX_DT: f32 = 0.1;

    /// Starting lives
    pub const INITIAL_LIVES: u32 = 3;

    /// Bullet-time slows motion to this fraction
    pub const BULLET_TIME_SCALE: f32 = 0.3;

    /// Effect windows (seconds)
    pub const BULLET_TIME_DURATION: f64 = 2.0;
    pub const SCREEN_SHAKE_DURATION: f64 = 0.4;
    pub const HIT_FLASH_DURATION: f64 = 0.12;
    pub const POPUP_DURATION: f64 = 0.8;
    pub const SHORT_POPUP_DURATION: f64 = 0.6;

    /// Streak steps per multiplier increment
    pub const STREAK_STEP: u32 = 5;
}

/// X coordinate of every spawn lane, left to right
pub fn lane_xs() -> [f32; consts::LANE_COUNT] {
    use consts::*;
    let mut xs = [0.0; LANE_COUNT];
    let span = FIELD_WIDTH - 2.0 * FIELD_MARGIN;
    for (i, x) in xs.iter_mut().enumerate() {
        *x = FIELD_MARGIN + (i as f32 / (LANE_COUNT - 1) as f32) * span;
    }
    xs
}

/// Unit aim direction for an angle in degrees.
///
/// 0° points left, 90° points up (screen y grows downward), 180° points right.
#[inline]
pub fn aim_direction(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(-rad.cos(), -rad.sin())
}

/// Score multiplier earned by a streak
#[inline]
pub fn streak_multiplier(streak: u32) -> u32 {
    1 + streak / consts::STREAK_STEP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_xs_span_margins() {
        let xs = lane_xs();
        assert_eq!(xs[0], consts::FIELD_MARGIN);
        assert!((xs[consts::LANE_COUNT - 1] - (consts::FIELD_WIDTH - consts::FIELD_MARGIN)).abs() < 1e-3);
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_aim_direction_conventions() {
        let left = aim_direction(0.0);
        let up = aim_direction(90.0);
        let right = aim_direction(180.0);
        assert!((left - Vec2::new(-1.0, 0.0)).length() < 1e-5);
        assert!((up - Vec2::new(0.0, -1.0)).length() < 1e-5);
        assert!((right - Vec2::new(1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_streak_multiplier_steps() {
        assert_eq!(streak_multiplier(0), 1);
        assert_eq!(streak_multiplier(4), 1);
        assert_eq!(streak_multiplier(5), 2);
        assert_eq!(streak_multiplier(14), 3);
    }
}
