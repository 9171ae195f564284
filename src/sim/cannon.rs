//! Cannons and aiming
//!
//! A layout describes how many cannons a variant has, where they pivot and
//! which angles they may take. Angles are in degrees using the convention of
//! [`crate::aim_direction`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::aim_direction;
use crate::consts::*;

/// Game variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// One turret in the middle sweeping the whole sky
    #[default]
    Single,
    /// Left and right cannons, each covering half the sky
    Dual,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Single => "single",
            Variant::Dual => "dual",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" | "center" => Some(Variant::Single),
            "dual" | "double" => Some(Variant::Dual),
            _ => None,
        }
    }
}

/// Which cannon fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CannonSide {
    Center,
    Left,
    Right,
}

/// Static description of one cannon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CannonSpec {
    pub side: CannonSide,
    pub pivot: Vec2,
    pub min_angle: f32,
    pub max_angle: f32,
    pub initial_angle: f32,
}

/// Horizontal inset of the dual cannons from the field margins
const DUAL_PIVOT_INSET: f32 = 112.0;

impl CannonSpec {
    /// Cannon specs for a variant, in slot order.
    ///
    /// Every cannon maps angles to directions through the same
    /// [`aim_direction`] (0° left, 90° up, 180° right). In the dual layout the
    /// angle range alone gives each cannon its half of the sky: the left
    /// cannon sweeps [0°, 90°] and the right one [90°, 180°].
    pub fn layout(variant: Variant) -> Vec<CannonSpec> {
        let base_y = FIELD_HEIGHT - FIELD_MARGIN;
        match variant {
            Variant::Single => vec![CannonSpec {
                side: CannonSide::Center,
                pivot: Vec2::new(FIELD_WIDTH / 2.0, base_y),
                min_angle: 0.0,
                max_angle: 180.0,
                initial_angle: 90.0,
            }],
            Variant::Dual => vec![
                CannonSpec {
                    side: CannonSide::Left,
                    pivot: Vec2::new(FIELD_MARGIN + DUAL_PIVOT_INSET, base_y),
                    min_angle: 0.0,
                    max_angle: 90.0,
                    initial_angle: 45.0,
                },
                CannonSpec {
                    side: CannonSide::Right,
                    pivot: Vec2::new(FIELD_WIDTH - FIELD_MARGIN - DUAL_PIVOT_INSET, base_y),
                    min_angle: 90.0,
                    max_angle: 180.0,
                    initial_angle: 135.0,
                },
            ],
        }
    }

    pub fn clamp_angle(&self, angle: f32) -> f32 {
        angle.clamp(self.min_angle, self.max_angle)
    }
}

/// Live cannon state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cannon {
    pub spec: CannonSpec,
    /// Current aim (degrees, always within the cannon's limits)
    pub angle: f32,
    /// Muzzle flash intensity (0-1)
    pub muzzle_flash: f32,
}

impl Cannon {
    pub fn new(spec: CannonSpec) -> Self {
        Self {
            spec,
            angle: spec.clamp_angle(spec.initial_angle),
            muzzle_flash: 0.0,
        }
    }

    pub fn side(&self) -> CannonSide {
        self.spec.side
    }

    /// Aim at an absolute angle (clamped, never wrapped)
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = self.spec.clamp_angle(angle);
    }

    /// Turn by a relative amount (clamped)
    pub fn turn(&mut self, delta: f32) {
        self.set_angle(self.angle + delta);
    }

    /// Barrel tip position
    pub fn muzzle(&self) -> Vec2 {
        self.spec.pivot + aim_direction(self.angle) * MUZZLE_OFFSET
    }

    /// Launch velocity along the current aim
    pub fn bullet_velocity(&self) -> Vec2 {
        bullet_velocity(self.angle)
    }

    /// Angle that points the barrel at `target` (unclamped)
    pub fn angle_toward(&self, target: Vec2) -> f32 {
        angle_toward(self.spec.pivot, target)
    }

    pub fn flash(&mut self) {
        self.muzzle_flash = 1.0;
    }

    /// Linear per-tick decay, independent of dt
    pub fn decay_flash(&mut self) {
        self.muzzle_flash = (self.muzzle_flash - MUZZLE_FLASH_DECAY).max(0.0);
    }
}

/// Fixed-speed velocity along an aim angle
pub fn bullet_velocity(angle_deg: f32) -> Vec2 {
    aim_direction(angle_deg) * BULLET_SPEED
}

/// Inverse of [`aim_direction`]: the angle from `from` toward `to`, in [0, 360)
pub fn angle_toward(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    (-d.y).atan2(-d.x).to_degrees().rem_euclid(360.0)
}
