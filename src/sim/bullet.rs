//! Projectiles

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cannon::{Cannon, CannonSide};
use crate::consts::*;

/// A bullet in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Cannon that fired this bullet
    pub origin: CannonSide,
    /// Recent positions, oldest first
    pub trail: VecDeque<Vec2>,
}

impl Bullet {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, origin: CannonSide) -> Self {
        let mut trail = VecDeque::with_capacity(TRAIL_LENGTH + 1);
        trail.push_back(pos);
        Self {
            id,
            pos,
            vel,
            radius: BULLET_RADIUS,
            origin,
            trail,
        }
    }

    /// Move along the velocity and record the new position in the trail
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    /// Whether the bullet is still inside the field plus margin
    pub fn in_bounds(&self) -> bool {
        let m = BULLET_BOUNDS_MARGIN;
        self.pos.x >= -m
            && self.pos.x <= FIELD_WIDTH + m
            && self.pos.y >= -m
            && self.pos.y <= FIELD_HEIGHT + m
    }
}

/// Fire from a cannon's muzzle along its aim and light the muzzle flash
pub fn spawn_bullet(bullets: &mut Vec<Bullet>, id: u32, cannon: &mut Cannon) {
    bullets.push(Bullet::new(
        id,
        cannon.muzzle(),
        cannon.bullet_velocity(),
        cannon.side(),
    ));
    cannon.flash();
}

/// Advance all bullets, then drop those that left the play area
pub fn update_bullets(bullets: &mut Vec<Bullet>, dt: f32) {
    for bullet in bullets.iter_mut() {
        bullet.advance(dt);
    }
    bullets.retain(Bullet::in_bounds);
}
