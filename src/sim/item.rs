//! Falling items
//!
//! Items drop down fixed lanes. Each kind carries its own radius, speed,
//! point value, hit count and optional special effect.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::{fall_speed_multiplier, pick_spawn_type};
use crate::consts::*;
use crate::lane_xs;

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    #[default]
    Normal,
    Fast,
    /// Takes two hits
    Heavy,
    /// Clears the board
    Bomb,
    /// Triggers bullet-time
    Gold,
    /// Breaks the streak
    Skull,
    /// Banks one miss absorption
    Shield,
    /// Punishes hits from the wrong cannon
    Decoy,
}

impl ItemKind {
    /// Fall speed before the difficulty multiplier
    pub fn base_speed(self) -> f32 {
        match self {
            ItemKind::Fast => BASE_FALL_SPEED * 1.3,
            _ => BASE_FALL_SPEED,
        }
    }

    pub fn radius(self) -> f32 {
        match self {
            ItemKind::Fast => ITEM_RADIUS * 0.8,
            _ => ITEM_RADIUS,
        }
    }

    /// Direct points awarded on destruction (specials score through their effect)
    pub fn points(self) -> u32 {
        match self {
            ItemKind::Normal => 10,
            ItemKind::Fast => 20,
            ItemKind::Heavy => 15,
            _ => 0,
        }
    }

    pub fn hits(self) -> u8 {
        match self {
            ItemKind::Heavy => 2,
            _ => 1,
        }
    }

    pub fn effect(self) -> Option<ItemEffect> {
        match self {
            ItemKind::Bomb => Some(ItemEffect::Clear),
            ItemKind::Gold => Some(ItemEffect::BulletTime),
            ItemKind::Skull => Some(ItemEffect::StreakReset),
            ItemKind::Shield => Some(ItemEffect::Shield),
            ItemKind::Decoy => Some(ItemEffect::Decoy),
            ItemKind::Normal | ItemKind::Fast | ItemKind::Heavy => None,
        }
    }

    /// True for kinds that only appear once specials unlock
    pub fn is_special(self) -> bool {
        self.effect().is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Normal => "normal",
            ItemKind::Fast => "fast",
            ItemKind::Heavy => "heavy",
            ItemKind::Bomb => "bomb",
            ItemKind::Gold => "gold",
            ItemKind::Skull => "skull",
            ItemKind::Shield => "shield",
            ItemKind::Decoy => "decoy",
        }
    }
}

/// Special effect attached to an item, resolved when it is destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemEffect {
    Clear,
    BulletTime,
    StreakReset,
    Shield,
    Decoy,
}

/// A falling target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub lane: usize,
    pub pos: Vec2,
    /// Downward speed (units/s)
    pub vel_y: f32,
    pub radius: f32,
    /// Remaining hits before destruction
    pub hits: u8,
    pub points: u32,
    pub effect: Option<ItemEffect>,
}

impl Item {
    /// Create an item at the top of `lane` falling at the kind's base speed
    /// scaled by `speed_multiplier`
    pub fn new(id: u32, kind: ItemKind, lane: usize, speed_multiplier: f32) -> Self {
        let xs = lane_xs();
        let lane = lane.min(xs.len() - 1);
        Self {
            id,
            kind,
            lane,
            pos: Vec2::new(xs[lane], 0.0),
            vel_y: kind.base_speed() * speed_multiplier,
            radius: kind.radius(),
            hits: kind.hits(),
            points: kind.points(),
            effect: kind.effect(),
        }
    }

    /// Whether the item has reached the danger line
    pub fn crossed_danger_line(&self) -> bool {
        self.pos.y >= DANGER_LINE_Y
    }
}

/// Pick a kind and lane for the current elapsed time and append the item
pub fn spawn_item<R: Rng + ?Sized>(
    items: &mut Vec<Item>,
    id: u32,
    elapsed_secs: f32,
    rng: &mut R,
) -> ItemKind {
    let kind = pick_spawn_type(elapsed_secs, rng);
    let lane = rng.random_range(0..LANE_COUNT);
    let item = Item::new(id, kind, lane, fall_speed_multiplier(elapsed_secs));
    log::debug!(
        "Spawned {} #{} in lane {} at {:.0} u/s",
        kind.as_str(),
        id,
        lane,
        item.vel_y
    );
    items.push(item);
    kind
}

/// Advance every item downward by `vel_y * dt * time_scale`
pub fn update_items(items: &mut [Item], dt: f32, time_scale: f32) {
    for item in items.iter_mut() {
        item.pos.y += item.vel_y * dt * time_scale;
    }
}

/// Remove every item at or past the danger line.
///
/// Returns true if anything crossed; simultaneous crossings are a single miss.
pub fn check_danger_line(items: &mut Vec<Item>) -> bool {
    let before = items.len();
    items.retain(|item| !item.crossed_danger_line());
    items.len() != before
}
