//! Bullet/item collision resolution
//!
//! Bullets are scanned in spawn order; each bullet consumes at most one item
//! per tick. Removals are marked during the scan and compacted afterwards.

use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::cannon::CannonSide;
use super::item::{Item, ItemEffect, ItemKind};
use super::state::Round;
use crate::consts::*;

/// Points awarded for popping a shield item
pub const SHIELD_POINTS: u32 = 5;
/// Points awarded for popping a gold item
pub const BULLET_TIME_POINTS: u32 = 25;

/// What a destroyed item did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum HitEffect {
    /// Plain scoring hit
    None,
    /// Bomb wiped the board
    Clear,
    /// Skull broke the streak
    StreakReset,
    /// Decoy popped; `wrong_cannon` when fired from the penalised side
    Decoy { wrong_cannon: bool },
    /// Shield banked
    Shield,
    /// Bullet-time started
    BulletTime,
}

impl HitEffect {
    /// Whether this hit breaks the streak instead of scoring
    pub fn resets_streak(&self) -> bool {
        matches!(
            self,
            HitEffect::StreakReset | HitEffect::Decoy { wrong_cannon: true }
        )
    }
}

/// A destroyed item, reported to the scoring step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitEvent {
    pub kind: ItemKind,
    pub points: u32,
    pub effect: HitEffect,
}

/// Circle overlap test between a bullet and an item
#[inline]
pub fn bullet_hits_item(bullet: &Bullet, item: &Item) -> bool {
    bullet.pos.distance(item.pos) < bullet.radius + item.radius
}

/// Decoys punish shots from the right cannon
#[inline]
fn is_wrong_cannon(origin: CannonSide) -> bool {
    origin == CannonSide::Right
}

/// Resolve every bullet/item contact for this tick.
///
/// Applies shield and bullet-time effects to the round directly; streak and
/// score are left to the caller, which folds the returned events.
pub fn resolve_collisions(round: &mut Round, now: f64) -> Vec<HitEvent> {
    let mut events = Vec::new();
    let mut dead_bullets = vec![false; round.bullets.len()];
    let mut dead_items = vec![false; round.items.len()];

    for bi in 0..round.bullets.len() {
        let bullet = &round.bullets[bi];
        let origin = bullet.origin;
        let Some(ii) = round
            .items
            .iter()
            .enumerate()
            .position(|(ii, item)| !dead_items[ii] && bullet_hits_item(bullet, item))
        else {
            continue;
        };

        dead_bullets[bi] = true;
        let item = &mut round.items[ii];
        item.hits = item.hits.saturating_sub(1);
        if item.hits > 0 {
            continue;
        }
        dead_items[ii] = true;

        let (kind, points, effect) = (item.kind, item.points, item.effect);
        let event = match effect {
            Some(ItemEffect::Clear) => {
                round.items.clear();
                round.bullets.clear();
                round.screen_shake_until = now + SCREEN_SHAKE_DURATION;
                events.push(HitEvent {
                    kind,
                    points: 0,
                    effect: HitEffect::Clear,
                });
                return events;
            }
            Some(ItemEffect::StreakReset) => HitEvent {
                kind,
                points: 0,
                effect: HitEffect::StreakReset,
            },
            Some(ItemEffect::Decoy) => HitEvent {
                kind,
                points: 0,
                effect: HitEffect::Decoy {
                    wrong_cannon: is_wrong_cannon(origin),
                },
            },
            Some(ItemEffect::Shield) => {
                round.shields += 1;
                HitEvent {
                    kind,
                    points: SHIELD_POINTS,
                    effect: HitEffect::Shield,
                }
            }
            Some(ItemEffect::BulletTime) => {
                round.bullet_time_until = now + BULLET_TIME_DURATION;
                HitEvent {
                    kind,
                    points: BULLET_TIME_POINTS,
                    effect: HitEffect::BulletTime,
                }
            }
            None => HitEvent {
                kind,
                points,
                effect: HitEffect::None,
            },
        };
        events.push(event);
    }

    compact(&mut round.bullets, &dead_bullets);
    compact(&mut round.items, &dead_items);
    events
}

/// Drop every element whose mark is set, preserving order
fn compact<T>(list: &mut Vec<T>, dead: &[bool]) {
    let mut marks = dead.iter();
    list.retain(|_| !marks.next().copied().unwrap_or(false));
}
