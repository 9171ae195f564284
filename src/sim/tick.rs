//! Per-frame simulation tick
//!
//! Drives the round state machine: NotStarted -> Playing -> GameOver ->
//! (restart) -> Playing. While playing, each tick aims and fires, spawns,
//! moves, resolves collisions, checks the danger line, and folds the
//! resulting hits into score and streak.

use rand::Rng;

use super::bullet::{spawn_bullet, update_bullets};
use super::collision::{HitEffect, HitEvent, resolve_collisions};
use super::difficulty::{fall_speed_multiplier, spawn_interval_ms};
use super::item::{check_danger_line, spawn_item, update_items};
use super::state::{GameEvent, GamePhase, Round};
use crate::consts::*;

/// Most cannons any variant has
pub const MAX_CANNONS: usize = 2;

/// Input for one cannon slot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CannonInput {
    /// Absolute aim from the pointer (degrees, clamped on apply)
    pub target_angle: Option<f32>,
    /// Held turn keys: negative turns toward 0°, positive toward 180°
    pub turn: f32,
    /// Fire button currently held (edge-triggered)
    pub fire: bool,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Per cannon slot, in layout order
    pub cannons: [CannonInput; MAX_CANNONS],
    /// Any qualifying press (key, pointer) while not started
    pub start: bool,
    /// Restart request (space/enter/click) on the game-over screen
    pub restart: bool,
}

impl TickInput {
    fn any_fire(&self) -> bool {
        self.cannons.iter().any(|c| c.fire)
    }
}

/// Advance the round by one frame at clock time `now` (seconds).
///
/// The step size is the time since the previous tick, clamped to [`MAX_DT`].
pub fn tick(round: &mut Round, input: &TickInput, now: f64) {
    round.events.clear();
    let dt = ((now - round.last_frame_at) as f32).clamp(0.0, MAX_DT);
    round.last_frame_at = now;

    match round.phase {
        GamePhase::NotStarted => {
            if input.start || input.any_fire() {
                start(round, now);
                latch_fire(round, input);
            }
            return;
        }
        GamePhase::GameOver => {
            if input.restart {
                restart(round, now);
                latch_fire(round, input);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    apply_cannon_input(round, input);

    // Spawn on cadence
    let elapsed = round.elapsed(now);
    let interval = f64::from(spawn_interval_ms(elapsed)) / 1000.0;
    if now - round.last_spawn_at >= interval {
        let id = round.next_entity_id();
        spawn_item(&mut round.items, id, elapsed, &mut round.rng);
        round.last_spawn_at = now;
    }

    round.fall_speed = BASE_FALL_SPEED * fall_speed_multiplier(elapsed);
    round.time_scale = if round.is_bullet_time(now) {
        BULLET_TIME_SCALE
    } else {
        1.0
    };

    // Items take the scaled step and scale it again; bullets only once
    update_items(&mut round.items, dt * round.time_scale, round.time_scale);
    update_bullets(&mut round.bullets, dt * round.time_scale);

    let hits = resolve_collisions(round, now);

    let missed = check_danger_line(&mut round.items);
    if missed {
        apply_miss(round);
    }

    fold_hits(round, &hits, now);

    if missed {
        round.show_popup("Miss!", now, POPUP_DURATION);
    } else if !hits.is_empty() {
        round.events.push(GameEvent::Hit);
    }

    if round.phase == GamePhase::GameOver {
        log::info!(
            "Game over: score {} after {:.1}s",
            round.score,
            round.elapsed(now)
        );
        round.events.push(GameEvent::GameOver { score: round.score });
    }

    for cannon in &mut round.cannons {
        cannon.decay_flash();
    }
}

/// Enter Playing from NotStarted
pub fn start(round: &mut Round, now: f64) {
    round.phase = GamePhase::Playing;
    round.started_at = Some(now);
    round.last_spawn_at = now;
    round.last_frame_at = now;
    round.events.push(GameEvent::Started);
    log::info!(
        "Round started ({} variant, seed {})",
        round.variant.as_str(),
        round.seed
    );
}

/// Discard the round and immediately start a fresh one
pub fn restart(round: &mut Round, now: f64) {
    let seed = round.rng.random::<u64>();
    *round = Round::new(round.variant, seed, round.initial_lives);
    start(round, now);
}

/// Remember which fire buttons are held so they need a release first
fn latch_fire(round: &mut Round, input: &TickInput) {
    for (latched, cannon) in round.fire_latched.iter_mut().zip(input.cannons.iter()) {
        *latched = cannon.fire;
    }
}

/// Aim every cannon and fire on fresh presses
fn apply_cannon_input(round: &mut Round, input: &TickInput) {
    for slot in 0..round.cannons.len() {
        let Some(cmd) = input.cannons.get(slot) else {
            break;
        };

        let cannon = &mut round.cannons[slot];
        if let Some(angle) = cmd.target_angle {
            cannon.set_angle(angle);
        }
        if cmd.turn != 0.0 {
            cannon.turn(cmd.turn.signum() * KEY_AIM_STEP);
        }

        let pressed = cmd.fire && !round.fire_latched[slot];
        round.fire_latched[slot] = cmd.fire;
        if pressed {
            let id = round.next_entity_id();
            let cannon = &mut round.cannons[slot];
            spawn_bullet(&mut round.bullets, id, cannon);
            round.events.push(GameEvent::Shot {
                side: cannon.side(),
            });
        }
    }
}

/// An item reached the danger line this tick
fn apply_miss(round: &mut Round) {
    round.events.push(GameEvent::Miss);
    if round.shields > 0 {
        round.shields -= 1;
        round.events.push(GameEvent::ShieldAbsorbed);
    } else {
        round.lives = round.lives.saturating_sub(1);
        round.events.push(GameEvent::LifeLost { lives: round.lives });
        if round.lives == 0 {
            round.phase = GamePhase::GameOver;
        }
    }
    round.streak = 0;
}

/// Fold this tick's hits into streak and score
pub fn fold_hits(round: &mut Round, hits: &[HitEvent], now: f64) {
    if hits.is_empty() {
        return;
    }
    round.hit_flash_until = now + HIT_FLASH_DURATION;

    for hit in hits {
        round
            .events
            .push(GameEvent::ItemDestroyed { kind: hit.kind });

        match hit.effect {
            HitEffect::Clear => {
                round.events.push(GameEvent::BombCleared);
                continue;
            }
            HitEffect::StreakReset => {
                round.streak = 0;
                round.events.push(GameEvent::StreakBroken);
                round.show_popup("Streak broken!", now, SHORT_POPUP_DURATION);
                continue;
            }
            HitEffect::Decoy { wrong_cannon: true } => {
                round.streak = 0;
                round.events.push(GameEvent::StreakBroken);
                round.show_popup("Wrong shot!", now, SHORT_POPUP_DURATION);
                continue;
            }
            HitEffect::BulletTime => round.events.push(GameEvent::BulletTime),
            HitEffect::None | HitEffect::Shield | HitEffect::Decoy { wrong_cannon: false } => {}
        }

        round.streak += 1;
        round.score += u64::from(hit.points) * u64::from(round.multiplier());
        if round.streak % STREAK_STEP == 0 {
            round.events.push(GameEvent::Perfect {
                streak: round.streak,
            });
            round.show_popup("Perfect!", now, POPUP_DURATION);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bullet::Bullet;
    use crate::sim::cannon::{CannonSide, Variant};
    use glam::Vec2;
    use crate::sim::item::{Item, ItemKind};

    const FRAME: f64 = 1.0 / 60.0;

    fn playing_round(variant: Variant) -> Round {
        let mut round = Round::new(variant, 12345, INITIAL_LIVES);
        start(&mut round, 0.0);
        round
    }

    fn hit(kind: ItemKind, points: u32, effect: HitEffect) -> HitEvent {
        HitEvent {
            kind,
            points,
            effect,
        }
    }

    fn fire(slot: usize) -> TickInput {
        let mut input = TickInput::default();
        input.cannons[slot].fire = true;
        input
    }

    #[test]
    fn test_tick_not_started_waits_for_input() {
        let mut round = Round::new(Variant::Single, 1, 3);
        tick(&mut round, &TickInput::default(), 1.0);
        assert_eq!(round.phase, GamePhase::NotStarted);
        assert!(round.items.is_empty());

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut round, &input, 2.0);
        assert_eq!(round.phase, GamePhase::Playing);
        assert_eq!(round.started_at, Some(2.0));
        assert_eq!(round.events, vec![GameEvent::Started]);
    }

    #[test]
    fn test_start_press_does_not_fire() {
        let mut round = Round::new(Variant::Single, 1, 3);
        tick(&mut round, &fire(0), 0.0);
        assert_eq!(round.phase, GamePhase::Playing);
        // Still held: no shot until released and pressed again
        tick(&mut round, &fire(0), FRAME);
        assert!(round.bullets.is_empty());
        tick(&mut round, &TickInput::default(), 2.0 * FRAME);
        tick(&mut round, &fire(0), 3.0 * FRAME);
        assert_eq!(round.bullets.len(), 1);
    }

    #[test]
    fn test_fire_is_edge_triggered() {
        let mut round = playing_round(Variant::Single);
        let mut now = 0.0;
        for _ in 0..10 {
            now += FRAME;
            tick(&mut round, &fire(0), now);
        }
        assert_eq!(round.bullets.len(), 1);

        now += FRAME;
        tick(&mut round, &TickInput::default(), now);
        now += FRAME;
        tick(&mut round, &fire(0), now);
        assert_eq!(round.bullets.len(), 2);
    }

    #[test]
    fn test_shot_event_and_flash_decay() {
        let mut round = playing_round(Variant::Dual);
        tick(&mut round, &fire(1), FRAME);
        assert!(round.events.contains(&GameEvent::Shot {
            side: CannonSide::Right
        }));
        assert_eq!(round.bullets[0].origin, CannonSide::Right);
        assert_eq!(round.cannons[1].muzzle_flash, 0.75);
        assert_eq!(round.cannons[0].muzzle_flash, 0.0);
    }

    #[test]
    fn test_aim_input_clamps() {
        let mut round = playing_round(Variant::Dual);
        let mut input = TickInput::default();
        input.cannons[0].target_angle = Some(170.0);
        input.cannons[1].turn = -1.0;
        tick(&mut round, &input, FRAME);
        assert_eq!(round.cannons[0].angle, 90.0);
        assert_eq!(round.cannons[1].angle, 135.0 - KEY_AIM_STEP);
    }

    #[test]
    fn test_spawn_on_interval() {
        let mut round = playing_round(Variant::Single);
        tick(&mut round, &TickInput::default(), 0.5);
        assert!(round.items.is_empty());
        tick(&mut round, &TickInput::default(), 1.2);
        assert_eq!(round.items.len(), 1);
        assert_eq!(round.last_spawn_at, 1.2);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut round = playing_round(Variant::Single);
        let id = round.next_entity_id();
        round.items.push(Item::new(id, ItemKind::Normal, 0, 1.0));
        round.last_spawn_at = 100.0;
        // A five second stall moves items by at most MAX_DT
        tick(&mut round, &TickInput::default(), 5.0);
        let moved = round.items[0].pos.y;
        assert!((moved - BASE_FALL_SPEED * MAX_DT).abs() < 1e-3);
    }

    #[test]
    fn test_bullet_time_slows_motion() {
        let mut round = playing_round(Variant::Single);
        let id = round.next_entity_id();
        round.items.push(Item::new(id, ItemKind::Normal, 0, 1.0));
        let id = round.next_entity_id();
        round.bullets.push(Bullet::new(
            id,
            Vec2::new(500.0, 500.0),
            Vec2::new(0.0, -BULLET_SPEED),
            CannonSide::Center,
        ));
        round.last_spawn_at = 100.0;
        round.bullet_time_until = 10.0;
        tick(&mut round, &TickInput::default(), 0.1);
        assert_eq!(round.time_scale, BULLET_TIME_SCALE);
        // Items are slowed twice (1.35 units), bullets once
        let item_step = BASE_FALL_SPEED * 0.1 * BULLET_TIME_SCALE * BULLET_TIME_SCALE;
        assert!((round.items[0].pos.y - item_step).abs() < 1e-3);
        let bullet_step = BULLET_SPEED * 0.1 * BULLET_TIME_SCALE;
        assert!((round.bullets[0].pos.y - (500.0 - bullet_step)).abs() < 1e-3);

        tick(&mut round, &TickInput::default(), 10.05);
        assert_eq!(round.time_scale, 1.0);
    }

    #[test]
    fn test_multiplier_at_fifth_streak() {
        let mut round = playing_round(Variant::Single);
        round.streak = 4;
        fold_hits(&mut round, &[hit(ItemKind::Normal, 10, HitEffect::None)], 1.0);
        assert_eq!(round.streak, 5);
        assert_eq!(round.score, 20);
        assert!(round.events.contains(&GameEvent::Perfect { streak: 5 }));
        assert_eq!(round.active_popup(1.0), Some("Perfect!"));
    }

    #[test]
    fn test_streak_resets() {
        let mut round = playing_round(Variant::Dual);
        round.streak = 7;
        round.score = 100;
        fold_hits(&mut round, &[hit(ItemKind::Skull, 0, HitEffect::StreakReset)], 1.0);
        assert_eq!(round.streak, 0);
        assert_eq!(round.score, 100);

        round.streak = 3;
        fold_hits(
            &mut round,
            &[hit(ItemKind::Decoy, 0, HitEffect::Decoy { wrong_cannon: true })],
            2.0,
        );
        assert_eq!(round.streak, 0);
        assert_eq!(round.active_popup(2.0), Some("Wrong shot!"));
    }

    #[test]
    fn test_correct_decoy_and_normal_keep_streak() {
        let mut round = playing_round(Variant::Dual);
        round.streak = 2;
        fold_hits(
            &mut round,
            &[
                hit(ItemKind::Decoy, 0, HitEffect::Decoy { wrong_cannon: false }),
                hit(ItemKind::Normal, 10, HitEffect::None),
            ],
            1.0,
        );
        assert_eq!(round.streak, 4);
        assert_eq!(round.score, 10);
    }

    #[test]
    fn test_clear_does_not_score() {
        let mut round = playing_round(Variant::Single);
        round.streak = 2;
        fold_hits(&mut round, &[hit(ItemKind::Bomb, 0, HitEffect::Clear)], 1.0);
        assert_eq!(round.streak, 2);
        assert_eq!(round.score, 0);
        assert!(round.events.contains(&GameEvent::BombCleared));
        assert!(round.is_hit_flashing(1.05));
    }

    #[test]
    fn test_miss_costs_life_and_streak() {
        let mut round = playing_round(Variant::Single);
        round.streak = 6;
        let id = round.next_entity_id();
        let mut item = Item::new(id, ItemKind::Normal, 0, 1.0);
        item.pos.y = DANGER_LINE_Y;
        round.items.push(item);
        round.last_spawn_at = 100.0;

        tick(&mut round, &TickInput::default(), FRAME);
        assert_eq!(round.lives, 2);
        assert_eq!(round.streak, 0);
        assert!(round.events.contains(&GameEvent::Miss));
        assert!(round.events.contains(&GameEvent::LifeLost { lives: 2 }));
        assert_eq!(round.active_popup(FRAME), Some("Miss!"));
    }

    #[test]
    fn test_shield_absorbs_miss() {
        let mut round = playing_round(Variant::Single);
        round.shields = 1;
        round.streak = 3;
        let id = round.next_entity_id();
        let mut item = Item::new(id, ItemKind::Normal, 0, 1.0);
        item.pos.y = DANGER_LINE_Y;
        round.items.push(item);
        round.last_spawn_at = 100.0;

        tick(&mut round, &TickInput::default(), FRAME);
        assert_eq!(round.lives, INITIAL_LIVES);
        assert_eq!(round.shields, 0);
        assert_eq!(round.streak, 0);
        assert!(round.events.contains(&GameEvent::ShieldAbsorbed));
    }

    #[test]
    fn test_simultaneous_crossings_cost_one_life() {
        let mut round = playing_round(Variant::Single);
        for lane in 0..3 {
            let id = round.next_entity_id();
            let mut item = Item::new(id, ItemKind::Normal, lane, 1.0);
            item.pos.y = DANGER_LINE_Y + 1.0;
            round.items.push(item);
        }
        round.last_spawn_at = 100.0;
        tick(&mut round, &TickInput::default(), FRAME);
        assert_eq!(round.lives, INITIAL_LIVES - 1);
        assert!(round.items.is_empty());
    }

    #[test]
    fn test_last_life_ends_round_then_restart() {
        let mut round = playing_round(Variant::Single);
        round.lives = 1;
        round.score = 42;
        let id = round.next_entity_id();
        let mut item = Item::new(id, ItemKind::Normal, 0, 1.0);
        item.pos.y = DANGER_LINE_Y;
        round.items.push(item);
        round.last_spawn_at = 100.0;

        tick(&mut round, &TickInput::default(), FRAME);
        assert_eq!(round.phase, GamePhase::GameOver);
        assert!(round.events.contains(&GameEvent::GameOver { score: 42 }));

        // Frozen until restart
        tick(&mut round, &fire(0), 2.0 * FRAME);
        assert_eq!(round.phase, GamePhase::GameOver);
        assert!(round.bullets.is_empty());

        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut round, &input, 5.0);
        assert_eq!(round.phase, GamePhase::Playing);
        assert_eq!(round.lives, INITIAL_LIVES);
        assert_eq!(round.score, 0);
        assert_eq!(round.started_at, Some(5.0));
        assert!(!round.score_recorded);
    }
}
