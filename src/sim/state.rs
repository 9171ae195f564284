//! Round state and core simulation types
//!
//! A `Round` owns everything that changes during play. Timed effects are
//! stored as absolute "active until" timestamps (seconds on the injected
//! monotonic clock) so restarting simply discards the old round.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::cannon::{Cannon, CannonSide, CannonSpec, Variant};
use super::item::{Item, ItemKind};
use crate::consts::*;
use crate::streak_multiplier;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Waiting for the first input
    #[default]
    NotStarted,
    /// Active gameplay
    Playing,
    /// Out of lives, waiting for restart
    GameOver,
}

/// Short text feedback shown by the renderer until `until`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub text: String,
    pub until: f64,
}

/// Discrete things that happened during a tick (audio/feedback cues)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum GameEvent {
    /// Round entered Playing (fresh start or restart)
    Started,
    /// A cannon fired
    Shot { side: CannonSide },
    /// At least one item was destroyed and nothing was missed this tick
    Hit,
    /// An item of this kind was destroyed
    ItemDestroyed { kind: ItemKind },
    /// Bomb wiped the board
    BombCleared,
    /// Bullet-time window opened
    BulletTime,
    /// Streak broken by a skull or a wrong-cannon decoy
    StreakBroken,
    /// Streak reached a multiple of five
    Perfect { streak: u32 },
    /// An item crossed the danger line
    Miss,
    /// A shield absorbed the miss
    ShieldAbsorbed,
    /// The miss cost a life
    LifeLost { lives: u32 },
    /// Lives ran out
    GameOver { score: u64 },
}

/// Complete round state
#[derive(Debug, Clone)]
pub struct Round {
    /// Game variant (decides the cannon layout)
    pub variant: Variant,
    /// Seed the round's RNG was created from
    pub seed: u64,
    /// Spawn RNG (kind and lane draws)
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Lives the round started with
    pub initial_lives: u32,
    pub lives: u32,
    pub score: u64,
    /// Consecutive scoring hits
    pub streak: u32,
    /// Banked miss absorptions
    pub shields: u32,
    /// Motion multiplier (slowed during bullet-time)
    pub time_scale: f32,
    /// Current fall speed (base speed times difficulty multiplier)
    pub fall_speed: f32,
    /// Clock time the round started (None until Playing)
    pub started_at: Option<f64>,
    /// Clock time of the previous tick
    pub last_frame_at: f64,
    /// Clock time of the last spawn
    pub last_spawn_at: f64,
    pub bullet_time_until: f64,
    pub screen_shake_until: f64,
    pub hit_flash_until: f64,
    pub popup: Option<Popup>,
    /// Cannons in slot order
    pub cannons: Vec<Cannon>,
    /// Fire button state per cannon slot from the previous tick
    pub fire_latched: Vec<bool>,
    /// Bullets in spawn order
    pub bullets: Vec<Bullet>,
    /// Items in spawn order
    pub items: Vec<Item>,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    /// Whether the game-over score has been handed to the leaderboard
    pub score_recorded: bool,
    /// Next entity ID
    next_id: u32,
}

impl Round {
    /// Create a fresh, not-yet-started round
    pub fn new(variant: Variant, seed: u64, initial_lives: u32) -> Self {
        let cannons: Vec<Cannon> = CannonSpec::layout(variant)
            .into_iter()
            .map(Cannon::new)
            .collect();
        let fire_latched = vec![false; cannons.len()];
        Self {
            variant,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::NotStarted,
            initial_lives,
            lives: initial_lives,
            score: 0,
            streak: 0,
            shields: 0,
            time_scale: 1.0,
            fall_speed: BASE_FALL_SPEED,
            started_at: None,
            last_frame_at: 0.0,
            last_spawn_at: 0.0,
            bullet_time_until: 0.0,
            screen_shake_until: 0.0,
            hit_flash_until: 0.0,
            popup: None,
            cannons,
            fire_latched,
            bullets: Vec::new(),
            items: Vec::new(),
            events: Vec::new(),
            score_recorded: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seconds since the round started (0 while not started)
    pub fn elapsed(&self, now: f64) -> f32 {
        match self.started_at {
            Some(start) => (now - start).max(0.0) as f32,
            None => 0.0,
        }
    }

    /// Current score multiplier
    pub fn multiplier(&self) -> u32 {
        streak_multiplier(self.streak)
    }

    pub fn is_bullet_time(&self, now: f64) -> bool {
        self.bullet_time_until > now
    }

    pub fn is_screen_shaking(&self, now: f64) -> bool {
        self.screen_shake_until > now
    }

    pub fn is_hit_flashing(&self, now: f64) -> bool {
        self.hit_flash_until > now
    }

    /// Popup text if still visible
    pub fn active_popup(&self, now: f64) -> Option<&str> {
        self.popup
            .as_ref()
            .filter(|p| p.until > now)
            .map(|p| p.text.as_str())
    }

    pub fn show_popup(&mut self, text: &str, now: f64, duration: f64) {
        self.popup = Some(Popup {
            text: text.to_string(),
            until: now + duration,
        });
    }

    /// Read-only view for renderers and tooling
    pub fn snapshot(&self, now: f64) -> RoundSnapshot {
        RoundSnapshot {
            phase: self.phase,
            elapsed: self.elapsed(now),
            lives: self.lives,
            score: self.score,
            streak: self.streak,
            multiplier: self.multiplier(),
            shields: self.shields,
            time_scale: self.time_scale,
            fall_speed: self.fall_speed,
            danger_line_y: DANGER_LINE_Y,
            cannons: self
                .cannons
                .iter()
                .map(|c| CannonView {
                    side: c.side(),
                    angle: c.angle,
                    muzzle_flash: c.muzzle_flash,
                })
                .collect(),
            bullets: self
                .bullets
                .iter()
                .map(|b| BulletView {
                    pos: (b.pos.x, b.pos.y),
                    trail: b.trail.iter().map(|p| (p.x, p.y)).collect(),
                })
                .collect(),
            items: self
                .items
                .iter()
                .map(|i| ItemView {
                    kind: i.kind,
                    pos: (i.pos.x, i.pos.y),
                    radius: i.radius,
                })
                .collect(),
            popup: self.popup.clone().filter(|p| p.until > now),
            screen_shake: self.is_screen_shaking(now),
            hit_flash: self.is_hit_flashing(now),
            bullet_time: self.is_bullet_time(now),
        }
    }
}

/// Renderer-facing cannon state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannonView {
    pub side: CannonSide,
    pub angle: f32,
    pub muzzle_flash: f32,
}

/// Renderer-facing bullet state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub pos: (f32, f32),
    pub trail: Vec<(f32, f32)>,
}

/// Renderer-facing item state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemView {
    pub kind: ItemKind,
    pub pos: (f32, f32),
    pub radius: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: GamePhase,
    pub elapsed: f32,
    pub lives: u32,
    pub score: u64,
    pub streak: u32,
    pub multiplier: u32,
    pub shields: u32,
    pub time_scale: f32,
    /// Base fall speed at the current difficulty
    pub fall_speed: f32,
    pub danger_line_y: f32,
    pub cannons: Vec<CannonView>,
    pub bullets: Vec<BulletView>,
    pub items: Vec<ItemView>,
    /// Visible popup with its expiry
    pub popup: Option<Popup>,
    pub screen_shake: bool,
    pub hit_flash: bool,
    pub bullet_time: bool,
}
