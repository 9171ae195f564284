//! Deterministic simulation module
//!
//! All gameplay rules live here. This module must stay free of I/O:
//! - Time comes in as an explicit clock reading per tick
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or storage dependencies

pub mod bullet;
pub mod cannon;
pub mod collision;
pub mod difficulty;
pub mod item;
pub mod state;
pub mod tick;

pub use bullet::{Bullet, spawn_bullet, update_bullets};
pub use cannon::{Cannon, CannonSide, CannonSpec, Variant, bullet_velocity};
pub use collision::{HitEffect, HitEvent, resolve_collisions};
pub use difficulty::{fall_speed_multiplier, pick_spawn_type, spawn_interval_ms, spawn_weights};
pub use item::{Item, ItemEffect, ItemKind, check_danger_line, spawn_item, update_items};
pub use state::{GameEvent, GamePhase, Popup, Round, RoundSnapshot};
pub use tick::{CannonInput, TickInput, restart, start, tick};
