//! Difficulty curve
//!
//! Pure functions of elapsed round time: fall speed, spawn cadence and the
//! weighted item mix.

use rand::Rng;

use super::item::ItemKind;

/// Fall speed compounds by this factor every [`FALL_SPEED_STEP_SECS`]
pub const FALL_SPEED_FACTOR: f32 = 1.1;
pub const FALL_SPEED_STEP_SECS: f32 = 10.0;

/// Base spawn interval and its per-step shrink factor
pub const BASE_SPAWN_MS: f32 = 1200.0;
pub const SPAWN_FASTER_FACTOR: f32 = 0.92;
pub const SPAWN_STEP_SECS: f32 = 20.0;
pub const MIN_SPAWN_MS: f32 = 400.0;

/// Special items join the mix from this point on
pub const SPECIALS_UNLOCK_SECS: f32 = 45.0;

/// A spawn candidate and its relative weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnWeight {
    pub kind: ItemKind,
    pub weight: u32,
}

const fn w(kind: ItemKind, weight: u32) -> SpawnWeight {
    SpawnWeight { kind, weight }
}

const EARLY_WEIGHTS: [SpawnWeight; 3] = [
    w(ItemKind::Normal, 50),
    w(ItemKind::Fast, 25),
    w(ItemKind::Heavy, 25),
];

const LATE_WEIGHTS: [SpawnWeight; 8] = [
    w(ItemKind::Normal, 35),
    w(ItemKind::Fast, 15),
    w(ItemKind::Heavy, 15),
    w(ItemKind::Bomb, 8),
    w(ItemKind::Gold, 8),
    w(ItemKind::Skull, 8),
    w(ItemKind::Shield, 6),
    w(ItemKind::Decoy, 5),
];

#[inline]
fn steps(elapsed_secs: f32, step: f32) -> i32 {
    (elapsed_secs.max(0.0) / step).floor() as i32
}

/// Fall speed multiplier: `1.1 ^ floor(t / 10)`
pub fn fall_speed_multiplier(elapsed_secs: f32) -> f32 {
    FALL_SPEED_FACTOR.powi(steps(elapsed_secs, FALL_SPEED_STEP_SECS))
}

/// Milliseconds between spawns, floored at [`MIN_SPAWN_MS`]
pub fn spawn_interval_ms(elapsed_secs: f32) -> f32 {
    let interval = BASE_SPAWN_MS * SPAWN_FASTER_FACTOR.powi(steps(elapsed_secs, SPAWN_STEP_SECS));
    interval.max(MIN_SPAWN_MS)
}

/// Weighted item mix for the given elapsed time (weights are relative)
pub fn spawn_weights(elapsed_secs: f32) -> &'static [SpawnWeight] {
    if elapsed_secs < SPECIALS_UNLOCK_SECS {
        &EARLY_WEIGHTS
    } else {
        &LATE_WEIGHTS
    }
}

/// Sum of all weights in a table
pub fn total_weight(weights: &[SpawnWeight]) -> u32 {
    weights.iter().map(|w| w.weight).sum()
}

/// Cumulative-weight lookup for a draw in `[0, total)`.
///
/// The first kind whose running total meets or exceeds `roll` wins. A roll
/// that matches nothing (rounding, out of range) falls back to the first entry.
pub fn pick_from_roll(weights: &[SpawnWeight], roll: f32) -> ItemKind {
    let mut cumulative = 0.0;
    for entry in weights {
        cumulative += entry.weight as f32;
        if cumulative >= roll {
            return entry.kind;
        }
    }
    weights.first().map(|e| e.kind).unwrap_or_default()
}

/// Draw one item kind for the given elapsed time
pub fn pick_spawn_type<R: Rng + ?Sized>(elapsed_secs: f32, rng: &mut R) -> ItemKind {
    let weights = spawn_weights(elapsed_secs);
    let roll = rng.random::<f32>() * total_weight(weights) as f32;
    pick_from_roll(weights, roll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_fall_speed_steps_every_ten_seconds() {
        assert_eq!(fall_speed_multiplier(0.0), 1.0);
        assert_eq!(fall_speed_multiplier(9.99), 1.0);
        assert!((fall_speed_multiplier(10.0) - 1.1).abs() < 1e-6);
        assert!((fall_speed_multiplier(25.0) - 1.21).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_interval_floor() {
        assert_eq!(spawn_interval_ms(0.0), 1200.0);
        assert!((spawn_interval_ms(20.0) - 1104.0).abs() < 1e-3);
        assert_eq!(spawn_interval_ms(10_000.0), MIN_SPAWN_MS);
    }

    #[test]
    fn test_weight_tables() {
        assert_eq!(spawn_weights(44.9).len(), 3);
        assert_eq!(spawn_weights(45.0).len(), 8);
        assert_eq!(total_weight(spawn_weights(0.0)), 100);
        assert_eq!(total_weight(spawn_weights(60.0)), 100);
    }

    #[test]
    fn test_pick_from_roll_boundaries() {
        let weights = spawn_weights(0.0);
        assert_eq!(pick_from_roll(weights, 0.0), ItemKind::Normal);
        assert_eq!(pick_from_roll(weights, 50.0), ItemKind::Normal);
        assert_eq!(pick_from_roll(weights, 50.5), ItemKind::Fast);
        assert_eq!(pick_from_roll(weights, 75.0), ItemKind::Fast);
        assert_eq!(pick_from_roll(weights, 99.9), ItemKind::Heavy);
    }

    #[test]
    fn test_pick_from_roll_falls_back_to_first() {
        let weights = spawn_weights(60.0);
        assert_eq!(pick_from_roll(weights, 1000.0), ItemKind::Normal);
        assert_eq!(pick_from_roll(&[], 3.0), ItemKind::Normal);
    }

    #[test]
    fn test_late_table_reaches_specials() {
        let weights = spawn_weights(50.0);
        assert_eq!(pick_from_roll(weights, 70.0), ItemKind::Bomb);
        assert_eq!(pick_from_roll(weights, 80.0), ItemKind::Gold);
        assert_eq!(pick_from_roll(weights, 85.0), ItemKind::Skull);
        assert_eq!(pick_from_roll(weights, 92.0), ItemKind::Shield);
        assert_eq!(pick_from_roll(weights, 96.0), ItemKind::Decoy);
    }

    proptest! {
        #[test]
        fn prop_fall_speed_matches_formula_and_grows(t in 0.0f32..600.0, dt in 0.0f32..60.0) {
            let expected = 1.1f32.powi((t / 10.0).floor() as i32);
            prop_assert!((fall_speed_multiplier(t) - expected).abs() <= expected * 1e-5);
            prop_assert!(fall_speed_multiplier(t + dt) >= fall_speed_multiplier(t));
        }

        #[test]
        fn prop_spawn_interval_bounded_and_shrinking(t in 0.0f32..2000.0, dt in 0.0f32..200.0) {
            prop_assert!(spawn_interval_ms(t) >= MIN_SPAWN_MS);
            prop_assert!(spawn_interval_ms(t + dt) <= spawn_interval_ms(t));
        }

        #[test]
        fn prop_picked_kind_is_in_table(t in 0.0f32..120.0, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let kind = pick_spawn_type(t, &mut rng);
            prop_assert!(spawn_weights(t).iter().any(|w| w.kind == kind));
            if t < SPECIALS_UNLOCK_SECS {
                prop_assert!(!kind.is_special());
            }
        }
    }
}
