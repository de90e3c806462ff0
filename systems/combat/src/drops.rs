//! Pickup drop rolls and on-death secondary spawns.

use std::f32::consts::TAU;

use collapse_arena_core::{unit_from_angle, EnemyKind, PickupKind, PickupTuning, Vec2, WeaponMod};
use rand::Rng;

/// Distance from the death point at which split children appear.
const SPLIT_SPREAD: f32 = 18.0;
/// Radius of the ring boss tokens scatter over.
const BOSS_TOKEN_SPREAD: f32 = 40.0;

/// Rolls the pickup dropped by a dying enemy of `kind`, if any.
pub(crate) fn roll_drop<R: Rng + ?Sized>(
    tuning: &PickupTuning,
    kind: EnemyKind,
    rng: &mut R,
) -> Option<PickupKind> {
    let weight = kind.drop_weight();
    if rng.gen::<f32>() < tuning.health_chance * weight {
        return Some(PickupKind::Health);
    }
    if rng.gen::<f32>() < tuning.weapon_chance * weight {
        let weapon = WeaponMod::ALL[rng.gen_range(0..WeaponMod::ALL.len())];
        return Some(PickupKind::Weapon(weapon));
    }
    if rng.gen::<f32>() < tuning.token_chance * weight {
        return Some(PickupKind::Token);
    }
    None
}

/// Number of minis a splitter breaks into.
pub(crate) fn split_count<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(2..=3)
}

/// Evenly spaced points on a circle of `radius` around `center`.
pub(crate) fn ring_points(center: Vec2, radius: f32, count: u32) -> impl Iterator<Item = Vec2> {
    let step = TAU / count.max(1) as f32;
    (0..count).map(move |index| center + unit_from_angle(step * index as f32) * radius)
}

/// Positions of the children of a split or summon.
pub(crate) fn split_points(center: Vec2, count: u32) -> impl Iterator<Item = Vec2> {
    ring_points(center, SPLIT_SPREAD, count)
}

/// Positions of the tokens a defeated boss leaves behind.
pub(crate) fn boss_token_points(center: Vec2, count: u32) -> impl Iterator<Item = Vec2> {
    ring_points(center, BOSS_TOKEN_SPREAD, count)
}
