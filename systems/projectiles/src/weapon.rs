//! Weapon volleys and the canonical damage composition.
//!
//! Outgoing damage composes multiplicatively in a fixed order:
//! base, then crit, then tier (including the variant factor). The resolver
//! applies the combo multiplier and class bonuses afterwards.

use collapse_arena_core::{angle_of, unit_from_angle, Vec2, WeaponMod, MAX_WEAPON_TIER};

use crate::{
    AreaEffect, AreaTrigger, Behavior, Homing, ProjectileSpawn, PLAYER_PROJECTILE_RADIUS,
};

/// Damage of a single player projectile before any multiplier.
pub const BASE_DAMAGE: f32 = 10.0;
/// Speed of player projectiles.
pub const BASE_SPEED: f32 = 520.0;
/// Lifetime of player projectiles in seconds.
pub const BASE_LIFETIME: f32 = 1.4;
/// Distance within which chain shots find their next target.
pub const CHAIN_RANGE: f32 = 180.0;

const TIER_STEP: f32 = 0.22;
const LASER_SPEED: f32 = 900.0;
const CLUSTER_MIN_FLIGHT: f32 = 0.2;

/// Multiplier contributed by the weapon tier.
#[must_use]
pub fn tier_factor(tier: u32) -> f32 {
    let tier = tier.clamp(1, MAX_WEAPON_TIER);
    1.0 + (tier - 1) as f32 * TIER_STEP
}

/// Composes outgoing projectile damage: base, crit, tier and variant.
#[must_use]
pub fn outgoing_damage(base: f32, crit_multiplier: f32, tier: u32, variant_factor: f32) -> f32 {
    base * crit_multiplier * (tier_factor(tier) * variant_factor)
}

/// Parameters of one trigger pull.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolleyRequest {
    /// Active weapon modifier.
    pub weapon: WeaponMod,
    /// Active weapon tier.
    pub tier: u32,
    /// Crit multiplier rolled for this volley, `1.0` when it did not crit.
    pub crit_multiplier: f32,
    /// Muzzle position.
    pub origin: Vec2,
    /// Point being aimed at.
    pub aim: Vec2,
}

/// Appends the projectiles produced by one trigger pull to `out`.
pub fn fire_volley(request: VolleyRequest, out: &mut Vec<ProjectileSpawn>) {
    let VolleyRequest {
        weapon,
        tier,
        crit_multiplier,
        origin,
        aim,
    } = request;
    let tier = tier.clamp(1, MAX_WEAPON_TIER);
    let offset = aim - origin;
    let heading = if offset.length_squared() > f32::EPSILON {
        angle_of(offset)
    } else {
        0.0
    };

    let shot = |angle: f32, speed: f32, variant: f32, lifetime: f32, behavior: Behavior| {
        ProjectileSpawn {
            origin,
            velocity: unit_from_angle(angle) * speed,
            damage: outgoing_damage(BASE_DAMAGE, crit_multiplier, tier, variant),
            radius: PLAYER_PROJECTILE_RADIUS,
            lifetime,
            from_player: true,
            behavior,
        }
    };

    match weapon {
        WeaponMod::Standard => {
            let count = 1 + (tier - 1) / 2;
            for angle in fan(heading, count, 0.12) {
                out.push(shot(angle, BASE_SPEED, 1.0, BASE_LIFETIME, Behavior::straight()));
            }
        }
        WeaponMod::Scatter => {
            let count = 3 + tier;
            let spacing = 0.5 / (count - 1) as f32;
            for angle in fan(heading, count, spacing) {
                out.push(shot(angle, BASE_SPEED, 0.6, 0.7, Behavior::straight()));
            }
        }
        WeaponMod::Homing => {
            let count = if tier >= 3 { 2 } else { 1 };
            let behavior = Behavior::straight().with_homing(Homing {
                turn_rate: 4.0,
                acquisition_radius: 260.0,
            });
            for angle in fan(heading, count, 0.3) {
                out.push(shot(angle, BASE_SPEED, 1.0, BASE_LIFETIME, behavior));
            }
        }
        WeaponMod::Piercing => {
            let behavior = Behavior::straight().with_pierce(1 + tier);
            out.push(shot(heading, BASE_SPEED, 1.0, BASE_LIFETIME, behavior));
        }
        WeaponMod::Chain => {
            let behavior = Behavior::straight().with_chain(1 + tier / 2, CHAIN_RANGE);
            let variant = 1.0 + tier as f32 * 0.1;
            out.push(shot(heading, BASE_SPEED, variant, BASE_LIFETIME, behavior));
        }
        WeaponMod::Nova => {
            let behavior = Behavior::straight().with_area(AreaEffect {
                radius: 70.0 + 8.0 * tier as f32,
                damage_factor: 0.5,
                trigger: AreaTrigger::OnHit,
                children: 0,
            });
            out.push(shot(heading, BASE_SPEED, 1.0, BASE_LIFETIME, behavior));
        }
        WeaponMod::Explosive => {
            let behavior = Behavior::straight().with_area(AreaEffect {
                radius: 90.0,
                damage_factor: 0.7,
                trigger: AreaTrigger::OnHit,
                children: 0,
            });
            out.push(shot(heading, BASE_SPEED, 1.0, BASE_LIFETIME, behavior));
        }
        WeaponMod::Cluster => {
            let behavior = Behavior::straight().with_area(AreaEffect {
                radius: 80.0,
                damage_factor: 0.7,
                trigger: AreaTrigger::OnHitOrExpiry,
                children: 3,
            });
            let flight = (offset.length() / BASE_SPEED).clamp(CLUSTER_MIN_FLIGHT, BASE_LIFETIME);
            out.push(shot(heading, BASE_SPEED, 1.0, flight, behavior));
        }
        WeaponMod::Laser => {
            let behavior = Behavior::straight().with_laser();
            out.push(shot(heading, LASER_SPEED, 1.1, BASE_LIFETIME, behavior));
        }
    }
}

/// Evenly fans `count` headings around `center`, `spacing` radians apart.
fn fan(center: f32, count: u32, spacing: f32) -> impl Iterator<Item = f32> {
    let first = center - spacing * (count.saturating_sub(1)) as f32 / 2.0;
    (0..count).map(move |index| first + spacing * index as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volley(weapon: WeaponMod, tier: u32) -> Vec<ProjectileSpawn> {
        let mut out = Vec::new();
        fire_volley(
            VolleyRequest {
                weapon,
                tier,
                crit_multiplier: 1.0,
                origin: Vec2::ZERO,
                aim: Vec2::new(100.0, 0.0),
            },
            &mut out,
        );
        out
    }

    #[test]
    fn tier_factor_matches_progression_curve() {
        assert!((tier_factor(1) - 1.0).abs() < 1e-6);
        assert!((tier_factor(3) - 1.44).abs() < 1e-6);
        assert_eq!(tier_factor(9), tier_factor(MAX_WEAPON_TIER));
    }

    #[test]
    fn crit_applies_before_tier_scaling() {
        let damage = outgoing_damage(10.0, 2.0, 2, 1.0);
        assert!((damage - 24.4).abs() < 1e-4);
    }

    #[test]
    fn chain_primary_bolt_gets_variant_factor() {
        let shots = volley(WeaponMod::Chain, 2);
        assert_eq!(shots.len(), 1);
        let expected = 10.0 * tier_factor(2) * 1.2;
        assert!((shots[0].damage - expected).abs() < 1e-4);
        assert_eq!(shots[0].behavior.chain().map(|chain| chain.bounces()), Some(2));
    }

    #[test]
    fn standard_volley_gains_barrels_with_tier() {
        assert_eq!(volley(WeaponMod::Standard, 1).len(), 1);
        assert_eq!(volley(WeaponMod::Standard, 3).len(), 2);
        assert_eq!(volley(WeaponMod::Standard, 5).len(), 3);
    }

    #[test]
    fn scatter_spreads_symmetrically() {
        let shots = volley(WeaponMod::Scatter, 1);
        assert_eq!(shots.len(), 4);
        let sum: f32 = shots.iter().map(|shot| shot.velocity.y).sum();
        assert!(sum.abs() < 1e-3);
    }

    #[test]
    fn cluster_flight_time_reaches_aim_point() {
        let shots = volley(WeaponMod::Cluster, 1);
        let expected = (100.0 / BASE_SPEED).max(CLUSTER_MIN_FLIGHT);
        assert!((shots[0].lifetime - expected).abs() < 1e-5);
    }

    #[test]
    fn piercing_count_grows_with_tier() {
        let shots = volley(WeaponMod::Piercing, 4);
        assert_eq!(shots[0].behavior.pierce(), Some(5));
    }
}
