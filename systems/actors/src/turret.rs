//! Engineer turrets: stationary emplacements that shoot the nearest enemy.

use collapse_arena_core::{snapshot::TurretPose, TurretId, Vec2};
use collapse_arena_system_projectiles::{
    outgoing_damage,
    weapon::{BASE_DAMAGE, BASE_LIFETIME, BASE_SPEED},
    Behavior, ProjectileSpawn, TargetCandidate, PLAYER_PROJECTILE_RADIUS,
};

/// Seconds between turret shots.
pub const TURRET_FIRE_INTERVAL_SECS: f32 = 0.4;
/// Distance within which a turret engages.
pub const TURRET_RANGE: f32 = 320.0;

const TURRET_DAMAGE_FACTOR: f32 = 0.6;

/// A deployed turret.
#[derive(Clone, Debug, PartialEq)]
pub struct Turret {
    id: TurretId,
    position: Vec2,
    fire_timer: f32,
}

impl Turret {
    /// Deploys a turret ready to fire.
    #[must_use]
    pub fn new(id: TurretId, position: Vec2) -> Self {
        Self {
            id,
            position,
            fire_timer: 0.0,
        }
    }

    /// Identifier of the turret.
    #[must_use]
    pub const fn id(&self) -> TurretId {
        self.id
    }

    /// Deployment position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Advances the reload timer and fires at the nearest target in range.
    ///
    /// Returns whether a shot was appended to `out`.
    pub fn update(
        &mut self,
        dt: f32,
        tier: u32,
        targets: &[TargetCandidate],
        out: &mut Vec<ProjectileSpawn>,
    ) -> bool {
        self.fire_timer = (self.fire_timer - dt).max(0.0);
        if self.fire_timer > 0.0 {
            return false;
        }

        let reach = TURRET_RANGE * TURRET_RANGE;
        let nearest = targets
            .iter()
            .map(|target| (target.position.distance_squared(self.position), target))
            .filter(|(distance, _)| *distance <= reach)
            .min_by(|(a, first), (b, second)| a.total_cmp(b).then_with(|| first.id.cmp(&second.id)));
        let Some((_, target)) = nearest else {
            return false;
        };

        let direction = (target.position - self.position).normalize_or_zero();
        out.push(ProjectileSpawn {
            origin: self.position,
            velocity: direction * BASE_SPEED,
            damage: outgoing_damage(BASE_DAMAGE, 1.0, tier, TURRET_DAMAGE_FACTOR),
            radius: PLAYER_PROJECTILE_RADIUS,
            lifetime: BASE_LIFETIME,
            from_player: true,
            behavior: Behavior::straight(),
        });
        self.fire_timer = TURRET_FIRE_INTERVAL_SECS;
        true
    }

    /// Snapshot of the turret for the renderer.
    #[must_use]
    pub fn pose(&self) -> TurretPose {
        TurretPose {
            id: self.id,
            position: self.position,
        }
    }
}
