#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile behavior model: motion, lifetime and on-hit variants.
//!
//! A [`Projectile`] owns its motion state, a [`Behavior`] describing which
//! variants apply (piercing, homing, chaining, area burst, laser) and the set
//! of entities it already damaged. The collision resolver decides *when* a hit
//! happens; this crate decides how the projectile reacts to it.

use collapse_arena_core::{
    angle_of, snapshot::ProjectilePose, unit_from_angle, wrap_angle, ArenaBounds, EntityId, Vec2,
};

pub mod weapon;

pub use weapon::{fire_volley, outgoing_damage, tier_factor, VolleyRequest};

/// Collision radius of player projectiles.
pub const PLAYER_PROJECTILE_RADIUS: f32 = 5.0;
/// Collision radius of hostile projectiles.
pub const HOSTILE_PROJECTILE_RADIUS: f32 = 6.0;
/// Seconds a hostile projectile survives.
pub const HOSTILE_PROJECTILE_LIFETIME: f32 = 3.0;
/// Damage retained after each chain bounce.
pub const CHAIN_DAMAGE_FACTOR: f32 = 0.75;
/// Distance outside the arena at which projectiles are discarded.
pub const OUT_OF_BOUNDS_MARGIN: f32 = 64.0;

/// Steering parameters for homing projectiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homing {
    /// Maximum heading change in radians per second.
    pub turn_rate: f32,
    /// Distance within which targets are acquired.
    pub acquisition_radius: f32,
}

/// When an area effect triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaTrigger {
    /// Bursts at the first hit only.
    OnHit,
    /// Bursts at the first hit, or where the projectile expires.
    OnHitOrExpiry,
}

/// Secondary area damage released by nova, explosive and cluster shots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaEffect {
    /// Burst radius.
    pub radius: f32,
    /// Fraction of the projectile damage dealt by the burst.
    pub damage_factor: f32,
    /// When the burst triggers.
    pub trigger: AreaTrigger,
    /// Delayed child blasts scattered around the burst point.
    pub children: u32,
}

/// Chain bounce parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Chain {
    bounces: u32,
    range: f32,
}

impl Chain {
    /// Bounces left.
    #[must_use]
    pub const fn bounces(&self) -> u32 {
        self.bounces
    }

    /// Distance within which a new target may be acquired.
    #[must_use]
    pub const fn range(&self) -> f32 {
        self.range
    }
}

/// Combination of variants applied to a projectile.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Behavior {
    pierce: Option<u32>,
    homing: Option<Homing>,
    chain: Option<Chain>,
    area: Option<AreaEffect>,
    laser: bool,
    slows: bool,
}

impl Behavior {
    /// Constant-velocity projectile destroyed on its first hit.
    #[must_use]
    pub fn straight() -> Self {
        Self::default()
    }

    /// Passes through up to `count` additional targets.
    #[must_use]
    pub fn with_pierce(mut self, count: u32) -> Self {
        self.pierce = Some(count);
        self
    }

    /// Steers toward the nearest eligible target.
    #[must_use]
    pub fn with_homing(mut self, homing: Homing) -> Self {
        self.homing = Some(homing);
        self
    }

    /// Retargets after lethal hits, up to `bounces` times.
    #[must_use]
    pub fn with_chain(mut self, bounces: u32, range: f32) -> Self {
        self.chain = Some(Chain { bounces, range });
        self
    }

    /// Releases an area burst.
    #[must_use]
    pub fn with_area(mut self, area: AreaEffect) -> Self {
        self.area = Some(area);
        self
    }

    /// Renders as a laser bolt.
    #[must_use]
    pub fn with_laser(mut self) -> Self {
        self.laser = true;
        self
    }

    /// Slows the player on hit.
    #[must_use]
    pub fn with_slow(mut self) -> Self {
        self.slows = true;
        self
    }

    /// Homing parameters, if any.
    #[must_use]
    pub const fn homing(&self) -> Option<Homing> {
        self.homing
    }

    /// Chain parameters, if any.
    #[must_use]
    pub const fn chain(&self) -> Option<Chain> {
        self.chain
    }

    /// Area effect, if any.
    #[must_use]
    pub const fn area(&self) -> Option<AreaEffect> {
        self.area
    }

    /// Remaining pierce count, if piercing.
    #[must_use]
    pub const fn pierce(&self) -> Option<u32> {
        self.pierce
    }

    /// Whether the projectile slows the player on hit.
    #[must_use]
    pub const fn slows(&self) -> bool {
        self.slows
    }
}

/// Everything required to create a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSpawn {
    /// Starting position.
    pub origin: Vec2,
    /// Starting velocity.
    pub velocity: Vec2,
    /// Damage dealt on hit, after crit and tier scaling.
    pub damage: f32,
    /// Collision radius.
    pub radius: f32,
    /// Seconds before expiry.
    pub lifetime: f32,
    /// Whether the player fired it.
    pub from_player: bool,
    /// Variant combination.
    pub behavior: Behavior,
}

impl ProjectileSpawn {
    /// Creates a straight hostile projectile aimed along `direction`.
    #[must_use]
    pub fn hostile(origin: Vec2, direction: Vec2, speed: f32, damage: f32) -> Self {
        Self {
            origin,
            velocity: direction.normalize_or_zero() * speed,
            damage,
            radius: HOSTILE_PROJECTILE_RADIUS,
            lifetime: HOSTILE_PROJECTILE_LIFETIME,
            from_player: false,
            behavior: Behavior::straight(),
        }
    }

    /// Replaces the behavior of the spawn.
    #[must_use]
    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }
}

/// A target the projectile may steer toward or chain onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetCandidate {
    /// Identifier of the target.
    pub id: EntityId,
    /// Position of the target.
    pub position: Vec2,
}

/// Entities a projectile already damaged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HitSet {
    hits: Vec<EntityId>,
}

impl HitSet {
    /// Reports whether the entity was already hit.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.hits.contains(&id)
    }

    /// Records a hit; returns `false` when the entity was already present.
    pub fn insert(&mut self, id: EntityId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.hits.push(id);
        true
    }

    /// Number of distinct entities hit.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Reports whether nothing was hit yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// How a projectile reacts after damaging a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitResponse {
    /// The projectile keeps flying.
    Continue,
    /// The projectile is destroyed.
    Destroy,
}

/// Outcome of advancing a projectile one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Still in flight.
    InFlight,
    /// Lifetime ran out or the projectile left the arena.
    Expired,
}

/// A projectile in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    position: Vec2,
    velocity: Vec2,
    damage: f32,
    radius: f32,
    lifetime: f32,
    from_player: bool,
    behavior: Behavior,
    hits: HitSet,
    spent: bool,
}

impl Projectile {
    /// Creates a projectile from its spawn description.
    #[must_use]
    pub fn new(spawn: ProjectileSpawn) -> Self {
        Self {
            position: spawn.origin,
            velocity: spawn.velocity,
            damage: spawn.damage,
            radius: spawn.radius,
            lifetime: spawn.lifetime,
            from_player: spawn.from_player,
            behavior: spawn.behavior,
            hits: HitSet::default(),
            spent: false,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Damage dealt by the next hit, before combo and class bonuses.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Collision radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Seconds left before expiry.
    #[must_use]
    pub const fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Whether the player fired it.
    #[must_use]
    pub const fn from_player(&self) -> bool {
        self.from_player
    }

    /// Variant combination.
    #[must_use]
    pub const fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Entities already damaged by this projectile.
    #[must_use]
    pub const fn hits(&self) -> &HitSet {
        &self.hits
    }

    /// Bounces left, zero for non-chaining projectiles.
    #[must_use]
    pub fn chain_bounces(&self) -> u32 {
        self.behavior.chain.map_or(0, |chain| chain.bounces)
    }

    /// Whether the projectile was destroyed and awaits removal.
    #[must_use]
    pub const fn is_spent(&self) -> bool {
        self.spent
    }

    /// Marks the projectile for removal at the end of the tick.
    pub fn destroy(&mut self) {
        self.spent = true;
    }

    /// Advances motion and lifetime by `dt` seconds.
    ///
    /// Homing projectiles first steer toward the nearest candidate inside their
    /// acquisition radius that they have not hit yet; with no candidate they
    /// continue straight.
    pub fn step(&mut self, dt: f32, candidates: &[TargetCandidate], bounds: &ArenaBounds) -> StepOutcome {
        if self.spent {
            return StepOutcome::Expired;
        }

        if let Some(homing) = self.behavior.homing {
            if let Some(target) = self.acquire(candidates, homing.acquisition_radius) {
                self.steer_toward(target.position, homing.turn_rate * dt);
            }
        }

        self.position += self.velocity * dt;
        self.lifetime -= dt;

        if self.lifetime <= 0.0 || !bounds.contains_with_margin(self.position, OUT_OF_BOUNDS_MARGIN) {
            return StepOutcome::Expired;
        }
        StepOutcome::InFlight
    }

    /// Records a hit on `target` and decides whether the projectile survives.
    ///
    /// Returns `None` when the target was already in the hit set, in which
    /// case no damage may be applied. Chain retargeting is handled separately
    /// through [`Projectile::retarget`].
    pub fn register_hit(&mut self, target: EntityId) -> Option<HitResponse> {
        if !self.hits.insert(target) {
            return None;
        }

        match self.behavior.pierce.as_mut() {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Some(HitResponse::Continue)
            }
            _ => Some(HitResponse::Destroy),
        }
    }

    /// Picks the nearest candidate for a chain bounce from `origin`.
    #[must_use]
    pub fn chain_target(&self, origin: Vec2, candidates: &[TargetCandidate]) -> Option<TargetCandidate> {
        let chain = self.behavior.chain?;
        if chain.bounces == 0 {
            return None;
        }
        nearest_unhit(&self.hits, origin, candidates, chain.range)
    }

    /// Redirects the projectile toward `target`, consuming one chain bounce.
    ///
    /// Returns `false` without changing anything when no bounce is left.
    pub fn retarget(&mut self, target: Vec2) -> bool {
        let Some(chain) = self.behavior.chain.as_mut() else {
            return false;
        };
        if chain.bounces == 0 {
            return false;
        }

        chain.bounces -= 1;
        self.damage *= CHAIN_DAMAGE_FACTOR;
        let speed = self.velocity.length();
        let direction = (target - self.position).normalize_or_zero();
        if direction != Vec2::ZERO {
            self.velocity = direction * speed;
        }
        true
    }

    /// Whether the projectile releases its area burst when it expires.
    #[must_use]
    pub fn bursts_on_expiry(&self) -> bool {
        matches!(
            self.behavior.area,
            Some(AreaEffect {
                trigger: AreaTrigger::OnHitOrExpiry,
                ..
            })
        )
    }

    /// Snapshot of the projectile for the renderer.
    #[must_use]
    pub fn pose(&self) -> ProjectilePose {
        ProjectilePose {
            position: self.position,
            velocity: self.velocity,
            radius: self.radius,
            from_player: self.from_player,
            laser: self.behavior.laser,
        }
    }

    fn acquire(&self, candidates: &[TargetCandidate], radius: f32) -> Option<TargetCandidate> {
        nearest_unhit(&self.hits, self.position, candidates, radius)
    }

    fn steer_toward(&mut self, target: Vec2, max_turn: f32) {
        let speed = self.velocity.length();
        if speed <= f32::EPSILON {
            return;
        }
        let offset = target - self.position;
        if offset.length_squared() <= f32::EPSILON {
            return;
        }

        let heading = angle_of(self.velocity);
        let desired = angle_of(offset);
        let delta = wrap_angle(desired - heading).clamp(-max_turn, max_turn);
        self.velocity = unit_from_angle(heading + delta) * speed;
    }
}

fn nearest_unhit(
    hits: &HitSet,
    origin: Vec2,
    candidates: &[TargetCandidate],
    radius: f32,
) -> Option<TargetCandidate> {
    let max_distance = radius * radius;
    candidates
        .iter()
        .filter(|candidate| !hits.contains(candidate.id))
        .map(|candidate| (candidate.position.distance_squared(origin), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .min_by(|(a, first), (b, second)| {
            a.total_cmp(b).then_with(|| first.id.cmp(&second.id))
        })
        .map(|(_, candidate)| *candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> ArenaBounds {
        ArenaBounds::new(1_000.0, 1_000.0)
    }

    fn player_shot(behavior: Behavior) -> Projectile {
        Projectile::new(ProjectileSpawn {
            origin: Vec2::new(100.0, 100.0),
            velocity: Vec2::new(400.0, 0.0),
            damage: 10.0,
            radius: PLAYER_PROJECTILE_RADIUS,
            lifetime: 1.0,
            from_player: true,
            behavior,
        })
    }

    #[test]
    fn straight_shot_moves_linearly_and_expires() {
        let mut shot = player_shot(Behavior::straight());
        assert_eq!(shot.step(0.5, &[], &bounds()), StepOutcome::InFlight);
        assert_eq!(shot.position(), Vec2::new(300.0, 100.0));
        assert_eq!(shot.step(0.5, &[], &bounds()), StepOutcome::Expired);
    }

    #[test]
    fn leaving_the_arena_expires_the_shot() {
        let mut shot = player_shot(Behavior::straight());
        let tiny = ArenaBounds::new(150.0, 150.0);
        assert_eq!(shot.step(0.5, &[], &tiny), StepOutcome::Expired);
    }

    #[test]
    fn homing_turn_is_bounded_and_speed_preserved() {
        let homing = Homing {
            turn_rate: 1.0,
            acquisition_radius: 500.0,
        };
        let mut shot = player_shot(Behavior::straight().with_homing(homing));
        let target = TargetCandidate {
            id: EntityId::new(1),
            position: Vec2::new(100.0, 400.0),
        };

        let _ = shot.step(0.1, &[target], &bounds());

        let heading = angle_of(shot.velocity());
        assert!((heading - 0.1).abs() < 1e-4, "turned {heading} radians");
        assert!((shot.velocity().length() - 400.0).abs() < 1e-3);
    }

    #[test]
    fn homing_without_target_flies_straight() {
        let homing = Homing {
            turn_rate: 10.0,
            acquisition_radius: 50.0,
        };
        let mut shot = player_shot(Behavior::straight().with_homing(homing));
        let far = TargetCandidate {
            id: EntityId::new(1),
            position: Vec2::new(900.0, 900.0),
        };
        let _ = shot.step(0.1, &[far], &bounds());
        assert_eq!(shot.velocity(), Vec2::new(400.0, 0.0));
    }

    #[test]
    fn non_piercing_shot_is_destroyed_on_first_hit() {
        let mut shot = player_shot(Behavior::straight());
        assert_eq!(
            shot.register_hit(EntityId::new(3)),
            Some(HitResponse::Destroy)
        );
    }

    #[test]
    fn piercing_shot_never_hits_the_same_target_twice() {
        let mut shot = player_shot(Behavior::straight().with_pierce(2));
        assert_eq!(
            shot.register_hit(EntityId::new(1)),
            Some(HitResponse::Continue)
        );
        assert_eq!(shot.register_hit(EntityId::new(1)), None);
        assert_eq!(
            shot.register_hit(EntityId::new(2)),
            Some(HitResponse::Continue)
        );
        assert_eq!(
            shot.register_hit(EntityId::new(3)),
            Some(HitResponse::Destroy)
        );
        assert_eq!(shot.hits().len(), 3);
    }

    #[test]
    fn retarget_consumes_bounce_and_reduces_damage() {
        let mut shot = player_shot(Behavior::straight().with_chain(2, 200.0));
        assert!(shot.retarget(Vec2::new(100.0, 300.0)));
        assert_eq!(shot.chain_bounces(), 1);
        assert!((shot.damage() - 7.5).abs() < 1e-5);
        assert!(shot.velocity().y > 0.0);
        assert!((shot.velocity().length() - 400.0).abs() < 1e-3);

        assert!(shot.retarget(Vec2::new(0.0, 0.0)));
        assert!(!shot.retarget(Vec2::new(0.0, 0.0)));
        assert_eq!(shot.chain_bounces(), 0);
    }

    #[test]
    fn chain_target_skips_already_hit_and_out_of_range() {
        let mut shot = player_shot(Behavior::straight().with_chain(1, 100.0));
        let _ = shot.register_hit(EntityId::new(1));
        let candidates = [
            TargetCandidate {
                id: EntityId::new(1),
                position: Vec2::new(110.0, 100.0),
            },
            TargetCandidate {
                id: EntityId::new(2),
                position: Vec2::new(400.0, 100.0),
            },
            TargetCandidate {
                id: EntityId::new(3),
                position: Vec2::new(150.0, 150.0),
            },
        ];
        let picked = shot.chain_target(Vec2::new(100.0, 100.0), &candidates);
        assert_eq!(picked.map(|candidate| candidate.id), Some(EntityId::new(3)));
    }

    #[test]
    fn cluster_shells_burst_on_expiry() {
        let shell = player_shot(Behavior::straight().with_area(AreaEffect {
            radius: 80.0,
            damage_factor: 0.7,
            trigger: AreaTrigger::OnHitOrExpiry,
            children: 3,
        }));
        assert!(shell.bursts_on_expiry());
        assert!(!player_shot(Behavior::straight()).bursts_on_expiry());
    }
}
