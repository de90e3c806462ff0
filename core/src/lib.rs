#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Collapse Arena simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the combat systems. Adapters submit [`Command`]
//! values once per rendered frame, the world executes them through its
//! `apply` entry point, and then reports [`Event`] values describing what
//! happened during the tick. Collaborators such as audio, rendering and the
//! HUD only ever observe the simulation through events, the [`AudioSink`]
//! capability, and the read-only snapshots in [`snapshot`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;
pub mod config;
pub mod snapshot;

pub use catalog::{BossKind, BossStats, EnemyKind, EnemyStats, PlayerClass, WeaponMod};
pub use config::{
    ArenaConfig, CollapseTuning, ComboTier, ComboTuning, ConfigError, PickupTuning,
    ScalingTuning, WaveTuning, ZoneConfig,
};
pub use glam::Vec2;

/// Canonical banner emitted when a run boots.
pub const WELCOME_BANNER: &str = "Welcome to Collapse Arena.";

/// Highest weapon tier reachable through progression.
pub const MAX_WEAPON_TIER: u32 = 5;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one frame using the sampled input.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
        /// Player intent sampled once for this frame.
        input: FrameInput,
    },
    /// Ends the current run immediately, tearing down all pending timers.
    AbandonRun,
}

/// Player intent sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Normalized movement intent. Longer vectors are clamped to unit length.
    pub movement: Vec2,
    /// Whether the player is holding the fire control.
    pub firing: bool,
    /// Edge-triggered request to use the class special ability this frame.
    pub special: bool,
}

impl FrameInput {
    /// Creates an input sample with the provided intents.
    #[must_use]
    pub const fn new(movement: Vec2, firing: bool, special: bool) -> Self {
        Self {
            movement,
            firing,
            special,
        }
    }

    /// Movement intent clamped to at most unit length.
    #[must_use]
    pub fn clamped_movement(&self) -> Vec2 {
        if self.movement.length_squared() > 1.0 {
            self.movement.normalize_or_zero()
        } else {
            self.movement
        }
    }
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a new run began with the provided seed.
    RunStarted {
        /// Seed driving every random roll of the run.
        seed: u64,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the spawn queue for a wave layer was built.
    WaveStarted {
        /// Zero-based run layer.
        layer: u32,
        /// Zero-based zone containing the layer.
        zone: u32,
        /// Number of enemies the wave will spawn.
        total: u32,
    },
    /// Confirms that an enemy entered the arena.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        id: EntityId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Position the enemy spawned at.
        position: Vec2,
    },
    /// Reports damage dealt to an enemy.
    EnemyDamaged {
        /// Identifier of the damaged enemy.
        id: EntityId,
        /// Health removed by the hit.
        amount: f32,
    },
    /// Reports that an enemy reached zero health.
    EnemyKilled {
        /// Identifier of the enemy.
        id: EntityId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Location of the kill.
        position: Vec2,
    },
    /// Reports that a chaining projectile retargeted.
    ProjectileChained {
        /// Enemy the projectile bounced off.
        from: EntityId,
        /// Enemy the projectile now travels toward.
        to: EntityId,
        /// Bounces remaining after this retarget.
        remaining: u32,
    },
    /// Reports an area-of-effect burst resolving.
    AreaBurst {
        /// Centre of the burst.
        center: Vec2,
        /// Radius of the burst.
        radius: f32,
    },
    /// Reports damage dealt to the player.
    PlayerDamaged {
        /// Health removed.
        amount: f32,
        /// What dealt the damage.
        source: DamageSource,
    },
    /// Reports healing applied to the player.
    PlayerHealed {
        /// Health restored.
        amount: f32,
    },
    /// Reports that the player triggered the class special ability.
    SpecialUsed {
        /// Class whose ability fired.
        class: PlayerClass,
    },
    /// Reports a pickup dropping into the arena.
    PickupSpawned {
        /// Identifier of the pickup.
        id: PickupId,
        /// Pickup contents.
        kind: PickupKind,
        /// Drop location.
        position: Vec2,
    },
    /// Reports the player collecting a pickup.
    PickupCollected {
        /// Identifier of the pickup.
        id: PickupId,
        /// Pickup contents.
        kind: PickupKind,
    },
    /// Reports that the kill combo advanced.
    ComboChanged {
        /// Current streak length.
        count: u32,
    },
    /// Reports that the kill combo returned to zero.
    ComboReset {
        /// Streak length before the reset.
        previous: u32,
    },
    /// Announces the intro sequence of a boss layer.
    BossIntroStarted {
        /// Archetype about to enter.
        kind: BossKind,
    },
    /// Confirms that a boss entered the arena.
    BossSpawned {
        /// Identifier assigned to the boss.
        id: EntityId,
        /// Archetype of the boss.
        kind: BossKind,
    },
    /// Reports damage dealt to the boss.
    BossDamaged {
        /// Health removed after archetype modifiers.
        amount: f32,
    },
    /// Reports a boss crossing one of its health thresholds.
    BossPhaseChanged {
        /// Archetype of the boss.
        kind: BossKind,
        /// Phase entered by the transition.
        phase: u32,
    },
    /// Reports the boss reaching zero health and starting its death cinematic.
    BossDied {
        /// Archetype of the boss.
        kind: BossKind,
    },
    /// Reports the boss death cinematic completing and the instance leaving.
    BossDefeated {
        /// Archetype of the boss.
        kind: BossKind,
    },
    /// Announces that context collapse started shrinking the safe arena.
    CollapseStarted {
        /// Layer on which the collapse began.
        layer: u32,
    },
    /// Announces that a layer was cleared.
    LayerCleared {
        /// Zero-based run layer that was cleared.
        layer: u32,
    },
    /// Announces that the player died, ending the run.
    PlayerDied {
        /// Layer the player died on.
        layer: u32,
    },
    /// Announces that the final layer was cleared.
    Victory,
}

/// Origin of damage applied to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// Hostile projectile.
    Projectile,
    /// Continuous body contact with an enemy or boss.
    Contact,
    /// Melee strike or lunge.
    Melee,
    /// Explosion or boss hazard.
    Hazard,
    /// Standing outside the collapsed safe arena.
    Collapse,
}

/// Contents of a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores player health.
    Health,
    /// Currency; every few tokens grants a special charge.
    Token,
    /// Swaps the active weapon modifier.
    Weapon(WeaponMod),
}

/// Finite-state-machine state shared by every enemy archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiState {
    /// Patrolling slowly around the spawn origin.
    Idle,
    /// Noticed the player and about to give chase.
    Alert,
    /// Pursuing the player.
    Chase,
    /// Executing an attack.
    Attack,
    /// Dead and playing the death animation.
    Dead,
}

/// Unique identifier assigned to an enemy or boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a deployed turret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TurretId(u32);

impl TurretId {
    /// Creates a new turret identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Axis-aligned rectangle bounding the playable arena.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    min: Vec2,
    max: Vec2,
}

impl ArenaBounds {
    /// Creates bounds anchored at the origin with the provided dimensions.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width.max(0.0), height.max(0.0)),
        }
    }

    /// Upper-left corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Lower-right corner.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Centre point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Reports whether the point lies inside the rectangle grown by `margin`.
    #[must_use]
    pub fn contains_with_margin(&self, point: Vec2, margin: f32) -> bool {
        point.x >= self.min.x - margin
            && point.x <= self.max.x + margin
            && point.y >= self.min.y - margin
            && point.y <= self.max.y + margin
    }

    /// Clamps a circle centre so the circle stays fully inside the rectangle.
    #[must_use]
    pub fn clamp_circle(&self, center: Vec2, radius: f32) -> Vec2 {
        let inset = Vec2::splat(radius);
        let low = self.min + inset;
        let high = (self.max - inset).max(low);
        center.clamp(low, high)
    }

    /// Returns a rectangle scaled around the same centre.
    ///
    /// `fraction` is clamped to `0.0..=1.0`; a fraction of one returns the
    /// rectangle unchanged.
    #[must_use]
    pub fn scaled(&self, fraction: f32) -> Self {
        let fraction = fraction.clamp(0.0, 1.0);
        let center = self.center();
        let half = Vec2::new(self.width(), self.height()) * 0.5 * fraction;
        Self {
            min: center - half,
            max: center + half,
        }
    }
}

/// Health pool clamped to `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Creates a full health pool. Negative maxima are treated as zero.
    #[must_use]
    pub fn full(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Remaining health.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Maximum health.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Remaining health as a fraction of the maximum.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    /// Reports whether the pool is empty.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Removes health and reports whether this call emptied the pool.
    ///
    /// Only the call that moves the pool from positive to zero reports
    /// `true`; hits on an already empty pool are ignored.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.is_depleted() || !(amount > 0.0) {
            return false;
        }
        self.current = (self.current - amount).clamp(0.0, self.max);
        self.is_depleted()
    }

    /// Restores health up to the maximum and returns the amount applied.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.is_depleted() || !(amount > 0.0) {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + amount).clamp(0.0, self.max);
        self.current - before
    }
}

/// Discrete sounds the simulation asks the audio collaborator to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// A hit landed on an enemy or boss.
    Hit,
    /// An enemy died.
    Kill,
    /// An area burst resolved.
    Explosion,
    /// The player took damage.
    PlayerHurt,
    /// A pickup was collected.
    Pickup,
    /// The class special ability fired.
    Special,
    /// A boss intro started.
    BossIntro,
    /// A boss changed phase.
    BossPhase,
    /// A boss died.
    BossDeath,
    /// Context collapse began.
    Collapse,
    /// A layer was cleared.
    LayerCleared,
    /// The player died.
    Defeat,
    /// The run was won.
    Victory,
}

impl SoundCue {
    /// Maps a simulation event onto the sound it should trigger, if any.
    #[must_use]
    pub fn for_event(event: &Event) -> Option<Self> {
        let cue = match event {
            Event::EnemyDamaged { .. } | Event::BossDamaged { .. } => Self::Hit,
            Event::EnemyKilled { .. } => Self::Kill,
            Event::AreaBurst { .. } => Self::Explosion,
            Event::PlayerDamaged { .. } => Self::PlayerHurt,
            Event::PickupCollected { .. } => Self::Pickup,
            Event::SpecialUsed { .. } => Self::Special,
            Event::BossIntroStarted { .. } => Self::BossIntro,
            Event::BossPhaseChanged { .. } => Self::BossPhase,
            Event::BossDied { .. } => Self::BossDeath,
            Event::CollapseStarted { .. } => Self::Collapse,
            Event::LayerCleared { .. } => Self::LayerCleared,
            Event::PlayerDied { .. } => Self::Defeat,
            Event::Victory => Self::Victory,
            _ => return None,
        };
        Some(cue)
    }
}

/// Failure reported by an external collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The collaborator is not ready to accept requests.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
    /// The collaborator rejected the request.
    #[error("collaborator rejected request: {0}")]
    Rejected(String),
}

/// Fire-and-forget audio capability injected into the simulation.
///
/// Failures are reported back so the caller can log them; they never affect
/// simulation state.
pub trait AudioSink {
    /// Requests playback of the provided cue.
    fn play(&mut self, cue: SoundCue) -> Result<(), SinkError>;
}

/// Audio sink that discards every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Builds a unit vector pointing along the provided angle in radians.
#[must_use]
pub fn unit_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle in radians of the provided vector, measured from the positive x axis.
#[must_use]
pub fn angle_of(vector: Vec2) -> f32 {
    vector.y.atan2(vector.x)
}

/// Wraps an angle into the `-PI..=PI` range.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let tau = std::f32::consts::TAU;
    let mut wrapped = angle % tau;
    if wrapped > std::f32::consts::PI {
        wrapped -= tau;
    } else if wrapped < -std::f32::consts::PI {
        wrapped += tau;
    }
    wrapped
}

/// Reports whether two circles overlap.
#[must_use]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn health_clamps_overkill_to_zero() {
        let mut health = Health::full(10.0);
        assert!(health.apply_damage(15.0));
        assert_eq!(health.current(), 0.0);
        assert!(!health.apply_damage(5.0), "dead pools never report lethal twice");
    }

    #[test]
    fn health_ignores_negative_and_nan_damage() {
        let mut health = Health::full(10.0);
        assert!(!health.apply_damage(-4.0));
        assert!(!health.apply_damage(f32::NAN));
        assert_eq!(health.current(), 10.0);
    }

    #[test]
    fn heal_never_exceeds_maximum() {
        let mut health = Health::full(20.0);
        let _ = health.apply_damage(5.0);
        assert_eq!(health.heal(50.0), 5.0);
        assert_eq!(health.current(), 20.0);
    }

    #[test]
    fn scaled_bounds_share_centre() {
        let bounds = ArenaBounds::new(200.0, 100.0);
        let half = bounds.scaled(0.5);
        assert_eq!(half.center(), bounds.center());
        assert!((half.width() - 100.0).abs() < f32::EPSILON);
        assert!((half.height() - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn clamp_circle_keeps_circle_inside() {
        let bounds = ArenaBounds::new(100.0, 100.0);
        let clamped = bounds.clamp_circle(Vec2::new(-30.0, 140.0), 10.0);
        assert_eq!(clamped, Vec2::new(10.0, 90.0));
    }

    #[test]
    fn wrap_angle_stays_in_range() {
        for step in -20..20 {
            let wrapped = wrap_angle(step as f32 * 1.3);
            assert!(wrapped <= std::f32::consts::PI + 1e-5);
            assert!(wrapped >= -std::f32::consts::PI - 1e-5);
        }
    }

    #[test]
    fn clamped_movement_limits_diagonals() {
        let input = FrameInput::new(Vec2::new(1.0, 1.0), false, false);
        assert!((input.clamped_movement().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn pickup_kind_round_trips_through_bincode() {
        assert_round_trip(&PickupKind::Weapon(WeaponMod::Chain));
    }

    #[test]
    fn entity_id_round_trips_through_bincode() {
        assert_round_trip(&EntityId::new(42));
    }

    #[test]
    fn sound_cues_cover_terminal_events() {
        assert_eq!(SoundCue::for_event(&Event::Victory), Some(SoundCue::Victory));
        assert_eq!(
            SoundCue::for_event(&Event::PlayerDied { layer: 2 }),
            Some(SoundCue::Defeat)
        );
        assert_eq!(
            SoundCue::for_event(&Event::TimeAdvanced {
                dt: Duration::from_millis(16)
            }),
            None
        );
    }
}
