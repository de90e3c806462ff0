//! Read-only snapshots handed to the renderer and HUD collaborators.

use glam::Vec2;

use crate::{
    AiState, ArenaBounds, BossKind, EnemyKind, EntityId, PickupId, PickupKind, PlayerClass,
    TurretId, WeaponMod,
};

/// Presentation flags shared by every entity pose.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VisualFlags {
    /// The entity was hit within the last few frames.
    pub flashing: bool,
    /// The entity cannot currently be hit.
    pub phased: bool,
    /// The entity is disguised as something harmless.
    pub disguised: bool,
    /// The entity is playing its death animation.
    pub dying: bool,
    /// Facing of a directional shield in radians, if any.
    pub shield_facing: Option<f32>,
}

/// Pose of the player for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPose {
    /// World position.
    pub position: Vec2,
    /// Point the player is aiming at, if any.
    pub aim: Option<Vec2>,
    /// Remaining health as a fraction of the maximum.
    pub health_fraction: f32,
    /// Whether invulnerability frames are active.
    pub invulnerable: bool,
    /// Presentation flags.
    pub flags: VisualFlags,
}

/// Pose of an enemy for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPose {
    /// Identifier of the enemy.
    pub id: EntityId,
    /// Archetype.
    pub kind: EnemyKind,
    /// World position.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// AI state.
    pub state: AiState,
    /// Remaining health as a fraction of the maximum.
    pub health_fraction: f32,
    /// Presentation flags.
    pub flags: VisualFlags,
}

/// Pose of the boss for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct BossPose {
    /// Identifier of the boss.
    pub id: EntityId,
    /// Archetype.
    pub kind: BossKind,
    /// World position of the core.
    pub position: Vec2,
    /// Current core radius.
    pub radius: f32,
    /// Current phase.
    pub phase: u32,
    /// Remaining health as a fraction of the maximum.
    pub health_fraction: f32,
    /// Whether the spawn-in animation is still playing.
    pub intro: bool,
    /// Whether the death cinematic is playing.
    pub dying: bool,
    /// Positions of archetype satellites (cells, clones, spikes, ring centres).
    pub satellites: Vec<Vec2>,
}

/// Pose of a projectile for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePose {
    /// World position.
    pub position: Vec2,
    /// Velocity, used to orient lasers.
    pub velocity: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Whether the player fired it.
    pub from_player: bool,
    /// Whether it renders as a laser bolt.
    pub laser: bool,
}

/// Pose of a pickup for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupPose {
    /// Identifier of the pickup.
    pub id: PickupId,
    /// Pickup contents.
    pub kind: PickupKind,
    /// World position.
    pub position: Vec2,
    /// Fraction of the pickup lifetime already elapsed.
    pub age_fraction: f32,
}

/// Pose of a turret for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretPose {
    /// Identifier of the turret.
    pub id: TurretId,
    /// World position.
    pub position: Vec2,
}

/// Everything the renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    /// Full arena rectangle.
    pub arena: ArenaBounds,
    /// Current safe rectangle; smaller than the arena while collapsing.
    pub safe_area: ArenaBounds,
    /// Player pose.
    pub player: PlayerPose,
    /// Enemy poses in identifier order.
    pub enemies: Vec<EnemyPose>,
    /// Boss pose, when a boss is present.
    pub boss: Option<BossPose>,
    /// Projectile poses.
    pub projectiles: Vec<ProjectilePose>,
    /// Pickup poses.
    pub pickups: Vec<PickupPose>,
    /// Turret poses.
    pub turrets: Vec<TurretPose>,
}

/// Aggregated run state for the HUD collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudState {
    /// Current player health.
    pub health: f32,
    /// Maximum player health.
    pub max_health: f32,
    /// Tokens collected this run.
    pub tokens: u32,
    /// Special ability charges available.
    pub charges: u32,
    /// Current kill streak.
    pub combo: u32,
    /// Damage multiplier granted by the streak.
    pub combo_multiplier: f32,
    /// Zero-based run layer.
    pub layer: u32,
    /// Zero-based zone.
    pub zone: u32,
    /// Whether context collapse is shrinking the arena.
    pub collapse: bool,
    /// Player class.
    pub class: PlayerClass,
    /// Active weapon modifier.
    pub weapon: WeaponMod,
    /// Active weapon tier.
    pub tier: u32,
    /// Boss health fraction, when a boss is present.
    pub boss_health: Option<f32>,
}
