//! Enemy archetypes layered on a shared idle/alert/chase/attack skeleton.
//!
//! Every enemy runs the same state machine. The archetype only decides how
//! the enemy moves while chasing, what an attack does, and which timers it
//! carries; that auxiliary state lives in a private archetype variant so
//! no enemy carries fields for another archetype.

use collapse_arena_core::{
    angle_of,
    snapshot::{EnemyPose, VisualFlags},
    unit_from_angle, wrap_angle, AiState, ArenaBounds, EnemyKind, EnemyStats, EntityId, Health,
    Vec2,
};
use collapse_arena_system_projectiles::{Behavior, ProjectileSpawn};

use crate::{approach, PLAYER_RADIUS};

const ALERT_SECS: f32 = 0.25;
const DEATH_SECS: f32 = 0.4;
const FLASH_SECS: f32 = 0.1;
const PATROL_SPEED_FACTOR: f32 = 0.35;
const PATROL_RADIUS: f32 = 40.0;
const PATROL_TURN_RATE: f32 = 0.8;
const LOSE_INTEREST_FACTOR: f32 = 1.5;
const KITE_INNER_FACTOR: f32 = 0.6;
const SNIPER_INNER_FACTOR: f32 = 0.5;

const LUNGE_WINDUP_SECS: f32 = 0.35;
const LUNGE_SECS: f32 = 0.3;
const LUNGE_SPEED_FACTOR: f32 = 3.5;
const MIMIC_REVEAL_SECS: f32 = 0.6;
const MIMIC_SPEED_FACTOR: f32 = 1.3;
const WARDEN_TURN_RATE: f32 = 2.0;
const PHANTOM_SOLID_SECS: f32 = 3.0;
const PHANTOM_PHASED_SECS: f32 = 2.0;
const BOMBER_FUSE_SECS: f32 = 0.8;
const SNIPER_AIM_SECS: f32 = 1.0;
const ORBIT_FACTOR: f32 = 0.7;
const SUMMON_INTERVAL_SECS: f32 = 4.0;
const SUMMON_COUNT: u32 = 2;
const GLITCH_INTERVAL_SECS: f32 = 4.0;
const GLITCH_SPEED_FACTOR: f32 = 1.8;

const SPITTER_SHOT_SPEED: f32 = 260.0;
const WARDEN_SHOT_SPEED: f32 = 180.0;
const SNIPER_SHOT_SPEED: f32 = 700.0;
const ORBITER_SHOT_SPEED: f32 = 300.0;
const SUMMONER_SHOT_SPEED: f32 = 220.0;

/// Full angular width of the warden shield in radians (110 degrees).
pub const WARDEN_SHIELD_ARC: f32 = 110.0 * std::f32::consts::PI / 180.0;
/// Radius of a bomber detonation.
pub const BOMBER_BLAST_RADIUS: f32 = 70.0;
/// Seconds a glitch window stays open.
pub const GLITCH_WINDOW_SECS: f32 = 1.5;

/// Stage of a lunger attack.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Lunge {
    Ready,
    Windup(f32),
    Committed {
        remaining: f32,
        direction: Vec2,
        struck: bool,
    },
}

/// Per-archetype auxiliary state.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Archetype {
    Chaser,
    Spitter,
    Lunger(Lunge),
    Mimic { disguised: bool, reveal: Option<f32> },
    Warden { facing: f32 },
    Splitter,
    Phantom { phased: bool, timer: f32 },
    Bomber { fuse: Option<f32> },
    Sniper { aim: Option<f32> },
    Orbiter { clockwise: bool },
    Leech,
    Summoner { cooldown: f32 },
    Glitch { open: bool, cooldown: f32 },
}

impl Archetype {
    fn for_kind(kind: EnemyKind, id: EntityId) -> Self {
        match kind {
            EnemyKind::Crawler | EnemyKind::Sprinter | EnemyKind::Brute | EnemyKind::Mini => {
                Self::Chaser
            }
            EnemyKind::Spitter => Self::Spitter,
            EnemyKind::Lunger => Self::Lunger(Lunge::Ready),
            EnemyKind::Mimic => Self::Mimic {
                disguised: true,
                reveal: None,
            },
            EnemyKind::Warden => Self::Warden { facing: 0.0 },
            EnemyKind::Splitter => Self::Splitter,
            EnemyKind::Phantom => Self::Phantom {
                phased: false,
                timer: PHANTOM_SOLID_SECS,
            },
            EnemyKind::Bomber => Self::Bomber { fuse: None },
            EnemyKind::Sniper => Self::Sniper { aim: None },
            EnemyKind::Orbiter => Self::Orbiter {
                clockwise: id.get() % 2 == 0,
            },
            EnemyKind::Leech => Self::Leech,
            EnemyKind::Summoner => Self::Summoner {
                cooldown: SUMMON_INTERVAL_SECS,
            },
            EnemyKind::Glitch => Self::Glitch {
                open: false,
                cooldown: GLITCH_INTERVAL_SECS,
            },
        }
    }
}

/// Intent reported by an enemy during its update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyAction {
    /// Launches a hostile projectile.
    Fire(ProjectileSpawn),
    /// Melee strike that connects with the player.
    Strike {
        /// Enemy that struck.
        attacker: EntityId,
        /// Damage of the strike.
        damage: f32,
    },
    /// Self-destruct damaging the player inside the radius.
    Explode {
        /// Enemy that detonated.
        attacker: EntityId,
        /// Centre of the blast.
        center: Vec2,
        /// Blast radius.
        radius: f32,
        /// Damage dealt to the player inside the radius.
        damage: f32,
    },
    /// Requests child enemies around a point.
    Summon {
        /// Enemy that summoned.
        parent: EntityId,
        /// Archetype of the children.
        kind: EnemyKind,
        /// Number of children.
        count: u32,
        /// Point the children appear around.
        center: Vec2,
    },
    /// A glitch window opened; the world closes it after `duration` seconds.
    GlitchOpened {
        /// Enemy that glitched.
        id: EntityId,
        /// Seconds before the window should close.
        duration: f32,
    },
}

/// Outcome of one enemy update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnemyStep {
    /// The enemy performed an attack this step.
    pub attacked: bool,
    /// The death animation completed and the enemy may be removed.
    pub died: bool,
}

/// A live or dying enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: EntityId,
    kind: EnemyKind,
    position: Vec2,
    origin: Vec2,
    health: Health,
    stats: EnemyStats,
    state: AiState,
    alert_timer: f32,
    attack_timer: f32,
    flash_timer: f32,
    death_timer: f32,
    patrol_angle: f32,
    removable: bool,
    archetype: Archetype,
}

impl Enemy {
    /// Creates an idle enemy at `position` with already scaled `stats`.
    #[must_use]
    pub fn new(id: EntityId, kind: EnemyKind, position: Vec2, stats: EnemyStats) -> Self {
        Self {
            id,
            kind,
            position,
            origin: position,
            health: Health::full(stats.health),
            stats,
            state: AiState::Idle,
            alert_timer: 0.0,
            attack_timer: 0.0,
            flash_timer: 0.0,
            death_timer: 0.0,
            patrol_angle: id.get() as f32,
            removable: false,
            archetype: Archetype::for_kind(kind, id),
        }
    }

    /// Identifier of the enemy.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Archetype of the enemy.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Collision radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.stats.radius
    }

    /// Health pool.
    #[must_use]
    pub const fn health(&self) -> &Health {
        &self.health
    }

    /// Scaled stats.
    #[must_use]
    pub const fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    /// Current AI state.
    #[must_use]
    pub const fn state(&self) -> AiState {
        self.state
    }

    /// Reports whether the enemy can still act and be hit.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state != AiState::Dead
    }

    /// Reports whether the enemy finished dying and should leave the arena.
    #[must_use]
    pub const fn is_removable(&self) -> bool {
        self.removable
    }

    /// Reports whether the enemy is currently out of phase with collisions.
    #[must_use]
    pub fn is_phased(&self) -> bool {
        matches!(
            self.archetype,
            Archetype::Phantom { phased: true, .. } | Archetype::Glitch { open: true, .. }
        )
    }

    /// Reports whether the enemy still looks like something harmless.
    #[must_use]
    pub fn is_disguised(&self) -> bool {
        matches!(self.archetype, Archetype::Mimic { disguised: true, .. })
    }

    /// Reports whether projectiles and contact checks may touch the enemy.
    #[must_use]
    pub fn is_targetable(&self) -> bool {
        self.is_alive() && !self.is_phased()
    }

    /// Continuous damage per second dealt while overlapping the player.
    #[must_use]
    pub fn contact_damage_per_sec(&self) -> f32 {
        self.stats.damage * 0.5
    }

    /// Facing of the directional shield, if the archetype carries one.
    #[must_use]
    pub fn shield_facing(&self) -> Option<f32> {
        match self.archetype {
            Archetype::Warden { facing } => Some(facing),
            _ => None,
        }
    }

    /// Reports whether a hit arriving from `point` lands inside the shield arc.
    #[must_use]
    pub fn blocks_from(&self, point: Vec2) -> bool {
        let Some(facing) = self.shield_facing() else {
            return false;
        };
        let offset = point - self.position;
        if offset.length_squared() <= f32::EPSILON {
            return false;
        }
        wrap_angle(angle_of(offset) - facing).abs() <= WARDEN_SHIELD_ARC * 0.5
    }

    /// Applies a discrete hit and reports whether it was lethal.
    ///
    /// Any hit flashes the enemy, reveals a disguised mimic and pulls an idle
    /// enemy straight into the chase. Hits on a dead enemy are ignored.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }

        let lethal = self.health.apply_damage(amount);
        self.flash_timer = FLASH_SECS;
        if let Archetype::Mimic { disguised, reveal } = &mut self.archetype {
            *disguised = false;
            *reveal = None;
        }
        if matches!(self.state, AiState::Idle | AiState::Alert) {
            self.state = AiState::Chase;
        }
        if lethal {
            self.begin_dying();
        }
        lethal
    }

    /// Heals a leech by the damage its strike dealt; returns the amount restored.
    pub fn absorb(&mut self, dealt: f32) -> f32 {
        if !matches!(self.archetype, Archetype::Leech) || !self.is_alive() {
            return 0.0;
        }
        self.health.heal(dealt)
    }

    /// Ends an open glitch window. Does nothing for other archetypes.
    pub fn close_glitch(&mut self) {
        if let Archetype::Glitch { open, .. } = &mut self.archetype {
            *open = false;
        }
    }

    /// Keeps the enemy body inside the arena.
    pub fn clamp_to(&mut self, bounds: &ArenaBounds) {
        self.position = bounds.clamp_circle(self.position, self.stats.radius);
    }

    /// Removes the enemy without a death animation.
    pub fn force_clear(&mut self) {
        self.state = AiState::Dead;
        self.removable = true;
    }

    /// Advances timers, movement and attacks by `dt` seconds.
    pub fn update(&mut self, dt: f32, player: Vec2, out: &mut Vec<EnemyAction>) -> EnemyStep {
        let mut step = EnemyStep::default();
        if !(dt > 0.0) {
            return step;
        }

        self.flash_timer = (self.flash_timer - dt).max(0.0);
        if self.state == AiState::Dead {
            if !self.removable {
                self.death_timer -= dt;
                if self.death_timer <= 0.0 {
                    self.removable = true;
                    step.died = true;
                }
            }
            return step;
        }

        self.attack_timer = (self.attack_timer - dt).max(0.0);
        self.tick_clocks(dt, out);

        let distance = self.position.distance(player);
        match self.state {
            AiState::Idle => self.idle(dt, player, distance),
            AiState::Alert => {
                self.turn_shield(dt, player);
                self.alert_timer -= dt;
                if self.alert_timer <= 0.0 {
                    self.state = AiState::Chase;
                }
            }
            AiState::Chase => {
                if distance > self.stats.chase_range * LOSE_INTEREST_FACTOR {
                    self.state = AiState::Idle;
                } else {
                    self.pursue(dt, player, distance);
                    if self.attack_timer <= 0.0 && distance <= self.stats.attack_range {
                        step.attacked = self.begin_attack(player, out);
                    }
                }
            }
            AiState::Attack => step.attacked = self.continue_attack(dt, player, out),
            AiState::Dead => {}
        }

        self.summon(player, out);
        step
    }

    /// Snapshot of the enemy for the renderer.
    #[must_use]
    pub fn pose(&self) -> EnemyPose {
        EnemyPose {
            id: self.id,
            kind: self.kind,
            position: self.position,
            radius: self.stats.radius,
            state: self.state,
            health_fraction: self.health.fraction(),
            flags: VisualFlags {
                flashing: self.flash_timer > 0.0,
                phased: self.is_phased(),
                disguised: self.is_disguised(),
                dying: self.state == AiState::Dead,
                shield_facing: self.shield_facing(),
            },
        }
    }

    fn begin_dying(&mut self) {
        self.state = AiState::Dead;
        self.death_timer = DEATH_SECS;
    }

    fn speed(&self) -> f32 {
        let factor = match self.archetype {
            Archetype::Glitch { open: true, .. } => GLITCH_SPEED_FACTOR,
            Archetype::Mimic {
                disguised: false, ..
            } => MIMIC_SPEED_FACTOR,
            _ => 1.0,
        };
        self.stats.speed * factor
    }

    fn tick_clocks(&mut self, dt: f32, out: &mut Vec<EnemyAction>) {
        let engaged = matches!(self.state, AiState::Chase | AiState::Attack);
        match &mut self.archetype {
            Archetype::Phantom { phased, timer } => {
                *timer -= dt;
                if *timer <= 0.0 {
                    *phased = !*phased;
                    *timer = if *phased {
                        PHANTOM_PHASED_SECS
                    } else {
                        PHANTOM_SOLID_SECS
                    };
                }
            }
            Archetype::Glitch { open, cooldown } => {
                *cooldown = (*cooldown - dt).max(0.0);
                if engaged && !*open && *cooldown <= 0.0 {
                    *open = true;
                    *cooldown = GLITCH_INTERVAL_SECS;
                    out.push(EnemyAction::GlitchOpened {
                        id: self.id,
                        duration: GLITCH_WINDOW_SECS,
                    });
                }
            }
            Archetype::Summoner { cooldown } if engaged => {
                *cooldown -= dt;
            }
            _ => {}
        }
    }

    fn summon(&mut self, player: Vec2, out: &mut Vec<EnemyAction>) {
        if let Archetype::Summoner { cooldown } = &mut self.archetype {
            if *cooldown <= 0.0 {
                *cooldown = SUMMON_INTERVAL_SECS;
                let toward = (player - self.position).normalize_or_zero();
                out.push(EnemyAction::Summon {
                    parent: self.id,
                    kind: EnemyKind::Mini,
                    count: SUMMON_COUNT,
                    center: self.position + toward * self.stats.radius * 2.0,
                });
            }
        }
    }

    fn idle(&mut self, dt: f32, player: Vec2, distance: f32) {
        let noticed = distance <= self.stats.chase_range;
        if let Archetype::Mimic {
            disguised: true,
            reveal,
        } = self.archetype
        {
            let reveal = match reveal {
                Some(remaining) => Some(remaining - dt),
                None if noticed => Some(MIMIC_REVEAL_SECS),
                None => None,
            };
            if reveal.is_some_and(|remaining| remaining <= 0.0) {
                self.archetype = Archetype::Mimic {
                    disguised: false,
                    reveal: None,
                };
                self.state = AiState::Chase;
            } else {
                self.archetype = Archetype::Mimic {
                    disguised: true,
                    reveal,
                };
            }
            return;
        }

        if noticed {
            self.state = AiState::Alert;
            self.alert_timer = ALERT_SECS;
            self.turn_shield(dt, player);
            return;
        }

        self.patrol_angle += PATROL_TURN_RATE * dt;
        let waypoint = self.origin + unit_from_angle(self.patrol_angle) * PATROL_RADIUS;
        self.position = approach(
            self.position,
            waypoint,
            self.stats.speed * PATROL_SPEED_FACTOR * dt,
        );
    }

    fn pursue(&mut self, dt: f32, player: Vec2, distance: f32) {
        let stride = self.speed() * dt;
        let range = self.stats.attack_range;
        match self.archetype {
            Archetype::Warden { .. } => self.turn_shield(dt, player),
            Archetype::Spitter | Archetype::Summoner { .. } => {
                self.kite(player, distance, range * KITE_INNER_FACTOR, range, stride);
            }
            Archetype::Sniper { .. } => {
                self.kite(player, distance, range * SNIPER_INNER_FACTOR, range, stride);
            }
            Archetype::Orbiter { clockwise } => {
                let radius = (range * ORBIT_FACTOR).max(1.0);
                let direction = if clockwise { -1.0 } else { 1.0 };
                let bearing = if distance > f32::EPSILON {
                    angle_of(self.position - player)
                } else {
                    0.0
                };
                let waypoint =
                    player + unit_from_angle(bearing + direction * stride / radius) * radius;
                self.position = approach(self.position, waypoint, stride);
            }
            _ => self.position = approach(self.position, player, stride),
        }
    }

    fn kite(&mut self, player: Vec2, distance: f32, inner: f32, outer: f32, stride: f32) {
        if distance < inner {
            let away = (self.position - player).normalize_or_zero();
            self.position += away * stride;
        } else if distance > outer {
            self.position = approach(self.position, player, stride);
        }
    }

    fn turn_shield(&mut self, dt: f32, player: Vec2) {
        let position = self.position;
        if let Archetype::Warden { facing } = &mut self.archetype {
            let offset = player - position;
            if offset.length_squared() <= f32::EPSILON {
                return;
            }
            let max_turn = WARDEN_TURN_RATE * dt;
            let delta = wrap_angle(angle_of(offset) - *facing).clamp(-max_turn, max_turn);
            *facing = wrap_angle(*facing + delta);
        }
    }

    fn begin_attack(&mut self, player: Vec2, out: &mut Vec<EnemyAction>) -> bool {
        self.state = AiState::Attack;
        match self.archetype {
            Archetype::Lunger(_) => {
                self.archetype = Archetype::Lunger(Lunge::Windup(LUNGE_WINDUP_SECS));
                false
            }
            Archetype::Sniper { .. } => {
                self.archetype = Archetype::Sniper {
                    aim: Some(SNIPER_AIM_SECS),
                };
                false
            }
            Archetype::Bomber { .. } => {
                self.archetype = Archetype::Bomber {
                    fuse: Some(BOMBER_FUSE_SECS),
                };
                false
            }
            _ => {
                self.strike_or_fire(player, out);
                self.finish_attack();
                true
            }
        }
    }

    fn continue_attack(&mut self, dt: f32, player: Vec2, out: &mut Vec<EnemyAction>) -> bool {
        match self.archetype {
            Archetype::Lunger(Lunge::Windup(remaining)) => {
                let remaining = remaining - dt;
                self.archetype = if remaining <= 0.0 {
                    Archetype::Lunger(Lunge::Committed {
                        remaining: LUNGE_SECS,
                        direction: (player - self.position).normalize_or_zero(),
                        struck: false,
                    })
                } else {
                    Archetype::Lunger(Lunge::Windup(remaining))
                };
                false
            }
            Archetype::Lunger(Lunge::Committed {
                remaining,
                direction,
                struck,
            }) => {
                self.position += direction * self.stats.speed * LUNGE_SPEED_FACTOR * dt;
                let connects =
                    !struck && self.position.distance(player) <= self.stats.radius + PLAYER_RADIUS;
                if connects {
                    out.push(EnemyAction::Strike {
                        attacker: self.id,
                        damage: self.stats.damage,
                    });
                }
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.archetype = Archetype::Lunger(Lunge::Ready);
                    self.finish_attack();
                } else {
                    self.archetype = Archetype::Lunger(Lunge::Committed {
                        remaining,
                        direction,
                        struck: struck || connects,
                    });
                }
                connects
            }
            Archetype::Sniper { aim: Some(remaining) } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.archetype = Archetype::Sniper {
                        aim: Some(remaining),
                    };
                    return false;
                }
                let shot = ProjectileSpawn::hostile(
                    self.position,
                    player - self.position,
                    SNIPER_SHOT_SPEED,
                    self.stats.damage,
                )
                .with_behavior(Behavior::straight().with_slow());
                out.push(EnemyAction::Fire(shot));
                self.archetype = Archetype::Sniper { aim: None };
                self.finish_attack();
                true
            }
            Archetype::Bomber { fuse: Some(remaining) } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.archetype = Archetype::Bomber {
                        fuse: Some(remaining),
                    };
                    return false;
                }
                out.push(EnemyAction::Explode {
                    attacker: self.id,
                    center: self.position,
                    radius: BOMBER_BLAST_RADIUS,
                    damage: self.stats.damage,
                });
                self.archetype = Archetype::Bomber { fuse: None };
                let _ = self.health.apply_damage(self.health.current());
                self.begin_dying();
                true
            }
            _ => {
                self.finish_attack();
                false
            }
        }
    }

    fn finish_attack(&mut self) {
        self.state = AiState::Chase;
        self.attack_timer = self.stats.attack_cooldown;
    }

    fn strike_or_fire(&mut self, player: Vec2, out: &mut Vec<EnemyAction>) {
        let speed = match self.archetype {
            Archetype::Spitter => SPITTER_SHOT_SPEED,
            Archetype::Warden { .. } => WARDEN_SHOT_SPEED,
            Archetype::Orbiter { .. } => ORBITER_SHOT_SPEED,
            Archetype::Summoner { .. } => SUMMONER_SHOT_SPEED,
            _ => {
                out.push(EnemyAction::Strike {
                    attacker: self.id,
                    damage: self.stats.damage,
                });
                return;
            }
        };
        let direction = match self.archetype {
            Archetype::Warden { facing } => unit_from_angle(facing),
            _ => player - self.position,
        };
        out.push(EnemyAction::Fire(ProjectileSpawn::hostile(
            self.position,
            direction,
            speed,
            self.stats.damage,
        )));
    }
}
