#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Boss phase state machines.
//!
//! A [`Boss`] walks through three stages: a spawn-in intro, the fight, and a
//! death cinematic. During the fight its `phase` advances whenever health
//! falls below one of the archetype's thresholds. Each step up rebuilds the
//! archetype's auxiliary state and re-arms the attack timer. Phases never
//! regress, and damage is ignored outside the fight.

use collapse_arena_core::{
    angle_of, circles_overlap,
    snapshot::BossPose,
    unit_from_angle, wrap_angle, ArenaBounds, BossKind, BossStats, EntityId, Health, Vec2,
};
use collapse_arena_system_projectiles::ProjectileSpawn;

/// Seconds of the spawn-in animation.
pub const INTRO_SECS: f32 = 2.0;
/// Seconds of the death cinematic.
pub const DEATH_CINEMATIC_SECS: f32 = 2.5;

const HOVER_DISTANCE: f32 = 180.0;
const HYDRA_FINAL_SPEED_FACTOR: f32 = 1.4;

const CELL_RADIUS: f32 = 10.0;
const CELL_SPACING: f32 = 26.0;
const CELL_REDUCTION: f32 = 0.12;
const CELL_SHOT_SPEED: f32 = 240.0;
const CELL_SHOT_DAMAGE: f32 = 12.0;

const SENTINEL_FRIENDLY_ARC: f32 = 160.0 * std::f32::consts::PI / 180.0;
const SENTINEL_HOSTILE_ARC: f32 = 90.0 * std::f32::consts::PI / 180.0;
const SENTINEL_SPIN: f32 = 1.0;
const SENTINEL_TRACK_RATE: f32 = 0.9;
const SENTINEL_SHOT_SPEED: f32 = 260.0;
const SENTINEL_SHOT_DAMAGE: f32 = 10.0;

const CLONE_RADIUS: f32 = 24.0;
const CLONE_RING: f32 = 140.0;
const MIRROR_SHOT_SPEED: f32 = 240.0;
const MIRROR_SHOT_DAMAGE: f32 = 8.0;

const SPIKE_RADIUS: f32 = 28.0;
const SPIKE_TELEGRAPH_SECS: f32 = 0.9;
const SPIKE_ACTIVE_SECS: f32 = 0.6;
const SPIKE_DPS: f32 = 45.0;
const SPIKE_SCATTER: f32 = 40.0;
const SPIKE_RING: f32 = 90.0;

const HYDRA_SHOT_SPEED: f32 = 280.0;
const HYDRA_SHOT_DAMAGE: f32 = 10.0;
const HYDRA_SPREAD: f32 = 0.2;

const RING_THICKNESS: f32 = 10.0;
const RING_GAP: f32 = 0.9;
const RING_SPIN: f32 = 0.8;
const RING_FIRST_RADIUS: f32 = 110.0;
const RING_SPACING: f32 = 60.0;
const RING_BURN_DPS: f32 = 20.0;
const FIREWALL_SHOT_SPEED: f32 = 220.0;
const FIREWALL_SHOT_DAMAGE: f32 = 9.0;

const CORE_GROWTH: f32 = 1.2;
const PULL_PER_PHASE: f32 = 40.0;
const SINGULARITY_SHOT_SPEED: f32 = 200.0;
const SINGULARITY_SHOT_DAMAGE: f32 = 10.0;

/// Where a projectile touching the boss landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossHit {
    /// Nothing was touched.
    Miss,
    /// A shield or ring absorbed the projectile.
    Blocked,
    /// A decoy clone popped.
    Decoy,
    /// A shielding cell was destroyed.
    Cell,
    /// The core was hit and should take damage.
    Core,
}

/// Intent reported by a boss during its update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BossAction {
    /// Launches a hostile projectile.
    Fire(ProjectileSpawn),
    /// Drags the player by `offset` this step.
    Pull {
        /// Displacement to apply to the player.
        offset: Vec2,
    },
}

/// Outcome of one boss update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BossStep {
    /// An attack cycle fired this step.
    pub attacked: bool,
    /// The death cinematic completed; the instance is finished.
    pub died: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Spike {
    position: Vec2,
    telegraph: f32,
    active: f32,
}

impl Spike {
    fn is_active(&self) -> bool {
        self.telegraph <= 0.0 && self.active > 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Ring {
    radius: f32,
    gap: f32,
    spin: f32,
}

impl Ring {
    fn covers(&self, center: Vec2, point: Vec2, radius: f32) -> bool {
        let distance = point.distance(center);
        if (distance - self.radius).abs() > RING_THICKNESS + radius {
            return false;
        }
        let bearing = angle_of(point - center);
        wrap_angle(bearing - self.gap).abs() > RING_GAP * 0.5
    }
}

/// Archetype-specific state; rebuilt on every phase transition.
#[derive(Clone, Debug, PartialEq)]
enum Aux {
    Hive { cells: Vec<Vec2> },
    Sentinel { facing: f32 },
    Mirror { clones: Vec<Vec2>, swaps: usize },
    Ascendant { spikes: Vec<Spike>, volleys: u32 },
    Hydra,
    Firewall { rings: Vec<Ring> },
    Singularity,
}

/// The active boss.
#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    id: EntityId,
    kind: BossKind,
    position: Vec2,
    health: Health,
    stats: BossStats,
    phase: u32,
    intro: f32,
    dying: Option<f32>,
    finished: bool,
    attack_timer: f32,
    elapsed: f32,
    phase_changes: Vec<u32>,
    aux: Aux,
}

impl Boss {
    /// Creates a boss in its spawn-in animation with already scaled `stats`.
    #[must_use]
    pub fn new(id: EntityId, kind: BossKind, position: Vec2, stats: BossStats) -> Self {
        let aux = match kind {
            BossKind::Hive => Aux::Hive {
                cells: hex_cells(6, stats.radius),
            },
            BossKind::Sentinel => Aux::Sentinel { facing: 0.0 },
            BossKind::Mirror => Aux::Mirror {
                clones: clone_ring(position, 2, 0.0),
                swaps: 0,
            },
            BossKind::Ascendant => Aux::Ascendant {
                spikes: Vec::new(),
                volleys: 0,
            },
            BossKind::Hydra => Aux::Hydra,
            BossKind::Firewall => Aux::Firewall {
                rings: vec![Ring {
                    radius: RING_FIRST_RADIUS,
                    gap: 0.0,
                    spin: RING_SPIN,
                }],
            },
            BossKind::Singularity => Aux::Singularity,
        };
        Self {
            id,
            kind,
            position,
            health: Health::full(stats.health),
            stats,
            phase: 1,
            intro: INTRO_SECS,
            dying: None,
            finished: false,
            attack_timer: stats.attack_interval,
            elapsed: 0.0,
            phase_changes: Vec::new(),
            aux,
        }
    }

    /// Identifier of the boss.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Archetype.
    #[must_use]
    pub const fn kind(&self) -> BossKind {
        self.kind
    }

    /// Position of the core.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Health pool.
    #[must_use]
    pub const fn health(&self) -> &Health {
        &self.health
    }

    /// Current phase, starting at one.
    #[must_use]
    pub const fn phase(&self) -> u32 {
        self.phase
    }

    /// Reports whether the spawn-in animation is playing.
    #[must_use]
    pub fn is_intro(&self) -> bool {
        self.intro > 0.0
    }

    /// Reports whether the death cinematic is playing or done.
    #[must_use]
    pub const fn is_dying(&self) -> bool {
        self.dying.is_some()
    }

    /// Reports whether the death cinematic completed.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Reports whether the boss is in the fight and accepts damage.
    #[must_use]
    pub fn is_targetable(&self) -> bool {
        !self.is_intro() && !self.is_dying()
    }

    /// Radius of the core; the singularity core grows as it weakens.
    #[must_use]
    pub fn core_radius(&self) -> f32 {
        match self.aux {
            Aux::Singularity => {
                self.stats.radius * (1.0 + CORE_GROWTH * (1.0 - self.health.fraction()))
            }
            _ => self.stats.radius,
        }
    }

    /// Multiplier applied to damage reaching the core.
    #[must_use]
    pub fn damage_modifier(&self) -> f32 {
        match &self.aux {
            Aux::Hive { cells } => 1.0 / (1.0 + CELL_REDUCTION * cells.len() as f32),
            _ => 1.0,
        }
    }

    /// Reports whether the adaptive shield turned hostile.
    #[must_use]
    pub fn is_hostile(&self) -> bool {
        !matches!(self.aux, Aux::Sentinel { .. }) || self.phase >= 2
    }

    /// Continuous damage per second dealt while the core overlaps the player.
    #[must_use]
    pub const fn contact_dps(&self) -> f32 {
        self.stats.contact_dps
    }

    /// Reports whether the core overlaps a circle.
    #[must_use]
    pub fn overlaps(&self, point: Vec2, radius: f32) -> bool {
        !self.is_intro()
            && !self.is_dying()
            && circles_overlap(self.position, self.core_radius(), point, radius)
    }

    /// Damage per second from hazards (spikes, rings) touching a circle.
    #[must_use]
    pub fn hazard_dps(&self, point: Vec2, radius: f32) -> f32 {
        if !self.is_targetable() {
            return 0.0;
        }
        match &self.aux {
            Aux::Ascendant { spikes, .. } => {
                spikes
                    .iter()
                    .filter(|spike| {
                        spike.is_active()
                            && circles_overlap(spike.position, SPIKE_RADIUS, point, radius)
                    })
                    .count() as f32
                    * SPIKE_DPS
            }
            Aux::Firewall { rings } => {
                rings
                    .iter()
                    .filter(|ring| ring.covers(self.position, point, radius))
                    .count() as f32
                    * RING_BURN_DPS
            }
            _ => 0.0,
        }
    }

    /// Resolves a projectile touching the boss at `point`.
    ///
    /// Decoys and cells are destroyed by the touch. A [`BossHit::Core`]
    /// result means the caller should follow up with [`Boss::take_damage`].
    pub fn resolve_hit(&mut self, point: Vec2, radius: f32) -> BossHit {
        if !self.is_targetable() {
            return BossHit::Miss;
        }

        let core = self.position;
        match &mut self.aux {
            Aux::Firewall { rings } => {
                if rings.iter().any(|ring| ring.covers(core, point, radius)) {
                    return BossHit::Blocked;
                }
            }
            Aux::Mirror { clones, .. } => {
                if let Some(index) = clones
                    .iter()
                    .position(|clone| circles_overlap(*clone, CLONE_RADIUS, point, radius))
                {
                    let _ = clones.remove(index);
                    return BossHit::Decoy;
                }
            }
            Aux::Hive { cells } => {
                if let Some(index) = cells
                    .iter()
                    .position(|cell| circles_overlap(core + *cell, CELL_RADIUS, point, radius))
                {
                    let _ = cells.remove(index);
                    return BossHit::Cell;
                }
            }
            _ => {}
        }

        if !circles_overlap(core, self.core_radius(), point, radius) {
            return BossHit::Miss;
        }
        if self.shield_blocks(point) {
            return BossHit::Blocked;
        }
        BossHit::Core
    }

    /// Applies damage to the core and reports whether it was lethal.
    ///
    /// Damage is scaled by [`Boss::damage_modifier`]. Every threshold the
    /// hit crosses records one phase step, in order.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_targetable() {
            return false;
        }
        let lethal = self.health.apply_damage(amount * self.damage_modifier());
        self.advance_phases();
        if lethal {
            self.dying = Some(DEATH_CINEMATIC_SECS);
        }
        lethal
    }

    /// Moves recorded phase transitions into `out`, oldest first.
    pub fn drain_phase_changes(&mut self, out: &mut Vec<u32>) {
        out.append(&mut self.phase_changes);
    }

    /// Keeps the core and satellites inside the arena.
    pub fn clamp_to(&mut self, bounds: &ArenaBounds) {
        let clamped = bounds.clamp_circle(self.position, self.core_radius());
        self.translate(clamped - self.position);
    }

    /// Advances the intro, movement, hazards, attacks and the death cinematic.
    pub fn update(&mut self, dt: f32, player: Vec2, out: &mut Vec<BossAction>) -> BossStep {
        let mut step = BossStep::default();
        if self.finished || !(dt > 0.0) {
            return step;
        }

        if let Some(remaining) = self.dying.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.finished = true;
                step.died = true;
            }
            return step;
        }

        if self.intro > 0.0 {
            self.intro = (self.intro - dt).max(0.0);
            return step;
        }

        self.elapsed += dt;
        self.advance_motion(dt, player);
        self.advance_aux(dt, player, out);

        self.attack_timer -= dt;
        if self.attack_timer <= 0.0 {
            self.attack_timer = self.stats.attack_interval;
            self.attack(player, out);
            step.attacked = true;
        }
        step
    }

    /// Snapshot of the boss for the renderer.
    #[must_use]
    pub fn pose(&self) -> BossPose {
        let satellites = match &self.aux {
            Aux::Hive { cells } => cells.iter().map(|cell| self.position + *cell).collect(),
            Aux::Mirror { clones, .. } => clones.clone(),
            Aux::Ascendant { spikes, .. } => spikes.iter().map(|spike| spike.position).collect(),
            Aux::Firewall { rings } => rings
                .iter()
                .map(|ring| self.position + unit_from_angle(ring.gap) * ring.radius)
                .collect(),
            Aux::Sentinel { .. } | Aux::Hydra | Aux::Singularity => Vec::new(),
        };
        BossPose {
            id: self.id,
            kind: self.kind,
            position: self.position,
            radius: self.core_radius(),
            phase: self.phase,
            health_fraction: self.health.fraction(),
            intro: self.is_intro(),
            dying: self.is_dying(),
            satellites,
        }
    }

    fn shield_blocks(&self, point: Vec2) -> bool {
        let Aux::Sentinel { facing } = self.aux else {
            return false;
        };
        let arc = if self.phase >= 2 {
            SENTINEL_HOSTILE_ARC
        } else {
            SENTINEL_FRIENDLY_ARC
        };
        let offset = point - self.position;
        offset.length_squared() > f32::EPSILON
            && wrap_angle(angle_of(offset) - facing).abs() <= arc * 0.5
    }

    fn advance_phases(&mut self) {
        let fraction = self.health.fraction();
        let crossed = self
            .kind
            .phase_thresholds()
            .iter()
            .filter(|threshold| fraction < **threshold)
            .count() as u32;
        let target = 1 + crossed;
        while self.phase < target {
            self.phase += 1;
            self.phase_changes.push(self.phase);
            self.enter_phase();
        }
    }

    fn enter_phase(&mut self) {
        let phase = self.phase;
        let position = self.position;
        let radius = self.stats.radius;
        match &mut self.aux {
            Aux::Hive { cells } => *cells = hex_cells(6 * phase as usize, radius),
            Aux::Mirror { clones, swaps } => {
                *clones = clone_ring(position, 2 * phase as usize, phase as f32 * 0.7);
                *swaps = 0;
            }
            Aux::Ascendant { spikes, volleys } => {
                spikes.clear();
                *volleys = 0;
            }
            Aux::Firewall { rings } => {
                for ring in rings.iter_mut() {
                    ring.spin = -ring.spin;
                }
                let (radius, spin, gap) = rings.last().map_or(
                    (RING_FIRST_RADIUS, RING_SPIN, 0.0),
                    |last| (last.radius + RING_SPACING, last.spin, last.gap + std::f32::consts::PI),
                );
                rings.push(Ring { radius, gap, spin });
            }
            Aux::Sentinel { .. } | Aux::Hydra | Aux::Singularity => {}
        }
        self.attack_timer = 0.0;
    }

    fn advance_motion(&mut self, dt: f32, player: Vec2) {
        let (speed, hover) = match self.aux {
            Aux::Hydra if self.phase >= 3 => {
                (self.stats.speed * HYDRA_FINAL_SPEED_FACTOR, HOVER_DISTANCE)
            }
            Aux::Singularity => (self.stats.speed, 0.0),
            _ => (self.stats.speed, HOVER_DISTANCE),
        };
        let offset = player - self.position;
        let distance = offset.length();
        if distance <= hover || distance <= f32::EPSILON {
            return;
        }
        let stride = (speed * dt).min(distance - hover);
        self.translate(offset / distance * stride);
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
        if let Aux::Mirror { clones, .. } = &mut self.aux {
            for clone in clones.iter_mut() {
                *clone += delta;
            }
        }
    }

    fn advance_aux(&mut self, dt: f32, player: Vec2, out: &mut Vec<BossAction>) {
        let position = self.position;
        let phase = self.phase;
        match &mut self.aux {
            Aux::Sentinel { facing } => {
                if phase >= 2 {
                    let desired = angle_of(player - position);
                    let max_turn = SENTINEL_TRACK_RATE * dt;
                    let delta = wrap_angle(desired - *facing).clamp(-max_turn, max_turn);
                    *facing = wrap_angle(*facing + delta);
                } else {
                    *facing = wrap_angle(*facing + SENTINEL_SPIN * dt);
                }
            }
            Aux::Ascendant { spikes, .. } => {
                for spike in spikes.iter_mut() {
                    if spike.telegraph > 0.0 {
                        spike.telegraph -= dt;
                    } else {
                        spike.active -= dt;
                    }
                }
                spikes.retain(|spike| spike.telegraph > 0.0 || spike.active > 0.0);
            }
            Aux::Firewall { rings } => {
                for ring in rings.iter_mut() {
                    ring.gap = wrap_angle(ring.gap + ring.spin * dt);
                }
            }
            Aux::Singularity => {
                let toward = (position - player).normalize_or_zero();
                if toward != Vec2::ZERO {
                    out.push(BossAction::Pull {
                        offset: toward * PULL_PER_PHASE * phase as f32 * dt,
                    });
                }
            }
            Aux::Hive { .. } | Aux::Mirror { .. } | Aux::Hydra => {}
        }
    }

    fn attack(&mut self, player: Vec2, out: &mut Vec<BossAction>) {
        let position = self.position;
        let phase = self.phase;
        let aim = angle_of(player - position);
        let elapsed = self.elapsed;
        match &mut self.aux {
            Aux::Hive { cells } => {
                let nearest = cells
                    .iter()
                    .enumerate()
                    .min_by(|(_, a), (_, b)| {
                        (position + **a)
                            .distance_squared(player)
                            .total_cmp(&(position + **b).distance_squared(player))
                    })
                    .map(|(index, _)| index);
                let origin = match nearest {
                    Some(index) => position + cells.remove(index),
                    None => position,
                };
                out.push(fire(origin, player - origin, CELL_SHOT_SPEED, CELL_SHOT_DAMAGE));
            }
            Aux::Sentinel { .. } => {
                if phase >= 2 {
                    spread(position, aim, 5, 0.25, SENTINEL_SHOT_SPEED, SENTINEL_SHOT_DAMAGE, out);
                }
            }
            Aux::Mirror { clones, swaps } => {
                out.push(fire(position, player - position, MIRROR_SHOT_SPEED, MIRROR_SHOT_DAMAGE));
                for clone in clones.iter() {
                    out.push(fire(*clone, player - *clone, MIRROR_SHOT_SPEED, MIRROR_SHOT_DAMAGE));
                }
                if !clones.is_empty() {
                    let index = *swaps % clones.len();
                    let target = clones[index];
                    clones[index] = position;
                    *swaps += 1;
                    self.position = target;
                }
            }
            Aux::Ascendant { spikes, volleys } => {
                let (count, radius) = if phase >= 2 {
                    (8, SPIKE_RING)
                } else {
                    (3, SPIKE_SCATTER)
                };
                let start = *volleys as f32 * 2.1;
                for index in 0..count {
                    let angle = start + std::f32::consts::TAU * index as f32 / count as f32;
                    spikes.push(Spike {
                        position: player + unit_from_angle(angle) * radius,
                        telegraph: SPIKE_TELEGRAPH_SECS,
                        active: SPIKE_ACTIVE_SECS,
                    });
                }
                *volleys += 1;
            }
            Aux::Hydra => {
                let count = 2 * phase.min(3) - 1;
                spread(position, aim, count, HYDRA_SPREAD, HYDRA_SHOT_SPEED, HYDRA_SHOT_DAMAGE, out);
            }
            Aux::Firewall { .. } => {
                radial(position, elapsed, 8, FIREWALL_SHOT_SPEED, FIREWALL_SHOT_DAMAGE, out);
            }
            Aux::Singularity => {
                radial(
                    position,
                    aim,
                    6 + 2 * phase,
                    SINGULARITY_SHOT_SPEED,
                    SINGULARITY_SHOT_DAMAGE,
                    out,
                );
            }
        }
    }
}

fn fire(origin: Vec2, direction: Vec2, speed: f32, damage: f32) -> BossAction {
    BossAction::Fire(ProjectileSpawn::hostile(origin, direction, speed, damage))
}

fn spread(
    origin: Vec2,
    aim: f32,
    count: u32,
    spacing: f32,
    speed: f32,
    damage: f32,
    out: &mut Vec<BossAction>,
) {
    let first = aim - spacing * count.saturating_sub(1) as f32 / 2.0;
    for index in 0..count {
        let direction = unit_from_angle(first + spacing * index as f32);
        out.push(fire(origin, direction, speed, damage));
    }
}

fn radial(origin: Vec2, offset: f32, count: u32, speed: f32, damage: f32, out: &mut Vec<BossAction>) {
    for index in 0..count {
        let angle = offset + std::f32::consts::TAU * index as f32 / count as f32;
        out.push(fire(origin, unit_from_angle(angle), speed, damage));
    }
}

/// Cell offsets laid out in hexagonal rings around a core of `core_radius`.
fn hex_cells(count: usize, core_radius: f32) -> Vec<Vec2> {
    (0..count)
        .map(|index| {
            let ring = index / 6;
            let angle = (index % 6) as f32 * std::f32::consts::FRAC_PI_3
                + ring as f32 * std::f32::consts::FRAC_PI_6;
            let distance = core_radius + CELL_RADIUS + 8.0 + ring as f32 * CELL_SPACING;
            unit_from_angle(angle) * distance
        })
        .collect()
}

fn clone_ring(center: Vec2, count: usize, offset: f32) -> Vec<Vec2> {
    (0..count)
        .map(|index| {
            let angle = offset + std::f32::consts::TAU * index as f32 / count as f32;
            center + unit_from_angle(angle) * CLONE_RING
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighting(kind: BossKind) -> Boss {
        let mut boss = Boss::new(EntityId::new(1), kind, Vec2::new(500.0, 300.0), kind.stats());
        let mut out = Vec::new();
        let _ = boss.update(INTRO_SECS + 0.01, Vec2::new(500.0, 600.0), &mut out);
        assert!(boss.is_targetable());
        boss
    }

    fn set_fraction(boss: &mut Boss, fraction: f32) -> bool {
        let target = boss.health().max() * fraction;
        let amount = (boss.health().current() - target) / boss.damage_modifier();
        boss.take_damage(amount)
    }

    #[test]
    fn damage_is_ignored_during_intro() {
        let kind = BossKind::Hydra;
        let mut boss = Boss::new(EntityId::new(1), kind, Vec2::ZERO, kind.stats());
        assert!(!boss.take_damage(10_000.0));
        assert_eq!(boss.health().fraction(), 1.0);
        assert_eq!(boss.resolve_hit(Vec2::ZERO, 5.0), BossHit::Miss);
    }

    #[test]
    fn crossing_one_threshold_emits_one_transition() {
        let mut boss = fighting(BossKind::Mirror);
        let _ = set_fraction(&mut boss, 0.67);
        let _ = set_fraction(&mut boss, 0.65);
        let _ = set_fraction(&mut boss, 0.64);
        let mut changes = Vec::new();
        boss.drain_phase_changes(&mut changes);
        assert_eq!(changes, vec![2]);
        assert_eq!(boss.phase(), 2);

        let mut out = Vec::new();
        for _ in 0..30 {
            let _ = boss.update(0.05, Vec2::new(500.0, 600.0), &mut out);
        }
        boss.drain_phase_changes(&mut changes);
        assert_eq!(changes, vec![2], "no transition per tick below the threshold");
    }

    #[test]
    fn one_hit_across_several_thresholds_steps_through_each_phase() {
        let mut boss = fighting(BossKind::Singularity);
        let _ = set_fraction(&mut boss, 0.10);
        let mut changes = Vec::new();
        boss.drain_phase_changes(&mut changes);
        assert_eq!(changes, vec![2, 3, 4]);
    }

    #[test]
    fn lethal_hit_starts_cinematic_that_finishes_once() {
        let mut boss = fighting(BossKind::Hydra);
        assert!(boss.take_damage(1_000_000.0));
        assert!(boss.is_dying());
        assert!(!boss.take_damage(10.0));

        let mut out = Vec::new();
        let mut finished = 0;
        for _ in 0..100 {
            if boss.update(0.05, Vec2::ZERO, &mut out).died {
                finished += 1;
            }
        }
        assert_eq!(finished, 1);
        assert!(boss.is_finished());
    }

    #[test]
    fn hive_cells_shield_the_core_and_regrow_per_phase() {
        let mut boss = fighting(BossKind::Hive);
        assert!((boss.damage_modifier() - 1.0 / 1.72).abs() < 1e-5);
        let _ = set_fraction(&mut boss, 0.5);
        assert_eq!(boss.phase(), 2);
        assert_eq!(boss.pose().satellites.len(), 12);
    }

    #[test]
    fn mirror_clone_pops_on_touch() {
        let mut boss = fighting(BossKind::Mirror);
        let clone = boss.pose().satellites[0];
        assert_eq!(boss.resolve_hit(clone, 5.0), BossHit::Decoy);
        assert_eq!(boss.pose().satellites.len(), 1);
    }

    #[test]
    fn sentinel_turns_hostile_below_threshold() {
        let mut boss = fighting(BossKind::Sentinel);
        assert!(!boss.is_hostile());
        let _ = set_fraction(&mut boss, 0.8);
        assert!(boss.is_hostile());

        let mut out = Vec::new();
        let _ = boss.update(0.01, Vec2::new(500.0, 600.0), &mut out);
        let shots = out
            .iter()
            .filter(|action| matches!(action, BossAction::Fire(_)))
            .count();
        assert_eq!(shots, 5, "transition re-arms the attack timer");
    }

    #[test]
    fn firewall_rings_block_and_multiply_on_transition() {
        let mut boss = fighting(BossKind::Firewall);
        let gap = match &boss.aux {
            Aux::Firewall { rings } => rings[0].gap,
            _ => unreachable!(),
        };
        let blocked = boss.position() + unit_from_angle(gap + std::f32::consts::PI) * RING_FIRST_RADIUS;
        assert_eq!(boss.resolve_hit(blocked, 5.0), BossHit::Blocked);
        let _ = set_fraction(&mut boss, 0.4);
        assert_eq!(boss.pose().satellites.len(), 2);
    }

    #[test]
    fn singularity_core_grows_and_pulls() {
        let mut boss = fighting(BossKind::Singularity);
        let base = boss.core_radius();
        let _ = set_fraction(&mut boss, 0.5);
        assert!(boss.core_radius() > base);

        let mut out = Vec::new();
        let _ = boss.update(0.1, Vec2::new(500.0, 600.0), &mut out);
        let pull = out.iter().find_map(|action| match action {
            BossAction::Pull { offset } => Some(*offset),
            _ => None,
        });
        assert!(pull.is_some_and(|offset| offset.y < 0.0));
    }

    #[test]
    fn ascendant_spikes_telegraph_before_burning() {
        let mut boss = fighting(BossKind::Ascendant);
        let player = Vec2::new(500.0, 600.0);
        let mut out = Vec::new();
        let _ = boss.update(boss.stats.attack_interval, player, &mut out);
        let spike = boss.pose().satellites[0];
        assert_eq!(boss.hazard_dps(spike, 14.0), 0.0);
        let _ = boss.update(SPIKE_TELEGRAPH_SECS + 0.05, player, &mut out);
        assert!(boss.hazard_dps(spike, 14.0) >= SPIKE_DPS);
    }
}
