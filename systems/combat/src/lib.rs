#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collision and damage resolver run once per tick after motion.
//!
//! The resolver borrows the live entity sets through a [`CombatScene`] and
//! never changes their length: entities created mid-pass (split children,
//! summons, pickups, delayed blasts, new projectiles) are reported as
//! [`FollowUp`] values that the owner merges at the end of the tick, and dead
//! enemies stay in place until the owner compacts them. Every damage path
//! checks liveness first, so an enemy killed earlier in the same pass is never
//! processed twice.

mod drops;

use collapse_arena_core::{
    circles_overlap, ArenaBounds, DamageSource, EnemyKind, EntityId, Event, PickupKind,
    PickupTuning, Vec2,
};
use collapse_arena_system_actors::{Enemy, EnemyAction, Player, PLAYER_RADIUS};
use collapse_arena_system_bosses::{Boss, BossAction, BossHit};
use collapse_arena_system_projectiles::{
    HitResponse, Projectile, ProjectileSpawn, TargetCandidate,
};
use collapse_arena_system_scaling::ComboTracker;
use rand::Rng;

/// Distance the player is pushed away from a body it touches.
pub const CONTACT_NUDGE: f32 = 6.0;
/// Offset of cluster child blasts from the parent burst.
pub const CHILD_BLAST_OFFSET: f32 = 60.0;
/// Seconds between consecutive cluster child blasts.
pub const CHILD_BLAST_INTERVAL: f32 = 0.15;

const CHILD_RADIUS_FACTOR: f32 = 0.6;
const CHILD_DAMAGE_FACTOR: f32 = 0.5;

/// Mutable view of everything the resolver touches in one pass.
#[derive(Debug)]
pub struct CombatScene<'a> {
    /// The player.
    pub player: &'a mut Player,
    /// Every enemy, dead or alive, in a stable order.
    pub enemies: &'a mut [Enemy],
    /// The boss, when a boss layer is active.
    pub boss: Option<&'a mut Boss>,
    /// Every projectile in flight.
    pub projectiles: &'a mut [Projectile],
    /// Kill streak of the run.
    pub combo: &'a mut ComboTracker,
    /// Bounds used to keep nudged bodies inside the arena.
    pub bounds: ArenaBounds,
}

/// An area burst independent of any projectile hit set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blast {
    /// Centre of the burst.
    pub center: Vec2,
    /// Radius of the burst.
    pub radius: f32,
    /// Damage before the combo multiplier and class bonuses.
    pub damage: f32,
    /// Delayed child blasts released around the centre.
    pub children: u32,
}

impl Blast {
    /// Burst released by a projectile that expired without hitting anything.
    #[must_use]
    pub fn on_expiry(projectile: &Projectile) -> Option<Self> {
        if !projectile.bursts_on_expiry() || !projectile.hits().is_empty() {
            return None;
        }
        let area = projectile.behavior().area()?;
        Some(Self {
            center: projectile.position(),
            radius: area.radius,
            damage: projectile.damage() * area.damage_factor,
            children: area.children,
        })
    }
}

/// Work the owner must perform after the pass, in the order reported.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FollowUp {
    /// Add a projectile.
    Projectile(ProjectileSpawn),
    /// Add an enemy spawned by another enemy.
    Enemy {
        /// Archetype of the child.
        kind: EnemyKind,
        /// Spawn point.
        position: Vec2,
        /// Enemy that produced the child.
        parent: EntityId,
    },
    /// Drop a pickup.
    Pickup {
        /// Pickup contents.
        kind: PickupKind,
        /// Drop point.
        position: Vec2,
    },
    /// Detonate a blast after `delay` seconds.
    Blast {
        /// The delayed blast.
        blast: Blast,
        /// Seconds until detonation.
        delay: f32,
    },
    /// Close a glitch window after `duration` seconds.
    GlitchWindow {
        /// Enemy owning the window.
        id: EntityId,
        /// Seconds until the window closes.
        duration: f32,
    },
    /// The player was slowed and the slow must be lifted later.
    PlayerSlowed,
}

/// Buffers filled by the resolver.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CombatOutput {
    /// Events in the order they happened.
    pub events: Vec<Event>,
    /// Deferred work for the owner.
    pub follow_ups: Vec<FollowUp>,
}

impl CombatOutput {
    /// Empties both buffers, keeping their allocations.
    pub fn clear(&mut self) {
        self.events.clear();
        self.follow_ups.clear();
    }
}

/// Collision and damage resolver.
#[derive(Debug)]
pub struct Resolver {
    pickups: PickupTuning,
    candidates: Vec<TargetCandidate>,
    phase_changes: Vec<u32>,
}

impl Resolver {
    /// Creates a resolver that drops pickups according to `pickups`.
    #[must_use]
    pub fn new(pickups: PickupTuning) -> Self {
        Self {
            pickups,
            candidates: Vec::new(),
            phase_changes: Vec::new(),
        }
    }

    /// Runs one full collision pass.
    ///
    /// Player projectiles are matched against enemies and the boss, hostile
    /// projectiles against the player, then bodies touching the player deal
    /// contact damage. Finally the combo idle clock advances.
    pub fn resolve<R: Rng + ?Sized>(
        &mut self,
        scene: &mut CombatScene<'_>,
        dt: f32,
        rng: &mut R,
        out: &mut CombatOutput,
    ) {
        self.resolve_player_projectiles(scene, rng, out);
        resolve_hostile_projectiles(scene, out);
        resolve_contact(scene, dt, out);

        if let Some(previous) = scene.combo.tick(dt) {
            out.events.push(Event::ComboReset { previous });
        }
    }

    /// Detonates `blast`, damaging every live enemy and the boss inside it.
    pub fn detonate<R: Rng + ?Sized>(
        &mut self,
        scene: &mut CombatScene<'_>,
        blast: Blast,
        rng: &mut R,
        out: &mut CombatOutput,
    ) {
        self.burst(scene, blast, None, rng, out);
    }

    /// Applies the damage carried by enemy intents and forwards the rest.
    pub fn resolve_enemy_actions(
        &mut self,
        scene: &mut CombatScene<'_>,
        actions: &[EnemyAction],
        out: &mut CombatOutput,
    ) {
        for action in actions {
            match *action {
                EnemyAction::Fire(spawn) => out.follow_ups.push(FollowUp::Projectile(spawn)),
                EnemyAction::Strike { attacker, damage } => {
                    let dealt =
                        hurt_player(scene.player, damage, DamageSource::Melee, true, &mut out.events);
                    if dealt > 0.0 {
                        if let Some(enemy) = scene.enemies.iter_mut().find(|enemy| enemy.id() == attacker) {
                            let _ = enemy.absorb(dealt);
                        }
                    }
                }
                EnemyAction::Explode {
                    center,
                    radius,
                    damage,
                    ..
                } => {
                    out.events.push(Event::AreaBurst { center, radius });
                    if circles_overlap(center, radius, scene.player.position(), PLAYER_RADIUS) {
                        let _ = hurt_player(
                            scene.player,
                            damage,
                            DamageSource::Hazard,
                            true,
                            &mut out.events,
                        );
                    }
                }
                EnemyAction::Summon {
                    parent,
                    kind,
                    count,
                    center,
                } => {
                    for position in drops::split_points(center, count) {
                        out.follow_ups.push(FollowUp::Enemy {
                            kind,
                            position,
                            parent,
                        });
                    }
                }
                EnemyAction::GlitchOpened { id, duration } => {
                    out.follow_ups.push(FollowUp::GlitchWindow { id, duration });
                }
            }
        }
    }

    /// Applies boss intents: pulls move the player, shots are forwarded.
    pub fn resolve_boss_actions(
        &mut self,
        scene: &mut CombatScene<'_>,
        actions: &[BossAction],
        out: &mut CombatOutput,
    ) {
        for action in actions {
            match *action {
                BossAction::Fire(spawn) => out.follow_ups.push(FollowUp::Projectile(spawn)),
                BossAction::Pull { offset } => {
                    if !scene.player.is_dead() {
                        scene.player.nudge(offset, &scene.bounds);
                    }
                }
            }
        }
    }

    fn resolve_player_projectiles<R: Rng + ?Sized>(
        &mut self,
        scene: &mut CombatScene<'_>,
        rng: &mut R,
        out: &mut CombatOutput,
    ) {
        for projectile in 0..scene.projectiles.len() {
            if !scene.projectiles[projectile].from_player() {
                continue;
            }
            let mut redirected = false;
            for enemy in 0..scene.enemies.len() {
                if scene.projectiles[projectile].is_spent() {
                    break;
                }
                if self.try_hit_enemy(scene, projectile, enemy, rng, out) {
                    redirected = true;
                    break;
                }
            }
            // A chained shot only touches its new target after it moves.
            if !redirected && !scene.projectiles[projectile].is_spent() {
                self.try_hit_boss(scene, projectile, rng, out);
            }
        }
    }

    /// Returns `true` when the projectile chained toward a new target.
    fn try_hit_enemy<R: Rng + ?Sized>(
        &mut self,
        scene: &mut CombatScene<'_>,
        projectile_index: usize,
        enemy_index: usize,
        rng: &mut R,
        out: &mut CombatOutput,
    ) -> bool {
        let enemy = &scene.enemies[enemy_index];
        if !enemy.is_targetable() {
            return false;
        }
        let (id, center, radius) = (enemy.id(), enemy.position(), enemy.radius());

        let projectile = &mut scene.projectiles[projectile_index];
        if projectile.hits().contains(id)
            || !circles_overlap(projectile.position(), projectile.radius(), center, radius)
        {
            return false;
        }

        let approach = center - projectile.velocity().normalize_or_zero() * radius;
        if enemy.blocks_from(approach) {
            projectile.destroy();
            return false;
        }

        let Some(response) = projectile.register_hit(id) else {
            return false;
        };
        let damage = projectile.damage();
        let first_hit = projectile.hits().len() == 1;
        let area = projectile.behavior().area();

        // The kill registers before the burst, so the burst sees the new combo.
        let lethal = self.damage_enemy(scene, enemy_index, damage, rng, out);

        if first_hit {
            if let Some(area) = area {
                let blast = Blast {
                    center,
                    radius: area.radius,
                    damage: damage * area.damage_factor,
                    children: area.children,
                };
                self.burst(scene, blast, Some(id), rng, out);
            }
        }

        if lethal && scene.projectiles[projectile_index].chain_bounces() > 0 {
            return self.chain(scene, projectile_index, id, center, out);
        }
        if response == HitResponse::Destroy {
            scene.projectiles[projectile_index].destroy();
        }
        false
    }

    fn chain(
        &mut self,
        scene: &mut CombatScene<'_>,
        projectile_index: usize,
        from: EntityId,
        origin: Vec2,
        out: &mut CombatOutput,
    ) -> bool {
        self.candidates.clear();
        self.candidates.extend(
            scene
                .enemies
                .iter()
                .filter(|enemy| enemy.is_targetable())
                .map(|enemy| TargetCandidate {
                    id: enemy.id(),
                    position: enemy.position(),
                }),
        );

        let projectile = &mut scene.projectiles[projectile_index];
        let Some(target) = projectile.chain_target(origin, &self.candidates) else {
            return false;
        };
        if !projectile.retarget(target.position) {
            return false;
        }
        out.events.push(Event::ProjectileChained {
            from,
            to: target.id,
            remaining: projectile.chain_bounces(),
        });
        true
    }

    fn try_hit_boss<R: Rng + ?Sized>(
        &mut self,
        scene: &mut CombatScene<'_>,
        projectile_index: usize,
        rng: &mut R,
        out: &mut CombatOutput,
    ) {
        let Some(boss) = scene.boss.as_deref_mut() else {
            return;
        };
        let projectile = &mut scene.projectiles[projectile_index];
        let boss_id = boss.id();
        if projectile.hits().contains(boss_id) {
            return;
        }

        match boss.resolve_hit(projectile.position(), projectile.radius()) {
            BossHit::Miss => {}
            BossHit::Blocked | BossHit::Decoy | BossHit::Cell => projectile.destroy(),
            BossHit::Core => {
                let Some(response) = projectile.register_hit(boss_id) else {
                    return;
                };
                let damage = projectile.damage();
                let first_hit = projectile.hits().len() == 1;
                let area = projectile.behavior().area();
                let center = boss.position();
                if response == HitResponse::Destroy {
                    projectile.destroy();
                }

                self.damage_boss(scene, damage, out);
                if first_hit {
                    if let Some(area) = area {
                        let blast = Blast {
                            center,
                            radius: area.radius,
                            damage: damage * area.damage_factor,
                            children: area.children,
                        };
                        self.burst(scene, blast, Some(boss_id), rng, out);
                    }
                }
            }
        }
    }

    /// Applies one area burst. Kills inside the burst run their own kill
    /// handling but never trigger further bursts.
    fn burst<R: Rng + ?Sized>(
        &mut self,
        scene: &mut CombatScene<'_>,
        blast: Blast,
        exclude: Option<EntityId>,
        rng: &mut R,
        out: &mut CombatOutput,
    ) {
        out.events.push(Event::AreaBurst {
            center: blast.center,
            radius: blast.radius,
        });

        for index in 0..scene.enemies.len() {
            let enemy = &scene.enemies[index];
            if !enemy.is_targetable()
                || Some(enemy.id()) == exclude
                || !circles_overlap(blast.center, blast.radius, enemy.position(), enemy.radius())
            {
                continue;
            }
            let _ = self.damage_enemy(scene, index, blast.damage, rng, out);
        }

        let boss_inside = scene.boss.as_deref().is_some_and(|boss| {
            Some(boss.id()) != exclude && boss.overlaps(blast.center, blast.radius)
        });
        if boss_inside {
            self.damage_boss(scene, blast.damage, out);
        }

        for (index, center) in
            drops::ring_points(blast.center, CHILD_BLAST_OFFSET, blast.children).enumerate()
        {
            out.follow_ups.push(FollowUp::Blast {
                blast: Blast {
                    center,
                    radius: blast.radius * CHILD_RADIUS_FACTOR,
                    damage: blast.damage * CHILD_DAMAGE_FACTOR,
                    children: 0,
                },
                delay: CHILD_BLAST_INTERVAL * (index + 1) as f32,
            });
        }
    }

    /// Applies `raw` damage scaled by combo and class bonus; returns lethality.
    fn damage_enemy<R: Rng + ?Sized>(
        &mut self,
        scene: &mut CombatScene<'_>,
        index: usize,
        raw: f32,
        rng: &mut R,
        out: &mut CombatOutput,
    ) -> bool {
        let class = scene.player.class();
        let multiplier = scene.combo.multiplier();
        let enemy = &mut scene.enemies[index];
        if !enemy.is_alive() {
            return false;
        }

        let amount = raw * multiplier * class.conditional_bonus(enemy.health().fraction());
        let before = enemy.health().current();
        let lethal = enemy.take_damage(amount);
        out.events.push(Event::EnemyDamaged {
            id: enemy.id(),
            amount: before - enemy.health().current(),
        });

        if lethal {
            self.on_enemy_killed(scene, index, rng, out);
        }
        lethal
    }

    fn on_enemy_killed<R: Rng + ?Sized>(
        &mut self,
        scene: &mut CombatScene<'_>,
        index: usize,
        rng: &mut R,
        out: &mut CombatOutput,
    ) {
        let enemy = &scene.enemies[index];
        let (id, kind, position) = (enemy.id(), enemy.kind(), enemy.position());
        out.events.push(Event::EnemyKilled { id, kind, position });

        let reward = scene.combo.register_kill();
        out.events.push(Event::ComboChanged {
            count: reward.count,
        });
        if reward.heal > 0.0 && !scene.player.is_dead() {
            let amount = scene.player.heal(reward.heal);
            if amount > 0.0 {
                out.events.push(Event::PlayerHealed { amount });
            }
        }

        if let Some(kind) = drops::roll_drop(&self.pickups, kind, rng) {
            out.follow_ups.push(FollowUp::Pickup { kind, position });
        }

        if kind == EnemyKind::Splitter {
            let count = drops::split_count(rng);
            for child in drops::split_points(position, count) {
                out.follow_ups.push(FollowUp::Enemy {
                    kind: EnemyKind::Mini,
                    position: child,
                    parent: id,
                });
            }
        }
    }

    fn damage_boss(&mut self, scene: &mut CombatScene<'_>, raw: f32, out: &mut CombatOutput) {
        let class = scene.player.class();
        let multiplier = scene.combo.multiplier();
        let Some(boss) = scene.boss.as_deref_mut() else {
            return;
        };
        if !boss.is_targetable() {
            return;
        }

        let amount = raw * multiplier * class.conditional_bonus(boss.health().fraction());
        let before = boss.health().current();
        let lethal = boss.take_damage(amount);
        let dealt = before - boss.health().current();
        if dealt > 0.0 {
            out.events.push(Event::BossDamaged { amount: dealt });
        }

        let kind = boss.kind();
        boss.drain_phase_changes(&mut self.phase_changes);
        for phase in self.phase_changes.drain(..) {
            out.events.push(Event::BossPhaseChanged { kind, phase });
        }

        if lethal {
            out.events.push(Event::BossDied { kind });
            self.drop_boss_tokens(boss.position(), out);
        }
    }

    fn drop_boss_tokens(&self, center: Vec2, out: &mut CombatOutput) {
        for position in drops::boss_token_points(center, self.pickups.boss_tokens) {
            out.follow_ups.push(FollowUp::Pickup {
                kind: PickupKind::Token,
                position,
            });
        }
    }
}

/// Hostile projectiles are destroyed on contact whether or not damage lands.
fn resolve_hostile_projectiles(scene: &mut CombatScene<'_>, out: &mut CombatOutput) {
    if scene.player.is_dead() {
        return;
    }
    let player = scene.player.position();
    for projectile in scene.projectiles.iter_mut() {
        if projectile.from_player()
            || projectile.is_spent()
            || !circles_overlap(projectile.position(), projectile.radius(), player, PLAYER_RADIUS)
        {
            continue;
        }
        projectile.destroy();

        let dealt = hurt_player(
            scene.player,
            projectile.damage(),
            DamageSource::Projectile,
            true,
            &mut out.events,
        );
        if dealt > 0.0 && projectile.behavior().slows() {
            scene.player.apply_slow();
            out.follow_ups.push(FollowUp::PlayerSlowed);
        }
    }
}

fn resolve_contact(scene: &mut CombatScene<'_>, dt: f32, out: &mut CombatOutput) {
    if scene.player.is_dead() || !(dt > 0.0) {
        return;
    }

    let mut hurt = false;
    for enemy in scene.enemies.iter() {
        let player = scene.player.position();
        if !enemy.is_targetable()
            || enemy.is_disguised()
            || !circles_overlap(enemy.position(), enemy.radius(), player, PLAYER_RADIUS)
        {
            continue;
        }
        hurt |= hurt_player(
            scene.player,
            enemy.contact_damage_per_sec() * dt,
            DamageSource::Contact,
            false,
            &mut out.events,
        ) > 0.0;
        scene
            .player
            .nudge(separation(enemy.position(), player) * CONTACT_NUDGE, &scene.bounds);
    }

    if let Some(boss) = scene.boss.as_deref() {
        let player = scene.player.position();
        if boss.is_hostile() && boss.overlaps(player, PLAYER_RADIUS) {
            hurt |= hurt_player(
                scene.player,
                boss.contact_dps() * dt,
                DamageSource::Contact,
                false,
                &mut out.events,
            ) > 0.0;
            scene
                .player
                .nudge(separation(boss.position(), player) * CONTACT_NUDGE, &scene.bounds);
        }

        let hazard = boss.hazard_dps(scene.player.position(), PLAYER_RADIUS);
        if hazard > 0.0 {
            let _ = hurt_player(
                scene.player,
                hazard * dt,
                DamageSource::Hazard,
                false,
                &mut out.events,
            );
        }
    }

    // Contact absorbed by invulnerability keeps the streak.
    if hurt {
        if let Some(previous) = scene.combo.reset() {
            out.events.push(Event::ComboReset { previous });
        }
    }
}

/// Unit vector pushing `player` away from `body`.
fn separation(body: Vec2, player: Vec2) -> Vec2 {
    let direction = (player - body).normalize_or_zero();
    if direction == Vec2::ZERO {
        Vec2::X
    } else {
        direction
    }
}

/// Damages the player and reports the health actually removed.
fn hurt_player(
    player: &mut Player,
    amount: f32,
    source: DamageSource,
    discrete: bool,
    events: &mut Vec<Event>,
) -> f32 {
    let before = player.health().current();
    let _ = if discrete {
        player.take_damage(amount)
    } else {
        player.take_continuous_damage(amount)
    };
    let dealt = before - player.health().current();
    if dealt > 0.0 {
        events.push(Event::PlayerDamaged {
            amount: dealt,
            source,
        });
    }
    dealt
}
