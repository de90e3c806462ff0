#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Collapse Arena.
//!
//! The world owns every entity of a run and advances them through [`apply`].
//! One tick runs in a fixed order: the progression controller checks layer
//! completion, the spawn queue releases due enemies, scheduled tasks fire,
//! actors move and attack, projectiles travel, and finally the collision
//! resolver applies damage. Deaths and drops become pending additions that are
//! merged before the tick ends, so no collection is mutated while it is being
//! iterated. Read-only access goes through [`query`].

mod tasks;

use std::{fmt, mem, time::Duration};

use collapse_arena_core::{
    ArenaBounds, ArenaConfig, AudioSink, BossKind, Command, ConfigError, DamageSource, EnemyKind,
    EntityId, Event, FrameInput, PickupId, PickupKind, PlayerClass, SoundCue, TurretId, Vec2,
};
use collapse_arena_system_actors::{
    player::SLOW_SECS, Enemy, EnemyAction, Pickup, Player, SpecialAbility, Turret,
};
use collapse_arena_system_bosses::{Boss, BossAction};
use collapse_arena_system_combat::{Blast, CombatOutput, CombatScene, FollowUp, Resolver};
use collapse_arena_system_progression::{Directive, LayerStatus, Progression, Stage};
use collapse_arena_system_projectiles::{
    Projectile, ProjectileSpawn, StepOutcome, TargetCandidate,
};
use collapse_arena_system_scaling::{weapon_tier, ComboTracker, ZoneScaling};
use collapse_arena_system_spawning::{derive_wave_seed, SpawnOrder, SpawnQueue, WavePlan};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use tasks::{TaskKind, TaskOwner, TaskScheduler};

/// Vertical position of a spawning boss as a fraction of the arena height.
const BOSS_SPAWN_HEIGHT: f32 = 0.25;

/// Simulation state of a single run.
pub struct World {
    config: ArenaConfig,
    arena: ArenaBounds,
    rng: ChaCha8Rng,
    player: Player,
    enemies: Vec<Enemy>,
    boss: Option<Boss>,
    projectiles: Vec<Projectile>,
    pickups: Vec<Pickup>,
    turrets: Vec<Turret>,
    combo: ComboTracker,
    scaling: ZoneScaling,
    progression: Progression,
    spawn_queue: Option<SpawnQueue>,
    resolver: Resolver,
    tasks: TaskScheduler,
    audio: Box<dyn AudioSink>,
    next_entity: u32,
    next_pickup: u32,
    next_turret: u32,
    tick: u64,
    elapsed: Duration,
    started: bool,
    finished: bool,
    scratch: Scratch,
}

/// Buffers reused across ticks.
#[derive(Debug, Default)]
struct Scratch {
    directives: Vec<Directive>,
    orders: Vec<SpawnOrder>,
    volleys: Vec<ProjectileSpawn>,
    enemy_actions: Vec<EnemyAction>,
    boss_actions: Vec<BossAction>,
    targets: Vec<TargetCandidate>,
    blasts: Vec<Blast>,
    due: Vec<TaskKind>,
    combat: CombatOutput,
}

impl World {
    /// Creates a run for `class` after validating `config`.
    ///
    /// The seed in `config` drives every random roll of the run, so two worlds
    /// built from the same configuration and fed the same commands produce
    /// identical event streams.
    pub fn new(
        config: ArenaConfig,
        class: PlayerClass,
        audio: Box<dyn AudioSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let arena = ArenaBounds::new(config.width, config.height);
        info!(
            seed = config.seed,
            ?class,
            layers = config.total_layers(),
            "world created"
        );

        Ok(Self {
            arena,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            player: Player::new(class, arena.center(), config.pickups.tokens_per_charge),
            enemies: Vec::new(),
            boss: None,
            projectiles: Vec::new(),
            pickups: Vec::new(),
            turrets: Vec::new(),
            combo: ComboTracker::new(config.combo.clone()),
            scaling: ZoneScaling::for_zone(&config.scaling, 0),
            progression: Progression::new(&config),
            spawn_queue: None,
            resolver: Resolver::new(config.pickups.clone()),
            tasks: TaskScheduler::new(),
            audio,
            next_entity: 0,
            next_pickup: 0,
            next_turret: 0,
            tick: 0,
            elapsed: Duration::ZERO,
            started: false,
            finished: false,
            scratch: Scratch::default(),
            config,
        })
    }

    fn advance(&mut self, dt: Duration, input: FrameInput, out: &mut Vec<Event>) {
        if self.finished {
            return;
        }
        if !self.started {
            self.started = true;
            out.push(Event::RunStarted {
                seed: self.config.seed,
            });
        }
        self.tick += 1;
        self.elapsed += dt;
        out.push(Event::TimeAdvanced { dt });

        let secs = dt.as_secs_f32();
        self.advance_progression(secs, out);
        if self.finished {
            return;
        }

        self.drain_spawns(dt, out);
        self.run_due_tasks(secs);
        self.advance_player(secs, &input, out);
        self.advance_hostiles(secs, out);
        self.advance_projectiles(secs);
        self.resolve_combat(secs, out);
        self.burn_collapse(secs, out);
        self.collect_pickups(secs, out);
        self.compact();

        if self.player.is_dead() {
            self.advance_progression(0.0, out);
        }
    }

    fn abandon(&mut self) {
        if self.finished {
            return;
        }
        let mut directives = mem::take(&mut self.scratch.directives);
        directives.clear();
        self.progression.abandon(&mut directives);
        debug!(?directives, "run abandoned");
        self.scratch.directives = directives;
        self.finish();
    }

    fn finish(&mut self) {
        self.finished = true;
        let cancelled = self.tasks.clear();
        let cleared = self.enemies.len();
        for enemy in &mut self.enemies {
            enemy.force_clear();
        }
        self.compact();
        info!(
            tick = self.tick,
            elapsed = ?self.elapsed,
            cancelled,
            cleared,
            "run finished"
        );
    }

    fn layer_status(&self) -> LayerStatus {
        LayerStatus {
            all_spawned: self
                .spawn_queue
                .as_ref()
                .map_or(true, SpawnQueue::is_fully_spawned),
            hostiles_alive: self.enemies.iter().filter(|enemy| enemy.is_alive()).count(),
            boss_finished: self.boss.as_ref().map_or(false, Boss::is_finished),
            player_dead: self.player.is_dead(),
        }
    }

    fn advance_progression(&mut self, secs: f32, out: &mut Vec<Event>) {
        let status = self.layer_status();
        let mut directives = mem::take(&mut self.scratch.directives);
        directives.clear();
        self.progression.update(secs, &status, &mut directives);
        for directive in directives.drain(..) {
            self.apply_directive(directive, out);
        }
        self.scratch.directives = directives;
    }

    fn apply_directive(&mut self, directive: Directive, out: &mut Vec<Event>) {
        match directive {
            Directive::BeginWave { layer, zone } => self.begin_wave(layer, zone, out),
            Directive::BeginBoss { layer, zone, kind } => self.begin_boss(layer, zone, kind, out),
            Directive::CollapseStarted { layer } => {
                info!(layer, "context collapse started");
                out.push(Event::CollapseStarted { layer });
            }
            Directive::LayerCleared { layer } => self.clear_layer(layer, out),
            Directive::Victory => {
                info!("final layer cleared");
                out.push(Event::Victory);
                self.finish();
            }
            Directive::Defeat { layer } => {
                info!(layer, "player died");
                out.push(Event::PlayerDied { layer });
                self.finish();
            }
        }
    }

    fn enter_layer(&mut self, layer: u32, zone: u32) {
        self.scaling = ZoneScaling::for_zone(&self.config.scaling, zone);
        self.player
            .set_tier(weapon_tier(&self.config.scaling, layer));
    }

    fn begin_wave(&mut self, layer: u32, zone: u32, out: &mut Vec<Event>) {
        self.enter_layer(layer, zone);
        let plan = WavePlan::for_layer(&self.config.waves, layer, zone);
        let pool = self
            .config
            .zones
            .get(zone as usize)
            .map(|entry| entry.enemy_pool.as_slice())
            .unwrap_or_default();

        match SpawnQueue::build(&plan, pool, derive_wave_seed(self.config.seed, layer)) {
            Ok(queue) => {
                let total = queue.total();
                info!(layer, zone, total, "wave started");
                out.push(Event::WaveStarted { layer, zone, total });
                self.spawn_queue = Some(queue);
            }
            Err(error) => {
                warn!(%error, layer, zone, "wave could not be built");
                self.spawn_queue = None;
            }
        }
    }

    fn begin_boss(&mut self, layer: u32, zone: u32, kind: BossKind, out: &mut Vec<Event>) {
        self.enter_layer(layer, zone);
        self.spawn_queue = None;

        let id = self.allocate_entity();
        let position = Vec2::new(
            self.arena.center().x,
            self.arena.min().y + self.arena.height() * BOSS_SPAWN_HEIGHT,
        );
        self.boss = Some(Boss::new(id, kind, position, self.scaling.boss_stats(kind)));

        info!(layer, zone, boss = kind.name(), "boss intro started");
        out.push(Event::BossIntroStarted { kind });
        out.push(Event::BossSpawned { id, kind });
    }

    fn clear_layer(&mut self, layer: u32, out: &mut Vec<Event>) {
        info!(layer, tick = self.tick, "layer cleared");
        out.push(Event::LayerCleared { layer });
        self.spawn_queue = None;
        self.boss = None;
        for projectile in &mut self.projectiles {
            if !projectile.from_player() {
                projectile.destroy();
            }
        }
    }

    fn allocate_entity(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity);
        self.next_entity = self.next_entity.wrapping_add(1);
        id
    }

    fn drain_spawns(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if self.progression.stage() != Stage::Wave {
            return;
        }
        let Some(queue) = self.spawn_queue.as_mut() else {
            return;
        };

        let mut orders = mem::take(&mut self.scratch.orders);
        orders.clear();
        queue.drain(dt, &self.arena, &mut orders);
        for order in orders.drain(..) {
            self.spawn_enemy(order.kind, order.position, out);
        }
        self.scratch.orders = orders;
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, position: Vec2, out: &mut Vec<Event>) {
        let id = self.allocate_entity();
        let mut enemy = Enemy::new(id, kind, position, self.scaling.enemy_stats(kind));
        enemy.clamp_to(&self.arena);
        debug!(id = id.get(), ?kind, "enemy spawned");
        out.push(Event::EnemySpawned {
            id,
            kind,
            position: enemy.position(),
        });
        self.enemies.push(enemy);
    }

    fn run_due_tasks(&mut self, secs: f32) {
        let mut due = mem::take(&mut self.scratch.due);
        due.clear();
        self.tasks.advance(secs, &mut due);
        for task in due.drain(..) {
            match task {
                TaskKind::EndOverclock => self.player.set_overclock(false),
                TaskKind::EndSlow => self.player.clear_slow(),
                TaskKind::ExpireTurret(id) => {
                    self.turrets.retain(|turret| turret.id() != id);
                    debug!(turret = id.get(), "turret expired");
                }
                TaskKind::CloseGlitch(id) => {
                    if let Some(enemy) = self.enemies.iter_mut().find(|enemy| enemy.id() == id) {
                        enemy.close_glitch();
                    }
                }
                TaskKind::Detonate(blast) => self.scratch.blasts.push(blast),
            }
        }
        self.scratch.due = due;
    }

    /// Nearest visible target for auto-aim: enemies and the boss core.
    fn aim_target(&self) -> Option<Vec2> {
        let origin = self.player.position();
        let enemies = self
            .enemies
            .iter()
            .filter(|enemy| enemy.is_targetable() && !enemy.is_disguised())
            .map(Enemy::position);
        let boss = self
            .boss
            .iter()
            .filter(|boss| boss.is_targetable())
            .map(Boss::position);
        enemies
            .chain(boss)
            .min_by(|a, b| a.distance_squared(origin).total_cmp(&b.distance_squared(origin)))
    }

    fn refresh_targets(&mut self) {
        self.scratch.targets.clear();
        self.scratch.targets.extend(
            self.enemies
                .iter()
                .filter(|enemy| enemy.is_targetable() && !enemy.is_disguised())
                .map(|enemy| TargetCandidate {
                    id: enemy.id(),
                    position: enemy.position(),
                }),
        );
        if let Some(boss) = self.boss.as_ref().filter(|boss| boss.is_targetable()) {
            self.scratch.targets.push(TargetCandidate {
                id: boss.id(),
                position: boss.position(),
            });
        }
    }

    fn advance_player(&mut self, secs: f32, input: &FrameInput, out: &mut Vec<Event>) {
        let aim = self.aim_target();
        self.scratch.volleys.clear();
        let step = self.player.update(
            secs,
            input,
            &self.arena,
            aim,
            &mut self.rng,
            &mut self.scratch.volleys,
        );
        self.projectiles
            .extend(self.scratch.volleys.drain(..).map(Projectile::new));

        if let Some(special) = step.special {
            self.use_special(special, out);
        }
    }

    fn use_special(&mut self, special: SpecialAbility, out: &mut Vec<Event>) {
        match special {
            SpecialAbility::Overclock { duration } => {
                self.player.set_overclock(true);
                self.tasks
                    .replace(TaskOwner::Player, duration, TaskKind::EndOverclock);
            }
            SpecialAbility::Purge {
                center,
                radius,
                damage,
            } => self.scratch.blasts.push(Blast {
                center,
                radius,
                damage,
                children: 0,
            }),
            SpecialAbility::Turret { position, lifetime } => {
                let id = TurretId::new(self.next_turret);
                self.next_turret = self.next_turret.wrapping_add(1);
                self.turrets.push(Turret::new(id, position));
                self.tasks
                    .schedule(TaskOwner::Turret(id), lifetime, TaskKind::ExpireTurret(id));
            }
        }

        let class = self.player.class();
        debug!(?class, charges = self.player.charges(), "special used");
        out.push(Event::SpecialUsed { class });
    }

    fn advance_hostiles(&mut self, secs: f32, out: &mut Vec<Event>) {
        let target = self.player.position();

        self.scratch.enemy_actions.clear();
        for enemy in &mut self.enemies {
            let _ = enemy.update(secs, target, &mut self.scratch.enemy_actions);
            enemy.clamp_to(&self.arena);
        }

        self.scratch.boss_actions.clear();
        if let Some(boss) = self.boss.as_mut() {
            let step = boss.update(secs, target, &mut self.scratch.boss_actions);
            boss.clamp_to(&self.arena);
            if step.died {
                info!(boss = boss.kind().name(), "boss defeated");
                out.push(Event::BossDefeated { kind: boss.kind() });
            }
        }

        self.refresh_targets();
        self.scratch.volleys.clear();
        let tier = self.player.tier();
        for turret in &mut self.turrets {
            let _ = turret.update(secs, tier, &self.scratch.targets, &mut self.scratch.volleys);
        }
        self.projectiles
            .extend(self.scratch.volleys.drain(..).map(Projectile::new));
    }

    fn advance_projectiles(&mut self, secs: f32) {
        self.refresh_targets();
        for projectile in &mut self.projectiles {
            if projectile.is_spent() {
                continue;
            }
            if projectile.step(secs, &self.scratch.targets, &self.arena) == StepOutcome::Expired {
                if let Some(blast) = Blast::on_expiry(projectile) {
                    self.scratch.blasts.push(blast);
                }
                projectile.destroy();
            }
        }
    }

    fn resolve_combat(&mut self, secs: f32, out: &mut Vec<Event>) {
        let mut combat = mem::take(&mut self.scratch.combat);
        combat.clear();

        let mut scene = CombatScene {
            player: &mut self.player,
            enemies: &mut self.enemies,
            boss: self.boss.as_mut(),
            projectiles: &mut self.projectiles,
            combo: &mut self.combo,
            bounds: self.arena,
        };
        self.resolver
            .resolve_enemy_actions(&mut scene, &self.scratch.enemy_actions, &mut combat);
        self.resolver
            .resolve_boss_actions(&mut scene, &self.scratch.boss_actions, &mut combat);
        for blast in self.scratch.blasts.drain(..) {
            self.resolver
                .detonate(&mut scene, blast, &mut self.rng, &mut combat);
        }
        self.resolver
            .resolve(&mut scene, secs, &mut self.rng, &mut combat);

        for event in combat.events.drain(..) {
            self.observe(&event);
            out.push(event);
        }
        for follow_up in combat.follow_ups.drain(..) {
            self.apply_follow_up(follow_up, out);
        }
        self.scratch.combat = combat;
    }

    fn observe(&mut self, event: &Event) {
        match *event {
            Event::EnemyKilled { id, kind, .. } => {
                let cancelled = self.tasks.cancel_owner(TaskOwner::Enemy(id));
                debug!(id = id.get(), ?kind, cancelled, "enemy killed");
            }
            Event::BossPhaseChanged { kind, phase } => {
                info!(boss = kind.name(), phase, "boss phase changed");
            }
            Event::BossDied { kind } => info!(boss = kind.name(), "boss died"),
            _ => {}
        }
    }

    fn apply_follow_up(&mut self, follow_up: FollowUp, out: &mut Vec<Event>) {
        match follow_up {
            FollowUp::Projectile(spawn) => self.projectiles.push(Projectile::new(spawn)),
            FollowUp::Enemy {
                kind,
                position,
                parent,
            } => {
                debug!(parent = parent.get(), ?kind, "child enemy released");
                self.spawn_enemy(kind, position, out);
            }
            FollowUp::Pickup { kind, position } => self.drop_pickup(kind, position, out),
            FollowUp::Blast { blast, delay } => {
                self.tasks
                    .schedule(TaskOwner::Arena, delay, TaskKind::Detonate(blast));
            }
            FollowUp::GlitchWindow { id, duration } => {
                self.tasks
                    .replace(TaskOwner::Enemy(id), duration, TaskKind::CloseGlitch(id));
            }
            FollowUp::PlayerSlowed => {
                self.tasks
                    .replace(TaskOwner::Player, SLOW_SECS, TaskKind::EndSlow);
            }
        }
    }

    fn drop_pickup(&mut self, kind: PickupKind, position: Vec2, out: &mut Vec<Event>) {
        let id = PickupId::new(self.next_pickup);
        self.next_pickup = self.next_pickup.wrapping_add(1);
        let position = self.arena.clamp_circle(position, 0.0);
        self.pickups.push(Pickup::new(
            id,
            kind,
            position,
            self.config.pickups.lifetime_secs,
        ));
        out.push(Event::PickupSpawned { id, kind, position });
    }

    fn burn_collapse(&mut self, secs: f32, out: &mut Vec<Event>) {
        let collapse = self.progression.collapse();
        if !collapse.is_active() || self.player.is_dead() {
            return;
        }
        if collapse.safe_area(&self.arena).contains(self.player.position()) {
            return;
        }

        let amount = collapse.burn(secs);
        let before = self.player.health().current();
        let _ = self.player.take_continuous_damage(amount);
        let dealt = before - self.player.health().current();
        if dealt > 0.0 {
            out.push(Event::PlayerDamaged {
                amount: dealt,
                source: DamageSource::Collapse,
            });
        }
    }

    fn collect_pickups(&mut self, secs: f32, out: &mut Vec<Event>) {
        let reach = self.config.pickups.collect_radius;
        let origin = self.player.position();
        let alive = !self.player.is_dead();

        for index in 0..self.pickups.len() {
            let pickup = &mut self.pickups[index];
            if pickup.update(secs) || !alive || !pickup.try_collect(origin, reach) {
                continue;
            }
            let (id, kind) = (pickup.id(), pickup.kind());
            out.push(Event::PickupCollected { id, kind });
            self.grant(kind, out);
        }
    }

    fn grant(&mut self, kind: PickupKind, out: &mut Vec<Event>) {
        match kind {
            PickupKind::Health => {
                let amount = self.player.heal(self.config.pickups.health_amount);
                if amount > 0.0 {
                    out.push(Event::PlayerHealed { amount });
                }
            }
            PickupKind::Token => {
                let granted = self.player.add_tokens(1);
                if granted > 0 {
                    debug!(granted, charges = self.player.charges(), "special charge earned");
                }
            }
            PickupKind::Weapon(weapon) => {
                self.player.set_weapon(weapon);
                info!(?weapon, "weapon equipped");
            }
        }
    }

    fn compact(&mut self) {
        let tasks = &mut self.tasks;
        self.enemies.retain(|enemy| {
            if enemy.is_removable() {
                let _ = tasks.cancel_owner(TaskOwner::Enemy(enemy.id()));
                false
            } else {
                true
            }
        });
        self.projectiles.retain(|projectile| !projectile.is_spent());
        self.pickups
            .retain(|pickup| !pickup.is_collected() && !pickup.is_expired());
    }

    fn play_cues(&mut self, events: &[Event]) {
        for cue in events.iter().filter_map(SoundCue::for_event) {
            if let Err(error) = self.audio.play(cue) {
                warn!(%error, ?cue, "audio cue dropped");
            }
        }
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.tick)
            .field("stage", &self.progression.stage())
            .field("layer", &self.progression.layer())
            .field("enemies", &self.enemies.len())
            .field("projectiles", &self.projectiles.len())
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

/// Executes the provided command against the world.
///
/// Events describing what happened are appended to `out_events`. Audio cues
/// for those events are requested afterwards; a failing sink is logged and
/// never changes the simulation.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let first = out_events.len();
    match command {
        Command::Tick { dt, input } => world.advance(dt, input, out_events),
        Command::AbandonRun => world.abandon(),
    }
    world.play_cues(&out_events[first..]);
}

/// Read-only views of the world for adapters and collaborators.
pub mod query {
    use std::time::Duration;

    use super::World;
    use collapse_arena_core::{
        snapshot::{FrameSnapshot, HudState},
        ArenaBounds, ArenaConfig,
    };
    use collapse_arena_system_actors::{Enemy, Pickup, Player, Turret};
    use collapse_arena_system_bosses::Boss;
    use collapse_arena_system_progression::{Progression, Stage};
    use collapse_arena_system_projectiles::Projectile;
    use collapse_arena_system_spawning::SpawnQueue;

    /// Everything the renderer needs to draw the current frame.
    #[must_use]
    pub fn frame_snapshot(world: &World) -> FrameSnapshot {
        let mut enemies: Vec<_> = world.enemies.iter().map(Enemy::pose).collect();
        enemies.sort_by_key(|pose| pose.id);

        FrameSnapshot {
            arena: world.arena,
            safe_area: world.progression.safe_area(&world.arena),
            player: world.player.pose(),
            enemies,
            boss: world.boss.as_ref().map(Boss::pose),
            projectiles: world.projectiles.iter().map(Projectile::pose).collect(),
            pickups: world.pickups.iter().map(Pickup::pose).collect(),
            turrets: world.turrets.iter().map(Turret::pose).collect(),
        }
    }

    /// Aggregated run state for the HUD.
    #[must_use]
    pub fn hud(world: &World) -> HudState {
        let player = &world.player;
        HudState {
            health: player.health().current(),
            max_health: player.health().max(),
            tokens: player.tokens(),
            charges: player.charges(),
            combo: world.combo.count(),
            combo_multiplier: world.combo.multiplier(),
            layer: world.progression.layer(),
            zone: world.progression.zone(),
            collapse: world.progression.collapse().is_active(),
            class: player.class(),
            weapon: player.weapon(),
            tier: player.tier(),
            boss_health: world.boss.as_ref().map(|boss| boss.health().fraction()),
        }
    }

    /// The player avatar.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Enemies in spawn order, including those still playing their death.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        &world.enemies
    }

    /// The boss of the current layer, if any.
    #[must_use]
    pub fn boss(world: &World) -> Option<&Boss> {
        world.boss.as_ref()
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> &[Projectile] {
        &world.projectiles
    }

    /// Pickups waiting to be collected.
    #[must_use]
    pub fn pickups(world: &World) -> &[Pickup] {
        &world.pickups
    }

    /// Deployed turrets.
    #[must_use]
    pub fn turrets(world: &World) -> &[Turret] {
        &world.turrets
    }

    /// Layer sequencing state.
    #[must_use]
    pub fn progression(world: &World) -> &Progression {
        &world.progression
    }

    /// Current stage of the run.
    #[must_use]
    pub fn stage(world: &World) -> Stage {
        world.progression.stage()
    }

    /// Spawn queue of the current wave, if one is active.
    #[must_use]
    pub fn spawn_queue(world: &World) -> Option<&SpawnQueue> {
        world.spawn_queue.as_ref()
    }

    /// Full arena rectangle.
    #[must_use]
    pub fn arena(world: &World) -> ArenaBounds {
        world.arena
    }

    /// Configuration the run was created with.
    #[must_use]
    pub fn config(world: &World) -> &ArenaConfig {
        &world.config
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick
    }

    /// Simulated time elapsed since the run began.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Reports whether the run ended through victory, death or abandonment.
    #[must_use]
    pub fn is_finished(world: &World) -> bool {
        world.finished
    }

    /// Number of delayed tasks still pending.
    #[must_use]
    pub fn pending_tasks(world: &World) -> usize {
        world.tasks.len()
    }
}
