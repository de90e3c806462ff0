use collapse_arena_core::{
    unit_from_angle, ArenaBounds, BossKind, ComboTuning, EnemyKind, EnemyStats, EntityId, Event,
    PickupKind, PickupTuning, PlayerClass, Vec2,
};
use collapse_arena_system_actors::{Enemy, Player};
use collapse_arena_system_bosses::{Boss, INTRO_SECS};
use collapse_arena_system_combat::{CombatOutput, CombatScene, FollowUp, Resolver};
use collapse_arena_system_projectiles::{
    weapon::CHAIN_RANGE, AreaEffect, AreaTrigger, Behavior, Projectile, ProjectileSpawn,
};
use collapse_arena_system_scaling::ComboTracker;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DT: f32 = 0.01;

struct Arena {
    player: Player,
    enemies: Vec<Enemy>,
    boss: Option<Boss>,
    projectiles: Vec<Projectile>,
    combo: ComboTracker,
    resolver: Resolver,
    rng: ChaCha8Rng,
    events: Vec<Event>,
    follow_ups: Vec<FollowUp>,
}

impl Arena {
    fn new() -> Self {
        Self::with_pickups(PickupTuning {
            health_chance: 0.0,
            weapon_chance: 0.0,
            token_chance: 0.0,
            ..PickupTuning::default()
        })
    }

    fn with_pickups(pickups: PickupTuning) -> Self {
        Self {
            player: Player::new(PlayerClass::Striker, Vec2::new(640.0, 690.0), 10),
            enemies: Vec::new(),
            boss: None,
            projectiles: Vec::new(),
            combo: ComboTracker::new(ComboTuning::default()),
            resolver: Resolver::new(pickups),
            rng: ChaCha8Rng::seed_from_u64(0x5eed),
            events: Vec::new(),
            follow_ups: Vec::new(),
        }
    }

    fn enemy(&mut self, id: u32, kind: EnemyKind, position: Vec2, health: f32) {
        let stats = EnemyStats {
            health,
            ..kind.stats()
        };
        self.enemies
            .push(Enemy::new(EntityId::new(id), kind, position, stats));
    }

    fn shoot(&mut self, origin: Vec2, velocity: Vec2, damage: f32, behavior: Behavior) {
        self.projectiles.push(Projectile::new(ProjectileSpawn {
            origin,
            velocity,
            damage,
            radius: 5.0,
            lifetime: 5.0,
            from_player: true,
            behavior,
        }));
    }

    fn resolve(&mut self) {
        let mut scene = CombatScene {
            player: &mut self.player,
            enemies: &mut self.enemies,
            boss: self.boss.as_mut(),
            projectiles: &mut self.projectiles,
            combo: &mut self.combo,
            bounds: ArenaBounds::new(1_280.0, 720.0),
        };
        let mut output = CombatOutput::default();
        self.resolver
            .resolve(&mut scene, DT, &mut self.rng, &mut output);
        self.events.append(&mut output.events);
        self.follow_ups.append(&mut output.follow_ups);
    }

    /// Moves every live projectile and resolves, until all are spent.
    fn run(&mut self, max_ticks: usize) {
        let bounds = ArenaBounds::new(1_280.0, 720.0);
        for _ in 0..max_ticks {
            self.resolve();
            if self.projectiles.iter().all(Projectile::is_spent) {
                return;
            }
            for projectile in &mut self.projectiles {
                if !projectile.is_spent() {
                    let _ = projectile.step(DT, &[], &bounds);
                }
            }
        }
    }

    fn damage_to(&self, id: u32) -> Vec<f32> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::EnemyDamaged { id: hit, amount } if hit.get() == id => Some(*amount),
                _ => None,
            })
            .collect()
    }

    fn kills(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::EnemyKilled { .. }))
            .count()
    }
}

#[test]
fn chain_consumes_every_bounce_then_dies_on_non_lethal_hit() {
    let mut arena = Arena::new();
    for (index, x) in [200.0, 350.0, 500.0].into_iter().enumerate() {
        arena.enemy(index as u32 + 1, EnemyKind::Crawler, Vec2::new(x, 300.0), 5.0);
    }
    arena.enemy(4, EnemyKind::Brute, Vec2::new(650.0, 300.0), 1_000.0);
    arena.shoot(
        Vec2::new(200.0, 300.0),
        Vec2::new(520.0, 0.0),
        40.0,
        Behavior::straight().with_chain(3, CHAIN_RANGE),
    );

    arena.run(400);

    let remaining: Vec<u32> = arena
        .events
        .iter()
        .filter_map(|event| match event {
            Event::ProjectileChained { remaining, .. } => Some(*remaining),
            _ => None,
        })
        .collect();
    assert_eq!(remaining, vec![2, 1, 0]);
    assert_eq!(arena.kills(), 3);
    assert_eq!(arena.projectiles[0].chain_bounces(), 0);
    assert!(arena.projectiles[0].is_spent());

    let last = arena.damage_to(4);
    assert_eq!(last.len(), 1);
    assert!((last[0] - 40.0 * 0.75_f32.powi(3)).abs() < 1e-3);
}

#[test]
fn chain_without_candidate_keeps_flying() {
    let mut arena = Arena::new();
    arena.enemy(1, EnemyKind::Crawler, Vec2::new(200.0, 300.0), 5.0);
    arena.enemy(2, EnemyKind::Crawler, Vec2::new(900.0, 300.0), 5.0);
    arena.shoot(
        Vec2::new(200.0, 300.0),
        Vec2::new(520.0, 0.0),
        40.0,
        Behavior::straight().with_chain(2, CHAIN_RANGE),
    );

    arena.resolve();

    assert_eq!(arena.kills(), 1);
    assert!(!arena.projectiles[0].is_spent());
    assert_eq!(arena.projectiles[0].chain_bounces(), 2);
}

#[test]
fn non_piercing_projectile_hits_exactly_once() {
    let mut arena = Arena::new();
    arena.enemy(1, EnemyKind::Brute, Vec2::new(300.0, 300.0), 500.0);
    arena.enemy(2, EnemyKind::Brute, Vec2::new(304.0, 300.0), 500.0);
    arena.shoot(
        Vec2::new(302.0, 300.0),
        Vec2::new(520.0, 0.0),
        10.0,
        Behavior::straight(),
    );

    arena.resolve();
    arena.resolve();

    let hits = arena.damage_to(1).len() + arena.damage_to(2).len();
    assert_eq!(hits, 1);
    assert!(arena.projectiles[0].is_spent());
}

#[test]
fn piercing_projectile_never_hits_the_same_enemy_twice() {
    let mut arena = Arena::new();
    arena.enemy(1, EnemyKind::Brute, Vec2::new(300.0, 300.0), 500.0);
    arena.enemy(2, EnemyKind::Brute, Vec2::new(380.0, 300.0), 500.0);
    arena.shoot(
        Vec2::new(290.0, 300.0),
        Vec2::new(520.0, 0.0),
        10.0,
        Behavior::straight().with_pierce(3),
    );

    arena.run(60);

    assert_eq!(arena.damage_to(1).len(), 1);
    assert_eq!(arena.damage_to(2).len(), 1);
}

#[test]
fn nova_splash_spares_primary_target_and_lands_once_on_neighbours() {
    let mut arena = Arena::new();
    arena.enemy(1, EnemyKind::Brute, Vec2::new(300.0, 300.0), 500.0);
    arena.enemy(2, EnemyKind::Brute, Vec2::new(340.0, 340.0), 500.0);
    let nova = AreaEffect {
        radius: 78.0,
        damage_factor: 0.5,
        trigger: AreaTrigger::OnHit,
        children: 0,
    };
    arena.shoot(
        Vec2::new(290.0, 300.0),
        Vec2::new(520.0, 0.0),
        20.0,
        Behavior::straight().with_area(nova),
    );

    arena.resolve();
    arena.resolve();

    assert_eq!(arena.damage_to(1), vec![20.0]);
    assert_eq!(arena.damage_to(2), vec![10.0]);
    assert!(arena.projectiles[0].is_spent());
}

#[test]
fn overkill_clamps_health_and_fires_one_death_cascade() {
    let mut arena = Arena::new();
    arena.enemy(1, EnemyKind::Splitter, Vec2::new(300.0, 300.0), 10.0);
    arena.shoot(
        Vec2::new(300.0, 300.0),
        Vec2::new(520.0, 0.0),
        15.0,
        Behavior::straight(),
    );
    arena.shoot(
        Vec2::new(300.0, 300.0),
        Vec2::new(0.0, 520.0),
        15.0,
        Behavior::straight(),
    );

    arena.resolve();

    let enemy = &arena.enemies[0];
    assert_eq!(enemy.health().current(), 0.0);
    assert!(!enemy.is_alive());
    assert_eq!(arena.kills(), 1);
    let minis = arena
        .follow_ups
        .iter()
        .filter(|follow_up| {
            matches!(
                follow_up,
                FollowUp::Enemy {
                    kind: EnemyKind::Mini,
                    ..
                }
            )
        })
        .count();
    assert!((2..=3).contains(&minis));
    assert!(!arena.projectiles[1].is_spent(), "dead enemies stay out of collision");
}

#[test]
fn combo_multiplier_scales_outgoing_damage() {
    let mut arena = Arena::new();
    for _ in 0..10 {
        let _ = arena.combo.register_kill();
    }
    arena.enemy(1, EnemyKind::Brute, Vec2::new(300.0, 300.0), 500.0);
    arena.shoot(
        Vec2::new(300.0, 300.0),
        Vec2::new(520.0, 0.0),
        10.0,
        Behavior::straight(),
    );

    arena.resolve();

    assert!((arena.damage_to(1)[0] - 12.5).abs() < 1e-4);
}

#[test]
fn warden_shield_absorbs_frontal_shots() {
    let mut arena = Arena::new();
    let warden = Enemy::new(
        EntityId::new(1),
        EnemyKind::Warden,
        Vec2::new(300.0, 300.0),
        EnemyKind::Warden.stats(),
    );
    let facing = warden.shield_facing().expect("warden carries a shield");
    let front = warden.position() + unit_from_angle(facing) * 20.0;
    arena.enemies.push(warden);
    arena.shoot(
        front,
        (Vec2::new(300.0, 300.0) - front).normalize() * 520.0,
        10.0,
        Behavior::straight(),
    );

    arena.resolve();

    assert!(arena.damage_to(1).is_empty());
    assert!(arena.projectiles[0].is_spent());
}

#[test]
fn crossing_a_boss_threshold_reports_one_phase_change() {
    let mut arena = Arena::new();
    let center = Vec2::new(640.0, 300.0);
    let mut boss = Boss::new(
        EntityId::new(99),
        BossKind::Hydra,
        center,
        BossKind::Hydra.stats(),
    );
    let mut actions = Vec::new();
    let _ = boss.update(INTRO_SECS + 0.01, arena.player.position(), &mut actions);
    let max = boss.health().max();
    let _ = boss.take_damage(max * 0.39);
    arena.boss = Some(boss);

    for _ in 0..3 {
        let position = arena.boss.as_ref().map_or(center, Boss::position);
        arena.shoot(position, Vec2::new(520.0, 0.0), max * 0.01, Behavior::straight());
        arena.resolve();
    }

    let phases: Vec<u32> = arena
        .events
        .iter()
        .filter_map(|event| match event {
            Event::BossPhaseChanged { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect();
    assert_eq!(phases, vec![2]);
    assert_eq!(arena.boss.as_ref().map(Boss::phase), Some(2));
}

#[test]
fn splitter_kill_queues_minis_and_a_drop_without_touching_the_enemy_list() {
    let mut arena = Arena::with_pickups(PickupTuning {
        health_chance: 1.0,
        ..PickupTuning::default()
    });
    let death_point = Vec2::new(300.0, 300.0);
    arena.enemy(1, EnemyKind::Splitter, death_point, 10.0);
    arena.shoot(death_point, Vec2::new(520.0, 0.0), 15.0, Behavior::straight());

    arena.resolve();

    assert_eq!(arena.enemies.len(), 1);
    assert_eq!(arena.enemies[0].id(), EntityId::new(1));
    assert!(!arena.enemies[0].is_alive());

    let minis: Vec<Vec2> = arena
        .follow_ups
        .iter()
        .filter_map(|follow_up| match follow_up {
            FollowUp::Enemy {
                kind: EnemyKind::Mini,
                position,
                parent,
            } if *parent == EntityId::new(1) => Some(*position),
            _ => None,
        })
        .collect();
    assert!((2..=3).contains(&minis.len()));
    for position in &minis {
        assert!(position.distance(death_point) < 20.0);
    }

    let drops: Vec<_> = arena
        .follow_ups
        .iter()
        .filter(|follow_up| matches!(follow_up, FollowUp::Pickup { .. }))
        .collect();
    assert_eq!(
        drops,
        vec![&FollowUp::Pickup {
            kind: PickupKind::Health,
            position: death_point,
        }]
    );
}

#[test]
fn chained_shot_ignores_bodies_at_the_kill_point_for_the_rest_of_the_pass() {
    let mut arena = Arena::new();
    arena.enemy(1, EnemyKind::Crawler, Vec2::new(300.0, 300.0), 5.0);
    arena.enemy(2, EnemyKind::Brute, Vec2::new(267.0, 300.0), 1_000.0);
    arena.enemy(3, EnemyKind::Crawler, Vec2::new(300.0, 330.0), 50.0);
    arena.shoot(
        Vec2::new(290.0, 300.0),
        Vec2::new(520.0, 0.0),
        40.0,
        Behavior::straight().with_chain(2, CHAIN_RANGE),
    );

    arena.resolve();

    assert_eq!(arena.kills(), 1);
    assert!(arena.damage_to(2).is_empty());
    assert!(arena.events.contains(&Event::ProjectileChained {
        from: EntityId::new(1),
        to: EntityId::new(3),
        remaining: 1,
    }));
    assert!(!arena.projectiles[0].is_spent());
}

#[test]
fn burst_after_a_kill_uses_the_raised_combo() {
    let mut arena = Arena::new();
    for _ in 0..9 {
        let _ = arena.combo.register_kill();
    }
    arena.enemy(1, EnemyKind::Crawler, Vec2::new(300.0, 300.0), 5.0);
    arena.enemy(2, EnemyKind::Brute, Vec2::new(340.0, 340.0), 500.0);
    let nova = AreaEffect {
        radius: 78.0,
        damage_factor: 0.5,
        trigger: AreaTrigger::OnHit,
        children: 0,
    };
    arena.shoot(
        Vec2::new(290.0, 300.0),
        Vec2::new(520.0, 0.0),
        20.0,
        Behavior::straight().with_area(nova),
    );

    arena.resolve();

    assert_eq!(arena.combo.count(), 10);
    let splash = arena.damage_to(2);
    assert_eq!(splash.len(), 1);
    assert!((splash[0] - 20.0 * 0.5 * 1.25).abs() < 1e-4);
}
