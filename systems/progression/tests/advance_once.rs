use std::time::Duration;

use collapse_arena_core::{ArenaBounds, ArenaConfig, EnemyKind};
use collapse_arena_system_progression::{Directive, LayerStatus, Progression, Stage};
use collapse_arena_system_spawning::{SpawnQueue, WavePlan};

const FRAME: Duration = Duration::from_millis(16);
const ENEMY_LIFETIME: Duration = Duration::from_millis(900);

#[test]
fn twelve_enemy_wave_advances_exactly_once() {
    let mut progression = Progression::new(&ArenaConfig::default());
    let bounds = ArenaBounds::new(1_280.0, 720.0);
    let plan = WavePlan {
        layer: 0,
        zone: 0,
        size: 12,
        interval: Duration::from_millis(520),
        warmup: Duration::from_millis(600),
    };

    let mut directives = Vec::new();
    progression.update(0.0, &LayerStatus::default(), &mut directives);
    assert_eq!(directives, vec![Directive::BeginWave { layer: 0, zone: 0 }]);

    let mut queue = SpawnQueue::build(&plan, &[EnemyKind::Crawler, EnemyKind::Sprinter], 12)
        .expect("valid pool");
    let mut orders = Vec::new();
    let mut alive: Vec<Duration> = Vec::new();

    for _ in 0..2_000 {
        if directives.contains(&Directive::BeginWave { layer: 1, zone: 0 }) {
            break;
        }
        let status = LayerStatus {
            all_spawned: queue.is_fully_spawned(),
            hostiles_alive: alive.len(),
            boss_finished: false,
            player_dead: false,
        };
        progression.update(FRAME.as_secs_f32(), &status, &mut directives);
        if progression.stage() != Stage::Wave {
            continue;
        }

        orders.clear();
        queue.drain(FRAME, &bounds, &mut orders);
        alive.extend(orders.iter().map(|_| ENEMY_LIFETIME));
        for remaining in &mut alive {
            *remaining = remaining.saturating_sub(FRAME);
        }
        alive.retain(|remaining| !remaining.is_zero());
    }

    let cleared = directives
        .iter()
        .filter(|directive| matches!(directive, Directive::LayerCleared { layer: 0 }))
        .count();
    assert_eq!(cleared, 1);
    assert_eq!(queue.spawned(), 12);
    assert!(directives.contains(&Directive::BeginWave { layer: 1, zone: 0 }));
}
