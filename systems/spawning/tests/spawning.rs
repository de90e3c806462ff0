use std::time::Duration;

use collapse_arena_core::{ArenaBounds, EnemyKind, WaveTuning};
use collapse_arena_system_spawning::{derive_wave_seed, SpawnOrder, SpawnQueue, WavePlan};
use proptest::prelude::*;

const POOL: [EnemyKind; 4] = [
    EnemyKind::Crawler,
    EnemyKind::Sprinter,
    EnemyKind::Spitter,
    EnemyKind::Splitter,
];

fn drain_all(queue: &mut SpawnQueue, step: Duration, bounds: &ArenaBounds) -> Vec<SpawnOrder> {
    let mut orders = Vec::new();
    for _ in 0..10_000 {
        if queue.is_fully_spawned() {
            break;
        }
        queue.drain(step, bounds, &mut orders);
    }
    orders
}

#[test]
fn large_dt_drains_every_due_entry_at_once() {
    let plan = WavePlan {
        layer: 0,
        zone: 0,
        size: 12,
        interval: Duration::from_millis(520),
        warmup: Duration::from_millis(600),
    };
    let mut queue = SpawnQueue::build(&plan, &POOL, 5).expect("valid pool");
    let bounds = ArenaBounds::new(1_280.0, 720.0);

    let mut orders = Vec::new();
    queue.drain(Duration::from_millis(599), &bounds, &mut orders);
    assert!(orders.is_empty(), "nothing spawns before the warm-up");

    queue.drain(Duration::from_secs(60), &bounds, &mut orders);
    assert_eq!(orders.len(), 12);
    assert!(queue.is_fully_spawned());
    assert_eq!(queue.spawned(), queue.total());
}

#[test]
fn identical_seeds_replay_identical_rosters() {
    let plan = WavePlan::for_layer(&WaveTuning::default(), 3, 1);
    let bounds = ArenaBounds::new(1_280.0, 720.0);
    let seed = derive_wave_seed(0xfeed, 3);

    let mut first = SpawnQueue::build(&plan, &POOL, seed).expect("valid pool");
    let mut second = SpawnQueue::build(&plan, &POOL, seed).expect("valid pool");
    let step = Duration::from_millis(16);

    assert_eq!(
        drain_all(&mut first, step, &bounds),
        drain_all(&mut second, step, &bounds)
    );
}

#[test]
fn later_layers_spawn_more_enemies_faster() {
    let tuning = WaveTuning::default();
    let early = WavePlan::for_layer(&tuning, 0, 0);
    let late = WavePlan::for_layer(&tuning, 10, 3);
    assert!(late.size > early.size);
    assert!(late.interval < early.interval);
    assert_eq!(WavePlan::for_layer(&tuning, 500, 6).size, tuning.size_cap);
}

proptest! {
    #[test]
    fn undrained_entries_never_fall_behind_accumulator(
        size in 0u32..48,
        seed in any::<u64>(),
        steps in prop::collection::vec(0u64..400, 1..120),
    ) {
        let plan = WavePlan {
            layer: 0,
            zone: 0,
            size,
            interval: Duration::from_millis(300),
            warmup: Duration::from_millis(600),
        };
        let mut queue = SpawnQueue::build(&plan, &POOL, seed).expect("valid pool");
        let bounds = ArenaBounds::new(800.0, 600.0);
        let mut orders = Vec::new();

        for millis in steps {
            queue.drain(Duration::from_millis(millis), &bounds, &mut orders);

            let accumulator = queue.accumulator();
            prop_assert!(queue.pending().all(|entry| entry.delay > accumulator));
            let delays: Vec<Duration> = queue.pending().map(|entry| entry.delay).collect();
            prop_assert!(delays.windows(2).all(|pair| pair[0] <= pair[1]));
            prop_assert_eq!(queue.pending().next().is_none(), queue.spawned() == queue.total());
            prop_assert_eq!(orders.len() as u32, queue.spawned());
        }
    }
}
