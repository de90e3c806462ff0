#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler that drains enemy spawns against elapsed time.
//!
//! A [`SpawnQueue`] is built once per wave layer from a [`WavePlan`] and the
//! zone's enemy pool. Entries are generated with ascending delays, so draining
//! only ever pops from the front. Every queue owns a generator seeded from the
//! run seed and the layer, which keeps a wave's roster stable no matter how
//! many random rolls combat consumed before it.

use std::{collections::VecDeque, time::Duration};

use collapse_arena_core::{ArenaBounds, ConfigError, EnemyKind, Vec2, WaveTuning};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Distance from the arena edge at which enemies appear.
pub const EDGE_INSET: f32 = 16.0;

const JITTER_MIN: f64 = 0.5;
const JITTER_MAX: f64 = 1.5;

/// Size and cadence of one wave layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavePlan {
    /// Zero-based run layer.
    pub layer: u32,
    /// Zero-based zone, reported in configuration errors.
    pub zone: u32,
    /// Number of enemies to spawn.
    pub size: u32,
    /// Base interval between consecutive spawns.
    pub interval: Duration,
    /// Delay before the first spawn.
    pub warmup: Duration,
}

impl WavePlan {
    /// Derives the plan for `layer` from the wave tuning table.
    #[must_use]
    pub fn for_layer(tuning: &WaveTuning, layer: u32, zone: u32) -> Self {
        Self {
            layer,
            zone,
            size: tuning.wave_size(layer),
            interval: tuning.spawn_interval(layer),
            warmup: tuning.warmup(),
        }
    }
}

/// A scheduled spawn waiting in the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnEntry {
    /// Archetype to spawn.
    pub kind: EnemyKind,
    /// Offset from the start of the wave at which the spawn is due.
    pub delay: Duration,
}

/// A spawn that came due during a drain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnOrder {
    /// Archetype to spawn.
    pub kind: EnemyKind,
    /// Point on the arena edge where the enemy appears.
    pub position: Vec2,
}

/// Time-ordered spawn queue for one wave.
#[derive(Clone, Debug)]
pub struct SpawnQueue {
    entries: VecDeque<SpawnEntry>,
    accumulator: Duration,
    spawned: u32,
    total: u32,
    rng: ChaCha8Rng,
}

impl SpawnQueue {
    /// Builds the queue for `plan`, drawing archetypes uniformly from `pool`.
    ///
    /// Archetypes that may not appear in rosters are ignored; a pool with no
    /// spawnable archetype is a configuration error.
    pub fn build(plan: &WavePlan, pool: &[EnemyKind], seed: u64) -> Result<Self, ConfigError> {
        let pool: Vec<EnemyKind> = pool.iter().copied().filter(|kind| kind.is_spawnable()).collect();
        if pool.is_empty() {
            return Err(ConfigError::EmptySpawnPool {
                zone: plan.zone as usize,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut entries = VecDeque::with_capacity(plan.size as usize);
        let mut delay = plan.warmup;
        for index in 0..plan.size {
            if index > 0 {
                let jitter = rng.gen_range(JITTER_MIN..JITTER_MAX);
                delay = delay.saturating_add(plan.interval.mul_f64(jitter));
            }
            let kind = pool[rng.gen_range(0..pool.len())];
            entries.push_back(SpawnEntry { kind, delay });
        }

        Ok(Self {
            entries,
            accumulator: Duration::ZERO,
            spawned: 0,
            total: plan.size,
            rng,
        })
    }

    /// Advances the accumulator by `dt` and appends every due spawn to `out`.
    pub fn drain(&mut self, dt: Duration, bounds: &ArenaBounds, out: &mut Vec<SpawnOrder>) {
        self.accumulator = self.accumulator.saturating_add(dt);
        while let Some(entry) = self.entries.front().copied() {
            if entry.delay > self.accumulator {
                break;
            }
            let _ = self.entries.pop_front();
            self.spawned += 1;
            out.push(SpawnOrder {
                kind: entry.kind,
                position: edge_spawn_point(bounds, &mut self.rng),
            });
        }
    }

    /// Reports whether every entry of the wave was spawned.
    #[must_use]
    pub fn is_fully_spawned(&self) -> bool {
        self.entries.is_empty() && self.spawned == self.total
    }

    /// Entries still waiting, soonest first.
    pub fn pending(&self) -> impl Iterator<Item = &SpawnEntry> + '_ {
        self.entries.iter()
    }

    /// Time elapsed since the wave started.
    #[must_use]
    pub const fn accumulator(&self) -> Duration {
        self.accumulator
    }

    /// Number of enemies spawned so far.
    #[must_use]
    pub const fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Number of enemies the wave spawns in total.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }
}

/// Picks a random point along one of the four arena edges.
pub fn edge_spawn_point<R: Rng + ?Sized>(bounds: &ArenaBounds, rng: &mut R) -> Vec2 {
    let min = bounds.min() + Vec2::splat(EDGE_INSET);
    let max = (bounds.max() - Vec2::splat(EDGE_INSET)).max(min);
    let along = rng.gen::<f32>();
    let x = min.x + (max.x - min.x) * along;
    let y = min.y + (max.y - min.y) * along;
    match rng.gen_range(0..4u8) {
        0 => Vec2::new(x, min.y),
        1 => Vec2::new(max.x, y),
        2 => Vec2::new(x, max.y),
        _ => Vec2::new(min.x, y),
    }
}

/// Derives the scheduler seed of a wave layer from the run seed.
#[must_use]
pub fn derive_wave_seed(run_seed: u64, layer: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(run_seed.to_le_bytes());
    hasher.update(b"wave");
    hasher.update(layer.to_le_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
