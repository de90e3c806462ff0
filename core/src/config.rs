//! Run configuration and the tuning surfaces designers adjust.
//!
//! Every structure deserializes with `#[serde(default)]` so partial TOML
//! files only override the knobs they mention.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{BossKind, EnemyKind};

/// Errors detected while validating a configuration at startup.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The zone table is empty.
    #[error("configuration defines no zones")]
    NoZones,
    /// A zone has no spawnable enemy archetypes.
    #[error("zone {zone} has an empty enemy pool")]
    EmptySpawnPool {
        /// Zero-based index of the offending zone.
        zone: usize,
    },
    /// The wave table cannot produce a playable layer.
    #[error("invalid wave table: {0}")]
    InvalidWaveTable(String),
    /// The arena has no playable area.
    #[error("arena bounds {width}x{height} are not playable")]
    InvalidBounds {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
}

/// Complete configuration for one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Arena width in world units.
    pub width: f32,
    /// Arena height in world units.
    pub height: f32,
    /// Seed driving every random roll of the run.
    pub seed: u64,
    /// Number of wave layers preceding the boss layer inside each zone.
    pub wave_layers_per_zone: u32,
    /// Zone table in campaign order.
    pub zones: Vec<ZoneConfig>,
    /// Wave size and cadence tuning.
    pub waves: WaveTuning,
    /// Zone and tier scaling tuning.
    pub scaling: ScalingTuning,
    /// Context collapse tuning.
    pub collapse: CollapseTuning,
    /// Kill combo tuning.
    pub combo: ComboTuning,
    /// Pickup drop tuning.
    pub pickups: PickupTuning,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1_280.0,
            height: 720.0,
            seed: 0x5eed_c011_a95e,
            wave_layers_per_zone: 2,
            zones: ZoneConfig::campaign(),
            waves: WaveTuning::default(),
            scaling: ScalingTuning::default(),
            collapse: CollapseTuning::default(),
            combo: ComboTuning::default(),
            pickups: PickupTuning::default(),
        }
    }
}

impl ArenaConfig {
    /// Checks the configuration for authoring errors that would make a run unplayable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::InvalidBounds {
                width: self.width,
                height: self.height,
            });
        }

        if self.zones.is_empty() {
            return Err(ConfigError::NoZones);
        }

        for (index, zone) in self.zones.iter().enumerate() {
            if !zone.enemy_pool.iter().any(|kind| kind.is_spawnable()) {
                return Err(ConfigError::EmptySpawnPool { zone: index });
            }
        }

        self.waves.validate()
    }

    /// Layers contained in one zone, boss layer included.
    #[must_use]
    pub fn layers_per_zone(&self) -> u32 {
        self.wave_layers_per_zone.saturating_add(1)
    }

    /// Total number of layers in the run.
    #[must_use]
    pub fn total_layers(&self) -> u32 {
        let zones = u32::try_from(self.zones.len()).unwrap_or(u32::MAX);
        zones.saturating_mul(self.layers_per_zone())
    }
}

/// Enemy pool and boss for one zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Archetypes wave rosters draw from uniformly.
    pub enemy_pool: Vec<EnemyKind>,
    /// Boss fought on the zone's final layer.
    pub boss: BossKind,
}

impl ZoneConfig {
    /// The default seven-zone campaign.
    #[must_use]
    pub fn campaign() -> Vec<Self> {
        use EnemyKind::*;

        vec![
            Self {
                enemy_pool: vec![Crawler, Sprinter, Spitter, Splitter],
                boss: BossKind::Hive,
            },
            Self {
                enemy_pool: vec![Crawler, Lunger, Brute, Mimic, Splitter],
                boss: BossKind::Sentinel,
            },
            Self {
                enemy_pool: vec![Sprinter, Warden, Phantom, Spitter, Bomber],
                boss: BossKind::Mirror,
            },
            Self {
                enemy_pool: vec![Brute, Sniper, Orbiter, Leech, Mimic],
                boss: BossKind::Ascendant,
            },
            Self {
                enemy_pool: vec![Lunger, Summoner, Glitch, Bomber, Phantom],
                boss: BossKind::Hydra,
            },
            Self {
                enemy_pool: vec![Warden, Sniper, Glitch, Leech, Splitter, Orbiter],
                boss: BossKind::Firewall,
            },
            Self {
                enemy_pool: vec![Brute, Summoner, Glitch, Phantom, Sniper, Bomber, Lunger],
                boss: BossKind::Singularity,
            },
        ]
    }
}

/// Wave size and spawn cadence parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Enemies in the first wave.
    pub base_size: u32,
    /// Additional enemies per run layer.
    pub size_growth: u32,
    /// Hard cap on wave size.
    pub size_cap: u32,
    /// Delay before the first spawn of a wave, in milliseconds.
    pub warmup_ms: u64,
    /// Spawn interval of the first layer, in milliseconds.
    pub base_interval_ms: u64,
    /// Interval reduction per run layer, in milliseconds.
    pub interval_step_ms: u64,
    /// Interval floor, in milliseconds.
    pub min_interval_ms: u64,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_size: 8,
            size_growth: 2,
            size_cap: 40,
            warmup_ms: 600,
            base_interval_ms: 900,
            interval_step_ms: 40,
            min_interval_ms: 260,
        }
    }
}

impl WaveTuning {
    /// Number of enemies the wave on `layer` spawns.
    #[must_use]
    pub fn wave_size(&self, layer: u32) -> u32 {
        self.base_size
            .saturating_add(self.size_growth.saturating_mul(layer))
            .min(self.size_cap)
    }

    /// Base spawn interval for `layer`; densifies as layers advance.
    #[must_use]
    pub fn spawn_interval(&self, layer: u32) -> Duration {
        let reduction = self.interval_step_ms.saturating_mul(u64::from(layer));
        let millis = self
            .base_interval_ms
            .saturating_sub(reduction)
            .max(self.min_interval_ms);
        Duration::from_millis(millis)
    }

    /// Fixed delay before the first spawn of every wave.
    #[must_use]
    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.size_cap == 0 || self.base_size == 0 {
            return Err(ConfigError::InvalidWaveTable(
                "waves must spawn at least one enemy".to_owned(),
            ));
        }
        if self.min_interval_ms == 0 {
            return Err(ConfigError::InvalidWaveTable(
                "minimum spawn interval must be positive".to_owned(),
            ));
        }
        if self.min_interval_ms > self.base_interval_ms {
            return Err(ConfigError::InvalidWaveTable(format!(
                "minimum interval {}ms exceeds base interval {}ms",
                self.min_interval_ms, self.base_interval_ms
            )));
        }
        Ok(())
    }
}

/// Zone and weapon tier scaling parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingTuning {
    /// Fractional enemy health increase per zone step.
    pub health_step: f32,
    /// Fractional enemy speed increase per zone step.
    pub speed_step: f32,
    /// Fractional enemy damage increase per zone step.
    pub damage_step: f32,
    /// Fractional boss health increase per zone step.
    pub boss_health_step: f32,
    /// Run layers required per weapon tier increase.
    pub layers_per_tier: u32,
    /// Highest reachable weapon tier.
    pub max_tier: u32,
}

impl Default for ScalingTuning {
    fn default() -> Self {
        Self {
            health_step: 0.25,
            speed_step: 0.05,
            damage_step: 0.15,
            boss_health_step: 0.30,
            layers_per_tier: 4,
            max_tier: crate::MAX_WEAPON_TIER,
        }
    }
}

/// Context collapse parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollapseTuning {
    /// Seconds a layer may run before the safe arena starts shrinking.
    pub grace_secs: f32,
    /// Fraction of the full arena lost per second once collapsing.
    pub shrink_per_sec: f32,
    /// Smallest safe fraction of the arena.
    pub min_fraction: f32,
    /// Damage per second dealt to a player outside the safe arena.
    pub damage_per_sec: f32,
}

impl Default for CollapseTuning {
    fn default() -> Self {
        Self {
            grace_secs: 40.0,
            shrink_per_sec: 0.02,
            min_fraction: 0.40,
            damage_per_sec: 8.0,
        }
    }
}

/// One step of the combo ladder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComboTier {
    /// Streak length at which the tier activates.
    pub threshold: u32,
    /// Multiplier applied to outgoing player damage.
    pub damage_multiplier: f32,
    /// Health restored on every kill while the tier is active.
    pub heal_per_kill: f32,
}

/// Kill combo parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboTuning {
    /// Seconds without a kill before the streak decays to zero.
    pub idle_window_secs: f32,
    /// Tier ladder in ascending threshold order.
    pub tiers: Vec<ComboTier>,
}

impl Default for ComboTuning {
    fn default() -> Self {
        Self {
            idle_window_secs: 3.0,
            tiers: vec![
                ComboTier {
                    threshold: 5,
                    damage_multiplier: 1.10,
                    heal_per_kill: 0.5,
                },
                ComboTier {
                    threshold: 10,
                    damage_multiplier: 1.25,
                    heal_per_kill: 1.0,
                },
                ComboTier {
                    threshold: 20,
                    damage_multiplier: 1.50,
                    heal_per_kill: 2.0,
                },
            ],
        }
    }
}

/// Pickup drop parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    /// Chance of a health pickup per kill.
    pub health_chance: f32,
    /// Health restored by a health pickup.
    pub health_amount: f32,
    /// Chance of a weapon pickup per kill.
    pub weapon_chance: f32,
    /// Chance of a token pickup per kill.
    pub token_chance: f32,
    /// Tokens dropped when a boss dies.
    pub boss_tokens: u32,
    /// Seconds before an uncollected pickup disappears.
    pub lifetime_secs: f32,
    /// Distance at which the player collects a pickup.
    pub collect_radius: f32,
    /// Tokens required per special charge.
    pub tokens_per_charge: u32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            health_chance: 0.06,
            health_amount: 15.0,
            weapon_chance: 0.02,
            token_chance: 0.35,
            boss_tokens: 10,
            lifetime_secs: 10.0,
            collect_radius: 28.0,
            tokens_per_charge: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(ArenaConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_pool_is_rejected() {
        let mut config = ArenaConfig::default();
        config.zones[2].enemy_pool = vec![EnemyKind::Mini];
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptySpawnPool { zone: 2 })
        );
    }

    #[test]
    fn spawn_interval_densifies_then_floors() {
        let waves = WaveTuning::default();
        assert_eq!(waves.spawn_interval(0), Duration::from_millis(900));
        assert_eq!(waves.spawn_interval(5), Duration::from_millis(700));
        assert_eq!(waves.spawn_interval(100), Duration::from_millis(260));
    }

    #[test]
    fn wave_size_respects_cap() {
        let waves = WaveTuning::default();
        assert_eq!(waves.wave_size(0), 8);
        assert_eq!(waves.wave_size(2), 12);
        assert_eq!(waves.wave_size(50), 40);
    }

    #[test]
    fn campaign_has_one_layer_more_than_waves_per_zone() {
        let config = ArenaConfig::default();
        assert_eq!(config.layers_per_zone(), 3);
        assert_eq!(config.total_layers(), 21);
    }
}
