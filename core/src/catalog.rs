//! Static archetype tables for enemies, bosses, weapons and player classes.

use serde::{Deserialize, Serialize};

/// Base stats for an enemy archetype before zone scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Maximum health.
    pub health: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Damage per attack; contact damage per second derives from it.
    pub damage: f32,
    /// Collision radius.
    pub radius: f32,
    /// Distance at which the enemy notices the player.
    pub chase_range: f32,
    /// Distance at which the enemy starts an attack.
    pub attack_range: f32,
    /// Seconds between attacks.
    pub attack_cooldown: f32,
}

/// The sixteen enemy archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Basic melee chaser.
    Crawler,
    /// Fast, fragile melee chaser.
    Sprinter,
    /// Slow, durable melee chaser.
    Brute,
    /// Ranged enemy that keeps its distance.
    Spitter,
    /// Melee enemy that commits to a fast lunge.
    Lunger,
    /// Disguised enemy that reveals itself when approached.
    Mimic,
    /// Stationary enemy with a directional shield.
    Warden,
    /// Splits into minis when killed.
    Splitter,
    /// Small swarm enemy spawned by splitters and summoners.
    Mini,
    /// Periodically phases out of collision.
    Phantom,
    /// Arms a fuse and explodes next to the player.
    Bomber,
    /// Long-range shooter whose shots slow the player.
    Sniper,
    /// Circles the player while firing.
    Orbiter,
    /// Heals itself from the damage it deals.
    Leech,
    /// Keeps distance and summons minis.
    Summoner,
    /// Opens short phased, high-speed glitch windows.
    Glitch,
}

impl EnemyKind {
    /// Every archetype in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Crawler,
        Self::Sprinter,
        Self::Brute,
        Self::Spitter,
        Self::Lunger,
        Self::Mimic,
        Self::Warden,
        Self::Splitter,
        Self::Mini,
        Self::Phantom,
        Self::Bomber,
        Self::Sniper,
        Self::Orbiter,
        Self::Leech,
        Self::Summoner,
        Self::Glitch,
    ];

    /// Base stats of the archetype.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        let (health, speed, damage, radius, chase_range, attack_range, attack_cooldown) =
            match self {
                Self::Crawler => (20.0, 70.0, 8.0, 12.0, 420.0, 26.0, 1.0),
                Self::Sprinter => (14.0, 135.0, 6.0, 10.0, 520.0, 24.0, 0.8),
                Self::Brute => (70.0, 45.0, 18.0, 20.0, 380.0, 34.0, 1.6),
                Self::Spitter => (18.0, 80.0, 7.0, 12.0, 480.0, 260.0, 1.8),
                Self::Lunger => (30.0, 75.0, 14.0, 13.0, 460.0, 140.0, 2.2),
                Self::Mimic => (26.0, 110.0, 12.0, 12.0, 160.0, 26.0, 1.0),
                Self::Warden => (60.0, 0.0, 9.0, 18.0, 500.0, 320.0, 2.4),
                Self::Splitter => (40.0, 60.0, 10.0, 16.0, 420.0, 28.0, 1.2),
                Self::Mini => (8.0, 120.0, 4.0, 7.0, 520.0, 20.0, 0.7),
                Self::Phantom => (24.0, 90.0, 9.0, 12.0, 460.0, 26.0, 1.1),
                Self::Bomber => (22.0, 95.0, 30.0, 13.0, 450.0, 40.0, 0.0),
                Self::Sniper => (16.0, 60.0, 16.0, 11.0, 620.0, 520.0, 3.0),
                Self::Orbiter => (22.0, 100.0, 7.0, 11.0, 480.0, 200.0, 1.5),
                Self::Leech => (28.0, 85.0, 6.0, 12.0, 440.0, 26.0, 0.9),
                Self::Summoner => (45.0, 40.0, 5.0, 16.0, 520.0, 360.0, 4.0),
                Self::Glitch => (24.0, 105.0, 9.0, 11.0, 480.0, 26.0, 1.0),
            };
        EnemyStats {
            health,
            speed,
            damage,
            radius,
            chase_range,
            attack_range,
            attack_cooldown,
        }
    }

    /// Whether wave rosters may draw this archetype directly.
    ///
    /// Minis only ever appear as children of splitters and summoners.
    #[must_use]
    pub const fn is_spawnable(self) -> bool {
        !matches!(self, Self::Mini)
    }

    /// Multiplier applied to pickup drop chances when this archetype dies.
    #[must_use]
    pub const fn drop_weight(self) -> f32 {
        match self {
            Self::Mini => 0.25,
            Self::Brute | Self::Summoner | Self::Warden => 1.5,
            _ => 1.0,
        }
    }
}

/// Base stats for a boss archetype before zone scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossStats {
    /// Maximum health.
    pub health: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Damage per second dealt while overlapping the player.
    pub contact_dps: f32,
    /// Collision radius of the boss core.
    pub radius: f32,
    /// Seconds between attack cycles.
    pub attack_interval: f32,
}

/// The seven boss archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    /// Cell-swarm boss shielded by a regrowing hex grid.
    Hive,
    /// Adaptive-shield boss that turns hostile once hurt.
    Sentinel,
    /// Clone-swarm boss hiding among decoys.
    Mirror,
    /// Rising-threat boss that erupts spikes under the player.
    Ascendant,
    /// Multi-stage boss whose volleys widen per stage.
    Hydra,
    /// Ring-set boss surrounded by rotating burning rings.
    Firewall,
    /// Absorption core whose radius grows as it weakens.
    Singularity,
}

impl BossKind {
    /// Every archetype in campaign order.
    pub const ALL: [Self; 7] = [
        Self::Hive,
        Self::Sentinel,
        Self::Mirror,
        Self::Ascendant,
        Self::Hydra,
        Self::Firewall,
        Self::Singularity,
    ];

    /// Base stats of the archetype.
    #[must_use]
    pub const fn stats(self) -> BossStats {
        let (health, speed, contact_dps, radius, attack_interval) = match self {
            Self::Hive => (900.0, 55.0, 20.0, 44.0, 2.2),
            Self::Sentinel => (1_100.0, 40.0, 18.0, 40.0, 1.6),
            Self::Mirror => (1_000.0, 90.0, 16.0, 34.0, 2.0),
            Self::Ascendant => (1_200.0, 50.0, 22.0, 42.0, 2.6),
            Self::Hydra => (1_400.0, 60.0, 24.0, 46.0, 1.8),
            Self::Firewall => (1_300.0, 30.0, 20.0, 40.0, 2.4),
            Self::Singularity => (1_800.0, 25.0, 30.0, 36.0, 3.0),
        };
        BossStats {
            health,
            speed,
            contact_dps,
            radius,
            attack_interval,
        }
    }

    /// Health fractions below which the boss advances a phase, descending.
    #[must_use]
    pub const fn phase_thresholds(self) -> &'static [f32] {
        match self {
            Self::Hive | Self::Mirror => &[0.66, 0.33],
            Self::Sentinel => &[0.85],
            Self::Ascendant | Self::Firewall => &[0.50],
            Self::Hydra => &[0.60, 0.30],
            Self::Singularity => &[0.70, 0.40, 0.15],
        }
    }

    /// Display name used in logs and the HUD.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hive => "The Hive",
            Self::Sentinel => "Sentinel",
            Self::Mirror => "Mirror Host",
            Self::Ascendant => "Ascendant",
            Self::Hydra => "Hydra",
            Self::Firewall => "Firewall",
            Self::Singularity => "Singularity",
        }
    }
}

/// Weapon modifiers that shape the player's volleys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponMod {
    /// Straight shots that gain parallel barrels with tier.
    Standard,
    /// Wide, short-lived spread.
    Scatter,
    /// Shots that steer toward nearby enemies.
    Homing,
    /// Shots that pass through several enemies.
    Piercing,
    /// Shots that bounce to a new enemy on lethal hits.
    Chain,
    /// Shots that release a nova around the first enemy hit.
    Nova,
    /// Shots that explode on impact.
    Explosive,
    /// Lobbed shells that burst at the aim point and scatter child blasts.
    Cluster,
    /// Fast, slightly stronger beam bolts.
    Laser,
}

impl WeaponMod {
    /// Every modifier in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Standard,
        Self::Scatter,
        Self::Homing,
        Self::Piercing,
        Self::Chain,
        Self::Nova,
        Self::Explosive,
        Self::Cluster,
        Self::Laser,
    ];
}

/// Player classes that define crit profile and special ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerClass {
    /// High crit chance; special temporarily doubles fire rate.
    Striker,
    /// Bonus damage against weakened targets; special is a nova around the player.
    Reaper,
    /// Special deploys a temporary turret.
    Engineer,
}

impl PlayerClass {
    /// Probability in `0.0..=1.0` that a volley crits.
    #[must_use]
    pub const fn crit_chance(self) -> f32 {
        match self {
            Self::Striker => 0.20,
            Self::Reaper | Self::Engineer => 0.05,
        }
    }

    /// Damage multiplier applied to critical volleys.
    #[must_use]
    pub const fn crit_multiplier(self) -> f32 {
        match self {
            Self::Striker => 2.0,
            Self::Reaper | Self::Engineer => 1.5,
        }
    }

    /// Conditional bonus multiplier against a target at the given health fraction.
    #[must_use]
    pub fn conditional_bonus(self, target_health_fraction: f32) -> f32 {
        match self {
            Self::Reaper if target_health_fraction < 0.30 => 1.5,
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minis_are_not_spawnable() {
        let spawnable = EnemyKind::ALL
            .iter()
            .filter(|kind| kind.is_spawnable())
            .count();
        assert_eq!(spawnable, 15);
    }

    #[test]
    fn boss_thresholds_descend() {
        for kind in BossKind::ALL {
            let thresholds = kind.phase_thresholds();
            assert!(!thresholds.is_empty());
            assert!(thresholds.windows(2).all(|pair| pair[0] > pair[1]));
        }
    }

    #[test]
    fn reaper_bonus_only_applies_to_weakened_targets() {
        assert_eq!(PlayerClass::Reaper.conditional_bonus(0.2), 1.5);
        assert_eq!(PlayerClass::Reaper.conditional_bonus(0.8), 1.0);
        assert_eq!(PlayerClass::Striker.conditional_bonus(0.1), 1.0);
    }
}
