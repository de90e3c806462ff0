#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Kill combo tracking and per-zone difficulty scaling.

use collapse_arena_core::{
    BossKind, BossStats, ComboTier, ComboTuning, EnemyKind, EnemyStats, ScalingTuning,
};

/// Reward granted by registering a kill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KillReward {
    /// Streak length after the kill.
    pub count: u32,
    /// Health the player regains from the kill.
    pub heal: f32,
    /// Damage multiplier now in effect.
    pub multiplier: f32,
}

/// Consecutive-kill streak with an idle timeout.
#[derive(Clone, Debug, PartialEq)]
pub struct ComboTracker {
    tuning: ComboTuning,
    count: u32,
    idle: f32,
}

impl ComboTracker {
    /// Creates an empty streak.
    #[must_use]
    pub fn new(tuning: ComboTuning) -> Self {
        Self {
            tuning,
            count: 0,
            idle: 0.0,
        }
    }

    /// Current streak length.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Damage multiplier granted by the current streak.
    #[must_use]
    pub fn multiplier(&self) -> f32 {
        self.active_tier().map_or(1.0, |tier| tier.damage_multiplier)
    }

    /// Records a kill and returns the resulting reward.
    pub fn register_kill(&mut self) -> KillReward {
        self.count = self.count.saturating_add(1);
        self.idle = 0.0;
        KillReward {
            count: self.count,
            heal: self.active_tier().map_or(0.0, |tier| tier.heal_per_kill),
            multiplier: self.multiplier(),
        }
    }

    /// Clears the streak; returns the previous length when it was non-zero.
    pub fn reset(&mut self) -> Option<u32> {
        self.idle = 0.0;
        let previous = std::mem::take(&mut self.count);
        (previous > 0).then_some(previous)
    }

    /// Advances the idle clock; returns the lost streak when it timed out.
    pub fn tick(&mut self, dt: f32) -> Option<u32> {
        if self.count == 0 {
            return None;
        }
        self.idle += dt.max(0.0);
        if self.idle >= self.tuning.idle_window_secs {
            return self.reset();
        }
        None
    }

    fn active_tier(&self) -> Option<&ComboTier> {
        self.tuning
            .tiers
            .iter()
            .filter(|tier| self.count >= tier.threshold)
            .max_by_key(|tier| tier.threshold)
    }
}

/// Stat multipliers for one zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneScaling {
    health: f32,
    speed: f32,
    damage: f32,
    boss_health: f32,
}

impl ZoneScaling {
    /// Scaling applied in the zero-based `zone`.
    #[must_use]
    pub fn for_zone(tuning: &ScalingTuning, zone: u32) -> Self {
        let steps = zone as f32;
        Self {
            health: 1.0 + tuning.health_step * steps,
            speed: 1.0 + tuning.speed_step * steps,
            damage: 1.0 + tuning.damage_step * steps,
            boss_health: 1.0 + tuning.boss_health_step * steps,
        }
    }

    /// Enemy health multiplier.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Enemy and boss damage multiplier.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Scaled stats for an enemy archetype.
    #[must_use]
    pub fn enemy_stats(&self, kind: EnemyKind) -> EnemyStats {
        let base = kind.stats();
        EnemyStats {
            health: base.health * self.health,
            speed: base.speed * self.speed,
            damage: base.damage * self.damage,
            ..base
        }
    }

    /// Scaled stats for a boss archetype.
    #[must_use]
    pub fn boss_stats(&self, kind: BossKind) -> BossStats {
        let base = kind.stats();
        BossStats {
            health: base.health * self.boss_health,
            contact_dps: base.contact_dps * self.damage,
            ..base
        }
    }
}

/// Weapon tier reached on the zero-based run `layer`.
#[must_use]
pub fn weapon_tier(tuning: &ScalingTuning, layer: u32) -> u32 {
    let per_tier = tuning.layers_per_tier.max(1);
    (1 + layer / per_tier).min(tuning.max_tier.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combo_tiers_raise_multiplier_and_heal() {
        let mut combo = ComboTracker::new(ComboTuning::default());
        for _ in 0..4 {
            let reward = combo.register_kill();
            assert_eq!(reward.heal, 0.0);
            assert_eq!(reward.multiplier, 1.0);
        }
        let fifth = combo.register_kill();
        assert_eq!(fifth.count, 5);
        assert_eq!(fifth.heal, 0.5);
        assert!((fifth.multiplier - 1.10).abs() < 1e-6);

        for _ in 0..15 {
            let _ = combo.register_kill();
        }
        assert!((combo.multiplier() - 1.50).abs() < 1e-6);
    }

    #[test]
    fn reset_reports_previous_streak_once() {
        let mut combo = ComboTracker::new(ComboTuning::default());
        let _ = combo.register_kill();
        let _ = combo.register_kill();
        assert_eq!(combo.reset(), Some(2));
        assert_eq!(combo.reset(), None);
        assert_eq!(combo.count(), 0);
    }

    #[test]
    fn idle_timeout_decays_streak() {
        let mut combo = ComboTracker::new(ComboTuning::default());
        let _ = combo.register_kill();
        assert_eq!(combo.tick(2.9), None);
        let _ = combo.register_kill();
        assert_eq!(combo.tick(2.9), None);
        assert_eq!(combo.tick(0.2), Some(2));
        assert_eq!(combo.count(), 0);
    }

    #[test]
    fn zone_scaling_compounds_per_step() {
        let scaling = ZoneScaling::for_zone(&ScalingTuning::default(), 2);
        let crawler = scaling.enemy_stats(EnemyKind::Crawler);
        let base = EnemyKind::Crawler.stats();
        assert!((crawler.health - base.health * 1.5).abs() < 1e-4);
        assert!((crawler.speed - base.speed * 1.1).abs() < 1e-4);
        assert!((crawler.damage - base.damage * 1.3).abs() < 1e-4);
        assert_eq!(crawler.radius, base.radius);

        let hive = scaling.boss_stats(BossKind::Hive);
        assert!((hive.health - BossKind::Hive.stats().health * 1.6).abs() < 1e-2);
    }

    #[test]
    fn weapon_tier_is_capped() {
        let tuning = ScalingTuning::default();
        assert_eq!(weapon_tier(&tuning, 0), 1);
        assert_eq!(weapon_tier(&tuning, 4), 2);
        assert_eq!(weapon_tier(&tuning, 20), 5);
        assert_eq!(weapon_tier(&tuning, 400), 5);
    }
}
