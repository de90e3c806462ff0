//! Context collapse: the safe arena shrinks while a layer drags on.

use collapse_arena_core::{ArenaBounds, CollapseTuning};

/// Shrinking safe-area clock of the current layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Collapse {
    tuning: CollapseTuning,
    elapsed: f32,
    started: bool,
}

impl Collapse {
    /// Creates an idle collapse clock.
    #[must_use]
    pub fn new(tuning: CollapseTuning) -> Self {
        Self {
            tuning,
            elapsed: 0.0,
            started: false,
        }
    }

    /// Advances the clock; returns `true` on the step the collapse begins.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        if !self.started && self.elapsed >= self.tuning.grace_secs {
            self.started = true;
            return true;
        }
        false
    }

    /// Restarts the grace period, restoring the full arena.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.started = false;
    }

    /// Reports whether the safe area is shrinking.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.started
    }

    /// Fraction of the arena that is still safe.
    #[must_use]
    pub fn safe_fraction(&self) -> f32 {
        if !self.started {
            return 1.0;
        }
        let shrinking = self.elapsed - self.tuning.grace_secs;
        (1.0 - self.tuning.shrink_per_sec * shrinking).max(self.tuning.min_fraction)
    }

    /// Safe rectangle inside `arena`.
    #[must_use]
    pub fn safe_area(&self, arena: &ArenaBounds) -> ArenaBounds {
        arena.scaled(self.safe_fraction())
    }

    /// Damage dealt over `dt` seconds to a player outside the safe area.
    #[must_use]
    pub fn burn(&self, dt: f32) -> f32 {
        if self.started {
            self.tuning.damage_per_sec * dt
        } else {
            0.0
        }
    }
}
