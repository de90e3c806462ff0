//! Aggregates the event stream of a run into a printable report.

use std::fmt;

use collapse_arena_core::Event;

/// How the run ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The tick limit was reached first.
    #[default]
    Unfinished,
    /// Every layer was cleared.
    Victory,
    /// The player died on the given layer.
    Defeat(u32),
}

/// Counters collected while the run plays out.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct RunSummary {
    ticks: u64,
    spawned: u32,
    kills: u32,
    layers_cleared: u32,
    bosses_defeated: u32,
    pickups: u32,
    specials: u32,
    damage_taken: f32,
    best_combo: u32,
    outcome: Outcome,
}

impl RunSummary {
    /// Folds one tick's events into the counters.
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match *event {
                Event::TimeAdvanced { .. } => self.ticks += 1,
                Event::EnemySpawned { .. } => self.spawned += 1,
                Event::EnemyKilled { .. } => self.kills += 1,
                Event::LayerCleared { .. } => self.layers_cleared += 1,
                Event::BossDefeated { .. } => self.bosses_defeated += 1,
                Event::PickupCollected { .. } => self.pickups += 1,
                Event::SpecialUsed { .. } => self.specials += 1,
                Event::PlayerDamaged { amount, .. } => self.damage_taken += amount,
                Event::ComboChanged { count } => self.best_combo = self.best_combo.max(count),
                Event::Victory => self.outcome = Outcome::Victory,
                Event::PlayerDied { layer } => self.outcome = Outcome::Defeat(layer),
                _ => {}
            }
        }
    }

    /// How the run ended.
    pub(crate) const fn outcome(&self) -> Outcome {
        self.outcome
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Unfinished => writeln!(f, "outcome:          unfinished")?,
            Outcome::Victory => writeln!(f, "outcome:          victory")?,
            Outcome::Defeat(layer) => writeln!(f, "outcome:          defeat on layer {}", layer + 1)?,
        }
        writeln!(f, "ticks:            {}", self.ticks)?;
        writeln!(f, "layers cleared:   {}", self.layers_cleared)?;
        writeln!(f, "bosses defeated:  {}", self.bosses_defeated)?;
        writeln!(f, "enemies killed:   {}/{}", self.kills, self.spawned)?;
        writeln!(f, "best combo:       {}", self.best_combo)?;
        writeln!(f, "pickups:          {}", self.pickups)?;
        writeln!(f, "specials used:    {}", self.specials)?;
        write!(f, "damage taken:     {:.1}", self.damage_taken)
    }
}
