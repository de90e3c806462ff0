//! Delayed work scheduled by the world.

use std::mem;

use collapse_arena_core::{EntityId, TurretId};
use collapse_arena_system_combat::Blast;

/// Entity whose removal cancels the tasks it owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TaskOwner {
    /// The player avatar.
    Player,
    /// An enemy; cancelled when it dies or leaves the arena.
    Enemy(EntityId),
    /// A deployed turret.
    Turret(TurretId),
    /// The arena itself; only cleared when the run ends.
    Arena,
}

/// Work performed when a task comes due.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum TaskKind {
    /// Ends the player's overclock.
    EndOverclock,
    /// Lifts the player's slow.
    EndSlow,
    /// Removes a turret whose lifetime ran out.
    ExpireTurret(TurretId),
    /// Closes the invulnerability window of a glitch enemy.
    CloseGlitch(EntityId),
    /// Detonates a delayed blast.
    Detonate(Blast),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ScheduledTask {
    owner: TaskOwner,
    kind: TaskKind,
    remaining: f32,
}

/// Pending delayed tasks in scheduling order.
#[derive(Debug, Default)]
pub(crate) struct TaskScheduler {
    tasks: Vec<ScheduledTask>,
}

impl TaskScheduler {
    /// Creates an empty scheduler.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Runs `kind` once `delay` seconds have elapsed.
    pub(crate) fn schedule(&mut self, owner: TaskOwner, delay: f32, kind: TaskKind) {
        self.tasks.push(ScheduledTask {
            owner,
            kind,
            remaining: delay.max(0.0),
        });
    }

    /// Schedules `kind`, dropping any pending task of the same kind for `owner`.
    pub(crate) fn replace(&mut self, owner: TaskOwner, delay: f32, kind: TaskKind) {
        let variant = mem::discriminant(&kind);
        self.tasks
            .retain(|task| task.owner != owner || mem::discriminant(&task.kind) != variant);
        self.schedule(owner, delay, kind);
    }

    /// Advances every timer and moves due tasks into `due`, earliest first.
    pub(crate) fn advance(&mut self, dt: f32, due: &mut Vec<TaskKind>) {
        let mut fired = Vec::new();
        let mut index = 0;
        while index < self.tasks.len() {
            self.tasks[index].remaining -= dt;
            if self.tasks[index].remaining <= 0.0 {
                fired.push(self.tasks.remove(index));
            } else {
                index += 1;
            }
        }
        fired.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));
        due.extend(fired.into_iter().map(|task| task.kind));
    }

    /// Drops every task owned by `owner` and returns how many were dropped.
    pub(crate) fn cancel_owner(&mut self, owner: TaskOwner) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.owner != owner);
        before - self.tasks.len()
    }

    /// Drops every pending task and returns how many were dropped.
    pub(crate) fn clear(&mut self) -> usize {
        let dropped = self.tasks.len();
        self.tasks.clear();
        dropped
    }

    /// Number of pending tasks.
    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }
}
