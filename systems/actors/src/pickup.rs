//! Dropped pickups waiting to be collected.

use collapse_arena_core::{snapshot::PickupPose, PickupId, PickupKind, Vec2};

/// A pickup lying in the arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Pickup {
    id: PickupId,
    kind: PickupKind,
    position: Vec2,
    age: f32,
    lifetime: f32,
    collected: bool,
}

impl Pickup {
    /// Drops a pickup that expires after `lifetime` seconds.
    #[must_use]
    pub fn new(id: PickupId, kind: PickupKind, position: Vec2, lifetime: f32) -> Self {
        Self {
            id,
            kind,
            position,
            age: 0.0,
            lifetime,
            collected: false,
        }
    }

    /// Identifier of the pickup.
    #[must_use]
    pub const fn id(&self) -> PickupId {
        self.id
    }

    /// Contents.
    #[must_use]
    pub const fn kind(&self) -> PickupKind {
        self.kind
    }

    /// Position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Reports whether the pickup was collected.
    #[must_use]
    pub const fn is_collected(&self) -> bool {
        self.collected
    }

    /// Reports whether the pickup timed out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Ages the pickup; returns `true` once it timed out.
    pub fn update(&mut self, dt: f32) -> bool {
        self.age += dt.max(0.0);
        self.is_expired()
    }

    /// Collects the pickup when `player` is within `radius`.
    pub fn try_collect(&mut self, player: Vec2, radius: f32) -> bool {
        if self.collected || self.is_expired() {
            return false;
        }
        if self.position.distance_squared(player) <= radius * radius {
            self.collected = true;
        }
        self.collected
    }

    /// Snapshot of the pickup for the renderer.
    #[must_use]
    pub fn pose(&self) -> PickupPose {
        PickupPose {
            id: self.id,
            kind: self.kind,
            position: self.position,
            age_fraction: if self.lifetime > 0.0 {
                (self.age / self.lifetime).min(1.0)
            } else {
                1.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collected_once_within_radius() {
        let mut pickup = Pickup::new(PickupId::new(1), PickupKind::Token, Vec2::ZERO, 10.0);
        assert!(!pickup.try_collect(Vec2::new(40.0, 0.0), 28.0));
        assert!(pickup.try_collect(Vec2::new(20.0, 0.0), 28.0));
        assert!(!pickup.try_collect(Vec2::new(20.0, 0.0), 28.0));
    }

    #[test]
    fn expired_pickups_cannot_be_collected() {
        let mut pickup = Pickup::new(PickupId::new(1), PickupKind::Health, Vec2::ZERO, 1.0);
        assert!(!pickup.update(0.5));
        assert!(pickup.update(0.5));
        assert!(!pickup.try_collect(Vec2::ZERO, 28.0));
    }
}
