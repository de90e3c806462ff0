//! Scripted input standing in for a human player.

use collapse_arena_core::{FrameInput, Vec2};
use collapse_arena_world::{query, World};

/// Distance the autopilot tries to keep from the nearest threat.
const KEEP_AWAY: f32 = 220.0;
/// Threat distance that triggers the class special.
const PANIC_RADIUS: f32 = 90.0;
/// Pickups closer than this are worth a detour.
const PICKUP_DETOUR: f32 = 160.0;
const STRAFE_WEIGHT: f32 = 0.6;
const PICKUP_WEIGHT: f32 = 0.8;

/// Kites the nearest threat while firing, collects nearby pickups and stays
/// inside the safe area.
#[derive(Debug, Default)]
pub(crate) struct Autopilot;

impl Autopilot {
    /// Samples the input for the next tick from the current world state.
    pub(crate) fn sample(&self, world: &World) -> FrameInput {
        let player = query::player(world);
        let origin = player.position();

        let threats = query::enemies(world)
            .iter()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| enemy.position())
            .chain(
                query::boss(world)
                    .filter(|boss| !boss.is_finished())
                    .map(|boss| boss.position()),
            );
        let nearest_threat = nearest(origin, threats);

        let mut movement = Vec2::ZERO;
        if let Some(threat) = nearest_threat {
            let away = (origin - threat).normalize_or_zero();
            if origin.distance(threat) < KEEP_AWAY {
                movement += away;
            }
            movement += away.perp() * STRAFE_WEIGHT;
        }

        let pickups = query::pickups(world).iter().map(|pickup| pickup.position());
        if let Some(pickup) = nearest(origin, pickups) {
            if origin.distance(pickup) < PICKUP_DETOUR {
                movement += (pickup - origin).normalize_or_zero() * PICKUP_WEIGHT;
            }
        }

        let safe = query::progression(world).safe_area(&query::arena(world));
        if !safe.contains(origin) {
            movement = (safe.center() - origin).normalize_or_zero();
        }

        let special = player.charges() > 0
            && nearest_threat.map_or(false, |threat| origin.distance(threat) < PANIC_RADIUS);
        FrameInput::new(movement, true, special)
    }
}

fn nearest(origin: Vec2, points: impl Iterator<Item = Vec2>) -> Option<Vec2> {
    points.min_by(|a, b| {
        a.distance_squared(origin)
            .total_cmp(&b.distance_squared(origin))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_prefers_the_closest_point() {
        let origin = Vec2::new(10.0, 10.0);
        let points = [Vec2::new(100.0, 0.0), Vec2::new(12.0, 14.0), Vec2::new(-40.0, 10.0)];
        assert_eq!(nearest(origin, points.into_iter()), Some(Vec2::new(12.0, 14.0)));
        assert_eq!(nearest(origin, std::iter::empty()), None);
    }
}
