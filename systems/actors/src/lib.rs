#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Entity model for everything that lives in the arena except the boss.
//!
//! Each actor exposes an `update` step that advances its own timers and
//! movement and reports intents (projectiles to fire, strikes, summons) into
//! an output buffer, plus a `take_damage` entry point that clamps health and
//! reports whether the hit was lethal. Actors never mutate one another; the
//! world and the collision resolver apply the reported intents.

use collapse_arena_core::Vec2;

pub mod enemy;
pub mod pickup;
pub mod player;
pub mod turret;

pub use enemy::{Enemy, EnemyAction, EnemyStep};
pub use pickup::Pickup;
pub use player::{Player, PlayerStep, SpecialAbility};
pub use turret::Turret;

/// Collision radius of the player.
pub const PLAYER_RADIUS: f32 = 14.0;

/// Moves `from` toward `to` by at most `distance` without overshooting.
#[must_use]
pub fn approach(from: Vec2, to: Vec2, distance: f32) -> Vec2 {
    let offset = to - from;
    let length = offset.length();
    if length <= distance || length <= f32::EPSILON {
        to
    } else {
        from + offset / length * distance
    }
}
