use collapse_arena_core::{EnemyKind, EntityId, PlayerClass, Vec2};
use collapse_arena_system_actors::{Enemy, Player};
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = EnemyKind> {
    prop::sample::select(EnemyKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn enemy_health_stays_within_bounds(
        kind in any_kind(),
        hits in prop::collection::vec(-50.0f32..200.0, 1..24),
    ) {
        let mut enemy = Enemy::new(EntityId::new(1), kind, Vec2::ZERO, kind.stats());
        let mut lethal_hits = 0;
        for amount in hits {
            if enemy.take_damage(amount) {
                lethal_hits += 1;
            }
            let health = enemy.health();
            prop_assert!(health.current() >= 0.0);
            prop_assert!(health.current() <= health.max());
        }
        prop_assert!(lethal_hits <= 1);
    }

    #[test]
    fn player_health_stays_within_bounds(
        hits in prop::collection::vec((0.0f32..80.0, any::<bool>()), 1..32),
        heal in 0.0f32..200.0,
    ) {
        let mut player = Player::new(PlayerClass::Striker, Vec2::splat(100.0), 10);
        for (amount, continuous) in hits {
            let _ = if continuous {
                player.take_continuous_damage(amount)
            } else {
                player.take_damage(amount)
            };
            let _ = player.heal(heal);
            let health = player.health();
            prop_assert!(health.current() >= 0.0);
            prop_assert!(health.current() <= health.max());
        }
    }
}
