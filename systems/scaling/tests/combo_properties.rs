use collapse_arena_core::ComboTuning;
use collapse_arena_system_scaling::ComboTracker;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Step {
    Kill,
    Contact,
    Idle(f32),
}

fn any_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Kill),
        Just(Step::Contact),
        (0.0f32..1.5).prop_map(Step::Idle),
    ]
}

proptest! {
    #[test]
    fn contact_always_zeroes_the_streak(steps in prop::collection::vec(any_step(), 1..64)) {
        let mut combo = ComboTracker::new(ComboTuning::default());
        let mut idle = 0.0f32;
        for step in steps {
            match step {
                Step::Kill => {
                    let before = combo.count();
                    let reward = combo.register_kill();
                    prop_assert_eq!(reward.count, before + 1);
                    idle = 0.0;
                }
                Step::Contact => {
                    let _ = combo.reset();
                    prop_assert_eq!(combo.count(), 0);
                    idle = 0.0;
                }
                Step::Idle(dt) => {
                    let had_streak = combo.count() > 0;
                    let decayed = combo.tick(dt);
                    if had_streak {
                        idle += dt;
                    }
                    if idle >= 3.0 {
                        prop_assert!(decayed.is_some() || !had_streak);
                        prop_assert_eq!(combo.count(), 0);
                        idle = 0.0;
                    }
                }
            }
            prop_assert!(combo.multiplier() >= 1.0);
        }
    }
}
