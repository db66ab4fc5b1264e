#![allow(non_snake_case)]
use proptest::prelude::*;
use rand::{
    SeedableRng,
    rngs::StdRng,
};
use std::f64::consts::TAU;
use wheel_core::{
    SequenceRandom,
    pick_winner_index,
    plan_spin,
    resolve,
    slice_under_pointer,
    test_helpers::*,
};

#[test]
fn plan_spin__empirical_odds_follow_resolved_chances() {
    // given
    let wheel = resolve(&[
        explicit("Jackpot", 10.0, 3.0),
        explicit("Small", 60.0, 1.0),
        auto("Nothing"),
    ])
    .unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    let trials = 100_000;
    let mut counts = [0usize; 3];

    // when
    for _ in 0..trials {
        counts[plan_spin(wheel.options(), &mut rng).winner_index] += 1;
    }

    // then
    let expected = [0.10, 0.60, 0.30];
    for (count, expected) in counts.iter().zip(expected) {
        let frequency = *count as f64 / trials as f64;
        assert!((frequency - expected).abs() < 0.02, "{counts:?}");
    }
}

#[test]
fn plan_spin__large_slice_with_zero_chance_never_wins() {
    // given
    let wheel = resolve(&[explicit("Huge", 0.0, 20.0), explicit("Tiny", 100.0, 0.1)]).unwrap();
    let mut rng = StdRng::seed_from_u64(5);

    // then
    for _ in 0..10_000 {
        let outcome = plan_spin(wheel.options(), &mut rng);
        assert_eq!(outcome.winner_index, 1);
        assert_eq!(slice_under_pointer(wheel.options(), outcome.rotation_delta), 1);
    }
}

#[test]
fn repeated_spins_keep_winding_forward() {
    // given
    let wheel = resolve(&[auto("A"), auto("B"), auto("C")]).unwrap();
    let mut rng = SequenceRandom::new(vec![0.1, 0.5, 0.0, 0.9, 0.5, 0.99]);
    let mut rotation = 0.0;

    for _ in 0..2 {
        // when
        let outcome = plan_spin(wheel.options(), &mut rng);
        let next = rotation + outcome.rotation_from(rotation);

        // then
        assert!(next - rotation > 3.0 * TAU);
        assert_eq!(slice_under_pointer(wheel.options(), next), outcome.winner_index);
        rotation = next;
    }
}

proptest! {
    #[test]
    fn pick_winner_index__always_in_bounds(
        chances in prop::collection::vec(0.0f64..50.0, 1..20),
        seed in any::<u64>()
    ) {
        let options: Vec<_> = chances
            .iter()
            .enumerate()
            .map(|(i, chance)| resolved(&format!("opt-{i}"), *chance, 1.0))
            .collect();
        let mut rng = StdRng::seed_from_u64(seed);

        let index = pick_winner_index(&options, &mut rng);

        prop_assert!(index < options.len());
    }
}
