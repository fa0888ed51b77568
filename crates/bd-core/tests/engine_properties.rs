//! Property-based tests for belief engine invariants.

use bd_core::inference::BeliefEngine;
use proptest::prelude::*;

const BOX: [u32; 5] = [4, 6, 8, 12, 20];

/// Rolls a real die from the box could produce.
fn feasible_rolls() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..=20, 1..40)
}

fn hypothesis_space() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::hash_set(1u32..=100, 1..8).prop_map(|s| s.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn posterior_stays_normalized(rolls in feasible_rolls()) {
        let mut engine = BeliefEngine::new(&BOX).unwrap();
        for roll in rolls {
            engine.observe(roll).unwrap();
            engine.update_belief().unwrap();
            let sum = engine.posterior().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "sum={sum}");
            for p in engine.posterior().iter() {
                prop_assert!(p >= 0.0);
            }
        }
    }

    #[test]
    fn ruled_out_dice_stay_at_zero(rolls in feasible_rolls()) {
        let mut engine = BeliefEngine::new(&BOX).unwrap();
        let mut zeroed = vec![false; BOX.len()];
        for roll in rolls {
            engine.observe(roll).unwrap();
            engine.update_belief().unwrap();
            for (i, p) in engine.posterior().iter().enumerate() {
                if zeroed[i] {
                    prop_assert_eq!(p, 0.0);
                }
                if p == 0.0 {
                    zeroed[i] = true;
                }
            }
        }
    }

    #[test]
    fn die_matching_every_roll_is_never_ruled_out(rolls in prop::collection::vec(1u32..=8, 1..30)) {
        let mut engine = BeliefEngine::new(&BOX).unwrap();
        for roll in rolls {
            engine.observe(roll).unwrap();
            engine.update_belief().unwrap();
        }
        // Every roll fits a d8, so the d8 and larger dice keep positive mass.
        for (sides, p) in engine.current_posterior() {
            if sides >= 8 {
                prop_assert!(p > 0.0, "{sides}-sided die ruled out");
            }
        }
    }

    #[test]
    fn uniform_start_for_any_space(space in hypothesis_space()) {
        let engine = BeliefEngine::new(&space).unwrap();
        let n = space.len() as f64;
        for p in engine.prior().iter() {
            prop_assert_eq!(p, 1.0 / n);
        }
        prop_assert!(engine.posterior().is_normalized());
    }

    #[test]
    fn posterior_query_is_idempotent(rolls in feasible_rolls()) {
        let mut engine = BeliefEngine::new(&BOX).unwrap();
        for roll in rolls {
            engine.observe(roll).unwrap();
        }
        engine.update_belief().unwrap();
        let first = engine.current_posterior();
        let second = engine.current_posterior();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn guess_is_the_argmax_when_present(rolls in feasible_rolls(), threshold in 0.05f64..=1.0) {
        let mut engine = BeliefEngine::new(&BOX).unwrap();
        for roll in rolls {
            engine.observe(roll).unwrap();
            engine.update_belief().unwrap();
        }
        if let Some(guess) = engine.best_guess(threshold) {
            let posterior = engine.current_posterior();
            let (_, p_guess) = posterior.iter().find(|(s, _)| *s == guess).copied().unwrap();
            prop_assert!(p_guess >= threshold);
            for (_, p) in posterior {
                prop_assert!(p <= p_guess);
            }
        }
    }
}
