//! Fuzz target for belief updating over arbitrary hypothesis spaces and rolls.

#![no_main]

use arbitrary::Arbitrary;
use bd_core::inference::BeliefEngine;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    hypotheses: Vec<u8>,
    rolls: Vec<(u8, bool)>,
}

fuzz_target!(|input: Input| {
    let space: Vec<u32> = input.hypotheses.iter().map(|&s| u32::from(s)).collect();
    let Ok(mut engine) = BeliefEngine::new(&space) else {
        return;
    };
    for (roll, update) in input.rolls {
        if engine.observe(u32::from(roll)).is_err() {
            continue;
        }
        if update && engine.update_belief().is_ok() {
            let sum = engine.posterior().sum();
            assert!((sum - 1.0).abs() < 1e-6, "posterior sum drifted to {sum}");
        }
    }
    let _ = engine.best_guess(0.8);
});
