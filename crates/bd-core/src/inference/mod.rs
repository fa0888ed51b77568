//! Bayesian belief updating over die side-counts.
//!
//! - `hypothesis`: the fixed, validated set of die types.
//! - `engine`: the belief state and its two-phase observe/update cycle.

mod engine;
mod hypothesis;

pub use engine::{
    BeliefEngine, BeliefError, BeliefRow, BeliefTable, Distribution, Result,
    DEFAULT_GUESS_THRESHOLD,
};
pub use hypothesis::HypothesisSpace;
