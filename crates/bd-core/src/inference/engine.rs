//! Belief engine for the hidden-die problem.
//!
//! Each hypothesis H is "the hidden die has `sides` faces". A roll D is
//! evidence against every die with fewer faces than D. The engine keeps the
//! classic Bayes table per hypothesis:
//!
//! | H | P(H) | P(D\|H) | P(H)·P(D\|H) | P(H\|D) |
//!
//! and rolls P(H|D) forward as the next prior.
//!
//! Observations and recomputation are separate steps: `observe` only records
//! a roll, `update_belief` recomputes. Callers may batch several observations
//! before one update.

use bd_math::{argmax_first, is_normalized, normalize, NORMALIZATION_EPSILON};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::hypothesis::HypothesisSpace;

pub use bd_config::DEFAULT_GUESS_THRESHOLD;

/// Errors raised by the belief engine.
///
/// All of these are caller usage errors; none are transient.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BeliefError {
    #[error("hypothesis space is empty")]
    EmptyHypothesisSpace,

    #[error("duplicate hypothesis: {sides}-sided die listed more than once")]
    DuplicateHypothesis { sides: u32 },

    #[error("hypothesis side counts must be positive")]
    NonPositiveHypothesis,

    #[error("invalid observation {roll}: rolls start at 1")]
    InvalidObservation { roll: u32 },

    #[error(
        "degenerate belief: every hypothesis is ruled out after {observations} observations \
         (highest roll {max_roll})"
    )]
    DegenerateBelief { observations: usize, max_roll: u32 },
}

impl BeliefError {
    /// Whether this error came from building the hypothesis space.
    pub fn is_invalid_hypothesis_space(&self) -> bool {
        matches!(
            self,
            BeliefError::EmptyHypothesisSpace
                | BeliefError::DuplicateHypothesis { .. }
                | BeliefError::NonPositiveHypothesis
        )
    }
}

/// Result type for belief engine operations.
pub type Result<T> = std::result::Result<T, BeliefError>;

/// Probabilities aligned positionally with a [`HypothesisSpace`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Distribution(Vec<f64>);

impl Distribution {
    fn uniform(n: usize) -> Self {
        Self(vec![1.0 / n as f64; n])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, idx: usize) -> Option<f64> {
        self.0.get(idx).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Whether the entries sum to one within [`NORMALIZATION_EPSILON`].
    pub fn is_normalized(&self) -> bool {
        is_normalized(&self.0, NORMALIZATION_EPSILON)
    }
}

/// One row of the Bayes table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeliefRow {
    /// Die side-count (the hypothesis).
    pub sides: u32,
    /// P(H)
    pub prior: f64,
    /// P(D|H)
    pub likelihood: f64,
    /// P(H)·P(D|H)
    pub unnormalized: f64,
    /// P(H|D)
    pub posterior: f64,
}

/// Serializable snapshot of the full belief state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeliefTable {
    pub rows: Vec<BeliefRow>,
    pub observations: usize,
    pub updates: usize,
    pub last_observation: Option<u32>,
}

/// Sequential Bayesian belief over which die is hidden.
#[derive(Debug, Clone)]
pub struct BeliefEngine {
    space: HypothesisSpace,
    prior: Distribution,
    likelihood: Distribution,
    posterior: Distribution,
    observations: Vec<u32>,
    updates: usize,
}

impl BeliefEngine {
    /// Build an engine over the given die side-counts.
    pub fn new(hypotheses: &[u32]) -> Result<Self> {
        Ok(Self::with_space(HypothesisSpace::new(hypotheses)?))
    }

    /// Build an engine over an already validated hypothesis space.
    pub fn with_space(space: HypothesisSpace) -> Self {
        let prior = Distribution::uniform(space.len());
        let likelihood = Distribution(
            space
                .iter()
                .map(HypothesisSpace::per_face_likelihood)
                .collect(),
        );
        let pre: Vec<f64> = prior
            .iter()
            .zip(likelihood.iter())
            .map(|(p, l)| p * l)
            .collect();
        // Every likelihood is positive here, so the total is too.
        let posterior = Distribution(normalize(&pre).unwrap_or_else(|| prior.0.clone()));

        Self {
            space,
            prior,
            likelihood,
            posterior,
            observations: Vec::new(),
            updates: 0,
        }
    }

    /// Record a roll. Does not touch the belief until [`update_belief`](Self::update_belief).
    pub fn observe(&mut self, roll: u32) -> Result<()> {
        if roll == 0 {
            return Err(BeliefError::InvalidObservation { roll });
        }
        self.observations.push(roll);
        Ok(())
    }

    /// Recompute likelihoods from every recorded roll and roll the posterior
    /// forward.
    ///
    /// The first update conditions the uniform construction prior; later
    /// updates use the previous posterior as prior. On `DegenerateBelief` the
    /// engine keeps its last valid distributions.
    pub fn update_belief(&mut self) -> Result<()> {
        let prior = if self.updates == 0 {
            self.prior.clone()
        } else {
            self.posterior.clone()
        };
        let likelihood = self.constrained_likelihood();
        let pre: Vec<f64> = prior
            .iter()
            .zip(likelihood.iter())
            .map(|(p, l)| p * l)
            .collect();

        let Some(posterior) = normalize(&pre) else {
            let max_roll = self.max_observation().unwrap_or(0);
            warn!(
                observations = self.observations.len(),
                max_roll,
                hypotheses = %self.space,
                "every hypothesis ruled out"
            );
            return Err(BeliefError::DegenerateBelief {
                observations: self.observations.len(),
                max_roll,
            });
        };

        self.prior = prior;
        self.likelihood = likelihood;
        self.posterior = Distribution(posterior);
        self.updates += 1;

        debug!(
            update = self.updates,
            observations = self.observations.len(),
            posterior = ?self.posterior.as_slice(),
            "belief updated"
        );
        Ok(())
    }

    /// Per-face likelihood, zeroed for any die some roll could not come from.
    fn constrained_likelihood(&self) -> Distribution {
        let max_roll = self.max_observation().unwrap_or(0);
        Distribution(
            self.space
                .iter()
                .map(|sides| {
                    if max_roll > sides {
                        0.0
                    } else {
                        HypothesisSpace::per_face_likelihood(sides)
                    }
                })
                .collect(),
        )
    }

    fn max_observation(&self) -> Option<u32> {
        self.observations.iter().copied().max()
    }

    /// `(sides, probability)` pairs in hypothesis order.
    pub fn current_posterior(&self) -> Vec<(u32, f64)> {
        self.space.iter().zip(self.posterior.iter()).collect()
    }

    /// Most probable die if its posterior reaches `threshold`.
    ///
    /// Ties go to the earliest hypothesis.
    pub fn best_guess(&self, threshold: f64) -> Option<u32> {
        let idx = argmax_first(self.posterior.as_slice())?;
        let p = self.posterior.get(idx)?;
        if p >= threshold {
            Some(self.space.sides()[idx])
        } else {
            None
        }
    }

    /// Dice that some observation has ruled out.
    pub fn ruled_out(&self) -> Vec<u32> {
        let max_roll = self.max_observation().unwrap_or(0);
        self.space.iter().filter(|&s| max_roll > s).collect()
    }

    pub fn hypotheses(&self) -> &HypothesisSpace {
        &self.space
    }

    pub fn prior(&self) -> &Distribution {
        &self.prior
    }

    pub fn likelihood(&self) -> &Distribution {
        &self.likelihood
    }

    pub fn posterior(&self) -> &Distribution {
        &self.posterior
    }

    pub fn observations(&self) -> &[u32] {
        &self.observations
    }

    /// Number of successful `update_belief` calls.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Snapshot of the Bayes table for display or serialization.
    pub fn table(&self) -> BeliefTable {
        let rows = self
            .space
            .iter()
            .enumerate()
            .map(|(i, sides)| {
                let prior = self.prior.as_slice()[i];
                let likelihood = self.likelihood.as_slice()[i];
                BeliefRow {
                    sides,
                    prior,
                    likelihood,
                    unnormalized: prior * likelihood,
                    posterior: self.posterior.as_slice()[i],
                }
            })
            .collect();
        BeliefTable {
            rows,
            observations: self.observations.len(),
            updates: self.updates,
            last_observation: self.observations.last().copied(),
        }
    }
}
