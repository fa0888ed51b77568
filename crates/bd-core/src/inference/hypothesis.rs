//! The fixed set of die types a belief ranges over.

use bd_config::{check_hypotheses, HypothesisIssue};
use serde::Serialize;

use super::engine::{BeliefError, Result};

/// Ordered, distinct, positive die side-counts.
///
/// Index `i` of every distribution in the engine refers to `sides()[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HypothesisSpace {
    sides: Vec<u32>,
}

impl HypothesisSpace {
    /// Validate and build a hypothesis space, preserving the given order.
    pub fn new(sides: &[u32]) -> Result<Self> {
        check_hypotheses(sides).map_err(|issue| match issue {
            HypothesisIssue::Empty => BeliefError::EmptyHypothesisSpace,
            HypothesisIssue::NonPositive => BeliefError::NonPositiveHypothesis,
            HypothesisIssue::Duplicate(sides) => BeliefError::DuplicateHypothesis { sides },
        })?;
        Ok(Self {
            sides: sides.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.sides.len()
    }

    /// Always false for a constructed space; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.sides.is_empty()
    }

    pub fn sides(&self) -> &[u32] {
        &self.sides
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.sides.iter().copied()
    }

    /// Probability of any single face on a fair die with these sides.
    pub fn per_face_likelihood(sides: u32) -> f64 {
        1.0 / f64::from(sides)
    }
}

impl std::fmt::Display for HypothesisSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.sides.iter().map(|s| s.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bd_config::DEFAULT_HYPOTHESES;

    #[test]
    fn standard_box() {
        let space = HypothesisSpace::new(&DEFAULT_HYPOTHESES).unwrap();
        assert_eq!(space.sides(), &[4, 6, 8, 12, 20]);
        assert_eq!(space.len(), 5);
        assert_eq!(space.to_string(), "[4, 6, 8, 12, 20]");
    }

    #[test]
    fn preserves_caller_order() {
        let space = HypothesisSpace::new(&[20, 4, 8]).unwrap();
        assert_eq!(space.sides(), &[20, 4, 8]);
        assert_eq!(space.iter().collect::<Vec<_>>(), vec![20, 4, 8]);
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            HypothesisSpace::new(&[]),
            Err(BeliefError::EmptyHypothesisSpace)
        ));
    }

    #[test]
    fn rejects_duplicates() {
        assert!(matches!(
            HypothesisSpace::new(&[6, 6, 8]),
            Err(BeliefError::DuplicateHypothesis { sides: 6 })
        ));
    }

    #[test]
    fn rejects_zero_sides() {
        assert!(matches!(
            HypothesisSpace::new(&[0, 6]),
            Err(BeliefError::NonPositiveHypothesis)
        ));
    }

    #[test]
    fn per_face_likelihood_is_reciprocal() {
        assert_eq!(HypothesisSpace::per_face_likelihood(4), 0.25);
        assert_eq!(HypothesisSpace::per_face_likelihood(1), 1.0);
    }
}
