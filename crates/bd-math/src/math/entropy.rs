//! Uncertainty measures over discrete distributions.

use serde::{Deserialize, Serialize};

use super::normalize::{argmax_first, total};

/// Shannon entropy in bits.
///
/// Zero-probability entries contribute nothing (0 · log 0 = 0). Input is
/// assumed to be normalized; no renormalization happens here.
pub fn shannon_entropy_bits(probs: &[f64]) -> f64 {
    probs
        .iter()
        .filter(|p| **p > 0.0)
        .map(|p| -p * p.log2())
        .sum()
}

/// Maximum entropy for `n` outcomes, log2(n).
pub fn max_entropy_bits(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    (n as f64).log2()
}

/// Compact description of a distribution for reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Sum of all entries.
    pub total: f64,
    /// Index of the most probable entry (first occurrence on ties).
    pub argmax: Option<usize>,
    /// Probability at `argmax`.
    pub max_prob: f64,
    /// Shannon entropy in bits.
    pub entropy_bits: f64,
    /// Entropy of the uniform distribution over the same entries.
    pub max_entropy_bits: f64,
    /// Number of entries with non-zero probability.
    pub support: usize,
}

impl DistributionSummary {
    pub fn from_probs(probs: &[f64]) -> Self {
        let argmax = argmax_first(probs);
        Self {
            total: total(probs),
            argmax,
            max_prob: argmax.map(|i| probs[i]).unwrap_or(0.0),
            entropy_bits: shannon_entropy_bits(probs),
            max_entropy_bits: max_entropy_bits(probs.len()),
            support: probs.iter().filter(|p| **p > 0.0).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entropy_of_uniform_is_log2_n() {
        let probs = [0.25; 4];
        assert!((shannon_entropy_bits(&probs) - 2.0).abs() < 1e-12);
        assert!((max_entropy_bits(4) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn entropy_of_certain_is_zero() {
        assert_eq!(shannon_entropy_bits(&[0.0, 1.0, 0.0]), 0.0);
    }

    #[test]
    fn max_entropy_empty() {
        assert_eq!(max_entropy_bits(0), 0.0);
    }

    #[test]
    fn summary_reports_support_and_argmax() {
        let s = DistributionSummary::from_probs(&[0.0, 0.6, 0.4]);
        assert_eq!(s.argmax, Some(1));
        assert_eq!(s.support, 2);
        assert!((s.max_prob - 0.6).abs() < 1e-12);
        assert!((s.total - 1.0).abs() < 1e-12);
        assert!(s.entropy_bits > 0.0 && s.entropy_bits < 1.0);
        assert!((s.max_entropy_bits - 3f64.log2()).abs() < 1e-12);
    }

    #[test]
    fn summary_of_uniform_hits_max_entropy() {
        let s = DistributionSummary::from_probs(&[0.2; 5]);
        assert!((s.entropy_bits - s.max_entropy_bits).abs() < 1e-12);
    }
}
