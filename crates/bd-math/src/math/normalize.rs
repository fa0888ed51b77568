//! Normalization primitives for discrete probability vectors.

/// Tolerance used when checking that a distribution sums to one.
pub const NORMALIZATION_EPSILON: f64 = 1e-9;

/// Sum of all entries.
///
/// Returns NaN if any entry is NaN.
pub fn total(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Divide every entry by the total so the result sums to one.
///
/// Returns `None` for empty input, a zero total, or a non-finite total.
/// Callers decide how to surface the degenerate case; this never yields NaN.
pub fn normalize(values: &[f64]) -> Option<Vec<f64>> {
    if values.is_empty() {
        return None;
    }
    if values.iter().any(|v| v.is_nan() || *v < 0.0) {
        return None;
    }
    let sum = total(values);
    if sum <= 0.0 || !sum.is_finite() {
        return None;
    }
    Some(values.iter().map(|v| v / sum).collect())
}

/// Whether `values` is a valid distribution: non-negative and summing to one
/// within `tol`.
pub fn is_normalized(values: &[f64], tol: f64) -> bool {
    if values.is_empty() {
        return false;
    }
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return false;
    }
    (total(values) - 1.0).abs() <= tol
}

/// Index of the largest entry.
///
/// Ties resolve to the first occurrence. NaN entries are skipped.
pub fn argmax_first(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if v <= current => {}
            _ => best = Some((idx, v)),
        }
    }
    best.map(|(idx, _)| idx)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalize_sums_to_one(values in prop::collection::vec(0.0f64..1e6, 1..16)) {
            match normalize(&values) {
                Some(out) => prop_assert!(is_normalized(&out, NORMALIZATION_EPSILON)),
                None => prop_assert!(total(&values) == 0.0),
            }
        }

        #[test]
        fn normalized_entries_are_probabilities(values in prop::collection::vec(0.001f64..1e3, 1..16)) {
            let out = normalize(&values).unwrap();
            prop_assert_eq!(out.len(), values.len());
            for p in out {
                prop_assert!((0.0..=1.0).contains(&p));
            }
        }
    }
}
