/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Computes `Σ(w·v) / Σw` over `(value, weight)` pairs.
/// Returns `None` when the total weight is zero.
pub fn weighted_mean(pairs: &[(f64, f64)]) -> Option<f64> {
    let (weighted_total, weight_sum) = pairs
        .iter()
        .fold((0.0, 0.0), |(t, s), (v, w)| (t + v * w, s + w));

    if weight_sum == 0.0 {
        None
    } else {
        Some(weighted_total / weight_sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[0.5, 0.7]), Some(0.6));
    }

    #[test]
    fn test_weighted_mean() {
        assert_eq!(weighted_mean(&[]), None);
        assert_eq!(weighted_mean(&[(0.5, 0.0)]), None);
        // (0.8*5 + 0.2*1) / 6 = 0.7
        let value = weighted_mean(&[(0.8, 5.0), (0.2, 1.0)]).unwrap();
        assert!((value - 0.7).abs() < 1e-12);
    }
}
