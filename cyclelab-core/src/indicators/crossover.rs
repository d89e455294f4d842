//! Crossover detection between two aligned series.
//!
//! A crossover of `a` above `b` at index i is a true sign change:
//! `a[i-1] <= b[i-1]` and `a[i] > b[i]`. The mirror condition (b above a) is
//! obtained by swapping the arguments.

/// Sign of an upward crossover of `a` over `b` between two consecutive points.
///
/// Returns 1.0 on a crossover, 0.0 when there is none, and NaN if any input is
/// undefined.
pub fn cross_above(prev_a: f64, prev_b: f64, cur_a: f64, cur_b: f64) -> f64 {
    if prev_a.is_nan() || prev_b.is_nan() || cur_a.is_nan() || cur_b.is_nan() {
        return f64::NAN;
    }
    if prev_a <= prev_b && cur_a > cur_b {
        1.0
    } else {
        0.0
    }
}

/// Crossover signs of `a` over `b` for whole series.
///
/// Index 0 is always NaN (no previous point).
pub fn crossover_signs(a: &[f64], b: &[f64]) -> Vec<f64> {
    assert_eq!(a.len(), b.len(), "crossover series must be aligned");
    let mut result = vec![f64::NAN; a.len()];
    for i in 1..a.len() {
        result[i] = cross_above(a[i - 1], b[i - 1], a[i], b[i]);
    }
    result
}
