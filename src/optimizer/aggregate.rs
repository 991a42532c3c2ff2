//! Portfolio-level aggregation
//!
//! Reduces a growth matrix to a per-position best-growth vector and to a
//! t-statistic-like sensitivity score: the weighted best growth over all
//! tradable positions, normalized by the metric's standard deviation. The
//! score is a first-order linear approximation, not a re-optimization.

use crate::optimizer::matrix::GrowthMatrix;

/// Best growth per row over tradable columns, 0 when the row has none.
///
/// Rows include the sentinels; their values are informational (they appear
/// in the Pareto summary) and are excluded from the t-statistic sums and
/// from candidate selection.
pub fn growth_vector(matrix: &GrowthMatrix, tradable: usize) -> Vec<f64> {
    (0..matrix.side())
        .map(|row| {
            let mut best = 0.0;
            for col in 0..tradable {
                let cell = matrix.get(row, col);
                if cell > best {
                    best = cell;
                }
            }
            best
        })
        .collect()
}

/// Linear sensitivity estimate in standard-deviation units.
///
/// `std` is validated positive at alignment time, so the division is safe.
pub fn t_statistic(weights: &[f64], growth: &[f64], tradable: usize, std: f64) -> f64 {
    let weighted: f64 = (0..tradable).map(|p| weights[p] * growth[p]).sum();
    weighted / std
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::matrix::build_growth_matrix;

    const DIVIDENDS: [f64; 5] = [1.0, 5.0, 2.0, 0.0, 0.0];
    const DRAWDOWN: [f64; 5] = [3.0, 1.0, 4.0, 0.0, 0.0];
    const WEIGHTS: [f64; 5] = [0.1, 0.2, 0.3, 0.4, 1.0];
    const UNIT: [f64; 5] = [1.0; 5];

    #[test]
    fn test_growth_vector_reference_scenario() {
        let matrix = build_growth_matrix(&DIVIDENDS, &DRAWDOWN, &WEIGHTS, &UNIT);
        let growth = growth_vector(&matrix, 3);
        // A -> C gives 1; B dominates everything on dividends; C has no
        // joint improvement.
        assert_eq!(growth[0], 1.0);
        assert_eq!(growth[1], 0.0);
        assert_eq!(growth[2], 0.0);
    }

    #[test]
    fn test_growth_vector_covers_sentinel_rows() {
        let matrix = build_growth_matrix(&DIVIDENDS, &DRAWDOWN, &WEIGHTS, &UNIT);
        let growth = growth_vector(&matrix, 3);
        assert_eq!(growth.len(), 5);
        // CASH holds weight and every stock improves on it along both axes,
        // so its informational growth is the best dividend gradient.
        assert_eq!(growth[3], 5.0);
    }

    #[test]
    fn test_t_statistic_weighted_sum() {
        let matrix = build_growth_matrix(&DIVIDENDS, &DRAWDOWN, &WEIGHTS, &UNIT);
        let growth = growth_vector(&matrix, 3);
        let t = t_statistic(&WEIGHTS, &growth, 3, 0.05);
        // Only A contributes: 0.1 * 1.0 / 0.05 = 2. The CASH row's growth
        // must not leak into the sum.
        assert!((t - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_t_statistic_zero_growth() {
        let matrix = GrowthMatrix::zeroed(5);
        let growth = growth_vector(&matrix, 3);
        assert_eq!(t_statistic(&WEIGHTS, &growth, 3, 1.0), 0.0);
    }
}
