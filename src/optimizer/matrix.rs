//! Growth matrices
//!
//! A growth matrix records, for every ordered pair (sell row i, buy column
//! j), the hypothetical improvement of the primary metric when position i is
//! replaced with position j. The secondary metric acts as a veto: a cell
//! survives only if the candidate buy strictly improves it, so every recorded
//! trade is a joint (Pareto) improvement.

use serde::Serialize;

/// Square, row-major matrix over the full position set including the two
/// sentinel slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthMatrix {
    side: usize,
    cells: Vec<f64>,
}

impl GrowthMatrix {
    pub fn zeroed(side: usize) -> Self {
        Self {
            side,
            cells: vec![0.0; side * side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.side + col]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.cells[row * self.side + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.side..(row + 1) * self.side]
    }

    /// Copy out as nested rows, for JSON output.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.side).map(|row| self.row(row).to_vec()).collect()
    }
}

/// Build the growth matrix for one metric.
///
/// Cell rule, applied with explicit loops over the fixed index range:
/// - `raw = (primary[j] - primary[i]) * volume_factor[j]` — the liquidity
///   discount penalizes the buy side only;
/// - rows of weight-0 positions are zeroed (an empty position cannot be
///   sold);
/// - cells where `secondary[j] <= secondary[i]` are zeroed (the trade must
///   not regress the other axis);
/// - remaining negative cells are clamped to 0.
///
/// All slices must have the same length, the matrix side.
pub fn build_growth_matrix(
    primary: &[f64],
    secondary: &[f64],
    weights: &[f64],
    volume_factors: &[f64],
) -> GrowthMatrix {
    let side = primary.len();
    debug_assert_eq!(side, secondary.len());
    debug_assert_eq!(side, weights.len());
    debug_assert_eq!(side, volume_factors.len());

    let mut matrix = GrowthMatrix::zeroed(side);
    for i in 0..side {
        if weights[i] == 0.0 {
            continue;
        }
        for j in 0..side {
            if secondary[j] <= secondary[i] {
                continue;
            }
            let raw = (primary[j] - primary[i]) * volume_factors[j];
            if raw > 0.0 {
                matrix.set(i, j, raw);
            }
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    // Layout: A, B, C, CASH, PORTFOLIO. Weights match the reference
    // scenario: 0.1 / 0.2 / 0.3 with 0.4 cash.
    const DIVIDENDS: [f64; 5] = [1.0, 5.0, 2.0, 0.0, 0.0];
    const DRAWDOWN: [f64; 5] = [3.0, 1.0, 4.0, 0.0, 0.0];
    const WEIGHTS: [f64; 5] = [0.1, 0.2, 0.3, 0.4, 1.0];
    const UNIT: [f64; 5] = [1.0; 5];

    #[test]
    fn test_reference_scenario_row_a() {
        let matrix = build_growth_matrix(&DIVIDENDS, &DRAWDOWN, &WEIGHTS, &UNIT);
        // B is vetoed: drawdown 1 <= 3. C survives: (2 - 1) * 1 = 1.
        assert_eq!(matrix.get(0, 1), 0.0);
        assert_eq!(matrix.get(0, 2), 1.0);
        assert_eq!(matrix.get(0, 0), 0.0);
    }

    #[test]
    fn test_zero_weight_row_is_zero() {
        let mut weights = WEIGHTS;
        weights[0] = 0.0;
        let matrix = build_growth_matrix(&DIVIDENDS, &DRAWDOWN, &weights, &UNIT);
        assert!(matrix.row(0).iter().all(|&cell| cell == 0.0));
    }

    #[test]
    fn test_secondary_veto_zeroes_cell() {
        let matrix = build_growth_matrix(&DIVIDENDS, &DRAWDOWN, &WEIGHTS, &UNIT);
        for i in 0..5 {
            for j in 0..5 {
                if DRAWDOWN[j] <= DRAWDOWN[i] {
                    assert_eq!(matrix.get(i, j), 0.0, "cell ({i}, {j}) must be vetoed");
                }
            }
        }
    }

    #[test]
    fn test_negative_raw_growth_clamped() {
        // From C to A the drawdown veto passes in the swapped-roles matrix
        // while the raw dividend difference is negative.
        let matrix = build_growth_matrix(&DRAWDOWN, &DIVIDENDS, &WEIGHTS, &UNIT);
        // Row C (index 2), column B (index 1): dividends 5 > 2 passes the
        // veto, raw = 1 - 4 = -3 -> clamped.
        assert_eq!(matrix.get(2, 1), 0.0);
    }

    #[test]
    fn test_buy_side_volume_discount() {
        let mut factors = UNIT;
        factors[2] = 0.5;
        let matrix = build_growth_matrix(&DIVIDENDS, &DRAWDOWN, &WEIGHTS, &factors);
        // A -> C scaled by the buy column's factor.
        assert_eq!(matrix.get(0, 2), 0.5);
        // The same column discount applies with the roles swapped: A -> C in
        // the drawdown matrix passes the dividend veto (2 > 1).
        let drawdown_matrix = build_growth_matrix(&DRAWDOWN, &DIVIDENDS, &WEIGHTS, &factors);
        assert_eq!(drawdown_matrix.get(0, 2), (4.0 - 3.0) * 0.5);
    }

    #[test]
    fn test_matrix_accessors() {
        let matrix = build_growth_matrix(&DIVIDENDS, &DRAWDOWN, &WEIGHTS, &UNIT);
        assert_eq!(matrix.side(), 5);
        assert_eq!(matrix.to_rows().len(), 5);
        assert_eq!(matrix.to_rows()[0][2], 1.0);
    }
}
