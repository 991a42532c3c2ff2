//! Dominance resolution
//!
//! A candidate buy dominates a held position when its recorded growth is the
//! row maximum and strictly positive. Ties break to the first occurrence in
//! the book ordering; the underlying heuristic defines no preference among
//! equal-growth alternatives, so the tie-break is deterministic but not
//! meaningful. Sentinel rows never resolve and sentinel columns are never
//! candidates.

use crate::optimizer::matrix::GrowthMatrix;

/// Best dominating alternative for one row, or `None` when the row has no
/// strictly positive cell among tradable columns.
pub fn best_dominator(matrix: &GrowthMatrix, tradable: usize, row: usize) -> Option<usize> {
    if row >= tradable {
        return None;
    }
    let mut best = 0.0;
    let mut dominator = None;
    for col in 0..tradable {
        let cell = matrix.get(row, col);
        if cell > best {
            best = cell;
            dominator = Some(col);
        }
    }
    dominator
}

/// Dominator (or `None`) for every row of the matrix, sentinels included.
pub fn dominated(matrix: &GrowthMatrix, tradable: usize) -> Vec<Option<usize>> {
    (0..matrix.side())
        .map(|row| best_dominator(matrix, tradable, row))
        .collect()
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
    fn test_reference_scenario_dominator() {
        let matrix = build_growth_matrix(&DIVIDENDS, &DRAWDOWN, &WEIGHTS, &UNIT);
        // Row A keeps only column C with growth 1.
        assert_eq!(best_dominator(&matrix, 3, 0), Some(2));
    }

    #[test]
    fn test_sentinels_never_resolve() {
        let matrix = build_growth_matrix(&DIVIDENDS, &DRAWDOWN, &WEIGHTS, &UNIT);
        let map = dominated(&matrix, 3);
        assert_eq!(map.len(), 5);
        assert_eq!(map[3], None, "CASH must not be dominated");
        assert_eq!(map[4], None, "PORTFOLIO must not be dominated");
    }

    #[test]
    fn test_non_positive_row_resolves_to_none() {
        // B has the highest dividend gradient; nothing dominates it.
        let matrix = build_growth_matrix(&DIVIDENDS, &DRAWDOWN, &WEIGHTS, &UNIT);
        assert_eq!(best_dominator(&matrix, 3, 1), None);
    }

    #[test]
    fn test_tie_breaks_to_first_occurrence() {
        // Two equal candidates: both columns improve by the same amount.
        let primary = [0.0, 2.0, 2.0, 0.0, 0.0];
        let secondary = [0.0, 1.0, 1.0, 0.0, 0.0];
        let matrix = build_growth_matrix(&primary, &secondary, &WEIGHTS, &UNIT);
        assert_eq!(matrix.get(0, 1), matrix.get(0, 2));
        assert_eq!(best_dominator(&matrix, 3, 0), Some(1));
    }

    #[test]
    fn test_sentinel_columns_are_never_candidates() {
        // Make a sentinel column look attractive; it must still be ignored.
        let primary = [0.0, 0.0, 0.0, 10.0, 10.0];
        let secondary = [0.0, 0.0, 0.0, 10.0, 10.0];
        let matrix = build_growth_matrix(&primary, &secondary, &WEIGHTS, &UNIT);
        assert!(matrix.get(0, 3) > 0.0);
        assert_eq!(best_dominator(&matrix, 3, 0), None);
    }
}
