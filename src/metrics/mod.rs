//! Input-side models for the external metric collaborators
//!
//! The dividend forecaster and the returns/drawdown estimator live outside
//! this crate; their outputs arrive in the snapshot as per-ticker gradient
//! maps plus a handful of portfolio-level scalars. This module aligns those
//! maps into dense vectors ordered exactly like the position book, failing
//! fast on missing or non-finite entries instead of producing silently wrong
//! numbers downstream.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::portfolio::{InvalidPortfolioState, PositionBook, CASH, PORTFOLIO};

/// Dividend metrics as emitted by the forecaster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendsInput {
    /// Marginal dividend utility per position. Must cover every tradable
    /// ticker; CASH/PORTFOLIO entries are optional and default to 0.
    pub gradient: HashMap<String, f64>,
    /// Portfolio-level standard deviation of the dividend estimate.
    pub std: f64,
    pub expected_dividends: f64,
    pub minimal_dividends: f64,
}

/// Returns/drawdown metrics as emitted by the historical estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnsInput {
    /// Marginal drawdown/return utility per position.
    pub gradient: HashMap<String, f64>,
    /// Expected maximum drawdown of the whole portfolio.
    pub draw_down: f64,
    /// Standard deviation at the drawdown horizon.
    pub std_at_draw_down: f64,
}

/// Dividend metrics aligned to a position book.
#[derive(Debug, Clone)]
pub struct DividendsMetrics {
    pub gradient: Vec<f64>,
    pub std: f64,
    pub expected_dividends: f64,
    pub minimal_dividends: f64,
}

/// Returns metrics aligned to a position book.
#[derive(Debug, Clone)]
pub struct ReturnsMetrics {
    pub gradient: Vec<f64>,
    pub draw_down: f64,
    pub std_at_draw_down: f64,
}

/// Build a dense gradient vector in book order.
///
/// Tradable tickers must be present and finite. The sentinel slots take the
/// provider's CASH/PORTFOLIO entries when given, 0 otherwise (gradients are
/// relative, so an absent sentinel row means "no marginal utility").
fn align_gradient(
    book: &PositionBook,
    gradient: &HashMap<String, f64>,
    metric: &'static str,
) -> Result<Vec<f64>, InvalidPortfolioState> {
    let mut dense = Vec::with_capacity(book.len());
    for index in 0..book.tradable() {
        let ticker = book.ticker(index);
        let value = gradient
            .get(ticker)
            .copied()
            .ok_or_else(|| InvalidPortfolioState::MissingGradient {
                metric,
                ticker: ticker.to_string(),
            })?;
        if !value.is_finite() {
            return Err(InvalidPortfolioState::NonFiniteValue {
                metric,
                ticker: ticker.to_string(),
            });
        }
        dense.push(value);
    }
    for sentinel in [CASH, PORTFOLIO] {
        let value = gradient.get(sentinel).copied().unwrap_or(0.0);
        if !value.is_finite() {
            return Err(InvalidPortfolioState::NonFiniteValue {
                metric,
                ticker: sentinel.to_string(),
            });
        }
        dense.push(value);
    }
    Ok(dense)
}

fn check_std(metric: &'static str, value: f64) -> Result<f64, InvalidPortfolioState> {
    if !value.is_finite() || value <= 0.0 {
        return Err(InvalidPortfolioState::NonPositiveStd { metric, value });
    }
    Ok(value)
}

impl DividendsMetrics {
    pub fn align(book: &PositionBook, input: &DividendsInput) -> Result<Self, InvalidPortfolioState> {
        Ok(Self {
            gradient: align_gradient(book, &input.gradient, "dividends")?,
            std: check_std("dividends", input.std)?,
            expected_dividends: input.expected_dividends,
            minimal_dividends: input.minimal_dividends,
        })
    }
}

impl ReturnsMetrics {
    pub fn align(book: &PositionBook, input: &ReturnsInput) -> Result<Self, InvalidPortfolioState> {
        Ok(Self {
            gradient: align_gradient(book, &input.gradient, "returns")?,
            draw_down: input.draw_down,
            std_at_draw_down: check_std("returns", input.std_at_draw_down)?,
        })
    }
}
