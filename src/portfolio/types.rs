//! Position book with strong typing
//!
//! The book is an ordered collection of tradable positions followed by two
//! sentinel pseudo-positions, `CASH` and `PORTFOLIO`, pinned to the last two
//! index slots. Every per-position vector and matrix in the optimizer is
//! aligned to this ordering, which makes tie-breaks and sentinel exclusion
//! reproducible.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved ticker for the cash sentinel slot.
pub const CASH: &str = "CASH";

/// Reserved ticker for the portfolio-total sentinel slot.
pub const PORTFOLIO: &str = "PORTFOLIO";

/// Number of sentinel slots appended after the tradable positions.
pub const SENTINELS: usize = 2;

#[derive(Error, Debug)]
pub enum InvalidPortfolioState {
    #[error("ticker '{0}' is reserved for a sentinel slot")]
    ReservedTicker(String),
    #[error("duplicate position ticker '{0}'")]
    DuplicateTicker(String),
    #[error("position {ticker} has non-positive price {price}")]
    NonPositivePrice { ticker: String, price: Decimal },
    #[error("position {ticker} has zero lot size")]
    ZeroLotSize { ticker: String },
    #[error("position {ticker} has volume factor {factor} outside (0, 1]")]
    VolumeFactorOutOfRange { ticker: String, factor: f64 },
    #[error("cash value {0} is negative")]
    NegativeCash(Decimal),
    #[error("total portfolio value {0} is not positive")]
    NonPositiveTotalValue(Decimal),
    #[error("no {metric} gradient for held position {ticker}")]
    MissingGradient { metric: &'static str, ticker: String },
    #[error("non-finite {metric} value for {ticker}")]
    NonFiniteValue { metric: &'static str, ticker: String },
    #[error("{metric} standard deviation {value} is not positive")]
    NonPositiveStd { metric: &'static str, value: f64 },
}

/// A single tradable position as supplied by the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub ticker: String,
    pub shares: u64,
    pub price: Decimal,
    pub lot_size: u32,
    /// Liquidity discount in (0, 1], 1 = fully liquid. Supplied by the
    /// market-data collaborator and consumed opaquely.
    pub volume_factor: f64,
}

/// Immutable, validated position book for one snapshot.
///
/// All vectors have length `tradable() + SENTINELS`; index `cash_index()`
/// holds CASH and `portfolio_index()` holds PORTFOLIO.
#[derive(Debug, Clone)]
pub struct PositionBook {
    date: Option<NaiveDate>,
    tickers: Vec<String>,
    prices: Vec<Decimal>,
    lot_sizes: Vec<u32>,
    values: Vec<Decimal>,
    weights: Vec<f64>,
    volume_factors: Vec<f64>,
}

impl PositionBook {
    /// Build a validated book from snapshot records and a cash balance.
    ///
    /// Fails fast on anything that would make downstream numbers silently
    /// wrong: reserved or duplicate tickers, non-positive prices, zero lot
    /// sizes, volume factors outside (0, 1], negative cash, or a
    /// non-positive total value. Zero-share positions are valid; their
    /// matrix rows are zeroed by the builder.
    pub fn new(
        date: Option<NaiveDate>,
        positions: &[PositionRecord],
        cash: Decimal,
    ) -> Result<Self, InvalidPortfolioState> {
        if cash < Decimal::ZERO {
            return Err(InvalidPortfolioState::NegativeCash(cash));
        }

        let tradable = positions.len();
        let side = tradable + SENTINELS;
        let mut tickers = Vec::with_capacity(side);
        let mut prices = Vec::with_capacity(side);
        let mut lot_sizes = Vec::with_capacity(side);
        let mut values = Vec::with_capacity(side);
        let mut volume_factors = Vec::with_capacity(side);

        let mut total = cash;
        for record in positions {
            if record.ticker == CASH || record.ticker == PORTFOLIO {
                return Err(InvalidPortfolioState::ReservedTicker(record.ticker.clone()));
            }
            if tickers.iter().any(|t| t == &record.ticker) {
                return Err(InvalidPortfolioState::DuplicateTicker(record.ticker.clone()));
            }
            if record.price <= Decimal::ZERO {
                return Err(InvalidPortfolioState::NonPositivePrice {
                    ticker: record.ticker.clone(),
                    price: record.price,
                });
            }
            if record.lot_size == 0 {
                return Err(InvalidPortfolioState::ZeroLotSize {
                    ticker: record.ticker.clone(),
                });
            }
            if !record.volume_factor.is_finite()
                || record.volume_factor <= 0.0
                || record.volume_factor > 1.0
            {
                return Err(InvalidPortfolioState::VolumeFactorOutOfRange {
                    ticker: record.ticker.clone(),
                    factor: record.volume_factor,
                });
            }

            let value = record.price * Decimal::from(record.shares);
            total += value;

            tickers.push(record.ticker.clone());
            prices.push(record.price);
            lot_sizes.push(record.lot_size);
            values.push(value);
            volume_factors.push(record.volume_factor);
        }

        if total <= Decimal::ZERO {
            return Err(InvalidPortfolioState::NonPositiveTotalValue(total));
        }

        // Sentinel slots: CASH then PORTFOLIO, always last. Their price and
        // lot size are never read; the padding keeps all vectors square.
        tickers.push(CASH.to_string());
        tickers.push(PORTFOLIO.to_string());
        prices.push(Decimal::ONE);
        prices.push(Decimal::ONE);
        lot_sizes.push(1);
        lot_sizes.push(1);
        values.push(cash);
        values.push(total);
        volume_factors.push(1.0);
        volume_factors.push(1.0);

        let weights = values
            .iter()
            .map(|value| (value / total).to_f64().unwrap_or(0.0))
            .collect();

        Ok(Self {
            date,
            tickers,
            prices,
            lot_sizes,
            values,
            weights,
            volume_factors,
        })
    }

    /// Snapshot date, if the snapshot carried one.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Number of tradable positions (sentinels excluded).
    pub fn tradable(&self) -> usize {
        self.tickers.len() - SENTINELS
    }

    /// Total number of slots including the two sentinels.
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tradable() == 0
    }

    /// Index of the CASH sentinel slot.
    pub fn cash_index(&self) -> usize {
        self.tickers.len() - 2
    }

    /// Index of the PORTFOLIO sentinel slot.
    pub fn portfolio_index(&self) -> usize {
        self.tickers.len() - 1
    }

    pub fn is_sentinel(&self, index: usize) -> bool {
        index >= self.tradable()
    }

    pub fn ticker(&self, index: usize) -> &str {
        &self.tickers[index]
    }

    pub fn index_of(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    pub fn price(&self, index: usize) -> Decimal {
        self.prices[index]
    }

    pub fn lot_size(&self, index: usize) -> u32 {
        self.lot_sizes[index]
    }

    pub fn value(&self, index: usize) -> Decimal {
        self.values[index]
    }

    pub fn cash_value(&self) -> Decimal {
        self.values[self.cash_index()]
    }

    pub fn total_value(&self) -> Decimal {
        self.values[self.portfolio_index()]
    }

    /// Portfolio weights including sentinels; `weight[CASH]` is the cash
    /// fraction and `weight[PORTFOLIO]` is 1.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn weight(&self, index: usize) -> f64 {
        self.weights[index]
    }

    pub fn cash_weight(&self) -> f64 {
        self.weights[self.cash_index()]
    }

    /// Liquidity discounts including sentinels (sentinel slots are 1).
    pub fn volume_factors(&self) -> &[f64] {
        &self.volume_factors
    }

    /// Value of one tradable lot of the given position, as f64 for sizing
    /// arithmetic.
    pub fn lot_value(&self, index: usize) -> f64 {
        (self.prices[index] * Decimal::from(self.lot_sizes[index]))
            .to_f64()
            .unwrap_or(0.0)
    }

    pub fn total_value_f64(&self) -> f64 {
        self.total_value().to_f64().unwrap_or(0.0)
    }

    pub fn cash_value_f64(&self) -> f64 {
        self.cash_value().to_f64().unwrap_or(0.0)
    }
}
