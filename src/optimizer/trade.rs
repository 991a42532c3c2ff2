//! Trade recommendation and cash-withdrawal advice
//!
//! Turns the chosen dominance relation into a concrete, lot-quantized
//! sell/buy instruction pair. Trade size is capped by the position's own
//! weight and by the `max_trade` ceiling net of cash already held, then
//! split into equal tranches of at least one lot each.

use std::fmt;

use serde::Serialize;

use crate::config::Settings;
use crate::optimizer::dominance::best_dominator;
use crate::optimizer::matrix::GrowthMatrix;
use crate::portfolio::PositionBook;

/// One side of a recommendation: a ticker traded in `tranches` equal slices
/// of `lots_per_tranche` lots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeLeg {
    pub ticker: String,
    pub tranches: u32,
    pub lots_per_tranche: u64,
}

impl fmt::Display for TradeLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} trades of {} lots",
            self.ticker, self.tranches, self.lots_per_tranche
        )
    }
}

/// The single best next rebalancing trade, or an explicit no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TradeRecommendation {
    Trade { sell: TradeLeg, buy: TradeLeg },
    NoTradeNeeded,
}

impl fmt::Display for TradeRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeRecommendation::Trade { sell, buy } => {
                write!(f, "Sell {sell}\nBuy {buy}")
            }
            TradeRecommendation::NoTradeNeeded => write!(f, "No trade needed"),
        }
    }
}

/// Independent cash-withdrawal suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CashOutAdvice {
    Sell { sell: TradeLeg },
    CashSufficient,
    NoCandidate,
}

impl fmt::Display for CashOutAdvice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashOutAdvice::Sell { sell } => write!(f, "To withdraw cash sell {sell}"),
            CashOutAdvice::CashSufficient => {
                write!(f, "Cash on hand is sufficient, no withdrawal sale needed")
            }
            CashOutAdvice::NoCandidate => {
                write!(f, "No dominated position available to sell")
            }
        }
    }
}

/// Build the trade recommendation from the selected matrix and its growth
/// vector.
///
/// The sell side shrinks the best-growth position toward zero, capped at
/// `max_trade` net of cash already held; lots per tranche round half-up.
/// The buy side spends available cash up to the same ceiling; lots per
/// tranche round down. Both sides are floored at one lot per tranche.
pub fn recommend_trade(
    book: &PositionBook,
    growth: &[f64],
    matrix: &GrowthMatrix,
    settings: &Settings,
) -> TradeRecommendation {
    let tradable = book.tradable();

    let mut best = 0.0;
    let mut best_sell = None;
    for position in 0..tradable {
        if growth[position] > best {
            best = growth[position];
            best_sell = Some(position);
        }
    }
    let Some(sell_index) = best_sell else {
        return TradeRecommendation::NoTradeNeeded;
    };
    let Some(buy_index) = best_dominator(matrix, tradable, sell_index) else {
        return TradeRecommendation::NoTradeNeeded;
    };

    let total_value = book.total_value_f64();
    let tranches = f64::from(settings.trades);

    let sell_weight = book
        .weight(sell_index)
        .min(settings.max_trade - book.cash_weight())
        .max(0.0);
    let sell_value = sell_weight * total_value;
    let sell_lots = (sell_value / book.lot_value(sell_index) / tranches).round() as u64;

    let buy_value = book.cash_value_f64().min(settings.max_trade * total_value);
    let buy_lots = (buy_value / book.lot_value(buy_index) / tranches).floor() as u64;

    TradeRecommendation::Trade {
        sell: TradeLeg {
            ticker: book.ticker(sell_index).to_string(),
            tranches: settings.trades,
            lots_per_tranche: sell_lots.max(1),
        },
        buy: TradeLeg {
            ticker: book.ticker(buy_index).to_string(),
            tranches: settings.trades,
            lots_per_tranche: buy_lots.max(1),
        },
    }
}

/// Pick the dominated position with the lowest dividend gradient and size a
/// sale that frees up to `max_trade` of cash.
///
/// `dominated` must be the mapping under the dividends-oriented matrix.
pub fn cash_out_advice(
    book: &PositionBook,
    dividend_gradient: &[f64],
    dominated: &[Option<usize>],
    settings: &Settings,
) -> CashOutAdvice {
    let tradable = book.tradable();
    let mut candidates: Vec<usize> = (0..tradable)
        .filter(|&position| dominated[position].is_some())
        .collect();
    if candidates.is_empty() {
        return CashOutAdvice::NoCandidate;
    }
    // Rank by dividend gradient descending; the stable sort keeps the book
    // order among ties, and the last entry is the weakest dividend payer.
    candidates.sort_by(|&a, &b| dividend_gradient[b].total_cmp(&dividend_gradient[a]));
    let Some(&chosen) = candidates.last() else {
        return CashOutAdvice::NoCandidate;
    };

    let weight_to_sell = book
        .weight(chosen)
        .min(settings.max_trade - book.cash_weight());
    if weight_to_sell < 0.0 {
        return CashOutAdvice::CashSufficient;
    }

    let sell_value = weight_to_sell * book.total_value_f64();
    let tranches = f64::from(settings.trades);
    let lots = (sell_value / tranches / book.lot_value(chosen)).floor() as u64 + 1;

    CashOutAdvice::Sell {
        sell: TradeLeg {
            ticker: book.ticker(chosen).to_string(),
            tranches: settings.trades,
            lots_per_tranche: lots,
        },
    }
}
