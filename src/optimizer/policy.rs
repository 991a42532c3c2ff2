//! Metric-selection policy
//!
//! Chooses which growth matrix drives the trade recommendation. The
//! reference behavior always selects the drawdown-oriented matrix;
//! `LargerT` picks whichever t-statistic is larger and exists as an explicit
//! opt-in (see DESIGN.md).

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One of the two optimization axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Dividends,
    Drawdown,
}

/// Injectable policy deciding which metric drives the recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MetricSelection {
    /// Always drive by the drawdown matrix (reference behavior).
    #[default]
    AlwaysDrawdown,
    /// Always drive by the dividends matrix.
    AlwaysDividends,
    /// Drive by whichever t-statistic is larger.
    LargerT,
}

impl MetricSelection {
    pub fn select(&self, t_dividends: f64, t_drawdown: f64) -> Metric {
        match self {
            MetricSelection::AlwaysDrawdown => Metric::Drawdown,
            MetricSelection::AlwaysDividends => Metric::Dividends,
            MetricSelection::LargerT => {
                if t_dividends > t_drawdown {
                    Metric::Dividends
                } else {
                    Metric::Drawdown
                }
            }
        }
    }
}
