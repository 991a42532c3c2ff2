//! Settings: thresholds and trade-sizing constants
//!
//! Defaults match the reference configuration; every value can be overridden
//! by an optional YAML settings file, then by `PORTOPT_*` environment
//! variables, then by CLI flags (applied by the command layer last).

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::optimizer::policy::MetricSelection;

/// Two-sided ~95% confidence heuristic for the "needs optimization" verdict.
pub const DEFAULT_T_SCORE: f64 = 2.0;

/// Ceiling of one recommendation, as a fraction of total portfolio value.
pub const DEFAULT_MAX_TRADE: f64 = 0.006;

/// Number of tranches a recommended trade is split into.
pub const DEFAULT_TRADES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub t_score: f64,
    pub max_trade: f64,
    pub trades: u32,
    pub selection: MetricSelection,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            t_score: DEFAULT_T_SCORE,
            max_trade: DEFAULT_MAX_TRADE,
            trades: DEFAULT_TRADES,
            selection: MetricSelection::default(),
        }
    }
}

impl Settings {
    /// Load settings: defaults, then the YAML file (when present), then
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read settings file {}", path.display()))?;
                serde_yaml::from_str(&raw)
                    .with_context(|| format!("failed to parse settings file {}", path.display()))?
            }
            _ => Self::default(),
        };
        settings.apply_env()?;
        settings.validate()?;
        debug!(?settings, "Settings resolved");
        Ok(settings)
    }

    /// Apply CLI overrides (the last layer) and re-validate.
    pub fn override_with(
        mut self,
        t_score: Option<f64>,
        max_trade: Option<f64>,
        trades: Option<u32>,
        selection: Option<MetricSelection>,
    ) -> Result<Self> {
        if let Some(value) = t_score {
            self.t_score = value;
        }
        if let Some(value) = max_trade {
            self.max_trade = value;
        }
        if let Some(value) = trades {
            self.trades = value;
        }
        if let Some(value) = selection {
            self.selection = value;
        }
        self.validate()?;
        Ok(self)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("PORTOPT_T_SCORE") {
            self.t_score = value
                .parse()
                .map_err(|_| anyhow!("PORTOPT_T_SCORE is not a number: {value}"))?;
        }
        if let Ok(value) = std::env::var("PORTOPT_MAX_TRADE") {
            self.max_trade = value
                .parse()
                .map_err(|_| anyhow!("PORTOPT_MAX_TRADE is not a number: {value}"))?;
        }
        if let Ok(value) = std::env::var("PORTOPT_TRADES") {
            self.trades = value
                .parse()
                .map_err(|_| anyhow!("PORTOPT_TRADES is not an integer: {value}"))?;
        }
        if let Ok(value) = std::env::var("PORTOPT_SELECTION") {
            self.selection = MetricSelection::from_str(&value, true)
                .map_err(|_| anyhow!("PORTOPT_SELECTION is not a known policy: {value}"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !self.t_score.is_finite() || self.t_score <= 0.0 {
            return Err(anyhow!("t_score must be positive, got {}", self.t_score));
        }
        if !self.max_trade.is_finite() || self.max_trade <= 0.0 || self.max_trade >= 1.0 {
            return Err(anyhow!(
                "max_trade must be a fraction in (0, 1), got {}",
                self.max_trade
            ));
        }
        if self.trades == 0 {
            return Err(anyhow!("trades must be at least 1"));
        }
        Ok(())
    }
}
