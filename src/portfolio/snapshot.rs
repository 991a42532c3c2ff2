//! Snapshot document loading
//!
//! A snapshot is one JSON document with three sections: the portfolio state
//! and the two metric collaborators' outputs. The whole document is read
//! once; the engine never goes back to disk.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::metrics::{DividendsInput, ReturnsInput};
use crate::portfolio::types::{InvalidPortfolioState, PositionBook, PositionRecord};

/// Portfolio section of the snapshot document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSection {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub cash: Decimal,
    pub positions: Vec<PositionRecord>,
}

/// Complete input snapshot: portfolio state plus both metric providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub portfolio: PortfolioSection,
    pub dividends: DividendsInput,
    pub returns: ReturnsInput,
}

impl Snapshot {
    /// Read and parse a snapshot document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot file {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse snapshot file {}", path.display()))?;
        info!(
            positions = snapshot.portfolio.positions.len(),
            date = ?snapshot.portfolio.date,
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Build the validated position book from the portfolio section.
    pub fn build_book(&self) -> Result<PositionBook, InvalidPortfolioState> {
        PositionBook::new(
            self.portfolio.date,
            &self.portfolio.positions,
            self.portfolio.cash,
        )
    }
}
