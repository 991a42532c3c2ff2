//! CLI command implementations

pub mod advise;
pub mod cashout;
pub mod pareto;
pub mod version;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::Settings;
use crate::data_paths::DataPaths;
use crate::optimizer::{MetricSelection, Optimizer};
use crate::portfolio::Snapshot;

/// Arguments shared by every command that runs the engine.
#[derive(Args, Clone)]
pub struct EngineArgs {
    /// Path to the snapshot JSON document (portfolio + metrics)
    pub snapshot: PathBuf,

    /// Settings file (default: <data-dir>/settings.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the confidence threshold for the verdict
    #[arg(long)]
    pub t_score: Option<f64>,

    /// Override the per-recommendation trade ceiling (fraction of value)
    #[arg(long)]
    pub max_trade: Option<f64>,

    /// Override the tranche count per recommended trade
    #[arg(long)]
    pub trades: Option<u32>,

    /// Override the metric-selection policy
    #[arg(long, value_enum)]
    pub selection: Option<MetricSelection>,
}

impl EngineArgs {
    /// Resolve settings and build the engine for the given snapshot.
    pub fn build_optimizer(&self, data_paths: &DataPaths) -> Result<Optimizer> {
        let settings_path = self
            .config
            .clone()
            .unwrap_or_else(|| data_paths.settings_file());
        let settings = Settings::load(Some(&settings_path))?.override_with(
            self.t_score,
            self.max_trade,
            self.trades,
            self.selection,
        )?;

        let snapshot = Snapshot::load(&self.snapshot)?;
        let optimizer = Optimizer::from_snapshot(&snapshot, settings)?;
        Ok(optimizer)
    }
}
