//! Advise command: full advisory output for one snapshot

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::cli::commands::EngineArgs;
use crate::data_paths::DataPaths;
use crate::optimizer::{CashOutAdvice, Metric, Optimizer, TradeRecommendation};

#[derive(Args, Clone)]
pub struct AdviseArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Emit the machine-readable JSON document instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Include both growth matrices in the JSON document
    #[arg(long, requires = "json")]
    pub matrices: bool,
}

pub struct AdviseCommand {
    args: AdviseArgs,
}

/// Growth matrix with its ticker ordering, for JSON output.
#[derive(Serialize)]
struct MatrixDocument {
    tickers: Vec<String>,
    rows: Vec<Vec<f64>>,
}

/// The machine-readable counterpart of the text report.
#[derive(Serialize)]
struct AdviceDocument {
    t_dividends_growth: f64,
    t_drawdown_growth: f64,
    needs_optimization: bool,
    selected_metric: Metric,
    dominated: BTreeMap<String, Option<String>>,
    dividends_gradient_growth: BTreeMap<String, f64>,
    drawdown_gradient_growth: BTreeMap<String, f64>,
    recommendation: TradeRecommendation,
    cash_out: CashOutAdvice,
    #[serde(skip_serializing_if = "Option::is_none")]
    dividends_growth_matrix: Option<MatrixDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    drawdown_growth_matrix: Option<MatrixDocument>,
}

impl AdviceDocument {
    fn new(optimizer: &Optimizer, with_matrices: bool) -> Self {
        let book = optimizer.book();
        let tickers: Vec<String> = (0..book.len())
            .map(|index| book.ticker(index).to_string())
            .collect();

        let by_ticker = |values: Vec<f64>| -> BTreeMap<String, f64> {
            tickers.iter().cloned().zip(values).collect()
        };

        let dominated = tickers
            .iter()
            .cloned()
            .zip(optimizer.dominated_tickers())
            .collect();

        let matrix_document = |matrix: &crate::optimizer::GrowthMatrix| MatrixDocument {
            tickers: tickers.clone(),
            rows: matrix.to_rows(),
        };

        Self {
            t_dividends_growth: optimizer.t_dividends_growth(),
            t_drawdown_growth: optimizer.t_drawdown_growth(),
            needs_optimization: optimizer.needs_optimization(),
            selected_metric: optimizer.selected_metric(),
            dominated,
            dividends_gradient_growth: by_ticker(optimizer.dividends_gradient_growth()),
            drawdown_gradient_growth: by_ticker(optimizer.drawdown_gradient_growth()),
            recommendation: optimizer.recommend_trade(),
            cash_out: optimizer.cash_out(),
            dividends_growth_matrix: with_matrices
                .then(|| matrix_document(optimizer.dividends_growth_matrix())),
            drawdown_growth_matrix: with_matrices
                .then(|| matrix_document(optimizer.drawdown_growth_matrix())),
        }
    }
}

impl AdviseCommand {
    pub fn new(args: AdviseArgs) -> Self {
        Self { args }
    }

    pub fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let optimizer = self.args.engine.build_optimizer(&data_paths)?;
        info!(
            positions = optimizer.book().tradable(),
            needs_optimization = optimizer.needs_optimization(),
            "Advice computed"
        );

        if self.args.json {
            let document = AdviceDocument::new(&optimizer, self.args.matrices);
            println!("{}", serde_json::to_string_pretty(&document)?);
        } else {
            println!("{}", optimizer.report());
        }
        Ok(())
    }
}
