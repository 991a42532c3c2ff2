//! Cashout command: cash-withdrawal suggestion for one snapshot

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::cli::commands::EngineArgs;
use crate::data_paths::DataPaths;

#[derive(Args, Clone)]
pub struct CashoutArgs {
    #[command(flatten)]
    pub engine: EngineArgs,
}

pub struct CashoutCommand {
    args: CashoutArgs,
}

impl CashoutCommand {
    pub fn new(args: CashoutArgs) -> Self {
        Self { args }
    }

    pub fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let optimizer = self.args.engine.build_optimizer(&data_paths)?;
        let advice = optimizer.cash_out();
        info!(?advice, "Cash-out advice computed");
        println!("{advice}");
        Ok(())
    }
}
