//! Pareto command: per-position optimality table only

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;

use crate::cli::commands::EngineArgs;
use crate::data_paths::DataPaths;
use crate::optimizer::report;

#[derive(Args, Clone)]
pub struct ParetoArgs {
    #[command(flatten)]
    pub engine: EngineArgs,
}

pub struct ParetoCommand {
    args: ParetoArgs,
}

impl ParetoCommand {
    pub fn new(args: ParetoArgs) -> Self {
        Self { args }
    }

    pub fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let optimizer = self.args.engine.build_optimizer(&data_paths)?;
        println!("{}", "PARETO OPTIMALITY KEY METRICS".bright_yellow());
        println!("{}", report::pareto_table(&optimizer));
        Ok(())
    }
}
