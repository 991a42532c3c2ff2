//! CLI module for portopt
//!
//! Command-line interface for the Pareto rebalancing advisor. Uses clap for
//! argument parsing and a structured command pattern: each subcommand is an
//! `XArgs` struct paired with an `XCommand` that executes it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use crate::data_paths::{DataPaths, DEFAULT_DATA_DIR};
use crate::logging::{init_logging, LogMode, LoggingConfig};

use commands::advise::{AdviseArgs, AdviseCommand};
use commands::cashout::{CashoutArgs, CashoutCommand};
use commands::pareto::{ParetoArgs, ParetoCommand};
use commands::version::{VersionArgs, VersionCommand};

#[derive(Parser)]
#[command(name = "portopt")]
#[command(version)]
#[command(about = "Pareto-dominance portfolio rebalancing advisor", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory path (default: ./data)
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full advisory report (or machine-readable JSON) for a snapshot
    Advise(AdviseArgs),

    /// Per-position Pareto optimality table
    Pareto(ParetoArgs),

    /// Cash-withdrawal suggestion
    Cashout(CashoutArgs),

    /// Show version information
    Version(VersionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let data_paths = DataPaths::new(&self.data_dir);
        data_paths.ensure_directories()?;

        if self.verbose > 0 && std::env::var("RUST_LOG").is_err() {
            std::env::set_var("RUST_LOG", "debug");
        }

        // JSON output keeps stdout clean for piping; everything else logs to
        // the console as well.
        let mode = match &self.command {
            Commands::Advise(args) if args.json => LogMode::FileOnly,
            _ => LogMode::ConsoleAndFile,
        };
        init_logging(LoggingConfig::new(mode, data_paths.clone()))?;

        match self.command {
            Commands::Advise(args) => AdviseCommand::new(args).execute(data_paths),
            Commands::Pareto(args) => ParetoCommand::new(args).execute(data_paths),
            Commands::Cashout(args) => CashoutCommand::new(args).execute(data_paths),
            Commands::Version(args) => VersionCommand::new(args).execute(data_paths),
        }
    }
}
