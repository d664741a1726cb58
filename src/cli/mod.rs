use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;
pub mod runner;

#[derive(Parser)]
#[command(name = "carteira")]
#[command(
    version,
    about = "Hierarchical investment rollup (class → subclass → asset)"
)]
#[command(
    long_about = "Aggregate flat investment positions into a class → subclass → asset tree with invested value, current value and profitability at every level."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to a TOML config file (default: $CARTEIRA_CONFIG or the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the class → subclass → asset rollup
    Rollup {
        #[command(flatten)]
        source: SourceArgs,

        /// Deepest level to show (class, subclass, asset)
        #[arg(short, long)]
        depth: Option<String>,

        /// Hide nodes whose invested and current values are both zero
        #[arg(long)]
        hide_zero: bool,
    },

    /// Show portfolio totals and allocation per class
    Summary {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Positions file (.json, .csv, .txt, .db, .sqlite, .sqlite3)
    pub file: PathBuf,

    /// How to value positions without a current value (recorded, cost, simulated)
    #[arg(short, long)]
    pub valuation: Option<String>,

    /// Seed for the simulated valuation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum simulated markup in percent (default 30)
    #[arg(long)]
    pub max_markup: Option<String>,

    /// Table to read from SQLite sources (default investimentos)
    #[arg(long)]
    pub table: Option<String>,
}
