//! Internal command representation
//!
//! The clap layer parses flags; `cli::runner` merges them with the config
//! file into these fully-resolved requests, which the dispatcher executes.

use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::positions::SourceOptions;
use crate::rollup::Level;
use crate::valuation::ValuationMode;

/// Where positions come from and how they are valued
#[derive(Debug, Clone)]
pub struct SourceRequest {
    pub path: PathBuf,
    pub options: SourceOptions,
    pub valuation: ValuationMode,
    pub max_markup_pct: Decimal,
    pub seed: Option<u64>,
}

/// Presentation-only filters applied after aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub depth: Level,
    pub hide_zero: bool,
}

#[derive(Debug, Clone)]
pub enum Command {
    Rollup {
        source: SourceRequest,
        display: DisplayOptions,
    },
    Summary {
        source: SourceRequest,
    },
}
