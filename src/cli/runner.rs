use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

use crate::cli::{Commands, SourceArgs};
use crate::commands::{Command, DisplayOptions, SourceRequest};
use crate::config::Config;
use crate::positions::amount::parse_amount;
use crate::rollup::Level;
use crate::valuation::ValuationMode;

/// Convert clap `Commands` into the internal `Command`, filling unset flags
/// from the config file. Returns Err on invalid flag values.
pub fn to_internal_command(c: &Commands, config: &Config) -> Result<Command> {
    match c {
        Commands::Rollup {
            source,
            depth,
            hide_zero,
        } => {
            let depth = match depth.as_deref() {
                Some(d) => d
                    .parse::<Level>()
                    .map_err(|_| anyhow!("Invalid depth: {} (expected class, subclass or asset)", d))?,
                None => config.display.depth,
            };
            Ok(Command::Rollup {
                source: source_request(source, config)?,
                display: DisplayOptions {
                    depth,
                    hide_zero: *hide_zero || config.display.hide_zero,
                },
            })
        }
        Commands::Summary { source } => Ok(Command::Summary {
            source: source_request(source, config)?,
        }),
    }
}

fn source_request(args: &SourceArgs, config: &Config) -> Result<SourceRequest> {
    let valuation = match args.valuation.as_deref() {
        Some(v) => v.parse::<ValuationMode>()?,
        None => config.valuation.mode,
    };

    let max_markup_pct = match args.max_markup.as_deref() {
        Some(m) => parse_markup(m)?,
        None => config.valuation.max_markup_pct,
    };

    let mut options = config.sources.to_options();
    if let Some(table) = &args.table {
        options.sqlite_table = table.clone();
    }

    Ok(SourceRequest {
        path: args.file.clone(),
        options,
        valuation,
        max_markup_pct,
        seed: args.seed.or(config.valuation.seed),
    })
}

fn parse_markup(raw: &str) -> Result<Decimal> {
    let value = parse_amount(raw.trim_end_matches('%'))
        .ok_or_else(|| anyhow!("Invalid markup: {}", raw))?;
    if value < Decimal::ZERO {
        return Err(anyhow!("Markup cannot be negative: {}", raw));
    }
    Ok(value)
}
