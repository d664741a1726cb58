//! Valuation strategies
//!
//! Resolve each position's current value before aggregation. The rollup
//! itself never invents current values; simulated values only come from
//! the explicitly selected [`SimulatedMarkup`] strategy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::CarteiraError;
use crate::positions::{Position, PositionRecord};

/// Default ceiling for simulated markups, in percent
pub const DEFAULT_MAX_MARKUP_PCT: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Supplies the current value of a record
pub trait ValueProvider {
    /// `index` is the 1-based position of the record in its source
    fn current_value(&mut self, index: usize, record: &PositionRecord) -> Result<Decimal, CarteiraError>;

    fn name(&self) -> &'static str;
}

/// Use the recorded current value; a missing one is an error
#[derive(Debug, Clone, Copy, Default)]
pub struct Recorded;

impl ValueProvider for Recorded {
    fn current_value(&mut self, index: usize, record: &PositionRecord) -> Result<Decimal, CarteiraError> {
        record
            .current_amount
            .ok_or_else(|| CarteiraError::MissingCurrentValue {
                index,
                asset: record.asset().to_string(),
            })
    }

    fn name(&self) -> &'static str {
        "recorded"
    }
}

/// Use the recorded current value, falling back to the invested amount
#[derive(Debug, Clone, Copy, Default)]
pub struct AtCost;

impl ValueProvider for AtCost {
    fn current_value(&mut self, _index: usize, record: &PositionRecord) -> Result<Decimal, CarteiraError> {
        Ok(record.current_amount.unwrap_or_else(|| record.invested()))
    }

    fn name(&self) -> &'static str {
        "cost"
    }
}

/// Demo valuation: records without a current value get
/// `invested * (1 + u * max_markup)` with `u` uniform in `[0, 1]`,
/// drawn in basis points from a seedable RNG. A product outside the
/// `Decimal` range falls back to the invested amount.
#[derive(Debug, Clone)]
pub struct SimulatedMarkup {
    rng: StdRng,
    max_markup_bps: i64,
}

impl SimulatedMarkup {
    pub fn new(max_markup_pct: Decimal, seed: Option<u64>) -> Self {
        let max_markup_bps = max_markup_pct
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|bps| bps.round().to_i64())
            .unwrap_or(0)
            .max(0);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, max_markup_bps }
    }
}

impl ValueProvider for SimulatedMarkup {
    fn current_value(&mut self, _index: usize, record: &PositionRecord) -> Result<Decimal, CarteiraError> {
        if let Some(current) = record.current_amount {
            return Ok(current);
        }
        let bps = self.rng.gen_range(0..=self.max_markup_bps);
        let markup = Decimal::new(bps, 4);
        let invested = record.invested();
        match Decimal::ONE
            .checked_add(markup)
            .and_then(|factor| invested.checked_mul(factor))
        {
            Some(current) => Ok(current),
            None => {
                warn!(
                    "Simulated value of {} overflows, using the invested amount",
                    record.asset()
                );
                Ok(invested)
            }
        }
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

/// Which valuation strategy to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuationMode {
    #[default]
    Recorded,
    Cost,
    Simulated,
}

impl ValuationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValuationMode::Recorded => "recorded",
            ValuationMode::Cost => "cost",
            ValuationMode::Simulated => "simulated",
        }
    }
}

impl FromStr for ValuationMode {
    type Err = CarteiraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recorded" | "atual" => Ok(ValuationMode::Recorded),
            "cost" | "custo" => Ok(ValuationMode::Cost),
            "simulated" | "simulado" => Ok(ValuationMode::Simulated),
            other => Err(CarteiraError::ConfigError(format!(
                "unknown valuation mode {:?} (expected recorded, cost or simulated)",
                other
            ))),
        }
    }
}

/// Build the provider for `mode`
pub fn provider_for(mode: ValuationMode, max_markup_pct: Decimal, seed: Option<u64>) -> Box<dyn ValueProvider> {
    match mode {
        ValuationMode::Recorded => Box::new(Recorded),
        ValuationMode::Cost => Box::new(AtCost),
        ValuationMode::Simulated => Box::new(SimulatedMarkup::new(max_markup_pct, seed)),
    }
}

/// Resolve every record into a [`Position`] in input order
pub fn resolve_positions(
    records: &[PositionRecord],
    provider: &mut dyn ValueProvider,
) -> Result<Vec<Position>, CarteiraError> {
    info!(
        "Valuing {} positions with the {} strategy",
        records.len(),
        provider.name()
    );

    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let current = provider.current_value(idx + 1, record)?;
            if record.current_amount.is_none() {
                debug!("{}: current value resolved to {}", record.asset(), current);
            }
            Ok(record.resolve(current))
        })
        .collect()
}
