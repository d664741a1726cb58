//! Carteira - hierarchical investment rollup
//!
//! Loads flat investment positions (JSON, CSV or SQLite), resolves their
//! current values through an explicit valuation strategy, and aggregates
//! them into an ordered class → subclass → asset tree with invested value,
//! current value and profitability at every level.

pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod positions;
pub mod rollup;
pub mod utils;
pub mod valuation;
