//! Error handling for carteira
//!
//! Defines the library error type and the unified Result alias used by the
//! application layer (anyhow for context chaining).

use thiserror::Error;

/// Core error types for loading and valuing positions
#[derive(Error, Debug)]
pub enum CarteiraError {
    #[error("source error: {0}")]
    SourceError(String),

    #[error("unsupported source format: {0} (supported: .json, .csv, .txt, .db, .sqlite, .sqlite3)")]
    UnsupportedFormat(String),

    #[error("record {index} ({asset}) has no current value; use --valuation cost or simulated")]
    MissingCurrentValue { index: usize, asset: String },

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application operations
pub type Result<T> = anyhow::Result<T>;
