//! Configuration file support
//!
//! Settings live in a TOML file at `$CARTEIRA_CONFIG` or
//! `<config_home>/carteira/config.toml`. Every key is optional; command-line
//! flags take precedence over the file.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::CarteiraError;
use crate::positions::{SourceOptions, DEFAULT_SQLITE_TABLE};
use crate::rollup::Level;
use crate::valuation::{ValuationMode, DEFAULT_MAX_MARKUP_PCT};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "CARTEIRA_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub valuation: ValuationConfig,
    pub display: DisplayConfig,
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValuationConfig {
    pub mode: ValuationMode,
    pub max_markup_pct: Decimal,
    pub seed: Option<u64>,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            mode: ValuationMode::default(),
            max_markup_pct: DEFAULT_MAX_MARKUP_PCT,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub hide_zero: bool,
    pub depth: Level,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesConfig {
    pub sqlite_table: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            sqlite_table: DEFAULT_SQLITE_TABLE.to_string(),
        }
    }
}

impl SourcesConfig {
    pub fn to_options(&self) -> SourceOptions {
        SourceOptions {
            sqlite_table: self.sqlite_table.clone(),
        }
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dir_spec::config_home().map(|dir| dir.join("carteira").join("config.toml"))
}

/// Load the config from `explicit` or the default location.
///
/// A missing default file yields defaults; a missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                debug!("No config file found, using defaults");
                return Ok(Config::default());
            }
        },
    };

    info!("Loading config from {:?}", path);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    let config = parse_config(&text).with_context(|| format!("Invalid config file {:?}", path))?;
    Ok(config)
}

/// Parse config TOML text
pub fn parse_config(text: &str) -> Result<Config, CarteiraError> {
    toml::from_str(text).map_err(|e| CarteiraError::ConfigError(e.to_string()))
}
