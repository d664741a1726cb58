use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info, warn};

use super::amount::coerce_json_amount;
use super::{Field, PositionRecord};
use crate::error::CarteiraError;

/// Parse a JSON positions file.
///
/// Accepts a top-level array of objects, or an object wrapping the array
/// under `investimentos` or `positions`.
pub fn parse_positions_json<P: AsRef<Path>>(file_path: P) -> Result<Vec<PositionRecord>> {
    let path = file_path.as_ref();
    info!("Parsing JSON positions file: {:?}", path);

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file {:?}", path))?;

    let records = parse_positions_str(&text)?;
    info!("Successfully parsed {} positions from JSON", records.len());
    Ok(records)
}

/// Parse positions from JSON text
pub fn parse_positions_str(text: &str) -> Result<Vec<PositionRecord>> {
    let root: Value = serde_json::from_str(text).context("Failed to parse JSON")?;

    let items = match root {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj
            .remove("investimentos")
            .or_else(|| obj.remove("positions"))
        {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(CarteiraError::SourceError(
                    "expected an array of positions or an object with an \"investimentos\" array"
                        .to_string(),
                )
                .into())
            }
        },
        _ => {
            return Err(
                CarteiraError::SourceError("expected an array of positions".to_string()).into(),
            )
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(obj) => records.push(record_from_object(&obj)),
            other => warn!("Skipping position {}: not an object ({})", idx + 1, other),
        }
    }
    Ok(records)
}

/// Keys are visited in document order, so the first alias written wins.
fn record_from_object(obj: &Map<String, Value>) -> PositionRecord {
    let mut record = PositionRecord::default();

    for (key, value) in obj {
        let Some(field) = Field::from_name(key) else {
            debug!("Ignoring unknown key {:?}", key);
            continue;
        };

        if field.is_amount() {
            record.set_amount(field, coerce_json_amount(key, value));
        } else if let Some(text) = json_text(value) {
            record.set_text(field, text);
        }
    }

    record
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
