use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use super::amount::coerce_amount;
use super::{Field, PositionRecord};
use crate::error::CarteiraError;

/// Parse a CSV positions file with a header row.
///
/// The delimiter is `;` when the header line contains one (Brazilian
/// exports), `,` otherwise.
pub fn parse_positions_csv<P: AsRef<Path>>(file_path: P) -> Result<Vec<PositionRecord>> {
    let path = file_path.as_ref();
    info!("Parsing CSV positions file: {:?}", path);

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read CSV file {:?}", path))?;

    let records = parse_positions_reader(text.as_bytes(), detect_delimiter(&text))?;
    info!("Successfully parsed {} positions from CSV", records.len());
    Ok(records)
}

fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Parse positions from any CSV reader
pub fn parse_positions_reader<R: Read>(input: R, delimiter: u8) -> Result<Vec<PositionRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(input);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();

    let columns = map_columns(&headers)?;
    debug!("Column mapping: {:?}", columns);

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping row {}: {}", idx + 2, e);
                continue;
            }
        };

        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        records.push(record_from_row(&row, &columns, &headers));
    }

    Ok(records)
}

fn map_columns(headers: &StringRecord) -> Result<Vec<(usize, Field)>> {
    let columns: Vec<(usize, Field)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| {
            let name = name.trim_start_matches('\u{feff}');
            Field::from_name(name).map(|field| (idx, field))
        })
        .collect();

    if columns.is_empty() {
        return Err(CarteiraError::SourceError(format!(
            "no known columns in CSV header: {:?}",
            headers.iter().collect::<Vec<_>>()
        ))
        .into());
    }

    Ok(columns)
}

fn record_from_row(row: &StringRecord, columns: &[(usize, Field)], headers: &StringRecord) -> PositionRecord {
    let mut record = PositionRecord::default();

    for &(idx, field) in columns {
        // Short rows leave trailing fields absent
        let Some(cell) = row.get(idx) else { continue };

        if field.is_amount() {
            let name = headers.get(idx).unwrap_or(field.as_str());
            record.set_amount(field, coerce_amount(name, cell));
        } else {
            record.set_text(field, cell.to_string());
        }
    }

    record
}
