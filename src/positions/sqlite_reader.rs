use anyhow::{Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use rust_decimal::Decimal;
use std::path::Path;
use tracing::{debug, info, warn};

use super::amount::coerce_amount;
use super::{Field, PositionRecord};
use crate::error::CarteiraError;

/// Read positions from a SQLite database file (opened read-only)
pub fn read_positions_db<P: AsRef<Path>>(db_path: P, table: &str) -> Result<Vec<PositionRecord>> {
    let path = db_path.as_ref();
    info!("Reading positions from SQLite {:?} (table: {})", path, table);

    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open database {:?}", path))?;

    let records = read_positions(&conn, table)?;
    info!("Successfully read {} positions from SQLite", records.len());
    Ok(records)
}

/// Read every row of `table`, mapping the columns whose names are known aliases
pub fn read_positions(conn: &Connection, table: &str) -> Result<Vec<PositionRecord>> {
    validate_table_name(table)?;

    let mut stmt = conn
        .prepare(&format!("SELECT * FROM \"{}\"", table))
        .with_context(|| format!("Failed to read table {}", table))?;

    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let columns: Vec<(usize, Field, String)> = names
        .into_iter()
        .enumerate()
        .filter_map(|(idx, name)| Field::from_name(&name).map(|field| (idx, field, name)))
        .collect();
    debug!("Column mapping: {:?}", columns);

    if columns.is_empty() {
        return Err(CarteiraError::SourceError(format!("no known columns in table {}", table)).into());
    }

    let mut rows = stmt.query([])?;
    let mut records = Vec::new();

    while let Some(row) = rows.next()? {
        let mut record = PositionRecord::default();
        for (idx, field, name) in &columns {
            let value = row.get_ref(*idx)?;
            if field.is_amount() {
                record.set_amount(*field, amount_from_sql(name, value));
            } else if let Some(text) = text_from_sql(value) {
                record.set_text(*field, text);
            }
        }
        records.push(record);
    }

    Ok(records)
}

fn validate_table_name(table: &str) -> Result<()> {
    let valid = !table.is_empty()
        && !table.starts_with(|c: char| c.is_ascii_digit())
        && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(CarteiraError::SourceError(format!("invalid table name: {:?}", table)).into());
    }
    Ok(())
}

fn amount_from_sql(column: &str, value: ValueRef<'_>) -> Option<Decimal> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(Decimal::from(i)),
        ValueRef::Real(f) => match Decimal::try_from(f) {
            Ok(d) => Some(d),
            Err(_) => {
                warn!("Non-finite {} value {}, using 0", column, f);
                Some(Decimal::ZERO)
            }
        },
        ValueRef::Text(bytes) => coerce_amount(column, &String::from_utf8_lossy(bytes)),
        ValueRef::Blob(_) => {
            warn!("Blob in {} column, using 0", column);
            Some(Decimal::ZERO)
        }
    }
}

fn text_from_sql(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
    }
}
