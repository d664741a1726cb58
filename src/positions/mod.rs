// Positions module - flat position records and the readers that load them

pub mod amount;
pub mod csv_reader;
pub mod json_reader;
pub mod sqlite_reader;

use anyhow::Result;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::info;

use crate::error::CarteiraError;

/// Fallback label for a missing class or subclass
pub const DEFAULT_GROUP_LABEL: &str = "Outros";

/// Fallback label for a missing asset name
pub const DEFAULT_ASSET_LABEL: &str = "Desconhecido";

/// Default table read from SQLite sources
pub const DEFAULT_SQLITE_TABLE: &str = "investimentos";

/// A raw position as read from a source. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionRecord {
    pub class_label: Option<String>,
    pub subclass_label: Option<String>,
    pub asset_name: Option<String>,
    pub invested_amount: Option<Decimal>,
    pub current_amount: Option<Decimal>,
}

impl PositionRecord {
    pub fn new(class: &str, subclass: &str, asset: &str, invested: Decimal) -> Self {
        Self {
            class_label: Some(class.to_string()),
            subclass_label: Some(subclass.to_string()),
            asset_name: Some(asset.to_string()),
            invested_amount: Some(invested),
            current_amount: None,
        }
    }

    pub fn with_current(mut self, current: Decimal) -> Self {
        self.current_amount = Some(current);
        self
    }

    pub fn class(&self) -> &str {
        label_or(&self.class_label, DEFAULT_GROUP_LABEL)
    }

    pub fn subclass(&self) -> &str {
        label_or(&self.subclass_label, DEFAULT_GROUP_LABEL)
    }

    pub fn asset(&self) -> &str {
        label_or(&self.asset_name, DEFAULT_ASSET_LABEL)
    }

    pub fn invested(&self) -> Decimal {
        self.invested_amount.unwrap_or(Decimal::ZERO)
    }

    /// Resolve labels and amounts into a [`Position`] using an already
    /// known current value.
    pub fn resolve(&self, current: Decimal) -> Position {
        Position {
            class: self.class().to_string(),
            subclass: self.subclass().to_string(),
            asset: self.asset().to_string(),
            invested: self.invested(),
            current,
        }
    }

    /// Store a text field by its semantic name; empty text stays empty and
    /// falls back to the default label at resolution time.
    pub(crate) fn set_text(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Class => &mut self.class_label,
            Field::Subclass => &mut self.subclass_label,
            Field::Asset => &mut self.asset_name,
            Field::Invested | Field::Current => return,
        };
        if slot.as_deref().map_or(true, str::is_empty) {
            *slot = Some(value);
        }
    }

    /// Store an amount field; the first present alias wins.
    pub(crate) fn set_amount(&mut self, field: Field, value: Option<Decimal>) {
        let slot = match field {
            Field::Invested => &mut self.invested_amount,
            Field::Current => &mut self.current_amount,
            _ => return,
        };
        if slot.is_none() {
            *slot = value;
        }
    }
}

fn label_or<'a>(label: &'a Option<String>, fallback: &'a str) -> &'a str {
    match label.as_deref() {
        Some(s) if !s.is_empty() => s,
        _ => fallback,
    }
}

/// A position with labels defaulted and a resolved current value.
/// This is what the rollup consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub class: String,
    pub subclass: String,
    pub asset: String,
    pub invested: Decimal,
    pub current: Decimal,
}

impl Position {
    pub fn new(class: &str, subclass: &str, asset: &str, invested: Decimal, current: Decimal) -> Self {
        PositionRecord::new(class, subclass, asset, invested).resolve(current)
    }
}

/// Semantic fields a source column or key can map to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Class,
    Subclass,
    Asset,
    Invested,
    Current,
}

impl Field {
    /// Map a source column/key name (semantic or legacy) to a field
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "class" | "class_label" | "classe" | "categoria" => Some(Field::Class),
            "subclass" | "subclass_label" | "subclasse" | "subcategoria" => Some(Field::Subclass),
            "asset" | "asset_name" | "ativo" | "nome" | "nome_investimento" => Some(Field::Asset),
            "invested" | "invested_amount" | "investido" | "valor_total" | "valor_investido" => {
                Some(Field::Invested)
            }
            "current" | "current_amount" | "atual" | "valor_atual" => Some(Field::Current),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Class => "class",
            Field::Subclass => "subclass",
            Field::Asset => "asset",
            Field::Invested => "invested",
            Field::Current => "current",
        }
    }

    pub fn is_amount(&self) -> bool {
        matches!(self, Field::Invested | Field::Current)
    }
}

/// Options shared by the position readers
#[derive(Debug, Clone)]
pub struct SourceOptions {
    pub sqlite_table: String,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            sqlite_table: DEFAULT_SQLITE_TABLE.to_string(),
        }
    }
}

/// Load position records from a file, picking the reader by extension
pub fn load_positions<P: AsRef<Path>>(path: P, options: &SourceOptions) -> Result<Vec<PositionRecord>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    info!("Loading positions from {:?} (type: {})", path, extension);

    match extension.as_str() {
        "json" => json_reader::parse_positions_json(path),
        "csv" | "txt" => csv_reader::parse_positions_csv(path),
        "db" | "sqlite" | "sqlite3" => sqlite_reader::read_positions_db(path, &options.sqlite_table),
        other => {
            let shown = if other.is_empty() { "<none>" } else { other };
            Err(CarteiraError::UnsupportedFormat(shown.to_string()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_absent_and_empty_labels_default() {
        let absent = PositionRecord::default();
        assert_eq!(absent.class(), "Outros");
        assert_eq!(absent.subclass(), "Outros");
        assert_eq!(absent.asset(), "Desconhecido");
        assert_eq!(absent.invested(), Decimal::ZERO);

        let empty = PositionRecord::new("", "", "", dec!(10));
        assert_eq!(empty.class(), "Outros");
        assert_eq!(empty.subclass(), "Outros");
        assert_eq!(empty.asset(), "Desconhecido");
    }

    #[test]
    fn test_whitespace_label_is_kept() {
        let record = PositionRecord::new(" ", "Tesouro", "Selic", dec!(1));
        assert_eq!(record.class(), " ");
    }

    #[test]
    fn test_resolve_carries_current() {
        let position = PositionRecord::new("Ações", "", "PETR4", dec!(2000)).resolve(dec!(2200));
        assert_eq!(position.class, "Ações");
        assert_eq!(position.subclass, "Outros");
        assert_eq!(position.current, dec!(2200));
    }

    #[test]
    fn test_field_aliases() {
        assert_eq!(Field::from_name("categoria"), Some(Field::Class));
        assert_eq!(Field::from_name("SubCategoria"), Some(Field::Subclass));
        assert_eq!(Field::from_name("nome_investimento"), Some(Field::Asset));
        assert_eq!(Field::from_name("valor_total"), Some(Field::Invested));
        assert_eq!(Field::from_name("valor_investido"), Some(Field::Invested));
        assert_eq!(Field::from_name(" valor_atual "), Some(Field::Current));
        assert_eq!(Field::from_name("id"), None);
    }

    #[test]
    fn test_first_present_alias_wins() {
        let mut record = PositionRecord::default();
        record.set_amount(Field::Invested, Some(dec!(100)));
        record.set_amount(Field::Invested, Some(dec!(999)));
        assert_eq!(record.invested(), dec!(100));

        record.set_text(Field::Class, String::new());
        record.set_text(Field::Class, "Renda Fixa".to_string());
        assert_eq!(record.class(), "Renda Fixa");
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = load_positions("carteira.xlsx", &SourceOptions::default()).unwrap_err();
        assert!(err.to_string().contains("unsupported source format"));
    }
}
