use anyhow::{Context, Result};
use tracing::info;

use crate::cli::formatters;
use crate::commands::{Command, SourceRequest};
use crate::positions::load_positions;
use crate::rollup::{self, class_allocations, AggregateNode, PortfolioTotals};
use crate::valuation::provider_for;

/// Route a resolved command to its handler
pub fn dispatch_command(command: Command, json_output: bool) -> Result<()> {
    match command {
        Command::Rollup { source, display } => {
            let tree = build_tree(&source)?;
            if tree.is_empty() {
                print_empty(json_output);
                return Ok(());
            }

            let totals = PortfolioTotals::from_tree(&tree);
            let view = formatters::apply_display_filters(&tree, &display);
            if json_output {
                println!("{}", formatters::format_rollup_json(&view));
            } else {
                println!("{}", formatters::format_rollup_table(&view, &totals));
            }
            Ok(())
        }
        Command::Summary { source } => {
            let tree = build_tree(&source)?;
            if tree.is_empty() && !json_output {
                print_empty(false);
                return Ok(());
            }

            let totals = PortfolioTotals::from_tree(&tree);
            let classes = class_allocations(&tree);
            if json_output {
                println!("{}", formatters::format_summary_json(&totals, &classes));
            } else {
                println!("{}", formatters::format_summary_table(&totals, &classes));
            }
            Ok(())
        }
    }
}

/// Load, value and aggregate the positions a request points at
pub fn build_tree(source: &SourceRequest) -> Result<Vec<AggregateNode>> {
    let records = load_positions(&source.path, &source.options)
        .with_context(|| format!("Failed to load positions from {:?}", source.path))?;

    let mut provider = provider_for(source.valuation, source.max_markup_pct, source.seed);
    let tree = rollup::aggregate_records(&records, provider.as_mut())?;

    info!(
        "Rolled up {} positions into {} classes",
        records.len(),
        tree.len()
    );
    Ok(tree)
}

fn print_empty(json_output: bool) {
    if json_output {
        println!("[]");
    } else {
        println!("{}", formatters::format_empty_positions());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positions::SourceOptions;
    use crate::valuation::ValuationMode;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::Builder;

    fn request(path: std::path::PathBuf, valuation: ValuationMode) -> SourceRequest {
        SourceRequest {
            path,
            options: SourceOptions::default(),
            valuation,
            max_markup_pct: dec!(30),
            seed: Some(1),
        }
    }

    #[test]
    fn test_build_tree_from_json_file() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"categoria": "Ações", "nome_investimento": "PETR4", "valor_total": 2000, "valor_atual": 2200}}]"#
        )
        .unwrap();

        let tree = build_tree(&request(file.path().to_path_buf(), ValuationMode::Recorded)).unwrap();
        assert_eq!(tree[0].name, "Ações");
        assert_eq!(tree[0].children[0].name, "Outros");
        assert_eq!(tree[0].profitability_pct, Some(dec!(10)));
    }

    #[test]
    fn test_build_tree_reports_missing_current_value() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "nome_investimento;valor_total\nVALE3;100\n").unwrap();

        let err = build_tree(&request(file.path().to_path_buf(), ValuationMode::Recorded)).unwrap_err();
        assert!(format!("{:#}", err).contains("VALE3"));

        let tree = build_tree(&request(file.path().to_path_buf(), ValuationMode::Cost)).unwrap();
        assert_eq!(tree[0].current, dec!(100));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = build_tree(&request("/nonexistent/carteira.json".into(), ValuationMode::Cost)).unwrap_err();
        assert!(err.to_string().contains("Failed to load positions"));
    }
}
