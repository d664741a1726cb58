//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of aggregation from presentation.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::commands::DisplayOptions;
use crate::rollup::{allocation_pct, AggregateNode, ClassAllocation, Level, PortfolioTotals};
use crate::utils::{format_currency, format_percent};

/// Apply depth truncation and zero hiding to a rollup tree
pub fn apply_display_filters(tree: &[AggregateNode], display: &DisplayOptions) -> Vec<AggregateNode> {
    filter_level(tree, 0, display)
}

fn filter_level(nodes: &[AggregateNode], depth: usize, display: &DisplayOptions) -> Vec<AggregateNode> {
    nodes
        .iter()
        .filter(|node| !(display.hide_zero && node.is_zero()))
        .map(|node| {
            let children = if Level::at_depth(depth) < display.depth {
                filter_level(&node.children, depth + 1, display)
            } else {
                Vec::new()
            };
            AggregateNode {
                children,
                ..node.clone()
            }
        })
        .collect()
}

/// Format a rollup tree as pretty JSON
pub fn format_rollup_json(tree: &[AggregateNode]) -> String {
    serde_json::to_string_pretty(tree)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format totals and class allocation as pretty JSON
pub fn format_summary_json(totals: &PortfolioTotals, classes: &[ClassAllocation]) -> String {
    #[derive(Serialize)]
    struct JsonSummary<'a> {
        totals: &'a PortfolioTotals,
        classes: &'a [ClassAllocation],
    }

    serde_json::to_string_pretty(&JsonSummary { totals, classes })
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

#[derive(Tabled)]
struct RollupRow {
    #[tabled(rename = "Nome")]
    name: String,
    #[tabled(rename = "Investido")]
    invested: String,
    #[tabled(rename = "Atual")]
    current: String,
    #[tabled(rename = "Resultado")]
    profit: String,
    #[tabled(rename = "Rentab. %")]
    profitability: String,
    #[tabled(rename = "Alocação %")]
    allocation: String,
}

fn colored_by_sign(text: String, sign: Decimal) -> String {
    if sign > Decimal::ZERO {
        text.green().to_string()
    } else if sign < Decimal::ZERO {
        text.red().to_string()
    } else {
        text
    }
}

fn push_rows(rows: &mut Vec<RollupRow>, nodes: &[AggregateNode], depth: usize, total_current: Decimal) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        let name = match Level::at_depth(depth) {
            Level::Class => format!("{}{}", indent, node.name.bold()),
            Level::Subclass => format!("{}{}", indent, node.name),
            Level::Asset => format!("{}{}", indent, node.name.dimmed()),
        };

        let profit = node.profit();
        rows.push(RollupRow {
            name,
            invested: format_currency(node.invested),
            current: format_currency(node.current),
            profit: colored_by_sign(format_currency(profit), profit),
            profitability: colored_by_sign(
                format_percent(node.profitability_pct),
                node.profitability_pct.unwrap_or(Decimal::ZERO),
            ),
            allocation: format_percent(allocation_pct(node.current, total_current)),
        });

        push_rows(rows, &node.children, depth + 1, total_current);
    }
}

/// Format a rollup tree as an indented terminal table with totals
pub fn format_rollup_table(tree: &[AggregateNode], totals: &PortfolioTotals) -> String {
    let mut output = format!("\n{} Carteira por classe\n\n", "📊".cyan().bold());

    let mut rows = Vec::new();
    push_rows(&mut rows, tree, 0, totals.current);

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    // Right-align everything except the name column
    table.modify(Columns::new(1..), Alignment::right());
    output.push_str(&table.to_string());

    output.push_str(&format_totals(totals));
    output
}

/// Format totals and class allocation for the terminal
pub fn format_summary_table(totals: &PortfolioTotals, classes: &[ClassAllocation]) -> String {
    #[derive(Tabled)]
    struct AllocationRow {
        #[tabled(rename = "Classe")]
        name: String,
        #[tabled(rename = "Atual")]
        current: String,
        #[tabled(rename = "Alocação %")]
        share: String,
    }

    let rows: Vec<AllocationRow> = classes
        .iter()
        .map(|c| AllocationRow {
            name: c.name.clone(),
            current: format_currency(c.current),
            share: format_percent(c.share_pct),
        })
        .collect();

    let mut output = format!("\n{} Alocação por classe\n\n", "📊".cyan().bold());
    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    output.push_str(&table.to_string());

    output.push_str(&format_totals(totals));
    output
}

fn format_totals(totals: &PortfolioTotals) -> String {
    let mut output = format!("\n\n{} Resumo", "━".repeat(80).bright_black());
    output.push_str(&format!(
        "\n{:<20} {}",
        "Total investido:".bold(),
        format_currency(totals.invested)
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Total atual:".bold(),
        format_currency(totals.current)
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Resultado:".bold(),
        colored_by_sign(format_currency(totals.profit), totals.profit)
    ));
    output.push_str(&format!(
        "\n{:<20} {}\n",
        "Rentabilidade:".bold(),
        colored_by_sign(
            format_percent(totals.profitability_pct),
            totals.profitability_pct.unwrap_or(Decimal::ZERO)
        )
    ));
    output
}

/// Format empty positions message
pub fn format_empty_positions() -> String {
    format!(
        "{} No positions found\nCheck the positions file passed to {} rollup <file>\n",
        "ℹ".blue().bold(),
        "carteira".bold()
    )
}
