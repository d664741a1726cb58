use rust_decimal::Decimal;
use serde::Serialize;

use super::profitability::{allocation_pct, profitability_pct};
use super::tree::AggregateNode;

/// Portfolio-wide totals over the class nodes of a rollup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub invested: Decimal,
    pub current: Decimal,
    pub profit: Decimal,
    pub profitability_pct: Option<Decimal>,
}

impl PortfolioTotals {
    pub fn from_tree(tree: &[AggregateNode]) -> Self {
        // Trees built by `aggregate` always fit; saturate for hand-built ones
        let invested = tree.iter().fold(Decimal::ZERO, |acc, n| acc.saturating_add(n.invested));
        let current = tree.iter().fold(Decimal::ZERO, |acc, n| acc.saturating_add(n.current));
        Self {
            invested,
            current,
            profit: current.saturating_sub(invested),
            profitability_pct: profitability_pct(invested, current),
        }
    }
}

/// A class's share of the portfolio's current value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAllocation {
    pub name: String,
    pub current: Decimal,
    pub share_pct: Option<Decimal>,
}

/// Per-class allocation in tree order
pub fn class_allocations(tree: &[AggregateNode]) -> Vec<ClassAllocation> {
    let total = PortfolioTotals::from_tree(tree).current;
    tree.iter()
        .map(|node| ClassAllocation {
            name: node.name.clone(),
            current: node.current,
            share_pct: allocation_pct(node.current, total),
        })
        .collect()
}
