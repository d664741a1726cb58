// Rollup module - class → subclass → asset aggregation of flat positions

mod accumulator;
mod groups;
pub mod profitability;
pub mod summary;
pub mod tree;

use anyhow::Result;
use tracing::debug;

use crate::positions::{Position, PositionRecord};
use crate::valuation::{resolve_positions, ValueProvider};

pub use groups::OrderedGroups;
pub use profitability::{allocation_pct, profitability_pct};
pub use summary::{class_allocations, ClassAllocation, PortfolioTotals};
pub use tree::{AggregateNode, Level};

/// Aggregate positions into the ordered class → subclass → asset tree.
///
/// Nodes appear in first-seen order at every level. Empty input gives an
/// empty tree.
pub fn aggregate(positions: &[Position]) -> Vec<AggregateNode> {
    let classes = accumulator::accumulate(positions);
    debug!(
        "Aggregated {} positions into {} classes",
        positions.len(),
        classes.len()
    );
    tree::assemble(classes)
}

/// Resolve current values with `provider`, then aggregate
pub fn aggregate_records(
    records: &[PositionRecord],
    provider: &mut dyn ValueProvider,
) -> Result<Vec<AggregateNode>> {
    let positions = resolve_positions(records, provider)?;
    Ok(aggregate(&positions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::{AtCost, Recorded};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sample() -> Vec<Position> {
        vec![
            Position::new("Renda Fixa", "Tesouro", "Tesouro Selic", dec!(1000), dec!(1050)),
            Position::new("Renda Fixa", "Tesouro", "Tesouro IPCA", dec!(500), dec!(480)),
            Position::new("Ações", "", "PETR4", dec!(2000), dec!(2200)),
        ]
    }

    #[test]
    fn test_reference_scenario() {
        let tree = aggregate(&sample());
        assert_eq!(tree.len(), 2);

        let rf = &tree[0];
        assert_eq!(rf.name, "Renda Fixa");
        assert_eq!(rf.invested, dec!(1500));
        assert_eq!(rf.current, dec!(1530));
        assert_eq!(rf.profitability_pct, Some(dec!(2)));

        let tesouro = &rf.children[0];
        assert_eq!(rf.children.len(), 1);
        assert_eq!(tesouro.name, "Tesouro");
        assert_eq!(tesouro.invested, dec!(1500));
        assert_eq!(tesouro.profitability_pct, Some(dec!(2)));

        let selic = &tesouro.children[0];
        assert_eq!(selic.name, "Tesouro Selic");
        assert_eq!(selic.profitability_pct, Some(dec!(5)));
        assert!(selic.is_leaf());

        let ipca = &tesouro.children[1];
        assert_eq!(ipca.name, "Tesouro IPCA");
        assert_eq!(ipca.current, dec!(480));
        assert_eq!(ipca.profitability_pct, Some(dec!(-4)));

        let acoes = &tree[1];
        assert_eq!(acoes.name, "Ações");
        assert_eq!(acoes.profitability_pct, Some(dec!(10)));
        assert_eq!(acoes.children[0].name, "Outros");
        assert_eq!(acoes.children[0].profitability_pct, Some(dec!(10)));
        assert_eq!(acoes.children[0].children[0].name, "PETR4");
        assert_eq!(acoes.children[0].children[0].invested, dec!(2000));
    }

    #[test]
    fn test_empty_input_gives_empty_tree() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_missing_labels_share_one_node() {
        let records = vec![
            PositionRecord::default().with_current(dec!(1)),
            PositionRecord::new("", "", "", dec!(10)).with_current(dec!(12)),
            PositionRecord {
                invested_amount: Some(dec!(5)),
                current_amount: Some(dec!(5)),
                ..Default::default()
            },
        ];
        let tree = aggregate_records(&records, &mut Recorded).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "Outros");
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].name, "Outros");
        assert_eq!(tree[0].children[0].children.len(), 1);

        let unknown = &tree[0].children[0].children[0];
        assert_eq!(unknown.name, "Desconhecido");
        assert_eq!(unknown.invested, dec!(15));
        assert_eq!(unknown.current, dec!(18));
    }

    #[test]
    fn test_order_is_first_seen_not_alphabetical() {
        let positions = vec![
            Position::new("Zeta", "B", "z2", dec!(1), dec!(1)),
            Position::new("Alfa", "A", "a1", dec!(1), dec!(1)),
            Position::new("Zeta", "A", "z1", dec!(1), dec!(1)),
            Position::new("Zeta", "B", "z0", dec!(1), dec!(1)),
        ];
        let tree = aggregate(&positions);
        let classes: Vec<_> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(classes, vec!["Zeta", "Alfa"]);

        let zeta_subclasses: Vec<_> = tree[0].children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(zeta_subclasses, vec!["B", "A"]);

        let zeta_b_assets: Vec<_> = tree[0].children[0]
            .children
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(zeta_b_assets, vec!["z2", "z0"]);

        assert_eq!(aggregate(&positions), tree);
    }

    #[test]
    fn test_zero_invested_node_has_undefined_profitability() {
        let positions = vec![
            Position::new("Caixa", "Conta", "Saldo", Decimal::ZERO, Decimal::ZERO),
            Position::new("Cripto", "BTC", "Airdrop", Decimal::ZERO, dec!(50)),
        ];
        let tree = aggregate(&positions);
        assert_eq!(tree[0].profitability_pct, None);
        assert_eq!(tree[0].children[0].profitability_pct, None);
        assert_eq!(tree[0].children[0].children[0].profitability_pct, None);
        assert_eq!(tree[1].profitability_pct, None);
    }

    #[test]
    fn test_profitability_is_derived_from_sums_not_averaged() {
        // 10% on 1000 and -50% on 10: average would be -20%, sums give 9.4059...%
        let positions = vec![
            Position::new("A", "S", "big", dec!(1000), dec!(1100)),
            Position::new("A", "S", "small", dec!(10), dec!(5)),
        ];
        let tree = aggregate(&positions);
        let pct = tree[0].profitability_pct.unwrap();
        assert!(pct > dec!(9.40) && pct < dec!(9.41));
    }

    #[test]
    fn test_aggregate_records_at_cost_fills_missing_current() {
        let records = vec![
            PositionRecord::new("Renda Fixa", "CDB", "Banco X", dec!(100)),
            PositionRecord::new("Renda Fixa", "CDB", "Banco Y", dec!(100)).with_current(dec!(120)),
        ];
        let tree = aggregate_records(&records, &mut AtCost).unwrap();
        assert_eq!(tree[0].current, dec!(220));
        assert_eq!(tree[0].children[0].children[0].profitability_pct, Some(Decimal::ZERO));
    }

    #[test]
    fn test_aggregate_records_recorded_requires_current() {
        let records = vec![PositionRecord::new("Ações", "", "VALE3", dec!(100))];
        let err = aggregate_records(&records, &mut Recorded).unwrap_err();
        assert!(err.to_string().contains("VALE3"));
    }
}
