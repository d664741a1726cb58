use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::accumulator::{ClassAccumulator, SubclassAccumulator, Totals};
use super::groups::OrderedGroups;
use super::profitability::profitability_pct;

/// One node of the rollup tree. Classes and subclasses carry children,
/// assets are leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateNode {
    pub name: String,
    pub invested: Decimal,
    pub current: Decimal,
    /// `None` when `invested` is zero
    pub profitability_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<AggregateNode>,
}

impl AggregateNode {
    fn from_totals(name: String, totals: Totals, children: Vec<AggregateNode>) -> Self {
        Self {
            name,
            invested: totals.invested,
            current: totals.current,
            profitability_pct: profitability_pct(totals.invested, totals.current),
            children,
        }
    }

    /// Absolute result (`current - invested`), saturating at the `Decimal` range
    pub fn profit(&self) -> Decimal {
        self.current.saturating_sub(self.invested)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True when both sums are zero
    pub fn is_zero(&self) -> bool {
        self.invested.is_zero() && self.current.is_zero()
    }
}

/// Tree levels, outermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Class,
    Subclass,
    #[default]
    Asset,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Class => "class",
            Level::Subclass => "subclass",
            Level::Asset => "asset",
        }
    }

    /// Level of a node at `depth` (0 = class)
    pub fn at_depth(depth: usize) -> Self {
        match depth {
            0 => Level::Class,
            1 => Level::Subclass,
            _ => Level::Asset,
        }
    }
}

impl FromStr for Level {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "class" | "classe" => Ok(Level::Class),
            "subclass" | "subclasse" => Ok(Level::Subclass),
            "asset" | "ativo" => Ok(Level::Asset),
            _ => Err(()),
        }
    }
}

/// Turn the accumulators into the ordered node tree
pub(crate) fn assemble(classes: OrderedGroups<ClassAccumulator>) -> Vec<AggregateNode> {
    classes
        .into_iter()
        .map(|(name, class)| {
            let children = class.subclasses.into_iter().map(assemble_subclass).collect();
            AggregateNode::from_totals(name, class.totals, children)
        })
        .collect()
}

fn assemble_subclass((name, subclass): (String, SubclassAccumulator)) -> AggregateNode {
    let children = subclass
        .assets
        .into_iter()
        .map(|(asset, totals)| AggregateNode::from_totals(asset, totals, Vec::new()))
        .collect();
    AggregateNode::from_totals(name, subclass.totals, children)
}
