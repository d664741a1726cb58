use rust_decimal::Decimal;
use tracing::warn;

use super::groups::OrderedGroups;
use crate::positions::Position;

/// Running invested/current sums for one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub invested: Decimal,
    pub current: Decimal,
}

impl Totals {
    /// Sums after adding `position`, or `None` when either leaves the `Decimal` range
    fn plus(&self, position: &Position) -> Option<Totals> {
        Some(Totals {
            invested: self.invested.checked_add(position.invested)?,
            current: self.current.checked_add(position.current)?,
        })
    }
}

#[derive(Debug, Default)]
pub struct SubclassAccumulator {
    pub totals: Totals,
    pub assets: OrderedGroups<Totals>,
}

#[derive(Debug, Default)]
pub struct ClassAccumulator {
    pub totals: Totals,
    pub subclasses: OrderedGroups<SubclassAccumulator>,
}

/// Single pass over `positions`, fanning each amount out to its class,
/// subclass and asset accumulators.
///
/// A position is committed to all levels or to none: when any running sum,
/// the portfolio total included, would overflow, it contributes zero and a
/// warning is logged.
pub fn accumulate(positions: &[Position]) -> OrderedGroups<ClassAccumulator> {
    let mut classes: OrderedGroups<ClassAccumulator> = OrderedGroups::new();
    let mut portfolio = Totals::default();

    for position in positions {
        let class = classes.entry(&position.class);
        let subclass = class.subclasses.entry(&position.subclass);
        let asset = subclass.assets.entry(&position.asset);

        match (
            portfolio.plus(position),
            class.totals.plus(position),
            subclass.totals.plus(position),
            asset.plus(position),
        ) {
            (Some(p), Some(c), Some(s), Some(a)) => {
                portfolio = p;
                class.totals = c;
                subclass.totals = s;
                *asset = a;
            }
            _ => warn!(
                "Amounts of {} ({} / {}) overflow the portfolio totals, using 0",
                position.asset, position.class, position.subclass
            ),
        }
    }

    classes
}
