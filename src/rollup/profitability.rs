//! Percentage derivation shared by every rollup level.
//!
//! A zero denominator yields `None`; consumers render it as a placeholder
//! instead of re-checking for non-finite values.

use rust_decimal::Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// `(current - invested) / invested * 100`, or `None` when nothing was invested
/// or the percentage falls outside the `Decimal` range.
///
/// # Examples
/// ```
/// use carteira::rollup::profitability_pct;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(profitability_pct(dec!(1000), dec!(1050)), Some(dec!(5)));
/// assert_eq!(profitability_pct(dec!(0), dec!(0)), None);
/// ```
pub fn profitability_pct(invested: Decimal, current: Decimal) -> Option<Decimal> {
    let ratio = match current.checked_sub(invested) {
        Some(diff) => diff.checked_div(invested)?,
        // Opposite-signed extremes: the ratio form stays in range
        None => current.checked_div(invested)?.checked_sub(Decimal::ONE)?,
    };
    ratio.checked_mul(HUNDRED).map(|pct| pct.normalize())
}

/// Share of `part` in `total` as a percentage, or `None` for an empty total.
pub fn allocation_pct(part: Decimal, total: Decimal) -> Option<Decimal> {
    let ratio = part.checked_div(total)?;
    ratio.checked_mul(HUNDRED).map(|pct| pct.normalize())
}
