//! Formatting helpers for amounts and percentages
//!
//! Values are shown in Brazilian notation (`.` thousands, `,` decimals),
//! rounded half away from zero to two places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Shown wherever a percentage is undefined
pub const UNDEFINED_PLACEHOLDER: &str = "—";

/// Brazilian-notation number with two decimals: "1.234,56"
///
/// # Examples
/// ```
/// use carteira::utils::format_decimal_br;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_decimal_br(dec!(1234.567)), "1.234,57");
/// assert_eq!(format_decimal_br(dec!(-500)), "-500,00");
/// ```
pub fn format_decimal_br(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };

    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let digits: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    format!("{}{},{}", sign, grouped, decimal_part)
}

/// Brazilian Real with symbol: "R$ 1.234,56"
///
/// # Examples
/// ```
/// use carteira::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "R$ 1.234,56");
/// assert_eq!(format_currency(dec!(-500)), "R$ -500,00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format!("R$ {}", format_decimal_br(value))
}

/// Percentage with two decimals, or the placeholder when undefined
///
/// # Examples
/// ```
/// use carteira::utils::format_percent;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_percent(Some(dec!(-4))), "-4,00%");
/// assert_eq!(format_percent(None), "—");
/// ```
pub fn format_percent(value: Option<Decimal>) -> String {
    match value {
        Some(pct) => format!("{}%", format_decimal_br(pct)),
        None => UNDEFINED_PLACEHOLDER.to_string(),
    }
}
