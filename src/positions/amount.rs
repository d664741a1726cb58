//! Lenient amount parsing
//!
//! Amount cells arrive as JSON numbers, Brazilian-formatted strings
//! ("R$ 1.234,56"), international strings ("1,234.56") or garbage.
//! Anything that does not parse coerces to zero instead of failing the load.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

/// Parse a textual amount, returning `None` when it is not a number.
///
/// The decimal separator is whichever of `,` / `.` appears last; the other
/// one is treated as a thousands separator. A lone separator followed by
/// exactly three digits after a non-zero integer part of at most three
/// digits ("1.234", "12,500") is read as a thousands separator; money
/// columns in these exports never carry three decimals.
///
/// # Examples
/// ```
/// use carteira::positions::amount::parse_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_amount("R$ 1.234,56"), Some(dec!(1234.56)));
/// assert_eq!(parse_amount("1,234.56"), Some(dec!(1234.56)));
/// assert_eq!(parse_amount("1.234"), Some(dec!(1234)));
/// assert_eq!(parse_amount("abc"), None);
/// ```
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let last_comma = cleaned.rfind(',');
    let last_dot = cleaned.rfind('.');

    let normalized = match (last_comma, last_dot) {
        (Some(comma_pos), Some(dot_pos)) if comma_pos > dot_pos => {
            // "1.234,56"
            cleaned.replace('.', "").replace(',', ".")
        }
        (Some(_), Some(_)) => {
            // "1,234.56"
            cleaned.replace(',', "")
        }
        (Some(_), None) => {
            if cleaned.matches(',').count() > 1 || is_thousands_group(&cleaned, ',') {
                cleaned.replace(',', "")
            } else {
                cleaned.replace(',', ".")
            }
        }
        (None, Some(_)) if cleaned.matches('.').count() > 1 || is_thousands_group(&cleaned, '.') => {
            // "1.234.567", "1.234"
            cleaned.replace('.', "")
        }
        _ => cleaned,
    };

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// True for a single `separator` splitting "d[dd]" from exactly three digits,
/// with a non-zero integer part.
fn is_thousands_group(cleaned: &str, separator: char) -> bool {
    let Some((int_part, frac_part)) = cleaned.split_once(separator) else {
        return false;
    };
    let digits = int_part.strip_prefix('-').unwrap_or(int_part);
    (1..=3).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && digits.chars().any(|c| c != '0')
        && frac_part.len() == 3
        && frac_part.chars().all(|c| c.is_ascii_digit())
}

/// Coerce a textual amount for `field`.
///
/// Blank text is absent (`None`); unparseable text is zero.
pub fn coerce_amount(field: &str, raw: &str) -> Option<Decimal> {
    if raw.trim().is_empty() {
        return None;
    }
    match parse_amount(raw) {
        Some(value) => Some(value),
        None => {
            warn!("Non-numeric {} value {:?}, using 0", field, raw);
            Some(Decimal::ZERO)
        }
    }
}

/// Coerce a JSON value for `field`. `null` is absent, numbers parse exactly,
/// strings go through [`coerce_amount`], anything else is zero.
pub fn coerce_json_amount(field: &str, value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::Number(n) => {
            let text = n.to_string();
            match Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
                Ok(d) => Some(d),
                Err(_) => {
                    warn!("Out-of-range {} value {}, using 0", field, text);
                    Some(Decimal::ZERO)
                }
            }
        }
        serde_json::Value::String(s) => coerce_amount(field, s),
        other => {
            warn!("Non-numeric {} value {}, using 0", field, other);
            Some(Decimal::ZERO)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_brazilian_and_international() {
        assert_eq!(parse_amount("1.234,56"), Some(dec!(1234.56)));
        assert_eq!(parse_amount("1234,56"), Some(dec!(1234.56)));
        assert_eq!(parse_amount("1,234.56"), Some(dec!(1234.56)));
        assert_eq!(parse_amount("1234.56"), Some(dec!(1234.56)));
        assert_eq!(parse_amount("1.234.567"), Some(dec!(1234567)));
        assert_eq!(parse_amount("R$ -500,00"), Some(dec!(-500)));
        assert_eq!(parse_amount("  2000 "), Some(dec!(2000)));
    }

    #[test]
    fn test_lone_separator_before_three_digits_is_thousands() {
        assert_eq!(parse_amount("1.234"), Some(dec!(1234)));
        assert_eq!(parse_amount("R$ 12.500"), Some(dec!(12500)));
        assert_eq!(parse_amount("-1.000"), Some(dec!(-1000)));
        assert_eq!(parse_amount("1,234"), Some(dec!(1234)));
        // Still decimals: zero integer part, long integer part, other widths
        assert_eq!(parse_amount("0.125"), Some(dec!(0.125)));
        assert_eq!(parse_amount("1234.567"), Some(dec!(1234.567)));
        assert_eq!(parse_amount("1.5"), Some(dec!(1.5)));
        assert_eq!(parse_amount("12,3456"), Some(dec!(12.3456)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_coerce_blank_is_absent_and_garbage_is_zero() {
        assert_eq!(coerce_amount("valor_atual", ""), None);
        assert_eq!(coerce_amount("valor_atual", "   "), None);
        assert_eq!(coerce_amount("valor_total", "n/a"), Some(Decimal::ZERO));
        assert_eq!(coerce_amount("valor_total", "1.000,50"), Some(dec!(1000.50)));
    }

    #[test]
    fn test_coerce_json_values() {
        assert_eq!(coerce_json_amount("v", &json!(null)), None);
        assert_eq!(coerce_json_amount("v", &json!(1050)), Some(dec!(1050)));
        assert_eq!(coerce_json_amount("v", &json!(0.1)), Some(dec!(0.1)));
        assert_eq!(coerce_json_amount("v", &json!("R$ 480,00")), Some(dec!(480)));
        assert_eq!(coerce_json_amount("v", &json!(true)), Some(Decimal::ZERO));
        assert_eq!(coerce_json_amount("v", &json!({"x": 1})), Some(Decimal::ZERO));
    }
}
