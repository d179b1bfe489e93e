//! Amount parsing for invoice totals.

use rust_decimal::Decimal;
use std::str::FromStr;

/// How a layout prints the separators in its totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmountFormat {
    /// Either separator may be the decimal one. With both present the last
    /// one is decimal; a lone separator followed by exactly three digits
    /// groups thousands.
    #[default]
    Auto,
    /// Commas always group thousands, the dot is decimal (`1,234,567.89`).
    CommaGrouping,
}

/// Parse an amount as printed on an invoice.
///
/// Spaces (regular or non-breaking) always group thousands. Returns `None`
/// when the digits do not form a single well-grouped number.
pub fn parse_amount(s: &str, format: AmountFormat) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match format {
        AmountFormat::CommaGrouping => {
            let (integer, fraction) = match cleaned.split_once('.') {
                Some((integer, fraction)) => (integer, Some(fraction)),
                None => (cleaned.as_str(), None),
            };
            let integer = ungroup(integer, ',')?;
            match fraction {
                Some(fraction) => format!("{integer}.{fraction}"),
                None => integer,
            }
        }
        AmountFormat::Auto => match (cleaned.rfind(','), cleaned.rfind('.')) {
            (Some(c), Some(d)) => {
                let (grouping, decimal) = if c > d { ('.', ',') } else { (',', '.') };
                let (integer, fraction) = cleaned.rsplit_once(decimal)?;
                format!("{}.{}", ungroup(integer, grouping)?, fraction)
            }
            (Some(_), None) => single_separator(&cleaned, ',')?,
            (None, Some(_)) => single_separator(&cleaned, '.')?,
            (None, None) => cleaned,
        },
    };

    Decimal::from_str(&normalized).ok()
}

/// Only one kind of separator: it groups thousands when every group after
/// the first has three digits, otherwise a single occurrence is decimal.
fn single_separator(cleaned: &str, separator: char) -> Option<String> {
    if let Some(grouped) = ungroup(cleaned, separator) {
        return Some(grouped);
    }
    match cleaned.split_once(separator) {
        Some((integer, fraction)) if !fraction.contains(separator) => {
            Some(format!("{integer}.{fraction}"))
        }
        _ => None,
    }
}

/// Remove `separator` from `integer` if it only appears between 3-digit groups.
fn ungroup(integer: &str, separator: char) -> Option<String> {
    let mut groups = integer.split(separator);
    let first = groups.next()?;
    if first.is_empty() || !first.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        let auto = AmountFormat::Auto;
        assert_eq!(parse_amount("150.00", auto), Some(dec("150.00")));
        assert_eq!(parse_amount("1 234,56", auto), Some(dec("1234.56")));
        assert_eq!(parse_amount("1\u{00a0}234,56", auto), Some(dec("1234.56")));
        assert_eq!(parse_amount("1.234,56", auto), Some(dec("1234.56")));
        assert_eq!(parse_amount("1,234.56", auto), Some(dec("1234.56")));
        assert_eq!(parse_amount("12 345 678,90", auto), Some(dec("12345678.90")));
        assert_eq!(parse_amount("12,5", auto), Some(dec("12.5")));
    }

    #[test]
    fn test_lone_separator_before_three_digits_groups_thousands() {
        let auto = AmountFormat::Auto;
        assert_eq!(parse_amount("1,234", auto), Some(dec("1234")));
        assert_eq!(parse_amount("1.234", auto), Some(dec("1234")));
        assert_eq!(parse_amount("1,234,567", auto), Some(dec("1234567")));
        assert_eq!(parse_amount("1.234.567,89", auto), Some(dec("1234567.89")));
    }

    #[test]
    fn test_comma_grouping() {
        let us = AmountFormat::CommaGrouping;
        assert_eq!(parse_amount("1,234", us), Some(dec("1234")));
        assert_eq!(parse_amount("1,234,567", us), Some(dec("1234567")));
        assert_eq!(parse_amount("1,234.56", us), Some(dec("1234.56")));
        assert_eq!(parse_amount("99.90", us), Some(dec("99.90")));
        assert_eq!(parse_amount("12,34", us), None);
        assert_eq!(parse_amount("1.234,56", us), None);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        for format in [AmountFormat::Auto, AmountFormat::CommaGrouping] {
            assert_eq!(parse_amount("", format), None);
            assert_eq!(parse_amount("n/a", format), None);
            assert_eq!(parse_amount("1.2.3", format), None);
        }
    }
}
