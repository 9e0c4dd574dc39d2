//! Currency helpers for Brazilian real amounts.
//!
//! Amounts stay as [`Decimal`] inside the engine; these helpers only run at the
//! edges (billing spreadsheets, reports, CLI output).

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

const CURRENCY_PREFIX: &str = "R$";

/// Rounds to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats as `R$1.234,56`; negative amounts render as `R$-1.234,56`.
pub fn format_brl(value: Decimal) -> String {
    let rounded = round_money(value);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format!("{:.2}", rounded.abs());
    let (integer, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, ch) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{CURRENCY_PREFIX}{sign}{grouped},{cents}")
}

/// Parses amounts as found in billing spreadsheets and on screen.
///
/// Accepts `R$ 1.234,56`, `1234,56`, `1.234`, `1500.5` and `-R$5,00`. When no comma
/// is present, a single dot followed by exactly three digits is read as a
/// thousands separator; any other single dot is the decimal point. Thousands
/// groups after the first must have exactly three digits.
pub fn parse_brl(raw: &str) -> Result<Decimal, CurrencyParseError> {
    let mut text = raw.trim();
    let mut negative = false;

    if let Some(rest) = text.strip_prefix('-') {
        negative = true;
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_prefix(CURRENCY_PREFIX) {
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_prefix('-') {
        negative = true;
        text = rest.trim_start();
    }

    let compact: String = text
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '\u{a0}')
        .collect();
    if compact.is_empty() {
        return Err(CurrencyParseError::Empty);
    }

    let invalid = || CurrencyParseError::Invalid(raw.to_string());
    let normalized = match compact.split_once(',') {
        Some((integer, fraction)) => {
            if fraction.contains([',', '.']) || !is_thousands_grouped(integer) {
                return Err(invalid());
            }
            format!("{}.{}", integer.replace('.', ""), fraction)
        }
        None => match compact.split_once('.') {
            Some((_, fraction)) if !fraction.contains('.') && fraction.len() != 3 => compact,
            Some(_) if is_thousands_grouped(&compact) => compact.replace('.', ""),
            Some(_) => return Err(invalid()),
            None => compact,
        },
    };

    if !normalized
        .chars()
        .all(|ch| ch.is_ascii_digit() || ch == '.')
        || normalized.matches('.').count() > 1
    {
        return Err(invalid());
    }

    let value = Decimal::from_str(&normalized).map_err(|_| invalid())?;
    Ok(if negative { -value } else { value })
}

/// `1.234.567` style: a leading group of 1-3 digits, then groups of exactly 3.
fn is_thousands_grouped(integer: &str) -> bool {
    let mut groups = integer.split('.');
    let leading_ok = groups
        .next()
        .is_some_and(|group| (1..=3).contains(&group.len()) || !integer.contains('.'));
    leading_ok && groups.all(|group| group.len() == 3)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CurrencyParseError {
    #[error("currency value is empty")]
    Empty,
    #[error("'{0}' is not a currency amount")]
    Invalid(String),
}
