//! Localized decimal amounts.
//!
//! Entry amounts travel as text in the Brazilian format (`4.405,49`): `.`
//! groups thousands, `,` separates two fractional digits. Parsing turns them
//! into integer cents so validation and display never touch floats.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("BRL")
    }
}

/// Mask settings applied to amount inputs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AmountFormat {
    pub scale: u32,
    pub grouping_separator: char,
    pub decimal_separator: char,
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self {
            scale: 2,
            grouping_separator: '.',
            decimal_separator: ',',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("`{0}` is not a valid amount")]
    Malformed(String),
    #[error("`{0}` has too many decimal places")]
    TooPrecise(String),
}

/// Parses an amount with the default (pt-BR) format into cents.
pub fn parse_amount(input: &str) -> Result<i64, AmountError> {
    parse_amount_with(input, AmountFormat::default())
}

pub fn parse_amount_with(input: &str, format: AmountFormat) -> Result<i64, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    let malformed = || AmountError::Malformed(trimmed.to_string());

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (whole, fraction) = match unsigned.split_once(format.decimal_separator) {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    if fraction.len() > format.scale as usize {
        return Err(AmountError::TooPrecise(trimmed.to_string()));
    }
    if !valid_grouping(whole, format.grouping_separator) {
        return Err(malformed());
    }

    let digits: String = whole
        .chars()
        .filter(|ch| *ch != format.grouping_separator)
        .collect();
    if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(malformed());
    }
    if !fraction.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(malformed());
    }

    let factor = 10_i64.pow(format.scale);
    let whole_value: i64 = digits.parse().map_err(|_| malformed())?;
    let padded = format!("{:0<width$}", fraction, width = format.scale as usize);
    let fraction_value: i64 = if padded.is_empty() {
        0
    } else {
        padded.parse().map_err(|_| malformed())?
    };

    let cents = whole_value
        .checked_mul(factor)
        .and_then(|value| value.checked_add(fraction_value))
        .ok_or_else(malformed)?;
    Ok(if negative { -cents } else { cents })
}

/// Groups must be three digits wide except the leading one.
fn valid_grouping(whole: &str, separator: char) -> bool {
    if !whole.contains(separator) {
        return true;
    }
    let mut groups = whole.split(separator);
    let leading_ok = groups
        .next()
        .map(|first| !first.is_empty() && first.len() <= 3)
        .unwrap_or(false);
    leading_ok && groups.all(|group| group.len() == 3)
}

/// Formats cents with the default (pt-BR) format, e.g. `440549` → `4.405,49`.
pub fn format_amount(cents: i64) -> String {
    format_amount_with(cents, AmountFormat::default())
}

pub fn format_amount_with(cents: i64, format: AmountFormat) -> String {
    let factor = 10_i64.pow(format.scale);
    let magnitude = cents.unsigned_abs();
    let whole = (magnitude / factor as u64).to_string();
    let fraction = magnitude % factor as u64;

    let mut grouped = String::new();
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(format.grouping_separator);
        }
        grouped.push(ch);
    }

    let sign = if cents < 0 { "-" } else { "" };
    if format.scale == 0 {
        format!("{sign}{grouped}")
    } else {
        format!(
            "{sign}{grouped}{}{:0width$}",
            format.decimal_separator,
            fraction,
            width = format.scale as usize
        )
    }
}
