//! Exact decoding of monetary amounts.
//!
//! Amounts arrive as JSON strings or JSON numbers. Numbers are read from
//! their literal text (serde_json `arbitrary_precision`), never through
//! `f64`, and any literal that `Decimal` cannot hold exactly is rejected
//! rather than rounded.

use rust_decimal::Decimal;
use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("invalid amount {0:?}: not a decimal number")]
    Malformed(String),
    #[error("invalid amount {0:?}: cannot be represented exactly")]
    Inexact(String),
}

/// Parse a decimal literal such as `100`, `0.01` or `1.5e3` without rounding.
pub fn parse_amount(text: &str) -> Result<Decimal, AmountError> {
    let malformed = || AmountError::Malformed(text.to_string());
    let inexact = || AmountError::Inexact(text.to_string());

    let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
        Some(at) => (&text[..at], Some(&text[at + 1..])),
        None => (text, None),
    };
    if !is_plain_decimal(mantissa) {
        return Err(malformed());
    }

    // Well-formed at this point, so any failure is lost precision or range.
    let value = Decimal::from_str_exact(mantissa).map_err(|_| inexact())?;
    let Some(exponent) = exponent else {
        return Ok(value);
    };
    let exponent: i64 = exponent.parse().map_err(|_| malformed())?;

    let scale = i64::from(value.scale()) - exponent;
    if scale >= 0 {
        let scale = u32::try_from(scale).map_err(|_| inexact())?;
        let mut value = value;
        value.set_scale(scale).map_err(|_| inexact())?;
        return Ok(value);
    }

    let factor = u32::try_from(-scale)
        .ok()
        .and_then(|power| 10i128.checked_pow(power))
        .ok_or_else(inexact)?;
    let mantissa = value.mantissa().checked_mul(factor).ok_or_else(inexact)?;
    Decimal::try_from_i128_with_scale(mantissa, 0).map_err(|_| inexact())
}

/// `[+-]digits[.digits]`
fn is_plain_decimal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.map_or(true, all_digits)
}

/// `deserialize_with` helper accepting a string or a number.
pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        other => {
            return Err(D::Error::custom(format!(
                "invalid amount: expected a decimal string or number, got {}",
                other
            )))
        }
    };
    parse_amount(text.trim()).map_err(D::Error::custom)
}
