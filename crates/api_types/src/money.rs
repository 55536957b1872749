use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount: {0}")]
    Invalid(String),
    #[error("too many decimals: {0}")]
    TooManyDecimals(String),
    #[error("amount too large: {0}")]
    Overflow(String),
}

/// Signed money amount represented as **integer minor units** (cents).
///
/// The API sends amounts as JSON numbers (`12.5`) or numeric strings
/// (`"12.50"`). Both are accepted on deserialization and rounded half away
/// from zero to two decimals; values are serialized back as JSON numbers.
///
/// Parsing user input through [`FromStr`] is strict instead: `.` or `,` as
/// decimal separator, at most two fractional digits.
///
/// ```rust
/// use api_types::Money;
///
/// assert_eq!("10,5".parse::<Money>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// assert_eq!(Money::new(-1050).to_string(), "-10.50");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

#[derive(Clone, Copy, PartialEq, Eq)]
enum Fraction {
    Strict,
    Round,
}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Value as a float in major units. Only meant for serialization.
    #[must_use]
    pub fn as_major_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Formats the amount followed by a currency code, e.g. `1234.50 EUR`.
    #[must_use]
    pub fn with_code(self, code: &str) -> String {
        if code.is_empty() {
            self.to_string()
        } else {
            format!("{self} {code}")
        }
    }

    /// Parses an API decimal, rounding anything past the second decimal.
    pub fn from_api_str(s: &str) -> Result<Self, MoneyError> {
        parse_decimal(s, Fraction::Round)
    }
}

fn parse_decimal(s: &str, fraction: Fraction) -> Result<Money, MoneyError> {
    let invalid = || MoneyError::Invalid(s.to_string());
    let overflow = || MoneyError::Overflow(s.to_string());

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(MoneyError::Empty);
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped.trim_start())
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped.trim_start())
    } else {
        (false, trimmed)
    };
    if rest.is_empty() {
        return Err(MoneyError::Empty);
    }

    let rest = rest.replace(',', ".");
    let mut parts = rest.split('.');
    let units_str = parts.next().ok_or_else(invalid)?;
    let frac_str = parts.next().unwrap_or("");
    if parts.next().is_some() {
        return Err(invalid());
    }
    if units_str.is_empty() && frac_str.is_empty() {
        return Err(invalid());
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !frac_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }
    if fraction == Fraction::Strict && frac_str.len() > 2 {
        return Err(MoneyError::TooManyDecimals(s.to_string()));
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| overflow())?
    };

    let mut digits = frac_str.chars().map(|c| i64::from(c as u8 - b'0'));
    let tens = digits.next().unwrap_or(0);
    let ones = digits.next().unwrap_or(0);
    let round_up = digits.next().is_some_and(|d| d >= 5);
    let cents = tens * 10 + ones + i64::from(round_up);

    let total = units
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(overflow)?;

    let signed = if negative {
        total.checked_neg().ok_or_else(overflow)?
    } else {
        total
    };
    Ok(Money(signed))
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s, Fraction::Strict)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major_f64())
    }
}

struct MoneyVisitor;

impl de::Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as number or string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom(MoneyError::Overflow(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Money)
            .ok_or_else(|| E::custom(MoneyError::Overflow(v.to_string())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom(MoneyError::Invalid(v.to_string())));
        }
        // `Display` for f64 is the shortest round-trip form and never uses exponents.
        Money::from_api_str(&v.to_string()).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::from_api_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_two_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(5).to_string(), "0.05");
        assert_eq!(Money::new(123_456).to_string(), "1234.56");
        assert_eq!(Money::new(-1050).with_code("EUR"), "-10.50 EUR");
    }

    #[test]
    fn strict_parse_rejects_extra_decimals() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("  -0,01 ".parse::<Money>().unwrap().minor(), -1);
        assert_eq!(".5".parse::<Money>().unwrap().minor(), 50);
        assert!("12.345".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn api_values_round_half_away_from_zero() {
        let values: Vec<Money> =
            serde_json::from_str(r#"[12, 12.5, "7.005", -1.005, "1.004", 0.1]"#).unwrap();
        let minor: Vec<i64> = values.into_iter().map(Money::minor).collect();
        assert_eq!(minor, vec![1200, 1250, 701, -101, 100, 10]);
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&Money::new(-1999)).unwrap();
        assert_eq!(json, "-19.99");
    }
}
