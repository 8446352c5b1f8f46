//! Exact fixed-point money values.
//!
//! Money is never represented with binary floating point. Every
//! [CurrencyValue] holds a decimal rounded to [FRACTIONAL_DIGITS] places, and
//! all arithmetic saturates instead of panicking so that it is total over any
//! pair of valid values.

use std::{fmt::Display, iter::Sum, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::ValidationError;

/// The number of digits kept after the decimal point.
pub const FRACTIONAL_DIGITS: u32 = 2;

/// An amount of money with exactly two fractional digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct CurrencyValue(Decimal);

/// The result of dividing one [CurrencyValue] by another.
///
/// Dividing by zero does not panic, it produces [Quotient::NonFinite] which
/// callers must handle explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quotient {
    /// The exact (unrounded) ratio of the two values.
    Finite(Decimal),
    /// The divisor was zero or the ratio does not fit in a decimal.
    NonFinite,
}

impl Quotient {
    /// The ratio, or `None` if the division was non-finite.
    pub fn finite(self) -> Option<Decimal> {
        match self {
            Quotient::Finite(ratio) => Some(ratio),
            Quotient::NonFinite => None,
        }
    }
}

impl CurrencyValue {
    /// Zero dollars.
    pub const ZERO: CurrencyValue = CurrencyValue(Decimal::ZERO);

    /// Create a currency value from a decimal, rounding to two fractional
    /// digits (midpoint away from zero).
    pub fn new(value: Decimal) -> Self {
        let mut value =
            value.round_dp_with_strategy(FRACTIONAL_DIGITS, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(FRACTIONAL_DIGITS);

        if value.is_zero() {
            value.set_sign_positive(true);
        }

        Self(value)
    }

    /// Create a currency value from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, FRACTIONAL_DIGITS))
    }

    pub fn add(self, rhs: CurrencyValue) -> CurrencyValue {
        Self::new(self.0.saturating_add(rhs.0))
    }

    pub fn subtract(self, rhs: CurrencyValue) -> CurrencyValue {
        Self::new(self.0.saturating_sub(rhs.0))
    }

    /// Scale the value by `factor`, rounding the product to two places.
    pub fn multiply(self, factor: Decimal) -> CurrencyValue {
        Self::new(self.0.saturating_mul(factor))
    }

    /// Divide the value by `divisor`.
    ///
    /// The ratio of two amounts of money is dimensionless, so the result is
    /// not rounded. A zero `divisor` yields [Quotient::NonFinite].
    pub fn divide(self, divisor: CurrencyValue) -> Quotient {
        match self.0.checked_div(divisor.0) {
            Some(ratio) => Quotient::Finite(ratio),
            None => Quotient::NonFinite,
        }
    }

    /// The same amount with the opposite sign.
    pub fn negate(self) -> CurrencyValue {
        Self::new(-self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl From<Decimal> for CurrencyValue {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl FromStr for CurrencyValue {
    type Err = ValidationError;

    /// Parse a plain decimal string such as `"12.5"` or `"-3.10"`.
    ///
    /// Thousands separators, digit separators, currency symbols and exponents
    /// are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();

        if !is_plain_decimal(text) {
            return Err(ValidationError::InvalidAmount(s.to_owned()));
        }

        Decimal::from_str(text)
            .map(Self::new)
            .map_err(|_| ValidationError::InvalidAmount(s.to_owned()))
    }
}

/// Whether `text` has the shape `[+-]digits[.digits]`.
fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let is_digits = |part: &str| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit());

    is_digits(whole) && fraction.is_none_or(is_digits)
}

impl Display for CurrencyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Sum for CurrencyValue {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(CurrencyValue::ZERO, CurrencyValue::add)
    }
}

impl Serialize for CurrencyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CurrencyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

// Stored as TEXT so that SQLite never converts the amount to a REAL.
impl ToSql for CurrencyValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for CurrencyValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
