//! Kenyan shilling amounts held as integer cents.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const CENTS_PER_SHILLING: i64 = 100;
// Amounts beyond this are far outside any limit enforced by validation and
// keep the f64 conversion exact.
const MAX_ABS_CENTS: i64 = 1 << 50;

/// Reasons a shilling value cannot be represented as [`Money`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    /// NaN or infinite input.
    #[error("amount must be a finite number")]
    NotFinite,
    /// More than two decimal places.
    #[error("amount must have at most two decimal places")]
    TooPrecise,
    /// Magnitude too large to represent.
    #[error("amount is too large")]
    OutOfRange,
}

/// An amount of money in KES, stored as cents.
///
/// On the wire amounts are JSON numbers of shillings.
///
/// # Examples
/// ```
/// use motofinance::domain::Money;
///
/// let fee = Money::from_shillings(1500.5).expect("valid amount");
/// assert_eq!(fee.cents(), 150_050);
/// assert_eq!(fee.to_string(), "1,500.50");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero shillings.
    pub const ZERO: Self = Self(0);

    /// Construct from a raw cent count.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Construct from whole shillings.
    #[must_use]
    pub const fn from_whole_shillings(shillings: i64) -> Self {
        Self(shillings.saturating_mul(CENTS_PER_SHILLING))
    }

    /// Convert a shilling amount with at most two decimals.
    pub fn from_shillings(shillings: f64) -> Result<Self, MoneyError> {
        if !shillings.is_finite() {
            return Err(MoneyError::NotFinite);
        }
        let scaled = shillings * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return Err(MoneyError::TooPrecise);
        }
        if rounded.abs() > MAX_ABS_CENTS as f64 {
            return Err(MoneyError::OutOfRange);
        }
        Ok(Self(rounded as i64))
    }

    /// Raw cent count.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Amount in shillings as a float, for percentages and the wire.
    #[must_use]
    pub fn as_shillings(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Subtract, flooring at zero.
    #[must_use]
    pub fn saturating_sub_to_zero(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0).max(0))
    }

    /// `self` as a percentage of `whole`; zero when `whole` is not positive.
    #[must_use]
    pub fn percent_of(self, whole: Self) -> f64 {
        if whole.0 <= 0 {
            return 0.0;
        }
        self.0 as f64 / whole.0 as f64 * 100.0
    }

    /// Divide evenly into `parts`, returning shillings.
    #[must_use]
    pub fn per(self, parts: u32) -> f64 {
        if parts == 0 {
            return 0.0;
        }
        self.as_shillings() / f64::from(parts)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Thousands-separated shillings; decimals only when the amount has cents.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / 100;
        let cents = abs % 100;
        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, ch) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if cents == 0 {
            write!(f, "{sign}{grouped}")
        } else {
            write!(f, "{sign}{grouped}.{cents:02}")
        }
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_shillings())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let shillings = f64::deserialize(deserializer)?;
        Self::from_shillings(shillings).map_err(serde::de::Error::custom)
    }
}
