//! Money primitives in integer minor units.
//!
//! All money in Corebank is an integer count of minor units (e.g. cents);
//! floating point never touches a balance. Two shapes are enforced at the
//! type level:
//! - `Amount`: the value of one movement, always > 0
//! - `Balance`: the stored funds of one account, always >= 0

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when constructing money values
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(i64),
    #[error("Balance cannot be negative, got {0}")]
    NegativeBalance(i64),
}

/// A strictly positive quantity of minor units.
///
/// # Invariant
/// The inner value is always > 0. This is enforced by the constructor, so a
/// deposit, transfer, or card payment of zero (or negative) minor units is
/// unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Amount(i64);

impl Amount {
    /// Create a new Amount from minor units.
    ///
    /// Returns an error if the value is zero or negative.
    pub fn new(minor_units: i64) -> Result<Self, MoneyError> {
        if minor_units <= 0 {
            Err(MoneyError::NonPositiveAmount(minor_units))
        } else {
            Ok(Self(minor_units))
        }
    }

    /// Get the inner minor-unit count
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Amount {
    type Error = MoneyError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// A non-negative account balance in minor units.
///
/// # Invariant
/// The inner value is always >= 0. Arithmetic is checked: `debit` refuses to
/// go below zero and `credit` refuses to overflow `i64`, so a committed
/// balance can never hold an out-of-range value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Balance(i64);

impl Balance {
    /// Zero balance constant
    pub const ZERO: Self = Self(0);

    /// Create a new Balance from minor units.
    ///
    /// Returns an error if the value is negative.
    pub fn new(minor_units: i64) -> Result<Self, MoneyError> {
        if minor_units < 0 {
            Err(MoneyError::NegativeBalance(minor_units))
        } else {
            Ok(Self(minor_units))
        }
    }

    /// Create a Balance without validation.
    ///
    /// # Safety
    /// The caller MUST ensure the value is non-negative. Use only where the
    /// range has already been checked (e.g. after a successful checked op).
    #[inline]
    pub const fn new_unchecked(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Get the inner minor-unit count
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Check if the balance is zero
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked credit - returns None if the result would overflow `i64`
    pub fn credit(self, amount: Amount) -> Option<Balance> {
        self.0.checked_add(amount.0).map(Balance)
    }

    /// Checked debit - returns None if the result would be negative
    pub fn debit(self, amount: Amount) -> Option<Balance> {
        let result = self.0 - amount.0;
        if result < 0 {
            None
        } else {
            Some(Balance(result))
        }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Balance {
    type Error = MoneyError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Balance> for i64 {
    fn from(balance: Balance) -> Self {
        balance.0
    }
}
