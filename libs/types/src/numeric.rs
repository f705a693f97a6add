//! Fixed-point decimal types for prices and quantities
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point errors).
//! `Price` is strictly positive; `Quantity` is non-negative. Both wrap
//! `Decimal` and compare by numeric value, so they can key ordered
//! collections directly.

use crate::errors::OrderError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A strictly positive price
///
/// Ordering follows the numeric value, so bid/ask books can use `Price`
/// as a sorted map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price, rejecting zero and negative values
    pub fn try_new(value: Decimal) -> Result<Self, OrderError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(OrderError::InvalidPrice(value.to_string()))
        }
    }

    /// Create a price from an integer number of quote units
    ///
    /// # Panics
    /// Panics if `value` is zero.
    pub fn from_u64(value: u64) -> Self {
        assert!(value > 0, "Price must be positive");
        Self(Decimal::from(value))
    }

    /// Parse a price from a decimal string
    pub fn from_str(s: &str) -> Result<Self, OrderError> {
        let value = Decimal::from_str_exact(s)
            .map_err(|e| OrderError::InvalidPrice(format!("{s}: {e}")))?;
        Self::try_new(value)
    }

    /// Get the inner decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative quantity
///
/// Resting orders always carry a quantity greater than zero; the zero
/// value exists only as a transient result of fills and subtraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Create a quantity, rejecting negative values
    pub fn try_new(value: Decimal) -> Result<Self, OrderError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(OrderError::InvalidQuantity(value.to_string()))
        }
    }

    /// The zero quantity
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create a quantity from an integer number of base units
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Parse a quantity from a decimal string
    pub fn from_str(s: &str) -> Result<Self, OrderError> {
        let value = Decimal::from_str_exact(s)
            .map_err(|e| OrderError::InvalidQuantity(format!("{s}: {e}")))?;
        Self::try_new(value)
    }

    /// Get the inner decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Check whether the quantity is exactly zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtract, returning `None` if the result would be negative
    pub fn checked_sub(&self, other: Quantity) -> Option<Quantity> {
        if other.0 > self.0 {
            None
        } else {
            Some(Self(self.0 - other.0))
        }
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
