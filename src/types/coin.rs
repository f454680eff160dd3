//! Native payment value
//!
//! Mint payments are denominated in `Coin`, a fixed-point amount of the
//! native currency. The smallest unit is 10^-9 of a whole coin.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Number of base units per whole coin
pub const UNITS_PER_COIN: u64 = 1_000_000_000;

/// A native currency amount in base units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Coin(u64);

impl Coin {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// One whole coin
    pub const ONE: Self = Self(UNITS_PER_COIN);

    /// Create from base units
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Create from whole coins
    pub fn from_whole(whole: u64) -> Self {
        Self(whole.saturating_mul(UNITS_PER_COIN))
    }

    /// Create from a decimal string (e.g., "0.08")
    pub fn from_decimal_str(s: &str) -> Result<Self, CoinError> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() > 2 {
            return Err(CoinError::InvalidAmount);
        }

        let whole = parts[0].parse::<u64>().map_err(|_| CoinError::InvalidAmount)?;

        let fractional = if parts.len() > 1 {
            let frac_str = parts[1];
            if frac_str.len() > 9 {
                return Err(CoinError::TooManyDecimals);
            }
            let padded = format!("{:0<9}", frac_str);
            padded[..9].parse::<u64>().map_err(|_| CoinError::InvalidAmount)?
        } else {
            0
        };

        let units = whole
            .checked_mul(UNITS_PER_COIN)
            .and_then(|w| w.checked_add(fractional))
            .ok_or(CoinError::Overflow)?;

        Ok(Self(units))
    }

    /// Get raw base units
    pub const fn units(&self) -> u64 {
        self.0
    }

    /// Get whole coin amount (truncated)
    pub const fn whole(&self) -> u64 {
        self.0 / UNITS_PER_COIN
    }

    /// Get fractional base units (after the decimal point)
    pub const fn fractional_units(&self) -> u64 {
        self.0 % UNITS_PER_COIN
    }

    /// Check if zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Saturating addition
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for Coin {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Sub for Coin {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.whole();
        let frac = self.fractional_units();
        if frac == 0 {
            write!(f, "{}", whole)
        } else {
            write!(f, "{}.{:09}", whole, frac)
        }
    }
}

/// Coin parsing and arithmetic errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoinError {
    #[error("Invalid amount format")]
    InvalidAmount,
    #[error("Too many decimal places (max 9)")]
    TooManyDecimals,
    #[error("Arithmetic overflow")]
    Overflow,
}
