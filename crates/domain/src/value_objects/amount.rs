use crate::entities::token::Decimals;
use crate::error::{AmmError, Quote};
use crate::math::scaling;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw token amount tagged with its decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    pub raw: i128,
    pub decimals: Decimals,
}

impl Amount {
    pub fn new(raw: i128, decimals: Decimals) -> Self {
        Self { raw, decimals }
    }

    pub fn zero(decimals: Decimals) -> Self {
        Self { raw: 0, decimals }
    }

    /// Converts a human-readable value, flooring digits beyond `decimals`.
    pub fn from_decimal(d: Decimal, decimals: Decimals) -> Quote<Self> {
        scaling::decimal_to_raw(d, decimals).map(|raw| Self { raw, decimals })
    }

    /// Exact human-readable value.
    ///
    /// # Errors
    /// Returns [`AmmError::DecimalConversion`] if the whole part exceeds `Decimal` range.
    pub fn to_decimal(&self) -> Result<Decimal, AmmError> {
        scaling::raw_to_decimal(self.raw, self.decimals)
    }

    /// Human-readable value cut (not rounded) to `max_fraction_digits`,
    /// trailing zeros removed.
    ///
    /// # Errors
    /// Returns [`AmmError::DecimalConversion`] if the whole part exceeds `Decimal` range.
    pub fn to_display(&self, max_fraction_digits: u32) -> Result<String, AmmError> {
        Ok(self
            .to_decimal()?
            .round_dp_with_strategy(max_fraction_digits, RoundingStrategy::ToZero)
            .normalize()
            .to_string())
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Ok(d) => write!(f, "{}", d.normalize()),
            Err(_) => write!(f, "{}e-{}", self.raw, self.decimals),
        }
    }
}
