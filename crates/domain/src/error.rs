//! Error taxonomy for AMM calculations.
//!
//! Two layers:
//! - [`AmmError`] is returned only for malformed inputs that should never
//!   reach a calculator (negative reserves, impossible decimals).
//! - [`Quote`] is what every calculator returns. Expected edge cases such as
//!   an empty pool or a negative keystroke are values, not errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Exceptional conditions raised while building value types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    /// A reserve balance below zero.
    #[error("reserve cannot be negative: {0}")]
    NegativeReserve(i128),
    /// Token decimals outside the range an `i128` scale factor can hold.
    #[error("token decimals {0} exceed the supported maximum of 38")]
    MalformedDescriptor(u8),
    /// Fee rate at or above 100%.
    #[error("fee rate of {0} bps must be below 10000")]
    InvalidFeeRate(u32),
    /// A contract that is not one of the pool's two tokens.
    #[error("token {token} is not part of pool {pool}")]
    TokenNotInPool {
        /// Token contract identifier.
        token: String,
        /// Pool identifier.
        pool: String,
    },
    /// A raw value too large for display arithmetic.
    #[error("value {0} does not fit display precision")]
    DecimalConversion(String),
}

/// Caller-visible validation failures carried by [`Quote::Invalid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ValidationIssue {
    /// Negative or unparseable amount.
    #[error("enter a valid, non-negative amount")]
    InvalidInput,
    /// Intermediate or final value beyond the signed 128-bit range.
    #[error("amount is too large, reduce amount")]
    PrecisionOverflow,
    /// Liquidity pair that does not match the pool ratio.
    #[error("amounts do not match the pool ratio, confirm the adjusted amounts")]
    ProportionalityMismatch,
}

/// Outcome of a calculator call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quote<T> {
    /// The calculation succeeded.
    Ready(T),
    /// The pool has a zero reserve, so no price exists.
    NoLiquidity,
    /// The input was rejected before computation.
    Invalid(ValidationIssue),
}

impl<T> Quote<T> {
    /// Returns the value if the quote is ready.
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::NoLiquidity | Self::Invalid(_) => None,
        }
    }

    /// Returns `true` for [`Quote::Ready`].
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns `true` for [`Quote::NoLiquidity`].
    pub const fn is_no_liquidity(&self) -> bool {
        matches!(self, Self::NoLiquidity)
    }

    /// Maps the ready value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Quote<U> {
        match self {
            Self::Ready(value) => Quote::Ready(f(value)),
            Self::NoLiquidity => Quote::NoLiquidity,
            Self::Invalid(issue) => Quote::Invalid(issue),
        }
    }

    /// Chains another calculation onto a ready value.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Quote<U>) -> Quote<U> {
        match self {
            Self::Ready(value) => f(value),
            Self::NoLiquidity => Quote::NoLiquidity,
            Self::Invalid(issue) => Quote::Invalid(issue),
        }
    }

    /// User-facing message for a non-ready outcome.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Ready(_) => None,
            Self::NoLiquidity => Some("pool has no liquidity".to_string()),
            Self::Invalid(issue) => Some(issue.to_string()),
        }
    }
}

impl<T> From<ValidationIssue> for Quote<T> {
    fn from(issue: ValidationIssue) -> Self {
        Self::Invalid(issue)
    }
}
