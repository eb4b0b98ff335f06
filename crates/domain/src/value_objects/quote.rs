use crate::enums::PoolSide;
use crate::error::ValidationIssue;
use serde::{Deserialize, Serialize};

/// Result of a swap calculation. All amounts are raw units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub amount_in: i128,
    pub amount_in_after_fee: i128,
    pub amount_out: i128,
    pub fee_bps: u32,
}

impl SwapQuote {
    /// A quote for a zero input.
    pub const fn zero(fee_bps: u32) -> Self {
        Self {
            amount_in: 0,
            amount_in_after_fee: 0,
            amount_out: 0,
            fee_bps,
        }
    }
}

/// Amounts for an add-liquidity request. All amounts are raw units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidityQuote {
    /// Deposit into a pool with reserves; the non-edited side was computed.
    Proportional {
        amount_a: i128,
        amount_b: i128,
        edited: PoolSide,
    },
    /// First deposit into an empty pool; both sides chosen by the caller.
    Initial {
        amount_a: i128,
        amount_b: i128,
        /// `floor(sqrt(a * b))`, an advisory LP share estimate.
        estimated_shares: i128,
    },
}

impl LiquidityQuote {
    #[must_use]
    pub const fn amounts(&self) -> (i128, i128) {
        match *self {
            Self::Proportional {
                amount_a, amount_b, ..
            }
            | Self::Initial {
                amount_a, amount_b, ..
            } => (amount_a, amount_b),
        }
    }
}

/// Verdict on a user-supplied liquidity pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidityCheck {
    /// Safe to submit as-is.
    Accepted(LiquidityQuote),
    /// The pair was off-ratio; submit `suggested` only after the user confirms it.
    NeedsConfirmation {
        suggested: LiquidityQuote,
        issue: ValidationIssue,
    },
}
