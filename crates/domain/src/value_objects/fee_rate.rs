use crate::error::AmmError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parts per 10 000.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Swap fee in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FeeRate(u32);

impl FeeRate {
    /// The pool contracts' 0.3% fee.
    pub const DEFAULT: Self = Self(30);

    /// Creates a fee rate.
    ///
    /// # Errors
    /// Returns [`AmmError::InvalidFeeRate`] for 100% or more.
    pub fn from_bps(bps: u32) -> Result<Self, AmmError> {
        if bps >= BPS_DENOMINATOR {
            return Err(AmmError::InvalidFeeRate(bps));
        }
        Ok(Self(bps))
    }

    #[must_use]
    pub const fn bps(self) -> u32 {
        self.0
    }

    /// Basis points kept after the fee, e.g. 9970 for 30 bps.
    #[must_use]
    pub const fn retained_bps(self) -> u32 {
        BPS_DENOMINATOR - self.0
    }

    /// Fee as a percentage (30 bps -> 0.3).
    #[must_use]
    pub fn as_percent(self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(100)
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for FeeRate {
    type Error = AmmError;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        Self::from_bps(bps)
    }
}

impl From<FeeRate> for u32 {
    fn from(fee: FeeRate) -> Self {
        fee.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fee_rate() {
        let fee = FeeRate::default();
        assert_eq!(fee.bps(), 30);
        assert_eq!(fee.retained_bps(), 9970);
        assert_eq!(fee.as_percent(), dec!(0.3));
        assert_eq!(FeeRate::from_bps(10_000), Err(AmmError::InvalidFeeRate(10_000)));
        assert_eq!(FeeRate::from_bps(9_999).map(FeeRate::bps), Ok(9_999));
    }
}
