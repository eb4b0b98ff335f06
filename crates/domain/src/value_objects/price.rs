use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Units of quote token per unit of base token, in human-readable terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Base per quote. A zero price stays zero.
    pub fn invert(&self) -> Self {
        if self.value.is_zero() {
            return Self {
                value: Decimal::ZERO,
            };
        }
        Self {
            value: Decimal::ONE / self.value,
        }
    }

    /// Re-denominates the price given the USD value of one quote unit.
    pub fn in_usd(&self, quote_usd_price: Decimal) -> Option<Decimal> {
        self.value.checked_mul(quote_usd_price)
    }
}
