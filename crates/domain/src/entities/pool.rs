use crate::entities::token::{ContractRef, TokenDescriptor};
use crate::enums::{MappingSource, PoolSide};
use crate::error::AmmError;
use serde::{Deserialize, Serialize};

/// Two raw reserve balances, oriented in trade direction.
///
/// When stored in a [`PoolSnapshot`] the `in` slot is token A and the `out`
/// slot is token B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(i128, i128)", into = "(i128, i128)")]
pub struct ReservePair {
    reserve_in: i128,
    reserve_out: i128,
}

impl ReservePair {
    /// Creates a reserve pair.
    ///
    /// # Errors
    /// Returns [`AmmError::NegativeReserve`] if either balance is below zero.
    pub fn new(reserve_in: i128, reserve_out: i128) -> Result<Self, AmmError> {
        for reserve in [reserve_in, reserve_out] {
            if reserve < 0 {
                return Err(AmmError::NegativeReserve(reserve));
            }
        }
        Ok(Self {
            reserve_in,
            reserve_out,
        })
    }

    /// A pool that never received liquidity.
    pub const EMPTY: Self = Self {
        reserve_in: 0,
        reserve_out: 0,
    };

    #[must_use]
    pub const fn reserve_in(&self) -> i128 {
        self.reserve_in
    }

    #[must_use]
    pub const fn reserve_out(&self) -> i128 {
        self.reserve_out
    }

    /// Reserve of a side, reading `in` as A and `out` as B.
    #[must_use]
    pub const fn reserve(&self, side: PoolSide) -> i128 {
        match side {
            PoolSide::A => self.reserve_in,
            PoolSide::B => self.reserve_out,
        }
    }

    /// Either reserve is zero; no quote is possible.
    #[must_use]
    pub const fn is_uninitialized(&self) -> bool {
        self.reserve_in == 0 || self.reserve_out == 0
    }

    /// Both reserves are zero; the next deposit sets the initial price.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.reserve_in == 0 && self.reserve_out == 0
    }

    /// The same pool seen from the other direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        Self {
            reserve_in: self.reserve_out,
            reserve_out: self.reserve_in,
        }
    }
}

impl TryFrom<(i128, i128)> for ReservePair {
    type Error = AmmError;

    fn try_from((reserve_in, reserve_out): (i128, i128)) -> Result<Self, Self::Error> {
        Self::new(reserve_in, reserve_out)
    }
}

impl From<ReservePair> for (i128, i128) {
    fn from(pair: ReservePair) -> Self {
        (pair.reserve_in, pair.reserve_out)
    }
}

/// Raw result of a pool reserves query.
///
/// `token_a`/`token_b` name the contract held in each slot when the query
/// reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReserves {
    pub pool: String,
    #[serde(default)]
    pub token_a: Option<ContractRef>,
    #[serde(default)]
    pub token_b: Option<ContractRef>,
    pub reserve_a: i128,
    pub reserve_b: i128,
}

impl PoolReserves {
    /// Reserves whose slot order is known to follow `token_a`, `token_b`.
    pub fn declared(
        pool: impl Into<String>,
        token_a: ContractRef,
        token_b: ContractRef,
        reserve_a: i128,
        reserve_b: i128,
    ) -> Self {
        Self {
            pool: pool.into(),
            token_a: Some(token_a),
            token_b: Some(token_b),
            reserve_a,
            reserve_b,
        }
    }
}

/// A pool's reserves matched to its two tokens at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub pool: String,
    /// Token A reserve in the `in` slot, token B in the `out` slot.
    pub reserves: ReservePair,
    pub token_a: TokenDescriptor,
    pub token_b: TokenDescriptor,
    pub mapping: MappingSource,
}

impl PoolSnapshot {
    /// Side holding the given contract.
    #[must_use]
    pub fn side_of(&self, contract: &ContractRef) -> Option<PoolSide> {
        if &self.token_a.contract == contract {
            Some(PoolSide::A)
        } else if &self.token_b.contract == contract {
            Some(PoolSide::B)
        } else {
            None
        }
    }

    #[must_use]
    pub fn descriptor(&self, side: PoolSide) -> &TokenDescriptor {
        match side {
            PoolSide::A => &self.token_a,
            PoolSide::B => &self.token_b,
        }
    }

    /// Reserves oriented for selling `from` into the pool.
    ///
    /// # Errors
    /// Returns [`AmmError::TokenNotInPool`] if `from` is not one of the pool's tokens.
    pub fn directed(&self, from: &ContractRef) -> Result<ReservePair, AmmError> {
        match self.side_of(from) {
            Some(PoolSide::A) => Ok(self.reserves),
            Some(PoolSide::B) => Ok(self.reserves.flipped()),
            None => Err(AmmError::TokenNotInPool {
                token: from.to_string(),
                pool: self.pool.clone(),
            }),
        }
    }
}
