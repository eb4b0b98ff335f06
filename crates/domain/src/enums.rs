use crate::entities::token::Decimals;
use serde::{Deserialize, Serialize};

/// Economic role of a token inside a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenRole {
    /// The network's native asset (XLM).
    Native,
    /// A contract-issued stable asset.
    Stable,
    /// Any other fungible token, e.g. one minted by the token launcher.
    Standard,
}

impl TokenRole {
    /// Conventional decimals for tokens of this role.
    pub const fn default_decimals(self) -> Decimals {
        match self {
            Self::Native => Decimals::NATIVE,
            Self::Stable => Decimals::STABLE,
            Self::Standard => Decimals::STANDARD,
        }
    }
}

/// One of the two reserve slots of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolSide {
    A,
    B,
}

impl PoolSide {
    pub const fn opposite(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// How reserve slots were matched to token descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappingSource {
    /// The pool query named the token contract of each slot.
    DeclaredContracts,
    /// Slots follow the token order the pool was registered with.
    DeclaredOrder,
    /// Guessed from reserve digit counts and token decimals.
    InferredFromMagnitude,
}

/// Whether a caller's `(token_a, token_b)` order matches the pool's reserve slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotOrder {
    /// Token order as registered with the factory; first token owns the first reserve.
    Declared,
    /// Tokens known, slot order not.
    Unknown,
}

/// Where a reported metric comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricSource {
    /// Read from pool contract accumulators.
    OnChain,
    /// Derived deterministically from a hash; not a measurement.
    Synthetic,
}
