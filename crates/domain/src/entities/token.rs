use crate::enums::TokenRole;
use crate::error::AmmError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest supported decimal count. `10^38` is the largest power of ten an `i128` holds.
pub const MAX_DECIMALS: u8 = 38;

/// Decimal places of a token's raw integer representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Decimals(u8);

impl Decimals {
    /// Native asset (XLM) precision.
    pub const NATIVE: Self = Self(7);
    /// Precision of contract-issued stable assets.
    pub const STABLE: Self = Self(6);
    /// Precision of launcher-minted fungible tokens.
    pub const STANDARD: Self = Self(18);

    /// Creates a validated decimal count.
    ///
    /// # Errors
    /// Returns [`AmmError::MalformedDescriptor`] above [`MAX_DECIMALS`].
    pub fn new(decimals: u8) -> Result<Self, AmmError> {
        if decimals > MAX_DECIMALS {
            return Err(AmmError::MalformedDescriptor(decimals));
        }
        Ok(Self(decimals))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns `10^decimals`.
    #[must_use]
    pub const fn scale_factor(self) -> i128 {
        10i128.pow(self.0 as u32)
    }
}

impl TryFrom<u8> for Decimals {
    type Error = AmmError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Decimals> for u8 {
    fn from(d: Decimals) -> Self {
        d.0
    }
}

impl fmt::Display for Decimals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque contract identifier (a Soroban `C...` address in practice).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractRef(String);

impl ContractRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContractRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ContractRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ContractRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the calculators need to know about a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub contract: ContractRef,
    pub decimals: Decimals,
    pub role: TokenRole,
}

impl TokenDescriptor {
    pub fn new(contract: impl Into<ContractRef>, decimals: Decimals, role: TokenRole) -> Self {
        Self {
            contract: contract.into(),
            decimals,
            role,
        }
    }

    /// Native asset with 7 decimals.
    pub fn native(contract: impl Into<ContractRef>) -> Self {
        Self::new(contract, Decimals::NATIVE, TokenRole::Native)
    }

    /// Stable asset with 6 decimals.
    pub fn stable(contract: impl Into<ContractRef>) -> Self {
        Self::new(contract, Decimals::STABLE, TokenRole::Stable)
    }

    /// Launcher token with 18 decimals.
    pub fn standard(contract: impl Into<ContractRef>) -> Self {
        Self::new(contract, Decimals::STANDARD, TokenRole::Standard)
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        self.role == TokenRole::Native
    }
}

/// Token descriptor plus display metadata, as returned by a token contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub descriptor: TokenDescriptor,
    pub symbol: String,
    pub name: String,
    /// Total supply in raw units, when the contract exposes it.
    #[serde(default)]
    pub total_supply_raw: Option<i128>,
}

impl TokenMetadata {
    pub fn new(
        descriptor: TokenDescriptor,
        symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            descriptor,
            symbol: symbol.into(),
            name: name.into(),
            total_supply_raw: None,
        }
    }

    #[must_use]
    pub fn with_supply(mut self, total_supply_raw: i128) -> Self {
        self.total_supply_raw = Some(total_supply_raw);
        self
    }
}
