use crate::error::DataError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stellar_amm_domain::entities::pool::PoolReserves;
use stellar_amm_domain::entities::token::{ContractRef, TokenMetadata};
use stellar_amm_domain::enums::SlotOrder;
use stellar_amm_domain::metrics::volume::VolumeCounters;

/// A pool and its two tokens.
///
/// Keys built with [`PoolKey::new`] carry the factory's registration order,
/// which is also the order of the pool's reserve slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    pub pool: String,
    pub token_a: ContractRef,
    pub token_b: ContractRef,
    #[serde(default = "declared_order")]
    pub slot_order: SlotOrder,
}

fn declared_order() -> SlotOrder {
    SlotOrder::Declared
}

impl PoolKey {
    /// Tokens in factory registration order.
    pub fn new(pool: impl Into<String>, token_a: ContractRef, token_b: ContractRef) -> Self {
        Self {
            pool: pool.into(),
            token_a,
            token_b,
            slot_order: SlotOrder::Declared,
        }
    }

    /// Tokens whose order may not match the reserve slots.
    pub fn unordered(pool: impl Into<String>, token_a: ContractRef, token_b: ContractRef) -> Self {
        Self {
            slot_order: SlotOrder::Unknown,
            ..Self::new(pool, token_a, token_b)
        }
    }
}

/// Read access to on-chain pool state.
///
/// Implementations must be cheap to share across tasks; the service holds
/// them behind an `Arc` and issues concurrent requests.
#[async_trait]
pub trait PoolDataSource: Send + Sync {
    /// Current reserves of `pool`, with slot contracts when the source knows them.
    async fn fetch_reserves(&self, pool: &str) -> Result<PoolReserves, DataError>;

    /// Descriptor and display metadata of a token contract.
    async fn fetch_token(&self, contract: &ContractRef) -> Result<TokenMetadata, DataError>;

    /// Volume counters of `pool`, or `None` when the pool does not track them.
    async fn fetch_volume(&self, pool: &str) -> Result<Option<VolumeCounters>, DataError>;
}
