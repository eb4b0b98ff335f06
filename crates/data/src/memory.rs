//! In-memory pool source, optionally seeded from a JSON snapshot file.

use crate::error::DataError;
use crate::source::{PoolDataSource, PoolKey};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use stellar_amm_domain::entities::pool::PoolReserves;
use stellar_amm_domain::entities::token::{ContractRef, TokenMetadata};
use stellar_amm_domain::metrics::volume::VolumeCounters;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// On-disk layout of a snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub pools: Vec<PoolReserves>,
    #[serde(default)]
    pub tokens: Vec<TokenMetadata>,
    #[serde(default)]
    pub volumes: HashMap<String, VolumeCounters>,
}

/// Pool data held in memory.
#[derive(Debug, Default)]
pub struct InMemoryPoolSource {
    pools: RwLock<HashMap<String, PoolReserves>>,
    tokens: RwLock<HashMap<ContractRef, TokenMetadata>>,
    volumes: RwLock<HashMap<String, VolumeCounters>>,
}

impl InMemoryPoolSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: SnapshotFile) -> Self {
        Self {
            pools: RwLock::new(
                snapshot
                    .pools
                    .into_iter()
                    .map(|reserves| (reserves.pool.clone(), reserves))
                    .collect(),
            ),
            tokens: RwLock::new(
                snapshot
                    .tokens
                    .into_iter()
                    .map(|token| (token.descriptor.contract.clone(), token))
                    .collect(),
            ),
            volumes: RwLock::new(snapshot.volumes),
        }
    }

    /// Loads a snapshot file written as JSON.
    ///
    /// # Errors
    /// Returns [`DataError::Io`] if the file cannot be read and
    /// [`DataError::Json`] if it does not parse.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await?;
        let snapshot: SnapshotFile = serde_json::from_str(&contents)?;
        info!(
            path = %path.display(),
            pools = snapshot.pools.len(),
            tokens = snapshot.tokens.len(),
            "Loaded pool snapshot"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    /// Keys of every stored pool whose slot contracts are declared.
    pub async fn pool_keys(&self) -> Vec<PoolKey> {
        let pools = self.pools.read().await;
        let mut keys: Vec<PoolKey> = pools
            .values()
            .filter_map(|reserves| match (&reserves.token_a, &reserves.token_b) {
                (Some(a), Some(b)) => Some(PoolKey::new(reserves.pool.clone(), a.clone(), b.clone())),
                _ => None,
            })
            .collect();
        keys.sort_by(|a, b| a.pool.cmp(&b.pool));
        keys
    }

    pub async fn insert_reserves(&self, reserves: PoolReserves) {
        debug!(pool = %reserves.pool, "Storing reserves");
        self.pools.write().await.insert(reserves.pool.clone(), reserves);
    }

    pub async fn insert_token(&self, token: TokenMetadata) {
        self.tokens
            .write()
            .await
            .insert(token.descriptor.contract.clone(), token);
    }

    pub async fn insert_volume(&self, pool: impl Into<String>, counters: VolumeCounters) {
        self.volumes.write().await.insert(pool.into(), counters);
    }
}

#[async_trait]
impl PoolDataSource for InMemoryPoolSource {
    async fn fetch_reserves(&self, pool: &str) -> Result<PoolReserves, DataError> {
        self.pools
            .read()
            .await
            .get(pool)
            .cloned()
            .ok_or_else(|| DataError::PoolNotFound(pool.to_string()))
    }

    async fn fetch_token(&self, contract: &ContractRef) -> Result<TokenMetadata, DataError> {
        self.tokens
            .read()
            .await
            .get(contract)
            .cloned()
            .ok_or_else(|| DataError::TokenNotFound(contract.to_string()))
    }

    async fn fetch_volume(&self, pool: &str) -> Result<Option<VolumeCounters>, DataError> {
        Ok(self.volumes.read().await.get(pool).cloned())
    }
}
