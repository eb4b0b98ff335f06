//! Pool source backed by an HTTP indexer.
//!
//! Raw amounts travel as decimal strings since they routinely exceed the
//! range JSON numbers survive in most clients.

use crate::config::NetworkConfig;
use crate::error::{ConfigError, DataError};
use crate::source::PoolDataSource;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use stellar_amm_domain::entities::pool::PoolReserves;
use stellar_amm_domain::entities::token::{ContractRef, Decimals, TokenDescriptor, TokenMetadata};
use stellar_amm_domain::enums::TokenRole;
use stellar_amm_domain::metrics::volume::VolumeCounters;
use tracing::{debug, warn};

const SOURCE_NAME: &str = "indexer";

#[derive(Debug, Deserialize)]
struct IndexerPool {
    #[serde(default)]
    token_a: Option<String>,
    #[serde(default)]
    token_b: Option<String>,
    reserve_a: String,
    reserve_b: String,
}

#[derive(Debug, Deserialize)]
struct IndexerToken {
    contract: String,
    symbol: String,
    name: String,
    decimals: u8,
    #[serde(default)]
    role: Option<TokenRole>,
    #[serde(default)]
    total_supply: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndexerVolume {
    denomination: String,
    volume_24h: String,
    volume_7d: String,
    volume_all_time: String,
}

/// HTTP client for the pool indexer.
#[derive(Debug, Clone)]
pub struct IndexerPoolSource {
    client: Client,
    base_url: String,
}

impl IndexerPoolSource {
    /// Builds a client from `config.indexer_url`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] when no indexer is configured, or
    /// [`DataError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &NetworkConfig) -> Result<Self, DataError> {
        let base_url = config
            .indexer_url
            .clone()
            .ok_or(ConfigError::Missing("AMM_INDEXER_URL"))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GETs `path`, mapping 404 to `Ok(None)`.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, DataError> {
        let url = self.url(path);
        debug!(url = %url, "Indexer request");
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.error_for_status()?.json::<T>().await?;
        Ok(Some(body))
    }
}

fn parse_raw(field: &str, value: &str) -> Result<i128, DataError> {
    value.parse::<i128>().map_err(|_| {
        warn!(field, value, "Indexer returned a malformed amount");
        DataError::InvalidResponse {
            source_name: SOURCE_NAME,
            reason: format!("{field} is not an integer: '{value}'"),
        }
    })
}

fn into_reserves(pool: &str, raw: IndexerPool) -> Result<PoolReserves, DataError> {
    Ok(PoolReserves {
        pool: pool.to_string(),
        token_a: raw.token_a.map(ContractRef::from),
        token_b: raw.token_b.map(ContractRef::from),
        reserve_a: parse_raw("reserve_a", &raw.reserve_a)?,
        reserve_b: parse_raw("reserve_b", &raw.reserve_b)?,
    })
}

fn into_metadata(raw: IndexerToken) -> Result<TokenMetadata, DataError> {
    let decimals = Decimals::new(raw.decimals)?;
    let role = raw.role.unwrap_or(TokenRole::Standard);
    let descriptor = TokenDescriptor::new(raw.contract, decimals, role);
    let metadata = TokenMetadata::new(descriptor, raw.symbol, raw.name);
    match raw.total_supply {
        Some(supply) => Ok(metadata.with_supply(parse_raw("total_supply", &supply)?)),
        None => Ok(metadata),
    }
}

fn into_counters(raw: IndexerVolume) -> Result<VolumeCounters, DataError> {
    Ok(VolumeCounters {
        denomination: ContractRef::from(raw.denomination),
        volume_24h: parse_raw("volume_24h", &raw.volume_24h)?,
        volume_7d: parse_raw("volume_7d", &raw.volume_7d)?,
        volume_all_time: parse_raw("volume_all_time", &raw.volume_all_time)?,
    })
}

#[async_trait]
impl PoolDataSource for IndexerPoolSource {
    async fn fetch_reserves(&self, pool: &str) -> Result<PoolReserves, DataError> {
        let raw: IndexerPool = self
            .get_optional(&format!("pools/{pool}"))
            .await?
            .ok_or_else(|| DataError::PoolNotFound(pool.to_string()))?;
        into_reserves(pool, raw)
    }

    async fn fetch_token(&self, contract: &ContractRef) -> Result<TokenMetadata, DataError> {
        let raw: IndexerToken = self
            .get_optional(&format!("tokens/{contract}"))
            .await?
            .ok_or_else(|| DataError::TokenNotFound(contract.to_string()))?;
        into_metadata(raw)
    }

    async fn fetch_volume(&self, pool: &str) -> Result<Option<VolumeCounters>, DataError> {
        self.get_optional::<IndexerVolume>(&format!("pools/{pool}/volume"))
            .await?
            .map(into_counters)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_indexer_url() {
        let result = IndexerPoolSource::new(&NetworkConfig::default());
        assert!(matches!(
            result,
            Err(DataError::Config(ConfigError::Missing("AMM_INDEXER_URL")))
        ));
    }

    #[test]
    fn test_url_join() {
        let config = NetworkConfig {
            indexer_url: Some("https://indexer.example".to_string()),
            ..NetworkConfig::default()
        };
        let source = IndexerPoolSource::new(&config).unwrap();
        assert_eq!(source.url("pools/CPOOL"), "https://indexer.example/pools/CPOOL");
    }

    #[test]
    fn test_pool_payload() {
        let raw: IndexerPool = serde_json::from_str(
            r#"{ "token_a": "CXLM", "token_b": "CMEME",
                 "reserve_a": "50000000000", "reserve_b": "170141183460469231731687303715884105727" }"#,
        )
        .unwrap();
        let reserves = into_reserves("CPOOL", raw).unwrap();
        assert_eq!(reserves.token_a, Some(ContractRef::from("CXLM")));
        assert_eq!(reserves.reserve_b, i128::MAX);
    }

    #[test]
    fn test_token_payload_defaults_to_standard() {
        let raw: IndexerToken = serde_json::from_str(
            r#"{ "contract": "CMEME", "symbol": "MEME", "name": "Meme", "decimals": 18,
                 "total_supply": "1000000000000000000000000000" }"#,
        )
        .unwrap();
        let token = into_metadata(raw).unwrap();
        assert_eq!(token.descriptor.role, TokenRole::Standard);
        assert_eq!(token.total_supply_raw, Some(1_000_000_000_000_000_000_000_000_000));
    }

    #[test]
    fn test_malformed_payloads() {
        let raw: IndexerPool =
            serde_json::from_str(r#"{ "reserve_a": "12.5", "reserve_b": "1" }"#).unwrap();
        assert!(matches!(
            into_reserves("CPOOL", raw),
            Err(DataError::InvalidResponse { .. })
        ));

        let raw: IndexerToken = serde_json::from_str(
            r#"{ "contract": "CBAD", "symbol": "BAD", "name": "Bad", "decimals": 40 }"#,
        )
        .unwrap();
        assert!(matches!(into_metadata(raw), Err(DataError::Domain(_))));
    }
}
