//! Network configuration.
//!
//! Everything that used to be a literal at call sites (RPC endpoint,
//! passphrase, contract ids) lives here and is injected into sources.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use stellar_amm_domain::entities::token::ContractRef;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Connection settings for one Stellar network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network name (testnet, futurenet, mainnet, local).
    pub network: String,
    /// Soroban RPC endpoint.
    pub rpc_url: String,
    /// Network passphrase used when signing.
    pub network_passphrase: String,
    /// Pool factory contract.
    pub factory_contract: Option<ContractRef>,
    /// Token launcher contract.
    pub launcher_contract: Option<ContractRef>,
    /// Base URL of the pool indexer, if one is deployed.
    pub indexer_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl NetworkConfig {
    /// Defaults for a named network.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownNetwork`] for unrecognised names, and
    /// [`ConfigError::Missing`] for mainnet, which has no public default RPC.
    pub fn for_network(network: &str) -> Result<Self, ConfigError> {
        let (rpc_url, passphrase) = match network {
            "testnet" => (
                "https://soroban-testnet.stellar.org",
                "Test SDF Network ; September 2015",
            ),
            "futurenet" => (
                "https://rpc-futurenet.stellar.org",
                "Test SDF Future Network ; October 2022",
            ),
            "local" | "standalone" => (
                "http://localhost:8000/soroban/rpc",
                "Standalone Network ; February 2017",
            ),
            "mainnet" | "public" => return Err(ConfigError::Missing("STELLAR_RPC_URL")),
            other => return Err(ConfigError::UnknownNetwork(other.to_string())),
        };

        Ok(Self {
            network: network.to_string(),
            rpc_url: rpc_url.to_string(),
            network_passphrase: passphrase.to_string(),
            factory_contract: None,
            launcher_contract: None,
            indexer_url: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    /// See [`NetworkConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// Recognised keys: `STELLAR_NETWORK` (default `testnet`),
    /// `STELLAR_RPC_URL`, `STELLAR_NETWORK_PASSPHRASE`,
    /// `AMM_FACTORY_CONTRACT`, `AMM_LAUNCHER_CONTRACT`, `AMM_INDEXER_URL`,
    /// `AMM_REQUEST_TIMEOUT_SECS`.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] for unknown networks, missing mainnet
    /// settings, or an unparseable timeout.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let network = lookup("STELLAR_NETWORK").unwrap_or_else(|| "testnet".to_string());
        let rpc_override = lookup("STELLAR_RPC_URL");

        let mut config = match (Self::for_network(&network), rpc_override.clone()) {
            (Ok(config), _) => config,
            // mainnet only needs an explicit endpoint and passphrase
            (Err(ConfigError::Missing(_)), Some(rpc_url)) => Self {
                network: network.clone(),
                rpc_url,
                network_passphrase: lookup("STELLAR_NETWORK_PASSPHRASE").unwrap_or_else(|| {
                    "Public Global Stellar Network ; September 2015".to_string()
                }),
                factory_contract: None,
                launcher_contract: None,
                indexer_url: None,
                request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            (Err(err), _) => return Err(err),
        };

        if let Some(rpc_url) = rpc_override {
            config.rpc_url = rpc_url;
        }
        if let Some(passphrase) = lookup("STELLAR_NETWORK_PASSPHRASE") {
            config.network_passphrase = passphrase;
        }
        config.factory_contract = lookup("AMM_FACTORY_CONTRACT").map(ContractRef::from);
        config.launcher_contract = lookup("AMM_LAUNCHER_CONTRACT").map(ContractRef::from);
        config.indexer_url = lookup("AMM_INDEXER_URL").map(|url| url.trim_end_matches('/').to_string());
        if let Some(raw) = lookup("AMM_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    key: "AMM_REQUEST_TIMEOUT_SECS",
                    value: raw,
                })?;
        }
        Ok(config)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network: "testnet".to_string(),
            rpc_url: "https://soroban-testnet.stellar.org".to_string(),
            network_passphrase: "Test SDF Network ; September 2015".to_string(),
            factory_contract: None,
            launcher_contract: None,
            indexer_url: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_testnet() {
        let config = NetworkConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, NetworkConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = NetworkConfig::from_lookup(lookup(&[
            ("STELLAR_NETWORK", "futurenet"),
            ("AMM_FACTORY_CONTRACT", "CFACTORY"),
            ("AMM_INDEXER_URL", "https://indexer.example/"),
            ("AMM_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.network_passphrase, "Test SDF Future Network ; October 2022");
        assert_eq!(config.factory_contract, Some(ContractRef::from("CFACTORY")));
        assert_eq!(config.indexer_url.as_deref(), Some("https://indexer.example"));
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_mainnet_requires_rpc_url() {
        let missing = NetworkConfig::from_lookup(lookup(&[("STELLAR_NETWORK", "mainnet")]));
        assert_eq!(missing, Err(ConfigError::Missing("STELLAR_RPC_URL")));

        let config = NetworkConfig::from_lookup(lookup(&[
            ("STELLAR_NETWORK", "mainnet"),
            ("STELLAR_RPC_URL", "https://rpc.example"),
        ]))
        .unwrap();
        assert_eq!(
            config.network_passphrase,
            "Public Global Stellar Network ; September 2015"
        );
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            NetworkConfig::from_lookup(lookup(&[("STELLAR_NETWORK", "devnet")])),
            Err(ConfigError::UnknownNetwork("devnet".to_string()))
        );
        assert!(matches!(
            NetworkConfig::from_lookup(lookup(&[("AMM_REQUEST_TIMEOUT_SECS", "0")])),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
