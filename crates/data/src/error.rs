use stellar_amm_domain::error::AmmError;
use thiserror::Error;

/// Errors raised while fetching pool data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("pool not found: {0}")]
    PoolNotFound(String),
    #[error("token not found: {0}")]
    TokenNotFound(String),
    #[error("invalid response from {source_name}: {reason}")]
    InvalidResponse {
        source_name: &'static str,
        reason: String,
    },
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Domain(#[from] AmmError),
}

/// Errors raised while loading [`crate::NetworkConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown network '{0}', expected testnet, futurenet, mainnet or local")]
    UnknownNetwork(String),
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}
