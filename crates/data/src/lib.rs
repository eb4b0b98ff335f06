//! Pool data access for the AMM calculators.
//!
//! This crate is the I/O side of the workspace:
//! - Network configuration injected from the environment
//! - A `PoolDataSource` trait with in-memory and indexer implementations
//! - Concurrent snapshot loading with in-flight deduplication
//! - Selection tickets that discard responses for pools no longer on screen

/// Network configuration.
pub mod config;
/// Error types.
pub mod error;
/// HTTP indexer source.
pub mod indexer;
/// In-memory and JSON file source.
pub mod memory;
/// Selection tracking for stale-response guards.
pub mod selection;
/// Snapshot loading and analytics.
pub mod service;
/// Data source trait.
pub mod source;

pub use config::NetworkConfig;
pub use error::{ConfigError, DataError};
pub use indexer::IndexerPoolSource;
pub use memory::InMemoryPoolSource;
pub use selection::{SelectionGuard, SelectionTicket};
pub use service::{LoadedPool, MarketDataService, UsdPrices};
pub use source::{PoolDataSource, PoolKey};
