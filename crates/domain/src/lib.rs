//! Constant-product AMM math for Soroban DEX pools.
//!
//! This crate is pure and synchronous; it performs no I/O. It provides:
//! - Swap quotes with the pool fee, in exact integer arithmetic
//! - Proportional add-liquidity amounts and ratio validation
//! - Reserve-to-token resolution from pool query results
//! - Price, market cap, liquidity and volume estimation
//! - Dollar and percentage formatting for display

/// Prelude module for convenient imports.
pub mod prelude;

/// Pool and token value types.
pub mod entities;
/// Shared enumerations.
pub mod enums;
/// Error taxonomy and quote outcomes.
pub mod error;
/// Display formatting.
pub mod format;
/// Swap, liquidity and scaling math.
pub mod math;
/// Market metrics.
pub mod metrics;
/// Reserve mapping and base/quote assignment.
pub mod roles;
/// Amounts, fees, prices and quotes.
pub mod value_objects;
