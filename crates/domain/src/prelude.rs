//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use stellar_amm_domain::prelude::*;
//! ```

// Entities
pub use crate::entities::pool::{PoolReserves, PoolSnapshot, ReservePair};
pub use crate::entities::token::{ContractRef, Decimals, TokenDescriptor, TokenMetadata};

// Enums
pub use crate::enums::{MappingSource, MetricSource, PoolSide, SlotOrder, TokenRole};

// Errors
pub use crate::error::{AmmError, Quote, ValidationIssue};

// Formatting
pub use crate::format::{
    format_change_metric, format_in_units, format_large_number, format_metric, format_percent_change,
    format_percentage, format_token_amount,
};

// Math
pub use crate::math::constant_product::{
    calculate_minimum_received, calculate_out_amount, calculate_price_impact,
    calculate_required_input, calculate_spot_price,
};
pub use crate::math::liquidity::{
    initial_liquidity, is_proportional, pool_share, proportional_amount, quote_add_liquidity,
    reconcile_pair,
};
pub use crate::math::scaling::{decimal_to_raw, parse_amount, raw_to_decimal};

// Metrics
pub use crate::metrics::market::{MarketContext, analytics_with_roles, estimate_pool_analytics};
pub use crate::metrics::volume::VolumeCounters;
pub use crate::metrics::{MetricFigure, PoolAnalytics};

// Roles
pub use crate::roles::{PricingRoles, assign_pricing_roles, resolve_snapshot};

// Value objects
pub use crate::value_objects::{Amount, FeeRate, LiquidityCheck, LiquidityQuote, Price, SwapQuote};
