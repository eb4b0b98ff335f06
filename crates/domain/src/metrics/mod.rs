use crate::enums::MetricSource;
use crate::roles::PricingRoles;
use crate::value_objects::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod market;
pub mod volume;

/// A displayed number and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricFigure {
    pub value: Decimal,
    pub source: MetricSource,
}

impl MetricFigure {
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.source == MetricSource::Synthetic
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolAnalytics {
    pub pool: String,
    pub roles: PricingRoles,
    /// Base token price in quote units.
    pub price: Price,
    pub price_usd: Decimal,
    pub market_cap_usd: Option<Decimal>,
    pub liquidity_usd: Decimal,
    pub volume_24h_usd: MetricFigure,
    /// Percent.
    pub price_change_24h: MetricFigure,
}
