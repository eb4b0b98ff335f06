use crate::entities::pool::{PoolSnapshot, ReservePair};
use crate::entities::token::Decimals;
use crate::enums::MetricSource;
use crate::error::{AmmError, Quote, ValidationIssue};
use crate::math::constant_product;
use crate::math::scaling;
use crate::metrics::volume::{self, VolumeCounters};
use crate::metrics::{MetricFigure, PoolAnalytics};
use crate::roles::{self, PricingRoles};
use crate::value_objects::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inputs besides the snapshot needed to value a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketContext {
    /// Base token total supply in raw units, if known.
    pub total_supply_raw: Option<i128>,
    /// USD value of one quote token; 1 for stable quotes.
    pub quote_usd_price: Decimal,
}

impl Default for MarketContext {
    fn default() -> Self {
        Self {
            total_supply_raw: None,
            quote_usd_price: Decimal::ONE,
        }
    }
}

/// Price of the base token in quote units:
/// (quote_reserve / 10^quote_decimals) / (base_reserve / 10^base_decimals)
pub fn calculate_unit_price(snapshot: &PoolSnapshot, roles: PricingRoles) -> Quote<Price> {
    let base_quote = ReservePair::new(
        snapshot.reserves.reserve(roles.base),
        snapshot.reserves.reserve(roles.quote),
    );
    match base_quote {
        Ok(pair) => constant_product::calculate_spot_price(
            &pair,
            snapshot.descriptor(roles.base).decimals,
            snapshot.descriptor(roles.quote).decimals,
        ),
        Err(_) => Quote::Invalid(ValidationIssue::InvalidInput),
    }
}

/// Unit price times human-readable total supply.
///
/// # Errors
/// Returns [`AmmError::DecimalConversion`] if the supply or product leaves `Decimal` range.
pub fn calculate_market_cap(
    unit_price: Decimal,
    total_supply_raw: i128,
    base_decimals: Decimals,
) -> Result<Decimal, AmmError> {
    let supply = scaling::raw_to_decimal(total_supply_raw, base_decimals)?;
    unit_price
        .checked_mul(supply)
        .ok_or_else(|| AmmError::DecimalConversion(total_supply_raw.to_string()))
}

/// TVL proxy: twice the quote-side reserve, in USD.
///
/// # Errors
/// Returns [`AmmError::DecimalConversion`] if the reserve leaves `Decimal` range.
pub fn calculate_liquidity(
    snapshot: &PoolSnapshot,
    roles: PricingRoles,
    quote_usd_price: Decimal,
) -> Result<Decimal, AmmError> {
    let raw = snapshot.reserves.reserve(roles.quote);
    let quote = scaling::raw_to_decimal(raw, snapshot.descriptor(roles.quote).decimals)?;
    quote
        .checked_mul(Decimal::TWO)
        .and_then(|v| v.checked_mul(quote_usd_price))
        .ok_or_else(|| AmmError::DecimalConversion(raw.to_string()))
}

/// USD value of 24h volume; on-chain counters when present, else synthetic.
///
/// # Errors
/// - [`AmmError::TokenNotInPool`] if the counters are denominated in a foreign token.
/// - [`AmmError::DecimalConversion`] if the counter leaves `Decimal` range.
pub fn calculate_volume_24h(
    snapshot: &PoolSnapshot,
    roles: PricingRoles,
    counters: Option<&VolumeCounters>,
    price_usd: Decimal,
    context: &MarketContext,
    liquidity_usd: Decimal,
) -> Result<MetricFigure, AmmError> {
    let Some(counters) = counters else {
        return Ok(volume::synthetic_volume_24h(
            &snapshot.pool,
            &snapshot.reserves,
            liquidity_usd,
        ));
    };

    let side = snapshot
        .side_of(&counters.denomination)
        .ok_or_else(|| AmmError::TokenNotInPool {
            token: counters.denomination.to_string(),
            pool: snapshot.pool.clone(),
        })?;
    let human = scaling::raw_to_decimal(counters.volume_24h, snapshot.descriptor(side).decimals)?;
    let unit_usd = if side == roles.quote {
        context.quote_usd_price
    } else {
        price_usd
    };
    let value = human
        .checked_mul(unit_usd)
        .ok_or_else(|| AmmError::DecimalConversion(counters.volume_24h.to_string()))?;
    Ok(MetricFigure {
        value,
        source: MetricSource::OnChain,
    })
}

/// Every figure the pool pages display, from one snapshot.
///
/// Base and quote follow [`roles::assign_pricing_roles`]. An uninitialized
/// pool yields [`Quote::NoLiquidity`]; values beyond display range yield
/// [`ValidationIssue::PrecisionOverflow`].
pub fn estimate_pool_analytics(
    snapshot: &PoolSnapshot,
    context: &MarketContext,
    counters: Option<&VolumeCounters>,
) -> Quote<PoolAnalytics> {
    let roles = roles::assign_pricing_roles(&snapshot.token_a, &snapshot.token_b);
    analytics_with_roles(snapshot, roles, context, counters)
}

/// [`estimate_pool_analytics`] with the priced token chosen by the caller.
pub fn analytics_with_roles(
    snapshot: &PoolSnapshot,
    roles: PricingRoles,
    context: &MarketContext,
    counters: Option<&VolumeCounters>,
) -> Quote<PoolAnalytics> {
    if context.quote_usd_price.is_sign_negative() {
        return Quote::Invalid(ValidationIssue::InvalidInput);
    }
    calculate_unit_price(snapshot, roles).and_then(|price| {
        match build_analytics(snapshot, roles, context, counters, price) {
            Ok(analytics) => Quote::Ready(analytics),
            Err(AmmError::TokenNotInPool { .. }) => Quote::Invalid(ValidationIssue::InvalidInput),
            Err(_) => Quote::Invalid(ValidationIssue::PrecisionOverflow),
        }
    })
}

fn build_analytics(
    snapshot: &PoolSnapshot,
    roles: PricingRoles,
    context: &MarketContext,
    counters: Option<&VolumeCounters>,
    price: Price,
) -> Result<PoolAnalytics, AmmError> {
    let overflow = || AmmError::DecimalConversion(price.value.to_string());
    let price_usd = price.in_usd(context.quote_usd_price).ok_or_else(overflow)?;
    let market_cap_usd = context
        .total_supply_raw
        .map(|supply| calculate_market_cap(price_usd, supply, snapshot.descriptor(roles.base).decimals))
        .transpose()?;
    let liquidity_usd = calculate_liquidity(snapshot, roles, context.quote_usd_price)?;
    let volume_24h_usd =
        calculate_volume_24h(snapshot, roles, counters, price_usd, context, liquidity_usd)?;

    Ok(PoolAnalytics {
        pool: snapshot.pool.clone(),
        roles,
        price,
        price_usd,
        market_cap_usd,
        liquidity_usd,
        volume_24h_usd,
        price_change_24h: volume::synthetic_price_change(&snapshot.pool, &snapshot.reserves),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::token::{ContractRef, TokenDescriptor};
    use crate::enums::MappingSource;
    use crate::format::format_large_number;
    use rust_decimal_macros::dec;

    /// 1,000,000 MEME (18 dp) against 50,000 USDC (6 dp): $0.05 per MEME.
    fn meme_usdc() -> PoolSnapshot {
        PoolSnapshot {
            pool: "CPOOL".to_string(),
            reserves: ReservePair::new(1_000_000 * 10i128.pow(18), 50_000_000_000).unwrap(),
            token_a: TokenDescriptor::standard("CMEME"),
            token_b: TokenDescriptor::stable("CUSDC"),
            mapping: MappingSource::DeclaredContracts,
        }
    }

    #[test]
    fn test_unit_price_uses_roles_not_magnitude() {
        let snapshot = meme_usdc();
        let roles = roles::assign_pricing_roles(&snapshot.token_a, &snapshot.token_b);
        let price = calculate_unit_price(&snapshot, roles).ready().unwrap();
        assert_eq!(price.value, dec!(0.05));
    }

    #[test]
    fn test_market_cap_scenario() {
        let cap = calculate_market_cap(dec!(0.05), 1_000_000 * 10i128.pow(18), Decimals::STANDARD)
            .unwrap();
        assert_eq!(cap, dec!(50000));
        assert_eq!(format_large_number(cap), "$50.0K");
    }

    #[test]
    fn test_liquidity_doubles_quote_side() {
        let snapshot = meme_usdc();
        let roles = roles::assign_pricing_roles(&snapshot.token_a, &snapshot.token_b);
        assert_eq!(
            calculate_liquidity(&snapshot, roles, Decimal::ONE).unwrap(),
            dec!(100000)
        );
    }

    #[test]
    fn test_analytics_prefers_on_chain_volume() {
        let snapshot = meme_usdc();
        let context = MarketContext {
            total_supply_raw: Some(1_000_000 * 10i128.pow(18)),
            quote_usd_price: Decimal::ONE,
        };
        let counters = VolumeCounters {
            denomination: ContractRef::from("CUSDC"),
            volume_24h: 12_500_000_000,
            volume_7d: 80_000_000_000,
            volume_all_time: 300_000_000_000,
        };

        let analytics = estimate_pool_analytics(&snapshot, &context, Some(&counters))
            .ready()
            .unwrap();
        assert_eq!(analytics.price_usd, dec!(0.05));
        assert_eq!(analytics.market_cap_usd, Some(dec!(50000)));
        assert_eq!(analytics.liquidity_usd, dec!(100000));
        assert_eq!(analytics.volume_24h_usd.value, dec!(12500));
        assert_eq!(analytics.volume_24h_usd.source, MetricSource::OnChain);
        assert_eq!(analytics.price_change_24h.source, MetricSource::Synthetic);
    }

    #[test]
    fn test_base_denominated_counters_use_price() {
        let snapshot = meme_usdc();
        let counters = VolumeCounters {
            denomination: ContractRef::from("CMEME"),
            volume_24h: 2_000 * 10i128.pow(18),
            volume_7d: 0,
            volume_all_time: 0,
        };
        let analytics =
            estimate_pool_analytics(&snapshot, &MarketContext::default(), Some(&counters))
                .ready()
                .unwrap();
        assert_eq!(analytics.volume_24h_usd.value, dec!(100));
    }

    #[test]
    fn test_analytics_falls_back_to_synthetic_volume() {
        let analytics = estimate_pool_analytics(&meme_usdc(), &MarketContext::default(), None)
            .ready()
            .unwrap();
        assert_eq!(analytics.volume_24h_usd.source, MetricSource::Synthetic);
        assert!(analytics.market_cap_usd.is_none());
    }

    #[test]
    fn test_native_quote_is_valued_in_usd() {
        let snapshot = PoolSnapshot {
            pool: "CPOOL".to_string(),
            reserves: ReservePair::new(2_000 * 10i128.pow(18), 1_000 * 10i128.pow(7)).unwrap(),
            token_a: TokenDescriptor::standard("CMEME"),
            token_b: TokenDescriptor::native("CXLM"),
            mapping: MappingSource::DeclaredContracts,
        };
        let context = MarketContext {
            total_supply_raw: None,
            quote_usd_price: dec!(0.4),
        };
        let analytics = estimate_pool_analytics(&snapshot, &context, None)
            .ready()
            .unwrap();
        assert_eq!(analytics.price.value, dec!(0.5));
        assert_eq!(analytics.price_usd, dec!(0.2));
        assert_eq!(analytics.liquidity_usd, dec!(800));
    }

    #[test]
    fn test_uninitialized_pool_has_no_analytics() {
        let mut snapshot = meme_usdc();
        snapshot.reserves = ReservePair::new(0, 50_000_000_000).unwrap();
        assert!(
            estimate_pool_analytics(&snapshot, &MarketContext::default(), None).is_no_liquidity()
        );
    }
}
