//! Snapshot loading and analytics on top of a [`PoolDataSource`].

use crate::error::DataError;
use crate::selection::{SelectionGuard, SelectionTicket};
use crate::source::{PoolDataSource, PoolKey};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use stellar_amm_domain::entities::pool::PoolSnapshot;
use stellar_amm_domain::entities::token::{ContractRef, TokenMetadata};
use stellar_amm_domain::enums::{PoolSide, TokenRole};
use stellar_amm_domain::error::Quote;
use stellar_amm_domain::math::{constant_product, scaling};
use stellar_amm_domain::metrics::PoolAnalytics;
use stellar_amm_domain::metrics::market::{self, MarketContext};
use stellar_amm_domain::roles;
use stellar_amm_domain::value_objects::{FeeRate, SwapQuote};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// USD reference prices for quote tokens that are not stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsdPrices {
    /// USD value of one unit of the native asset.
    pub native_usd: Decimal,
}

impl UsdPrices {
    /// USD value of one unit of a token with `role`, if one is known.
    ///
    /// Standard tokens have no reference price.
    pub fn reference(&self, role: TokenRole) -> Option<Decimal> {
        match role {
            TokenRole::Native => Some(self.native_usd),
            TokenRole::Stable => Some(Decimal::ONE),
            TokenRole::Standard => None,
        }
    }

    /// Multiplier applied to quote-token figures: the USD reference price, or
    /// 1 to keep figures in the quote token's own units.
    pub fn for_role(&self, role: TokenRole) -> Decimal {
        self.reference(role).unwrap_or(Decimal::ONE)
    }
}

impl Default for UsdPrices {
    fn default() -> Self {
        Self {
            native_usd: Decimal::ONE,
        }
    }
}

/// A pool snapshot together with the metadata it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPool {
    pub snapshot: PoolSnapshot,
    pub token_a: TokenMetadata,
    pub token_b: TokenMetadata,
    pub fetched_at: DateTime<Utc>,
}

impl LoadedPool {
    pub fn metadata(&self, side: PoolSide) -> &TokenMetadata {
        match side {
            PoolSide::A => &self.token_a,
            PoolSide::B => &self.token_b,
        }
    }

    /// Quotes a swap of `amount` (as typed) of `from` against this snapshot.
    ///
    /// # Errors
    /// Returns [`DataError::Domain`] when `from` is not one of the pool's tokens.
    pub fn quote_swap(
        &self,
        from: &ContractRef,
        amount: &str,
        fee: FeeRate,
    ) -> Result<Quote<SwapQuote>, DataError> {
        let reserves = self.snapshot.directed(from)?;
        let decimals = match self.snapshot.side_of(from) {
            Some(side) => self.snapshot.descriptor(side).decimals,
            None => return Err(DataError::TokenNotFound(from.to_string())),
        };
        Ok(scaling::parse_amount(amount, decimals)
            .and_then(|raw| constant_product::calculate_out_amount(&reserves, raw, fee)))
    }
}

/// Analytics together with the snapshot they were computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolReport {
    pub loaded: Arc<LoadedPool>,
    pub analytics: Quote<PoolAnalytics>,
    /// Whether money figures are in USD. When `false` they are in units of
    /// the quote token.
    pub usd_denominated: bool,
}

type InFlight = Arc<OnceCell<Arc<LoadedPool>>>;
type InFlightMap = Mutex<HashMap<String, InFlight>>;

/// A caller's stake in an in-flight load.
///
/// Dropping it, on completion or when the caller's future is dropped,
/// removes the map entry once the load has produced a value, or when the
/// dropping caller started the load.
struct InFlightEntry<'a> {
    in_flight: &'a InFlightMap,
    pool: &'a str,
    cell: InFlight,
    leader: bool,
}

impl Drop for InFlightEntry<'_> {
    fn drop(&mut self) {
        if !self.leader && !self.cell.initialized() {
            return;
        }
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight
            .get(self.pool)
            .is_some_and(|current| Arc::ptr_eq(current, &self.cell))
        {
            in_flight.remove(self.pool);
        }
    }
}

/// Loads pool snapshots and derives the figures the pool pages show.
///
/// Concurrent loads of the same pool share one set of requests. Nothing is
/// cached once the shared load completes.
pub struct MarketDataService<S: PoolDataSource> {
    /// Pool data source.
    source: Arc<S>,
    /// Loads currently running, keyed by pool id.
    in_flight: InFlightMap,
    /// Currently selected pool.
    selection: SelectionGuard,
    /// Reference prices for valuing quote tokens.
    usd_prices: UsdPrices,
}

impl<S: PoolDataSource> MarketDataService<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self::with_usd_prices(source, UsdPrices::default())
    }

    pub fn with_usd_prices(source: Arc<S>, usd_prices: UsdPrices) -> Self {
        Self {
            source,
            in_flight: Mutex::new(HashMap::new()),
            selection: SelectionGuard::new(),
            usd_prices,
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Loads a fresh snapshot of `key.pool`.
    ///
    /// Reserves and both token records are requested concurrently. Callers
    /// arriving while a load of the same pool is running wait for it instead
    /// of issuing their own requests.
    ///
    /// # Errors
    /// Propagates source failures, and [`DataError::Domain`] when the reserves
    /// cannot be matched to the tokens.
    pub async fn load_snapshot(&self, key: &PoolKey) -> Result<Arc<LoadedPool>, DataError> {
        let entry = self.join_or_start(&key.pool);
        let result = entry.cell.get_or_try_init(|| self.fetch_pool(key)).await.cloned();
        result
    }

    /// Joins the running load of `pool`, or registers a new one.
    ///
    /// A completed cell still in the map belongs to a caller that was dropped
    /// before cleaning up; it is replaced rather than joined.
    fn join_or_start<'a>(&'a self, pool: &'a str) -> InFlightEntry<'a> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cell) = in_flight.get(pool).filter(|cell| !cell.initialized()) {
            debug!(pool, "Joining in-flight load");
            return InFlightEntry {
                in_flight: &self.in_flight,
                pool,
                cell: Arc::clone(cell),
                leader: false,
            };
        }

        let cell: InFlight = Arc::new(OnceCell::new());
        in_flight.insert(pool.to_string(), Arc::clone(&cell));
        InFlightEntry {
            in_flight: &self.in_flight,
            pool,
            cell,
            leader: true,
        }
    }

    async fn fetch_pool(&self, key: &PoolKey) -> Result<Arc<LoadedPool>, DataError> {
        debug!(pool = %key.pool, token_a = %key.token_a, token_b = %key.token_b, "Fetching pool");
        let (reserves, token_a, token_b) = tokio::try_join!(
            self.source.fetch_reserves(&key.pool),
            self.source.fetch_token(&key.token_a),
            self.source.fetch_token(&key.token_b),
        )?;

        let snapshot = roles::resolve_snapshot(
            &reserves,
            &token_a.descriptor,
            &token_b.descriptor,
            key.slot_order,
        )?;
        info!(
            pool = %key.pool,
            reserve_a = snapshot.reserves.reserve_in(),
            reserve_b = snapshot.reserves.reserve_out(),
            mapping = ?snapshot.mapping,
            "Loaded pool snapshot"
        );
        Ok(Arc::new(LoadedPool {
            snapshot,
            token_a,
            token_b,
            fetched_at: Utc::now(),
        }))
    }

    /// Marks `pool` as the selected pool and returns its ticket.
    pub fn select(&self, pool: impl Into<String>) -> SelectionTicket {
        self.selection.select(pool)
    }

    /// Loads `key` on behalf of `ticket`.
    ///
    /// Returns `Ok(None)` when another pool was selected while the load was
    /// running; the result must then not be shown.
    ///
    /// # Errors
    /// See [`MarketDataService::load_snapshot`].
    pub async fn fetch_for_selection(
        &self,
        ticket: &SelectionTicket,
        key: &PoolKey,
    ) -> Result<Option<Arc<LoadedPool>>, DataError> {
        let loaded = self.load_snapshot(key).await?;
        if self.selection.is_current(ticket) {
            Ok(Some(loaded))
        } else {
            debug!(pool = %ticket.pool, "Discarding result for stale selection");
            Ok(None)
        }
    }

    /// Price, market cap, liquidity, volume and price change of a pool, with
    /// the snapshot they were computed from.
    ///
    /// # Errors
    /// Propagates source failures. Calculator outcomes such as an empty pool
    /// come back inside [`PoolReport::analytics`].
    pub async fn pool_analytics(&self, key: &PoolKey) -> Result<PoolReport, DataError> {
        let (loaded, counters) = tokio::try_join!(
            self.load_snapshot(key),
            self.source.fetch_volume(&key.pool),
        )?;

        let pricing = roles::assign_pricing_roles(&loaded.snapshot.token_a, &loaded.snapshot.token_b);
        let quote_role = loaded.snapshot.descriptor(pricing.quote).role;
        let context = MarketContext {
            total_supply_raw: loaded.metadata(pricing.base).total_supply_raw,
            quote_usd_price: self.usd_prices.for_role(quote_role),
        };
        let analytics =
            market::analytics_with_roles(&loaded.snapshot, pricing, &context, counters.as_ref());
        Ok(PoolReport {
            loaded,
            analytics,
            usd_denominated: self.usd_prices.reference(quote_role).is_some(),
        })
    }
}
