//! Matching reserve slots to tokens, and choosing which token prices which.

use crate::entities::pool::{PoolReserves, PoolSnapshot, ReservePair};
use crate::entities::token::TokenDescriptor;
use crate::enums::{MappingSource, PoolSide, SlotOrder, TokenRole};
use crate::error::AmmError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Builds a snapshot whose reserve slots follow `token_a`, `token_b`.
///
/// The contracts named by the pool query decide the mapping. When the query
/// names none, a [`SlotOrder::Declared`] token order is trusted as the slot
/// order. Only when the order is unknown too is the mapping inferred from
/// reserve magnitudes, which is logged as a warning.
///
/// # Errors
/// - [`AmmError::NegativeReserve`] for a negative reserve.
/// - [`AmmError::TokenNotInPool`] if the query names contracts other than the two tokens.
pub fn resolve_snapshot(
    reserves: &PoolReserves,
    token_a: &TokenDescriptor,
    token_b: &TokenDescriptor,
    order: SlotOrder,
) -> Result<PoolSnapshot, AmmError> {
    let declared = ReservePair::new(reserves.reserve_a, reserves.reserve_b)?;
    let (pair, mapping) = match (&reserves.token_a, &reserves.token_b) {
        (None, None) if order == SlotOrder::Declared => (declared, MappingSource::DeclaredOrder),
        (None, None) => (
            infer_from_magnitude(reserves, token_a, token_b, declared),
            MappingSource::InferredFromMagnitude,
        ),
        (slot_a, slot_b) => {
            let direct = slot_a.as_ref().is_none_or(|c| c == &token_a.contract)
                && slot_b.as_ref().is_none_or(|c| c == &token_b.contract);
            let swapped = slot_a.as_ref().is_none_or(|c| c == &token_b.contract)
                && slot_b.as_ref().is_none_or(|c| c == &token_a.contract);
            if direct {
                (declared, MappingSource::DeclaredContracts)
            } else if swapped {
                (declared.flipped(), MappingSource::DeclaredContracts)
            } else {
                let stray = slot_a
                    .iter()
                    .chain(slot_b.iter())
                    .find(|c| **c != token_a.contract && **c != token_b.contract)
                    .map_or_else(|| token_a.contract.to_string(), ToString::to_string);
                return Err(AmmError::TokenNotInPool {
                    token: stray,
                    pool: reserves.pool.clone(),
                });
            }
        }
    };

    debug!(pool = %reserves.pool, mapping = ?mapping, "Resolved pool reserves");
    Ok(PoolSnapshot {
        pool: reserves.pool.clone(),
        reserves: pair,
        token_a: token_a.clone(),
        token_b: token_b.clone(),
        mapping,
    })
}

/// The token with more decimals is assumed to own the reserve with more digits.
fn infer_from_magnitude(
    reserves: &PoolReserves,
    token_a: &TokenDescriptor,
    token_b: &TokenDescriptor,
    declared: ReservePair,
) -> ReservePair {
    let digits_a = digit_count(declared.reserve_in());
    let digits_b = digit_count(declared.reserve_out());

    if token_a.decimals == token_b.decimals || digits_a == digits_b {
        warn!(
            pool = %reserves.pool,
            "Pool query named no token contracts and magnitudes are ambiguous; keeping slot order"
        );
        return declared;
    }

    let keep = (digits_a > digits_b) == (token_a.decimals > token_b.decimals);
    warn!(
        pool = %reserves.pool,
        flipped = !keep,
        "Pool query named no token contracts; reserve mapping inferred from magnitude"
    );
    if keep { declared } else { declared.flipped() }
}

fn digit_count(value: i128) -> usize {
    value.unsigned_abs().checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Which side of a pool is priced (base) and which side prices it (quote).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRoles {
    pub base: PoolSide,
    pub quote: PoolSide,
}

impl PricingRoles {
    /// Prices `base` in units of the other token.
    pub const fn with_base(base: PoolSide) -> Self {
        Self {
            base,
            quote: base.opposite(),
        }
    }
}

/// Assigns base and quote by role.
///
/// A stable asset is always the quote; otherwise the native asset is the
/// quote; otherwise token B quotes token A.
pub fn assign_pricing_roles(token_a: &TokenDescriptor, token_b: &TokenDescriptor) -> PricingRoles {
    let quote = match (token_a.role, token_b.role) {
        (TokenRole::Stable, b) if b != TokenRole::Stable => PoolSide::A,
        (a, TokenRole::Stable) if a != TokenRole::Stable => PoolSide::B,
        (TokenRole::Native, b) if b != TokenRole::Native => PoolSide::A,
        _ => PoolSide::B,
    };
    PricingRoles::with_base(quote.opposite())
}
