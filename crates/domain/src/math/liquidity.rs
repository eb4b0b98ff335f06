//! Proportional add-liquidity math for constant product pools.
//!
//! Everything here is integer arithmetic on raw amounts. Ratios are checked
//! by cross multiplication (`a * reserve_b == b * reserve_a`) so no division
//! happens before the final floor.

use crate::entities::pool::ReservePair;
use crate::enums::PoolSide;
use crate::error::{Quote, ValidationIssue};
use crate::math::scaling::{self, narrow, widen};
use crate::value_objects::{LiquidityCheck, LiquidityQuote};
use primitive_types::U256;
use rust_decimal::Decimal;

/// Relative tolerance of the proportionality check: 1 / 100 000 = 0.001%.
const RELATIVE_TOLERANCE_DENOMINATOR: u64 = 100_000;

/// Absolute tolerance of the proportionality check, in cross-product units.
const ABSOLUTE_TOLERANCE: u64 = 1;

/// Counterpart of `amount` deposited on `side`.
///
/// `floor(amount * reserve_opposite / reserve_same)`, where the reserve pair
/// holds A in the `in` slot and B in the `out` slot.
pub fn proportional_amount(reserves: &ReservePair, side: PoolSide, amount: i128) -> Quote<i128> {
    if amount < 0 {
        return Quote::Invalid(ValidationIssue::InvalidInput);
    }
    if reserves.is_uninitialized() {
        return Quote::NoLiquidity;
    }
    if amount == 0 {
        return Quote::Ready(0);
    }

    let same = reserves.reserve(side);
    let opposite = reserves.reserve(side.opposite());
    match scaling::mul_div_floor(amount, opposite, same) {
        Some(counterpart) => Quote::Ready(counterpart),
        None => Quote::Invalid(ValidationIssue::PrecisionOverflow),
    }
}

/// Quote for depositing `amount` on `edited` into a pool with reserves.
///
/// Empty pools have no ratio to follow; use [`initial_liquidity`] instead.
pub fn quote_add_liquidity(reserves: &ReservePair, edited: PoolSide, amount: i128) -> Quote<LiquidityQuote> {
    proportional_amount(reserves, edited, amount).map(|counterpart| {
        let (amount_a, amount_b) = match edited {
            PoolSide::A => (amount, counterpart),
            PoolSide::B => (counterpart, amount),
        };
        LiquidityQuote::Proportional {
            amount_a,
            amount_b,
            edited,
        }
    })
}

/// First deposit into an empty pool.
///
/// `estimated_shares` is `floor(sqrt(a * b))`; the contract mints the real amount.
pub fn initial_liquidity(amount_a: i128, amount_b: i128) -> Quote<LiquidityQuote> {
    if amount_a < 0 || amount_b < 0 {
        return Quote::Invalid(ValidationIssue::InvalidInput);
    }
    let product = widen(amount_a) * widen(amount_b);
    match narrow(product.integer_sqrt()) {
        Some(estimated_shares) => Quote::Ready(LiquidityQuote::Initial {
            amount_a,
            amount_b,
            estimated_shares,
        }),
        None => Quote::Invalid(ValidationIssue::PrecisionOverflow),
    }
}

/// Whether `(amount_a, amount_b)` matches the pool ratio.
///
/// True iff `|a * reserve_b - b * reserve_a|` is at most one unit, or at
/// most 0.001% of `a * reserve_b`. Empty pools accept any pair.
pub fn is_proportional(reserves: &ReservePair, amount_a: i128, amount_b: i128) -> bool {
    if amount_a < 0 || amount_b < 0 {
        return false;
    }
    if reserves.is_empty() {
        return true;
    }
    if reserves.is_uninitialized() {
        return false;
    }

    let lhs = widen(amount_a) * widen(reserves.reserve(PoolSide::B));
    let rhs = widen(amount_b) * widen(reserves.reserve(PoolSide::A));
    let diff = if lhs > rhs { lhs - rhs } else { rhs - lhs };

    // lhs < 2^254, so scaling the diff by 10^5 (< 2^17) cannot overflow
    diff <= U256::from(ABSOLUTE_TOLERANCE)
        || diff * U256::from(RELATIVE_TOLERANCE_DENOMINATOR) <= lhs
}

/// Pre-submission check of a user-entered liquidity pair.
///
/// An off-ratio pair is never accepted: the field the user did not edit last
/// is recomputed and returned for confirmation. Pairs whose cross products
/// leave the `i128` range the contract computes in are rejected.
pub fn reconcile_pair(
    reserves: &ReservePair,
    amount_a: i128,
    amount_b: i128,
    last_edited: PoolSide,
) -> Quote<LiquidityCheck> {
    if amount_a < 0 || amount_b < 0 {
        return Quote::Invalid(ValidationIssue::InvalidInput);
    }
    if reserves.is_empty() {
        return initial_liquidity(amount_a, amount_b).map(LiquidityCheck::Accepted);
    }
    if reserves.is_uninitialized() {
        return Quote::NoLiquidity;
    }

    let cross_a = widen(amount_a) * widen(reserves.reserve(PoolSide::B));
    let cross_b = widen(amount_b) * widen(reserves.reserve(PoolSide::A));
    if narrow(cross_a).is_none() || narrow(cross_b).is_none() {
        return Quote::Invalid(ValidationIssue::PrecisionOverflow);
    }

    if is_proportional(reserves, amount_a, amount_b) {
        return Quote::Ready(LiquidityCheck::Accepted(LiquidityQuote::Proportional {
            amount_a,
            amount_b,
            edited: last_edited,
        }));
    }

    let edited_amount = match last_edited {
        PoolSide::A => amount_a,
        PoolSide::B => amount_b,
    };
    quote_add_liquidity(reserves, last_edited, edited_amount).map(|suggested| {
        LiquidityCheck::NeedsConfirmation {
            suggested,
            issue: ValidationIssue::ProportionalityMismatch,
        }
    })
}

/// Depositor's share of the pool after adding `amount_a` of token A, in percent.
///
/// Assumes LP supply scales with reserve A; an estimate for display only.
pub fn pool_share(reserves: &ReservePair, amount_a: i128) -> Quote<Decimal> {
    if amount_a < 0 {
        return Quote::Invalid(ValidationIssue::InvalidInput);
    }
    if reserves.is_empty() {
        return Quote::Ready(if amount_a > 0 {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        });
    }
    if reserves.is_uninitialized() {
        return Quote::NoLiquidity;
    }

    // share in units of 10^-8 percent
    const SCALE: i128 = 10_000_000_000;
    let total = widen(reserves.reserve(PoolSide::A)) + widen(amount_a);
    let share = widen(amount_a) * U256::from(SCALE.unsigned_abs()) / total;
    let share = i64::try_from(share.low_u64()).unwrap_or(i64::MAX);
    Quote::Ready(Decimal::new(share, 8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pair(a: i128, b: i128) -> ReservePair {
        ReservePair::new(a, b).unwrap()
    }

    #[test]
    fn test_proportional_amount() {
        let reserves = pair(7_000_000, 3_000_000_000_000_000_000);
        assert_eq!(
            proportional_amount(&reserves, PoolSide::A, 1_000_000),
            Quote::Ready(428_571_428_571_428_571)
        );
        assert_eq!(
            proportional_amount(&reserves, PoolSide::B, 428_571_428_571_428_571),
            Quote::Ready(999_999)
        );
    }

    #[test]
    fn test_proportional_edge_cases() {
        let reserves = pair(100, 200);
        assert_eq!(proportional_amount(&reserves, PoolSide::A, 0), Quote::Ready(0));
        assert_eq!(
            proportional_amount(&reserves, PoolSide::A, -3),
            Quote::Invalid(ValidationIssue::InvalidInput)
        );
        assert_eq!(
            proportional_amount(&pair(0, 200), PoolSide::A, 10),
            Quote::NoLiquidity
        );
        assert_eq!(
            proportional_amount(&pair(1, i128::MAX), PoolSide::A, 2),
            Quote::Invalid(ValidationIssue::PrecisionOverflow)
        );
    }

    #[test]
    fn test_quote_add_liquidity_orders_amounts() {
        let reserves = pair(100, 200);
        assert_eq!(
            quote_add_liquidity(&reserves, PoolSide::B, 50),
            Quote::Ready(LiquidityQuote::Proportional {
                amount_a: 25,
                amount_b: 50,
                edited: PoolSide::B,
            })
        );
    }

    #[test]
    fn test_initial_liquidity_estimate() {
        let quote = initial_liquidity(4_000_000, 9_000_000).ready().unwrap();
        assert_eq!(
            quote,
            LiquidityQuote::Initial {
                amount_a: 4_000_000,
                amount_b: 9_000_000,
                estimated_shares: 6_000_000,
            }
        );
        assert_eq!(quote.amounts(), (4_000_000, 9_000_000));
    }

    #[test]
    fn test_is_proportional_tolerance() {
        let reserves = pair(1_000_000, 2_000_000);
        assert!(is_proportional(&reserves, 500, 1_000));
        // 0.0005% off
        assert!(is_proportional(&reserves, 1_000_000, 1_999_990));
        // 0.01% off
        assert!(!is_proportional(&reserves, 1_000_000, 1_999_800));
        assert!(is_proportional(&ReservePair::EMPTY, 5, 9));
        assert!(!is_proportional(&pair(0, 10), 5, 9));
    }

    #[test]
    fn test_tolerance_is_relative_to_amount_a_side() {
        let reserves = pair(1, 1);
        // diff just over 0.001% of amount_a * reserve_b, under 0.001% of the other product
        assert!(!is_proportional(&reserves, 1_000_000_000_000, 1_000_010_000_001));
        assert!(is_proportional(&reserves, 1_000_010_000_001, 1_000_000_000_000));
    }

    #[test]
    fn test_reconcile_accepts_matching_pair() {
        let reserves = pair(100, 200);
        let check = reconcile_pair(&reserves, 10, 20, PoolSide::A).ready().unwrap();
        assert!(matches!(check, LiquidityCheck::Accepted(_)));
    }

    #[test]
    fn test_reconcile_recomputes_last_edited_counterpart() {
        let reserves = pair(100, 200);
        let check = reconcile_pair(&reserves, 10, 30, PoolSide::B).ready().unwrap();
        assert_eq!(
            check,
            LiquidityCheck::NeedsConfirmation {
                suggested: LiquidityQuote::Proportional {
                    amount_a: 15,
                    amount_b: 30,
                    edited: PoolSide::B,
                },
                issue: ValidationIssue::ProportionalityMismatch,
            }
        );
    }

    #[test]
    fn test_reconcile_rejects_i128_overflowing_products() {
        let reserves = pair(10, i128::MAX / 2);
        assert_eq!(
            reconcile_pair(&reserves, 1_000, 1, PoolSide::A),
            Quote::Invalid(ValidationIssue::PrecisionOverflow)
        );
    }

    #[test]
    fn test_reconcile_empty_pool_is_initial() {
        let check = reconcile_pair(&ReservePair::EMPTY, 4, 9, PoolSide::A)
            .ready()
            .unwrap();
        assert!(matches!(
            check,
            LiquidityCheck::Accepted(LiquidityQuote::Initial {
                estimated_shares: 6,
                ..
            })
        ));
    }

    #[test]
    fn test_pool_share() {
        let reserves = pair(300, 600);
        assert_eq!(pool_share(&reserves, 100).ready().unwrap(), dec!(25));
        assert_eq!(
            pool_share(&ReservePair::EMPTY, 1).ready().unwrap(),
            dec!(100)
        );
    }
}
