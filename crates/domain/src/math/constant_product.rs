use crate::entities::pool::ReservePair;
use crate::entities::token::Decimals;
use crate::error::{Quote, ValidationIssue};
use crate::math::scaling::{self, narrow, widen};
use crate::value_objects::fee_rate::BPS_DENOMINATOR;
use crate::value_objects::{FeeRate, Price, SwapQuote};
use primitive_types::{U256, U512};
use rust_decimal::Decimal;

/// Calculates the output amount for a given input amount in a constant product pool (x * y = k).
///
/// formula, with integer floor at each step:
/// amount_in_after_fee = amount_in * (10000 - fee_bps) / 10000
/// amount_out = reserve_out * amount_in_after_fee / (reserve_in + amount_in_after_fee)
///
/// Both divisions truncate, matching contract settlement.
pub fn calculate_out_amount(reserves: &ReservePair, amount_in: i128, fee: FeeRate) -> Quote<SwapQuote> {
    if amount_in < 0 {
        return Quote::Invalid(ValidationIssue::InvalidInput);
    }
    if reserves.is_uninitialized() {
        return Quote::NoLiquidity;
    }
    if amount_in == 0 {
        return Quote::Ready(SwapQuote::zero(fee.bps()));
    }

    let after_fee =
        widen(amount_in) * U256::from(fee.retained_bps()) / U256::from(BPS_DENOMINATOR);
    let numerator = widen(reserves.reserve_out()) * after_fee;
    let denominator = widen(reserves.reserve_in()) + after_fee;
    let amount_out = numerator / denominator;

    match (narrow(after_fee), narrow(amount_out)) {
        (Some(amount_in_after_fee), Some(amount_out)) => Quote::Ready(SwapQuote {
            amount_in,
            amount_in_after_fee,
            amount_out,
            fee_bps: fee.bps(),
        }),
        _ => Quote::Invalid(ValidationIssue::PrecisionOverflow),
    }
}

/// Smallest input whose quote yields at least `amount_out`.
///
/// Inverts [`calculate_out_amount`] with ceiling division. Asking for the
/// whole `reserve_out` or more is [`Quote::NoLiquidity`].
pub fn calculate_required_input(
    reserves: &ReservePair,
    amount_out: i128,
    fee: FeeRate,
) -> Quote<i128> {
    if amount_out < 0 {
        return Quote::Invalid(ValidationIssue::InvalidInput);
    }
    if reserves.is_uninitialized() || amount_out >= reserves.reserve_out() {
        return Quote::NoLiquidity;
    }
    if amount_out == 0 {
        return Quote::Ready(0);
    }

    let after_fee = ceil_div(
        widen(amount_out) * widen(reserves.reserve_in()),
        widen(reserves.reserve_out() - amount_out),
    );
    let amount_in = ceil_div(
        after_fee * U256::from(BPS_DENOMINATOR),
        U256::from(fee.retained_bps()),
    );

    match narrow(amount_in) {
        Some(amount_in) => Quote::Ready(amount_in),
        None => Quote::Invalid(ValidationIssue::PrecisionOverflow),
    }
}

fn ceil_div(numerator: U256, denominator: U256) -> U256 {
    let quotient = numerator / denominator;
    if (numerator % denominator).is_zero() {
        quotient
    } else {
        quotient + U256::one()
    }
}

/// Calculates the spot price of token_in in terms of token_out, in human units.
/// Price = (reserve_out / 10^decimals_out) / (reserve_in / 10^decimals_in)
pub fn calculate_spot_price(
    reserves: &ReservePair,
    decimals_in: Decimals,
    decimals_out: Decimals,
) -> Quote<Price> {
    if reserves.is_uninitialized() {
        return Quote::NoLiquidity;
    }
    let r_in = scaling::raw_to_decimal(reserves.reserve_in(), decimals_in);
    let r_out = scaling::raw_to_decimal(reserves.reserve_out(), decimals_out);

    match (r_in, r_out) {
        (Ok(r_in), Ok(r_out)) if !r_in.is_zero() => match r_out.checked_div(r_in) {
            Some(value) => Quote::Ready(Price::new(value)),
            None => Quote::Invalid(ValidationIssue::PrecisionOverflow),
        },
        // reserve_in below the smallest representable fraction, or too large
        _ => Quote::Invalid(ValidationIssue::PrecisionOverflow),
    }
}

/// Price impact of a quote, in percent.
///
/// Compares the execution rate `amount_out / amount_in` with the pre-trade
/// rate `reserve_out / reserve_in`; the fee is included in the impact.
/// Decimals cancel, so the comparison is done on raw integers.
pub fn calculate_price_impact(reserves: &ReservePair, quote: &SwapQuote) -> Quote<Decimal> {
    if reserves.is_uninitialized() {
        return Quote::NoLiquidity;
    }
    if quote.amount_in == 0 {
        return Quote::Ready(Decimal::ZERO);
    }

    // ratio = (out * r_in) / (in * r_out), scaled by 10^12 for 10 percent digits
    const PRECISION: u64 = 1_000_000_000_000;
    let execution = U512::from(widen(quote.amount_out)) * U512::from(widen(reserves.reserve_in()));
    let spot = U512::from(widen(quote.amount_in)) * U512::from(widen(reserves.reserve_out()));
    let ratio = execution * U512::from(PRECISION) / spot;
    let ratio = ratio.min(U512::from(PRECISION)).low_u64();

    let impact = i64::try_from(PRECISION - ratio).unwrap_or(i64::MAX);
    Quote::Ready(Decimal::new(impact, 10))
}

/// Lowest acceptable output under a slippage tolerance in basis points.
pub fn calculate_minimum_received(amount_out: i128, slippage_bps: u32) -> i128 {
    if amount_out <= 0 {
        return 0;
    }
    let kept = BPS_DENOMINATOR.saturating_sub(slippage_bps);
    scaling::mul_div_floor(amount_out, i128::from(kept), i128::from(BPS_DENOMINATOR)).unwrap_or(0)
}

/// Calculates the constant product K.
pub fn calculate_k(reserves: &ReservePair) -> U256 {
    widen(reserves.reserve_in()) * widen(reserves.reserve_out())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationIssue;
    use rust_decimal_macros::dec;

    fn pair(reserve_in: i128, reserve_out: i128) -> ReservePair {
        ReservePair::new(reserve_in, reserve_out).unwrap()
    }

    #[test]
    fn test_calculate_out_amount() {
        // 1000 reserve0, 1000 reserve1, 10 input, 0.3% fee (30 bps)
        // amount_in_after_fee = floor(10 * 9970 / 10000) = 9
        // out = floor(1000 * 9 / 1009) = 8
        let quote = calculate_out_amount(&pair(1000, 1000), 10, FeeRate::DEFAULT)
            .ready()
            .unwrap();
        assert_eq!(quote.amount_in_after_fee, 9);
        assert_eq!(quote.amount_out, 8);
        assert_eq!(quote.fee_bps, 30);
    }

    #[test]
    fn test_stable_to_standard_swap_is_exact() {
        // 1000 units at 6 decimals against 2000 units at 18 decimals, 1 unit in
        let reserves = pair(1_000_000_000, 2_000_000_000_000_000_000_000);
        let quote = calculate_out_amount(&reserves, 1_000_000, FeeRate::DEFAULT)
            .ready()
            .unwrap();
        assert_eq!(quote.amount_in_after_fee, 997_000);
        assert_eq!(quote.amount_out, 1_992_013_962_079_806_432);
    }

    #[test]
    fn test_zero_input_and_zero_reserves() {
        let zero = calculate_out_amount(&pair(100, 100), 0, FeeRate::DEFAULT);
        assert_eq!(zero, Quote::Ready(SwapQuote::zero(30)));

        assert_eq!(
            calculate_out_amount(&pair(0, 100), 10, FeeRate::DEFAULT),
            Quote::NoLiquidity
        );
        assert_eq!(
            calculate_out_amount(&pair(100, 0), 10, FeeRate::DEFAULT),
            Quote::NoLiquidity
        );
        assert_eq!(
            calculate_out_amount(&pair(100, 100), -1, FeeRate::DEFAULT),
            Quote::Invalid(ValidationIssue::InvalidInput)
        );
    }

    #[test]
    fn test_output_never_drains_pool() {
        let quote = calculate_out_amount(&pair(1, 1_000), i128::MAX, FeeRate::DEFAULT)
            .ready()
            .unwrap();
        assert!(quote.amount_out < 1_000);
    }

    #[test]
    fn test_higher_fee_gives_less() {
        let reserves = pair(5_000_000_000, 7_000_000_000_000);
        let low = calculate_out_amount(&reserves, 10_000_000, FeeRate::from_bps(5).unwrap());
        let high = calculate_out_amount(&reserves, 10_000_000, FeeRate::from_bps(100).unwrap());
        assert!(low.ready().unwrap().amount_out > high.ready().unwrap().amount_out);
    }

    #[test]
    fn test_required_input_inverts_quote() {
        let reserves = pair(1_000_000_000, 2_000_000_000_000_000_000_000);
        let wanted = 1_992_013_962_079_806_432;
        let amount_in = calculate_required_input(&reserves, wanted, FeeRate::DEFAULT)
            .ready()
            .unwrap();
        let out = calculate_out_amount(&reserves, amount_in, FeeRate::DEFAULT)
            .ready()
            .unwrap();
        assert!(out.amount_out >= wanted);
        let less = calculate_out_amount(&reserves, amount_in - 1, FeeRate::DEFAULT)
            .ready()
            .unwrap();
        assert!(less.amount_out < wanted);
    }

    #[test]
    fn test_required_input_cannot_drain() {
        let reserves = pair(1_000, 1_000);
        assert_eq!(
            calculate_required_input(&reserves, 1_000, FeeRate::DEFAULT),
            Quote::NoLiquidity
        );
    }

    #[test]
    fn test_calculate_spot_price() {
        // 1000 USDC (6 dp) against 2000 tokens (18 dp): 1 USDC buys 2 tokens
        let reserves = pair(1_000_000_000, 2_000_000_000_000_000_000_000);
        let price = calculate_spot_price(&reserves, Decimals::STABLE, Decimals::STANDARD)
            .ready()
            .unwrap();
        assert_eq!(price.value, dec!(2));
        assert_eq!(price.invert().value, dec!(0.5));
    }

    #[test]
    fn test_price_impact() {
        let reserves = pair(1_000, 1_000);
        let quote = calculate_out_amount(&reserves, 10, FeeRate::DEFAULT)
            .ready()
            .unwrap();
        // 8 out for 10 in at a 1:1 spot rate: 20% impact
        assert_eq!(
            calculate_price_impact(&reserves, &quote).ready().unwrap(),
            dec!(20)
        );
    }

    #[test]
    fn test_minimum_received() {
        assert_eq!(calculate_minimum_received(10_000, 50), 9_950);
        assert_eq!(calculate_minimum_received(10_000, 20_000), 0);
        assert_eq!(calculate_minimum_received(-5, 50), 0);
    }

    #[test]
    fn test_calculate_k() {
        assert_eq!(calculate_k(&pair(3, 7)), U256::from(21));
    }
}
