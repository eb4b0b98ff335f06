//! Conversion between raw integer amounts and human-readable decimals.
//!
//! Integer products go through `U256`, so any pair of `i128` values can be
//! multiplied without loss. Results are narrowed back to `i128` only after
//! division, and anything that does not fit is reported as
//! [`ValidationIssue::PrecisionOverflow`].

use crate::entities::token::Decimals;
use crate::error::{AmmError, Quote, ValidationIssue};
use primitive_types::U256;
use rust_decimal::Decimal;

/// Most fraction digits a `Decimal` can carry.
const DECIMAL_MAX_SCALE: u32 = 28;

/// Widens a non-negative raw amount.
pub(crate) fn widen(value: i128) -> U256 {
    debug_assert!(value >= 0, "raw amounts are non-negative");
    U256::from(value.unsigned_abs())
}

/// Narrows back to `i128`, or `None` if the value exceeds `i128::MAX`.
pub(crate) fn narrow(value: U256) -> Option<i128> {
    if value > U256::from(i128::MAX.unsigned_abs()) {
        return None;
    }
    i128::try_from(value.as_u128()).ok()
}

/// `floor(value * numerator / denominator)` without intermediate overflow.
pub(crate) fn mul_div_floor(value: i128, numerator: i128, denominator: i128) -> Option<i128> {
    if denominator == 0 {
        return None;
    }
    narrow(widen(value) * widen(numerator) / widen(denominator))
}

/// Exact human-readable value of a raw amount.
///
/// Fraction digits beyond `Decimal`'s 28-digit scale are truncated.
///
/// # Errors
/// Returns [`AmmError::DecimalConversion`] if the whole part does not fit a `Decimal`.
pub fn raw_to_decimal(raw: i128, decimals: Decimals) -> Result<Decimal, AmmError> {
    let factor = decimals.scale_factor();
    let whole = raw / factor;
    let mut fraction = raw % factor;
    let mut scale = u32::from(decimals.get());
    if scale > DECIMAL_MAX_SCALE {
        fraction /= 10i128.pow(scale - DECIMAL_MAX_SCALE);
        scale = DECIMAL_MAX_SCALE;
    }

    let conversion = || AmmError::DecimalConversion(raw.to_string());
    let whole = Decimal::try_from_i128_with_scale(whole, 0).map_err(|_| conversion())?;
    let fraction = Decimal::try_from_i128_with_scale(fraction, scale).map_err(|_| conversion())?;
    whole.checked_add(fraction).ok_or_else(conversion)
}

/// Raw amount of a human-readable value, flooring digits beyond `decimals`.
pub fn decimal_to_raw(value: Decimal, decimals: Decimals) -> Quote<i128> {
    if value.is_sign_negative() && !value.is_zero() {
        return Quote::Invalid(ValidationIssue::InvalidInput);
    }
    let mantissa = value.mantissa();
    let scale = value.scale();
    let target = u32::from(decimals.get());

    let raw = if target >= scale {
        10i128
            .checked_pow(target - scale)
            .and_then(|factor| mantissa.checked_mul(factor))
    } else {
        Some(mantissa / 10i128.pow(scale - target))
    };

    match raw {
        Some(raw) => Quote::Ready(raw),
        None => Quote::Invalid(ValidationIssue::PrecisionOverflow),
    }
}

/// Parses user-typed text such as `"1,250.5"` into a raw amount.
///
/// An empty field is zero. Signs, exponents and other characters are
/// rejected; digits beyond `decimals` are floored. Parsing is done on the
/// digit string so amounts above `Decimal` range still convert exactly.
pub fn parse_amount(text: &str, decimals: Decimals) -> Quote<i128> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() {
        return Quote::Ready(0);
    }

    let (whole, fraction) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));
    if (whole.is_empty() && fraction.is_empty())
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Quote::Invalid(ValidationIssue::InvalidInput);
    }

    let places = usize::from(decimals.get());
    let mut digits = String::with_capacity(whole.len() + places);
    digits.push_str(whole);
    digits.extend(fraction.chars().chain(std::iter::repeat('0')).take(places));

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Quote::Ready(0);
    }
    match digits.parse::<i128>() {
        Ok(raw) => Quote::Ready(raw),
        Err(_) => Quote::Invalid(ValidationIssue::PrecisionOverflow),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_raw_to_decimal() {
        assert_eq!(
            raw_to_decimal(12_345_678, Decimals::NATIVE).unwrap(),
            dec!(1.2345678)
        );
        assert_eq!(
            raw_to_decimal(2_000_000_000_000_000_000_000, Decimals::STANDARD).unwrap(),
            dec!(2000)
        );
        assert_eq!(raw_to_decimal(0, Decimals::STABLE).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_raw_to_decimal_truncates_beyond_decimal_scale() {
        let d38 = Decimals::new(38).unwrap();
        let value = raw_to_decimal(123_456_789, d38).unwrap();
        assert_eq!(value, Decimal::ZERO);
        let one = raw_to_decimal(10i128.pow(38), d38).unwrap();
        assert_eq!(one, Decimal::ONE);
    }

    #[test]
    fn test_raw_to_decimal_rejects_huge_whole_part() {
        let result = raw_to_decimal(i128::MAX, Decimals::new(0).unwrap());
        assert!(matches!(result, Err(AmmError::DecimalConversion(_))));
    }

    #[test]
    fn test_decimal_to_raw() {
        assert_eq!(
            decimal_to_raw(dec!(1.5), Decimals::STANDARD),
            Quote::Ready(1_500_000_000_000_000_000)
        );
        assert_eq!(
            decimal_to_raw(dec!(-1), Decimals::STABLE),
            Quote::Invalid(ValidationIssue::InvalidInput)
        );
        assert_eq!(
            decimal_to_raw(dec!(79228162514264337593543950335), Decimals::STANDARD),
            Quote::Invalid(ValidationIssue::PrecisionOverflow)
        );
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("", Decimals::STABLE), Quote::Ready(0));
        assert_eq!(parse_amount("1,250.5", Decimals::STABLE), Quote::Ready(1_250_500_000));
        assert_eq!(parse_amount(".25", Decimals::NATIVE), Quote::Ready(2_500_000));
        assert_eq!(parse_amount("3.", Decimals::STABLE), Quote::Ready(3_000_000));
        assert_eq!(parse_amount("0.1234567", Decimals::STABLE), Quote::Ready(123_456));
        assert_eq!(
            parse_amount("-1", Decimals::STABLE),
            Quote::Invalid(ValidationIssue::InvalidInput)
        );
        assert_eq!(
            parse_amount("1e5", Decimals::STABLE),
            Quote::Invalid(ValidationIssue::InvalidInput)
        );
        assert_eq!(
            parse_amount(".", Decimals::STABLE),
            Quote::Invalid(ValidationIssue::InvalidInput)
        );
        assert_eq!(
            parse_amount("1000000000000000000000", Decimals::STANDARD),
            Quote::Invalid(ValidationIssue::PrecisionOverflow)
        );
    }

    #[test]
    fn test_mul_div_floor() {
        assert_eq!(mul_div_floor(i128::MAX, i128::MAX, i128::MAX), Some(i128::MAX));
        assert_eq!(mul_div_floor(7, 3, 2), Some(10));
        assert_eq!(mul_div_floor(1, 1, 0), None);
        assert_eq!(mul_div_floor(i128::MAX, 2, 1), None);
    }
}
