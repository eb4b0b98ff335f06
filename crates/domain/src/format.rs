//! Human-readable rendering of dollar amounts, percentages and token amounts.

use crate::entities::token::Decimals;
use crate::error::AmmError;
use crate::metrics::MetricFigure;
use crate::value_objects::Amount;
use rust_decimal::{Decimal, RoundingStrategy};

const THOUSAND: Decimal = Decimal::ONE_THOUSAND;
const MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
const BILLION: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);
// 10^12 = 232 * 2^32 + 3_567_587_328
const TRILLION: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);
const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// Display tiers from largest to smallest: threshold, divisor, decimals, suffix.
const TIERS: [(Decimal, Decimal, u32, &str); 7] = [
    (TRILLION, TRILLION, 2, "T"),
    (BILLION, BILLION, 1, "B"),
    (MILLION, MILLION, 1, "M"),
    (THOUSAND, THOUSAND, 1, "K"),
    (Decimal::ONE, Decimal::ONE, 2, ""),
    (CENT, Decimal::ONE, 4, ""),
    (Decimal::ZERO, Decimal::ONE, 6, ""),
];

/// Magnitude-suffixed rendering of a positive value, without a unit.
///
/// The tier is picked again after rounding, so a value that rounds up to
/// the next threshold takes that threshold's suffix.
fn compact(value: Decimal) -> String {
    let mut tier = TIERS
        .iter()
        .position(|(threshold, ..)| value >= *threshold)
        .unwrap_or(TIERS.len() - 1);
    loop {
        let (_, divisor, dp, suffix) = TIERS[tier];
        let rounded = (value / divisor)
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
        if tier > 0 && rounded * divisor >= TIERS[tier - 1].0 {
            tier -= 1;
            continue;
        }
        return format!("{:.*}{}", dp as usize, rounded, suffix);
    }
}

/// Formats a dollar amount with a magnitude suffix.
///
/// | value          | output     |
/// |----------------|------------|
/// | >= 1e12        | `$1.23T`   |
/// | >= 1e9         | `$1.2B`    |
/// | >= 1e6         | `$1.2M`    |
/// | >= 1e3         | `$1.2K`    |
/// | >= 1           | `$999.00`  |
/// | >= 0.01        | `$0.0500`  |
/// | > 0            | `$0.005000`|
/// | 0              | `$0.00`    |
pub fn format_large_number(value: Decimal) -> String {
    if value.is_zero() {
        return "$0.00".to_string();
    }
    if value.is_sign_negative() {
        return format!("-${}", compact(-value));
    }
    format!("${}", compact(value))
}

/// Same tiers as [`format_large_number`], followed by a token symbol
/// instead of a leading `$`. For figures with no USD reference price.
pub fn format_in_units(value: Decimal, symbol: &str) -> String {
    if value.is_zero() {
        return format!("0.00 {symbol}");
    }
    if value.is_sign_negative() {
        return format!("-{} {symbol}", compact(-value));
    }
    format!("{} {symbol}", compact(value))
}

/// Formats a percentage (4.5 means 4.5%).
///
/// Above 1000 gets a `K` suffix, above 100 is a whole number, above 1 has
/// one decimal, anything smaller keeps up to four decimals.
pub fn format_percentage(value: Decimal) -> String {
    let magnitude = value.abs();
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };

    let body = if magnitude > THOUSAND {
        format!("{}K", fixed(magnitude / THOUSAND, 1))
    } else if magnitude > Decimal::ONE_HUNDRED {
        fixed(magnitude, 0)
    } else if magnitude > Decimal::ONE {
        fixed(magnitude, 1)
    } else {
        let trimmed = magnitude
            .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        trimmed.to_string()
    };
    format!("{sign}{body}%")
}

/// Like [`format_percentage`], with an explicit `+` on gains.
pub fn format_percent_change(value: Decimal) -> String {
    let formatted = format_percentage(value);
    if value.is_sign_positive() && !value.is_zero() {
        format!("+{formatted}")
    } else {
        formatted
    }
}

/// Dollar figure with an `(est.)` marker when synthetic.
pub fn format_metric(figure: &MetricFigure) -> String {
    let formatted = format_large_number(figure.value);
    if figure.is_synthetic() {
        format!("{formatted} (est.)")
    } else {
        formatted
    }
}

/// Percent-change figure with an `(est.)` marker when synthetic.
pub fn format_change_metric(figure: &MetricFigure) -> String {
    let formatted = format_percent_change(figure.value);
    if figure.is_synthetic() {
        format!("{formatted} (est.)")
    } else {
        formatted
    }
}

/// Raw token amount in human units, truncated to `max_fraction_digits`.
///
/// # Errors
/// Returns [`AmmError::DecimalConversion`] if the amount exceeds `Decimal` range.
pub fn format_token_amount(
    raw: i128,
    decimals: Decimals,
    max_fraction_digits: u32,
) -> Result<String, AmmError> {
    Amount::new(raw, decimals).to_display(max_fraction_digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::MetricSource;
    use rust_decimal_macros::dec;

    #[test]
    fn test_suffix_constants() {
        assert_eq!(MILLION, dec!(1000000));
        assert_eq!(BILLION, dec!(1000000000));
        assert_eq!(TRILLION, dec!(1000000000000));
        assert_eq!(CENT, dec!(0.01));
    }

    #[test]
    fn test_format_large_number_boundaries() {
        assert_eq!(format_large_number(dec!(999)), "$999.00");
        assert_eq!(format_large_number(dec!(1000)), "$1.0K");
        assert_eq!(format_large_number(dec!(1000000)), "$1.0M");
        assert_eq!(format_large_number(dec!(2500000000)), "$2.5B");
        assert_eq!(format_large_number(dec!(1234000000000)), "$1.23T");
        assert_eq!(format_large_number(dec!(50000)), "$50.0K");
    }

    #[test]
    fn test_format_small_numbers() {
        assert_eq!(format_large_number(dec!(0.5)), "$0.5000");
        assert_eq!(format_large_number(dec!(0.01)), "$0.0100");
        assert_eq!(format_large_number(dec!(0.005)), "$0.005000");
        assert_eq!(format_large_number(dec!(0.00000049)), "$0.000000");
        assert_eq!(format_large_number(Decimal::ZERO), "$0.00");
        assert_eq!(format_large_number(dec!(-1500)), "-$1.5K");
    }

    #[test]
    fn test_rounding_carries_into_next_suffix() {
        assert_eq!(format_large_number(dec!(999950)), "$1.0M");
        assert_eq!(format_large_number(dec!(999.996)), "$1.0K");
        assert_eq!(format_large_number(dec!(0.99999)), "$1.00");
        assert_eq!(format_large_number(dec!(0.0099999)), "$0.0100");
        assert_eq!(format_large_number(dec!(999940)), "$999.9K");
        assert_eq!(format_large_number(dec!(-999950)), "-$1.0M");
    }

    #[test]
    fn test_format_in_units() {
        assert_eq!(format_in_units(dec!(2500), "MEME"), "2.5K MEME");
        assert_eq!(format_in_units(dec!(0.5), "MEME"), "0.5000 MEME");
        assert_eq!(format_in_units(Decimal::ZERO, "MEME"), "0.00 MEME");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(dec!(2500)), "2.5K%");
        assert_eq!(format_percentage(dec!(150.4)), "150%");
        assert_eq!(format_percentage(dec!(4.5)), "4.5%");
        assert_eq!(format_percentage(dec!(0.25)), "0.25%");
        assert_eq!(format_percentage(dec!(0.123456)), "0.1235%");
        assert_eq!(format_percentage(dec!(-3.25)), "-3.3%");
        assert_eq!(format_percentage(Decimal::ZERO), "0%");
    }

    #[test]
    fn test_format_percent_change() {
        assert_eq!(format_percent_change(dec!(4.5)), "+4.5%");
        assert_eq!(format_percent_change(dec!(-4.5)), "-4.5%");
        assert_eq!(format_percent_change(Decimal::ZERO), "0%");
    }

    #[test]
    fn test_synthetic_metrics_are_labelled() {
        let synthetic = MetricFigure {
            value: dec!(1200),
            source: MetricSource::Synthetic,
        };
        let real = MetricFigure {
            value: dec!(1200),
            source: MetricSource::OnChain,
        };
        assert_eq!(format_metric(&synthetic), "$1.2K (est.)");
        assert_eq!(format_metric(&real), "$1.2K");
    }

    #[test]
    fn test_format_token_amount() {
        assert_eq!(
            format_token_amount(1_992_013_962_079_806_432, Decimals::STANDARD, 6).unwrap(),
            "1.992013"
        );
        assert_eq!(format_token_amount(10_000_000, Decimals::NATIVE, 4).unwrap(), "1");
    }
}
