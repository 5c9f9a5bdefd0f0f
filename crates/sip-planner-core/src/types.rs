use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Periodic rates expressed as decimals (0.01 = 1% per month).
pub type Rate = Decimal;

/// Percentages as entered by users and reported back (12 = 12%).
pub type Percent = Decimal;

/// Decimal places used for reported currency fields
pub const MONEY_DP: u32 = 2;
/// Decimal places used for reported rates
pub const RATE_DP: u32 = 6;
/// Decimal places used for reported percentages
pub const PERCENT_DP: u32 = 2;
/// Decimal places used for fractional month and year counts
pub const MONTHS_DP: u32 = 2;
/// Decimal places used for growth multiples
pub const RATIO_DP: u32 = 4;

/// Round a currency amount for reporting. Never apply to intermediates.
pub fn round_money(value: Money) -> Money {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a periodic rate for reporting.
pub fn round_rate(value: Rate) -> Rate {
    value.round_dp_with_strategy(RATE_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a percentage for reporting.
pub fn round_percent(value: Percent) -> Percent {
    value.round_dp_with_strategy(PERCENT_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a month or year count for reporting.
pub fn round_months(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONTHS_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a ratio such as a growth multiple for reporting.
pub fn round_ratio(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(RATIO_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Gain as a percentage of the amount invested. Zero when nothing was invested.
pub fn return_percentage(gain: Money, invested: Money) -> Percent {
    if invested.is_zero() {
        return Decimal::ZERO;
    }
    gain / invested * dec!(100)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    for w in &warnings {
        log::warn!("{methodology}: {w}");
    }
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(10.005)), dec!(10.01));
        assert_eq!(round_money(dec!(-10.005)), dec!(-10.01));
        assert_eq!(round_money(dec!(1161695.3817597)), dec!(1161695.38));
    }

    #[test]
    fn test_round_rate_six_places() {
        assert_eq!(round_rate(dec!(0.0066666666)), dec!(0.006667));
    }

    #[test]
    fn test_months_and_ratio_round_half_away_from_zero() {
        assert_eq!(round_months(dec!(1.005)), dec!(1.01));
        assert_eq!(round_months(dec!(2.125)), dec!(2.13));
        assert_eq!(round_ratio(dec!(1.00005)), dec!(1.0001));
    }

    #[test]
    fn test_return_percentage_zero_invested() {
        assert_eq!(return_percentage(dec!(100), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_return_percentage_basic() {
        assert_eq!(return_percentage(dec!(50), dec!(200)), dec!(25));
    }
}
