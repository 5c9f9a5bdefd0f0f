use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::PlannerError;
use crate::types::{Percent, Rate};
use crate::PlannerResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const HUNDRED: Decimal = dec!(100);

/// Convert an annual percentage (12 = 12%) into a monthly decimal rate.
pub fn monthly_rate_from_annual_pct(annual_pct: Percent) -> Rate {
    annual_pct / MONTHS_PER_YEAR / HUNDRED
}

/// Convert an annual percentage (10 = 10%) into an annual decimal rate.
pub fn annual_rate_from_pct(annual_pct: Percent) -> Rate {
    annual_pct / HUNDRED
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
///
/// Fails with `Overflow` instead of panicking when the growth factor leaves
/// the representable range.
pub fn compound(rate: Rate, n: u32) -> PlannerResult<Decimal> {
    let factor = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.checked_mul(factor).ok_or_else(|| PlannerError::Overflow {
            context: format!("compounding {rate} over {n} periods"),
        })?;
    }
    Ok(result)
}

/// Future value of one unit contributed at the start of each period:
/// `((1 + r)^n - 1) / r * (1 + r)`, or `n` when the rate is zero.
pub fn annuity_due_factor(rate: Rate, n: u32) -> PlannerResult<Decimal> {
    if rate.is_zero() {
        return Ok(Decimal::from(n));
    }
    let growth = compound(rate, n)?;
    ((growth - Decimal::ONE) / rate)
        .checked_mul(Decimal::ONE + rate)
        .ok_or_else(|| PlannerError::Overflow {
            context: "annuity factor".into(),
        })
}

/// Discount a future amount back `n` periods at `rate`.
pub fn present_value(future_value: Decimal, rate: Rate, n: u32) -> PlannerResult<Decimal> {
    let growth = compound(rate, n)?;
    if growth.is_zero() {
        return Err(PlannerError::DivisionByZero {
            context: "present value growth factor".into(),
        });
    }
    Ok(future_value / growth)
}

/// Effective annual rate equivalent to a monthly compounding rate.
pub fn effective_annual_rate(monthly_rate: Rate) -> PlannerResult<Rate> {
    Ok(compound(monthly_rate, 12)? - Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_rate_conversion() {
        assert_eq!(monthly_rate_from_annual_pct(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate_from_annual_pct(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_compound_basic() {
        assert_eq!(compound(dec!(0.10), 2).unwrap(), dec!(1.21));
        assert_eq!(compound(dec!(0.10), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_compound_overflow_is_an_error() {
        let result = compound(dec!(1.0), 200);
        assert!(matches!(result, Err(PlannerError::Overflow { .. })));
    }

    #[test]
    fn test_annuity_due_factor_zero_rate() {
        assert_eq!(annuity_due_factor(Decimal::ZERO, 12).unwrap(), dec!(12));
    }

    #[test]
    fn test_annuity_due_factor_single_period() {
        // One contribution, one period of growth
        assert_eq!(annuity_due_factor(dec!(0.01), 1).unwrap(), dec!(1.01));
    }

    #[test]
    fn test_present_value_inverts_compound() {
        let pv = present_value(dec!(121), dec!(0.10), 2).unwrap();
        assert_eq!(pv, dec!(100));
    }

    #[test]
    fn test_effective_annual_rate() {
        let ear = effective_annual_rate(dec!(0.01)).unwrap();
        assert!((ear - dec!(0.126825)).abs() < dec!(0.000001));
    }
}
