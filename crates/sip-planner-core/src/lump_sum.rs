use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlannerError;
use crate::sip::annuity::{
    calculate_sip, return_assumption_warnings, validate_positive, validate_return_pct,
    validate_years, SipInput, SipOutput,
};
use crate::time_value::{annual_rate_from_pct, compound, present_value};
use crate::types::*;
use crate::PlannerResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One-off investment compounded annually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpSumInput {
    pub principal: Money,
    pub years: u32,
    pub annual_return_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpSumOutput {
    pub principal: Money,
    pub years: u32,
    pub maturity_value: Money,
    pub returns: Money,
    pub return_percentage: Percent,
    pub growth_multiple: Decimal,
}

/// Strategy that produced the larger maturity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    Sip,
    LumpSum,
}

/// Compare a SIP against a lump sum. When `lump_sum_principal` is omitted the
/// lump sum invests the SIP's total contributions on day one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub sip: SipInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lump_sum_principal: Option<Money>,
    /// Defaults to the SIP's expected return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lump_sum_return_pct: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub sip: SipOutput,
    pub lump_sum: LumpSumOutput,
    /// SIP maturity minus lump-sum maturity
    pub difference: Money,
    pub winner: Strategy,
}

// ---------------------------------------------------------------------------
// Closed form
// ---------------------------------------------------------------------------

/// `principal * (1 + annual_pct / 100)^years`, annual compounding.
pub fn future_value(principal: Money, years: u32, annual_return_pct: Percent) -> PlannerResult<Money> {
    if principal < Decimal::ZERO {
        return Err(PlannerError::invalid("principal", "Principal cannot be negative"));
    }
    if annual_return_pct < Decimal::ZERO {
        return Err(PlannerError::invalid("annual_return_pct", "Expected return cannot be negative"));
    }
    let growth = compound(annual_rate_from_pct(annual_return_pct), years)?;
    principal.checked_mul(growth).ok_or_else(|| PlannerError::Overflow {
        context: "lump-sum maturity value".into(),
    })
}

/// Principal needed today for `target` after `years` of annual compounding.
pub fn required_principal(target: Money, years: u32, annual_return_pct: Percent) -> PlannerResult<Money> {
    validate_positive("target_amount", target)?;
    if annual_return_pct < Decimal::ZERO {
        return Err(PlannerError::invalid("annual_return_pct", "Expected return cannot be negative"));
    }
    present_value(target, annual_rate_from_pct(annual_return_pct), years)
}

/// Tie goes to the SIP.
pub fn pick_winner(sip_maturity: Money, lump_sum_maturity: Money) -> Strategy {
    if sip_maturity >= lump_sum_maturity {
        Strategy::Sip
    } else {
        Strategy::LumpSum
    }
}

fn lump_sum_output(input: &LumpSumInput) -> PlannerResult<LumpSumOutput> {
    let maturity = future_value(input.principal, input.years, input.annual_return_pct)?;
    let returns = maturity - input.principal;
    Ok(LumpSumOutput {
        principal: round_money(input.principal),
        years: input.years,
        maturity_value: round_money(maturity),
        returns: round_money(returns),
        return_percentage: round_percent(return_percentage(returns, input.principal)),
        growth_multiple: if input.principal.is_zero() {
            Decimal::ZERO
        } else {
            round_ratio(maturity / input.principal)
        },
    })
}

fn validate_lump_sum(input: &LumpSumInput) -> PlannerResult<()> {
    validate_positive("principal", input.principal)?;
    validate_years("years", input.years)?;
    validate_return_pct("annual_return_pct", input.annual_return_pct)
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Maturity value of a one-off investment.
pub fn calculate_lump_sum(input: &LumpSumInput) -> PlannerResult<ComputationOutput<LumpSumOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_lump_sum(input)?;
    return_assumption_warnings(input.annual_return_pct, &mut warnings);

    let output = lump_sum_output(input)?;
    log::debug!("lump sum: {} over {} years -> {}", input.principal, input.years, output.maturity_value);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Lump-sum future value (annual compounding)",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "years": input.years,
            "annual_return_pct": input.annual_return_pct.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Compare a monthly SIP with a lump sum over the same horizon.
pub fn compare_sip_lump_sum(
    input: &ComparisonInput,
) -> PlannerResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();

    let sip_out = calculate_sip(&input.sip)?;
    let mut warnings = sip_out.warnings;
    let sip = sip_out.result;

    let lump_input = LumpSumInput {
        principal: input.lump_sum_principal.unwrap_or(sip.total_invested),
        years: input.sip.years,
        annual_return_pct: input.lump_sum_return_pct.unwrap_or(input.sip.annual_return_pct),
    };
    validate_lump_sum(&lump_input)?;
    let lump_sum = lump_sum_output(&lump_input)?;

    if lump_input.principal != sip.total_invested {
        warnings.push(format!(
            "Lump sum principal {} differs from total SIP contributions {}",
            lump_input.principal, sip.total_invested
        ));
    }

    // Compared on reported (rounded) values so a displayed tie is a tie.
    let winner = pick_winner(sip.maturity_value, lump_sum.maturity_value);
    let difference = sip.maturity_value - lump_sum.maturity_value;

    let output = ComparisonOutput {
        sip,
        lump_sum,
        difference,
        winner,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SIP vs lump sum (monthly annuity-due vs annual compounding)",
        &serde_json::json!({
            "sip_monthly_contribution": input.sip.monthly_contribution.to_string(),
            "years": input.sip.years,
            "lump_sum_principal": lump_input.principal.to_string(),
            "lump_sum_return_pct": lump_input.annual_return_pct.to_string(),
            "tie_break": "sip",
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lump_sum_known_answer() {
        let input = LumpSumInput {
            principal: dec!(100000),
            years: 5,
            annual_return_pct: dec!(10),
        };
        let out = calculate_lump_sum(&input).unwrap().result;
        assert_eq!(out.maturity_value, dec!(161051.00));
        assert_eq!(out.returns, dec!(61051.00));
        assert_eq!(out.return_percentage, dec!(61.05));
        assert_eq!(out.growth_multiple, dec!(1.6105));
    }

    #[test]
    fn test_growth_multiple_rounds_half_away_from_zero() {
        // 1.00005 sits exactly on the 4 dp midpoint
        let input = LumpSumInput {
            principal: dec!(100000),
            years: 1,
            annual_return_pct: dec!(0.005),
        };
        let out = calculate_lump_sum(&input).unwrap().result;
        assert_eq!(out.growth_multiple, dec!(1.0001));
    }

    #[test]
    fn test_lump_sum_zero_rate() {
        assert_eq!(future_value(dec!(5000), 10, Decimal::ZERO).unwrap(), dec!(5000));
    }

    #[test]
    fn test_lump_sum_validation() {
        let input = LumpSumInput {
            principal: Decimal::ZERO,
            years: 5,
            annual_return_pct: dec!(10),
        };
        let err = calculate_lump_sum(&input).unwrap_err();
        assert!(err.to_string().contains("principal"));
    }

    #[test]
    fn test_required_principal_inverts_future_value() {
        let p = required_principal(dec!(161051), 5, dec!(10)).unwrap();
        assert_eq!(p, dec!(100000));
    }

    #[test]
    fn test_tie_goes_to_sip() {
        assert_eq!(pick_winner(dec!(12000), dec!(12000)), Strategy::Sip);
        assert_eq!(pick_winner(dec!(11999.99), dec!(12000)), Strategy::LumpSum);
    }

    #[test]
    fn test_comparison_exact_tie_at_zero_rate() {
        let input = ComparisonInput {
            sip: SipInput {
                monthly_contribution: dec!(1000),
                years: 1,
                annual_return_pct: Decimal::ZERO,
            },
            lump_sum_principal: None,
            lump_sum_return_pct: None,
        };
        let out = compare_sip_lump_sum(&input).unwrap().result;
        assert_eq!(out.sip.maturity_value, dec!(12000));
        assert_eq!(out.lump_sum.maturity_value, dec!(12000));
        assert_eq!(out.difference, Decimal::ZERO);
        assert_eq!(out.winner, Strategy::Sip);
    }

    #[test]
    fn test_comparison_same_capital_lump_sum_wins() {
        let input = ComparisonInput {
            sip: SipInput {
                monthly_contribution: dec!(5000),
                years: 10,
                annual_return_pct: dec!(12),
            },
            lump_sum_principal: None,
            lump_sum_return_pct: None,
        };
        let out = compare_sip_lump_sum(&input).unwrap().result;
        // 600000 * 1.12^10 is far above the SIP's 1.16M
        assert_eq!(out.lump_sum.principal, dec!(600000));
        assert_eq!(out.winner, Strategy::LumpSum);
        assert!(out.difference < Decimal::ZERO);
    }
}
