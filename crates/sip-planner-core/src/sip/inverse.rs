use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::annuity::{
    future_value, return_assumption_warnings, validate_positive, validate_return_pct,
    validate_years, AnnuityParameters,
};
use super::MAX_PERIOD_MONTHS;
use crate::error::PlannerError;
use crate::time_value::{annuity_due_factor, monthly_rate_from_annual_pct};
use crate::types::*;
use crate::PlannerResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Solve for the monthly contribution that reaches a target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredSipInput {
    pub target_amount: Money,
    pub years: u32,
    pub annual_return_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredSipOutput {
    pub months: u32,
    pub monthly_rate: Rate,
    pub required_monthly_contribution: Money,
    pub total_invested: Money,
    pub expected_returns: Money,
}

/// Solve for how long a contribution takes to reach a target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipDurationInput {
    pub monthly_contribution: Money,
    pub target_amount: Money,
    pub annual_return_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipDurationOutput {
    /// Continuous (fractional) solution of the closed form
    pub months: Decimal,
    pub years: Decimal,
    /// Smallest whole number of months whose maturity value reaches the target
    pub whole_months: u32,
    pub whole_years_part: u32,
    pub remaining_months_part: u32,
    pub total_invested: Money,
    pub maturity_value: Money,
}

// ---------------------------------------------------------------------------
// Closed-form inverses
// ---------------------------------------------------------------------------

/// Monthly contribution whose maturity value after `period_months` is `target`.
///
/// `target / (((1+r)^n - 1) / r * (1+r))`, or `target / n` at zero rate.
pub fn required_contribution(target: Money, period_months: u32, monthly_rate: Rate) -> PlannerResult<Money> {
    validate_positive("target_amount", target)?;
    if period_months == 0 {
        return Err(PlannerError::invalid("period_months", "Period must be at least 1 month"));
    }
    if monthly_rate < Decimal::ZERO {
        return Err(PlannerError::invalid("monthly_rate", "Rate of return cannot be negative"));
    }
    let factor = annuity_due_factor(monthly_rate, period_months)?;
    if factor.is_zero() {
        return Err(PlannerError::DivisionByZero {
            context: "required contribution annuity factor".into(),
        });
    }
    Ok(target / factor)
}

/// Months needed for `contribution` to grow to `target`.
///
/// For r > 0 this is the logarithmic inversion
/// `ln(target * r / (P * (1+r)) + 1) / ln(1+r)`, which solves the closed form
/// for a real-valued month count; the answer is generally fractional and is
/// not refined iteratively. At zero rate it is `target / P`.
pub fn required_duration_months(contribution: Money, target: Money, monthly_rate: Rate) -> PlannerResult<Decimal> {
    validate_positive("monthly_contribution", contribution)?;
    validate_positive("target_amount", target)?;
    if monthly_rate < Decimal::ZERO {
        return Err(PlannerError::invalid("monthly_rate", "Rate of return cannot be negative"));
    }

    let overflow = || PlannerError::Overflow {
        context: "duration solve".into(),
    };

    if monthly_rate.is_zero() {
        return target.checked_div(contribution).ok_or_else(overflow);
    }

    let one_plus_r = Decimal::ONE + monthly_rate;
    let argument = target
        .checked_mul(monthly_rate)
        .zip(contribution.checked_mul(one_plus_r))
        .and_then(|(num, den)| num.checked_div(den))
        .and_then(|ratio| ratio.checked_add(Decimal::ONE))
        .ok_or_else(overflow)?;
    let numerator = argument.checked_ln().ok_or_else(|| PlannerError::Overflow {
        context: "duration logarithm".into(),
    })?;
    let denominator = one_plus_r.checked_ln().ok_or_else(|| PlannerError::Overflow {
        context: "duration logarithm".into(),
    })?;
    if denominator.is_zero() {
        return Err(PlannerError::DivisionByZero {
            context: "duration logarithm of growth factor".into(),
        });
    }
    Ok(numerator / denominator)
}

/// Round the continuous solution up to whole months, then settle the integer
/// against the forward formula so the target is reached at `whole` but not at
/// `whole - 1`.
fn whole_months_to_target(params: &AnnuityParameters, target: Money, months: Decimal) -> PlannerResult<u32> {
    let mut whole = months
        .ceil()
        .to_u32()
        .filter(|m| *m <= MAX_PERIOD_MONTHS)
        .ok_or_else(target_unreachable)?;

    while future_value(&params.at_month(whole))? < target {
        whole += 1;
        if whole > MAX_PERIOD_MONTHS {
            return Err(target_unreachable());
        }
    }
    while whole > 1 && future_value(&params.at_month(whole - 1))? >= target {
        whole -= 1;
    }
    Ok(whole.max(1))
}

fn target_unreachable() -> PlannerError {
    PlannerError::invalid(
        "target_amount",
        format!("Target is not reachable within {} years", MAX_PERIOD_MONTHS / 12),
    )
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Monthly SIP needed to reach a target amount.
pub fn calculate_required_sip(
    input: &RequiredSipInput,
) -> PlannerResult<ComputationOutput<RequiredSipOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_positive("target_amount", input.target_amount)?;
    validate_years("years", input.years)?;
    validate_return_pct("annual_return_pct", input.annual_return_pct)?;
    return_assumption_warnings(input.annual_return_pct, &mut warnings);

    let months = input.years * 12;
    let monthly_rate = monthly_rate_from_annual_pct(input.annual_return_pct);
    let contribution = required_contribution(input.target_amount, months, monthly_rate)?;
    let total_invested = contribution * Decimal::from(months);

    let output = RequiredSipOutput {
        months,
        monthly_rate: round_rate(monthly_rate),
        required_monthly_contribution: round_money(contribution),
        total_invested: round_money(total_invested),
        expected_returns: round_money(input.target_amount - total_invested),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Required SIP (inverse of the annuity-due future value)",
        &serde_json::json!({
            "target_amount": input.target_amount.to_string(),
            "years": input.years,
            "annual_return_pct": input.annual_return_pct.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Time a monthly SIP needs to reach a target amount.
pub fn calculate_sip_duration(
    input: &SipDurationInput,
) -> PlannerResult<ComputationOutput<SipDurationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_positive("monthly_contribution", input.monthly_contribution)?;
    validate_positive("target_amount", input.target_amount)?;
    validate_return_pct("annual_return_pct", input.annual_return_pct)?;
    return_assumption_warnings(input.annual_return_pct, &mut warnings);

    let monthly_rate = monthly_rate_from_annual_pct(input.annual_return_pct);
    let months = required_duration_months(input.monthly_contribution, input.target_amount, monthly_rate)?;
    let params = AnnuityParameters {
        monthly_contribution: input.monthly_contribution,
        period_months: 0,
        monthly_rate,
    };
    let whole_months = whole_months_to_target(&params, input.target_amount, months)?;
    let maturity_value = future_value(&params.at_month(whole_months))?;

    if input.monthly_contribution >= input.target_amount {
        warnings.push("Target is reached within the first month".into());
    }

    let output = SipDurationOutput {
        months: round_months(months),
        years: round_months(months / dec!(12)),
        whole_months,
        whole_years_part: whole_months / 12,
        remaining_months_part: whole_months % 12,
        total_invested: round_money(input.monthly_contribution * Decimal::from(whole_months)),
        maturity_value: round_money(maturity_value),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SIP duration (closed-form logarithmic inversion, fractional months)",
        &serde_json::json!({
            "monthly_contribution": input.monthly_contribution.to_string(),
            "target_amount": input.target_amount.to_string(),
            "annual_return_pct": input.annual_return_pct.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
