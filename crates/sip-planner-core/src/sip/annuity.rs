use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::MAX_PERIOD_MONTHS;
use crate::error::PlannerError;
use crate::time_value::{annuity_due_factor, effective_annual_rate, monthly_rate_from_annual_pct};
use crate::types::*;
use crate::PlannerResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Raw annuity parameters. `monthly_rate` is a decimal (0.01 = 1% a month).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnuityParameters {
    pub monthly_contribution: Money,
    pub period_months: u32,
    pub monthly_rate: Rate,
}

/// Unrounded outcome of a single annuity evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnuityResult {
    pub total_contributed: Money,
    pub maturity_value: Money,
    pub gain: Money,
    pub gain_percent: Percent,
}

/// User-facing SIP input: annual return given in percent (12 = 12%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipInput {
    pub monthly_contribution: Money,
    pub years: u32,
    pub annual_return_pct: Percent,
}

/// Output of `calculate_sip`. All fields rounded for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipOutput {
    pub months: u32,
    pub monthly_rate: Rate,
    pub total_invested: Money,
    pub maturity_value: Money,
    pub returns: Money,
    pub return_percentage: Percent,
    pub effective_annual_rate_pct: Percent,
}

/// SIP whose monthly contribution rises once a year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepUpSipInput {
    pub monthly_contribution: Money,
    pub years: u32,
    pub annual_return_pct: Percent,
    /// Yearly increase applied to the monthly contribution (10 = +10% a year)
    pub annual_step_up_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepUpSipOutput {
    pub months: u32,
    pub final_monthly_contribution: Money,
    pub total_invested: Money,
    pub maturity_value: Money,
    pub returns: Money,
    pub return_percentage: Percent,
    /// Value of the same base contribution without step-ups
    pub flat_sip_maturity_value: Money,
    pub year_by_year: Vec<StepUpYear>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepUpYear {
    pub year: u32,
    pub monthly_contribution: Money,
    pub invested_to_date: Money,
    pub value: Money,
}

// ---------------------------------------------------------------------------
// Closed-form evaluation
// ---------------------------------------------------------------------------

impl AnnuityParameters {
    /// Build parameters from the user-facing annual percentage form.
    pub fn from_annual_pct(monthly_contribution: Money, years: u32, annual_return_pct: Percent) -> Self {
        AnnuityParameters {
            monthly_contribution,
            period_months: years.saturating_mul(12),
            monthly_rate: monthly_rate_from_annual_pct(annual_return_pct),
        }
    }

    /// Same contribution and rate, truncated to `months`.
    pub fn at_month(&self, months: u32) -> Self {
        AnnuityParameters {
            period_months: months,
            ..*self
        }
    }

    fn ensure_non_negative(&self) -> PlannerResult<()> {
        if self.monthly_contribution < Decimal::ZERO {
            return Err(PlannerError::invalid(
                "monthly_contribution",
                "Monthly contribution cannot be negative",
            ));
        }
        if self.monthly_rate < Decimal::ZERO {
            return Err(PlannerError::invalid(
                "monthly_rate",
                "Rate of return cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Maturity value of a monthly contribution series.
///
/// `P * ((1+r)^n - 1) / r * (1+r)` for r > 0, `P * n` for r = 0. Zero
/// contribution and zero months are allowed here and evaluate to zero.
pub fn future_value(params: &AnnuityParameters) -> PlannerResult<Money> {
    params.ensure_non_negative()?;
    let factor = annuity_due_factor(params.monthly_rate, params.period_months)?;
    params
        .monthly_contribution
        .checked_mul(factor)
        .ok_or_else(|| PlannerError::Overflow {
            context: "SIP maturity value".into(),
        })
}

/// Evaluate an annuity into an unrounded result record.
pub fn evaluate(params: &AnnuityParameters) -> PlannerResult<AnnuityResult> {
    let maturity_value = future_value(params)?;
    let total_contributed = params
        .monthly_contribution
        .checked_mul(Decimal::from(params.period_months))
        .ok_or_else(|| PlannerError::Overflow {
            context: "SIP total contributed".into(),
        })?;
    let gain = maturity_value - total_contributed;
    Ok(AnnuityResult {
        total_contributed,
        maturity_value,
        gain,
        gain_percent: return_percentage(gain, total_contributed),
    })
}

impl AnnuityResult {
    /// Copy with every field rounded for reporting.
    pub fn rounded(&self) -> Self {
        AnnuityResult {
            total_contributed: round_money(self.total_contributed),
            maturity_value: round_money(self.maturity_value),
            gain: round_money(self.gain),
            gain_percent: round_percent(self.gain_percent),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub(crate) fn validate_years(field: &str, years: u32) -> PlannerResult<()> {
    if years == 0 {
        return Err(PlannerError::invalid(field, "Investment period must be at least 1 year"));
    }
    if years.saturating_mul(12) > MAX_PERIOD_MONTHS {
        return Err(PlannerError::invalid(
            field,
            format!("Investment period cannot exceed {} years", MAX_PERIOD_MONTHS / 12),
        ));
    }
    Ok(())
}

pub(crate) fn validate_return_pct(field: &str, annual_return_pct: Percent) -> PlannerResult<()> {
    if annual_return_pct < Decimal::ZERO {
        return Err(PlannerError::invalid(field, "Expected return cannot be negative"));
    }
    if annual_return_pct > dec!(100) {
        return Err(PlannerError::invalid(field, "Expected return cannot exceed 100% a year"));
    }
    Ok(())
}

pub(crate) fn validate_positive(field: &str, value: Money) -> PlannerResult<()> {
    if value <= Decimal::ZERO {
        return Err(PlannerError::invalid(field, format!("{field} must be > 0")));
    }
    Ok(())
}

pub(crate) fn return_assumption_warnings(annual_return_pct: Percent, warnings: &mut Vec<String>) {
    if annual_return_pct.is_zero() {
        warnings.push("Zero expected return: maturity value equals contributions".into());
    } else if annual_return_pct > dec!(30) {
        warnings.push(format!(
            "Expected return of {annual_return_pct}% a year is unusually high"
        ));
    }
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Calculate maturity value and returns for a monthly SIP.
pub fn calculate_sip(input: &SipInput) -> PlannerResult<ComputationOutput<SipOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_positive("monthly_contribution", input.monthly_contribution)?;
    validate_years("years", input.years)?;
    validate_return_pct("annual_return_pct", input.annual_return_pct)?;
    return_assumption_warnings(input.annual_return_pct, &mut warnings);

    let params = AnnuityParameters::from_annual_pct(
        input.monthly_contribution,
        input.years,
        input.annual_return_pct,
    );
    let result = evaluate(&params)?.rounded();
    let ear = effective_annual_rate(params.monthly_rate)?;

    log::debug!(
        "sip: {} x {} months at {} -> {}",
        params.monthly_contribution,
        params.period_months,
        params.monthly_rate,
        result.maturity_value
    );

    let output = SipOutput {
        months: params.period_months,
        monthly_rate: round_rate(params.monthly_rate),
        total_invested: result.total_contributed,
        maturity_value: result.maturity_value,
        returns: result.gain,
        return_percentage: result.gain_percent,
        effective_annual_rate_pct: round_percent(ear * dec!(100)),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SIP future value (monthly compounding, contributions at start of month)",
        &serde_json::json!({
            "monthly_contribution": input.monthly_contribution.to_string(),
            "years": input.years,
            "annual_return_pct": input.annual_return_pct.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Calculate a SIP whose contribution is stepped up at every anniversary.
pub fn calculate_step_up_sip(
    input: &StepUpSipInput,
) -> PlannerResult<ComputationOutput<StepUpSipOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_positive("monthly_contribution", input.monthly_contribution)?;
    validate_years("years", input.years)?;
    validate_return_pct("annual_return_pct", input.annual_return_pct)?;
    if input.annual_step_up_pct < Decimal::ZERO {
        return Err(PlannerError::invalid(
            "annual_step_up_pct",
            "Step-up percentage cannot be negative",
        ));
    }
    return_assumption_warnings(input.annual_return_pct, &mut warnings);

    let overflow = || PlannerError::Overflow {
        context: "step-up SIP accumulation".into(),
    };

    let monthly_rate = monthly_rate_from_annual_pct(input.annual_return_pct);
    let growth = Decimal::ONE + monthly_rate;
    let step_up = input.annual_step_up_pct / dec!(100);

    let mut balance = Decimal::ZERO;
    let mut invested = Decimal::ZERO;
    let mut contribution = input.monthly_contribution;
    let mut year_by_year = Vec::with_capacity(input.years as usize);

    for year in 0..input.years {
        if year > 0 {
            contribution = contribution
                .checked_mul(Decimal::ONE + step_up)
                .ok_or_else(overflow)?;
        }
        for _ in 0..12 {
            invested = invested.checked_add(contribution).ok_or_else(overflow)?;
            balance = balance
                .checked_add(contribution)
                .and_then(|b| b.checked_mul(growth))
                .ok_or_else(overflow)?;
        }
        year_by_year.push(StepUpYear {
            year: year + 1,
            monthly_contribution: round_money(contribution),
            invested_to_date: round_money(invested),
            value: round_money(balance),
        });
    }

    let flat = AnnuityParameters::from_annual_pct(
        input.monthly_contribution,
        input.years,
        input.annual_return_pct,
    );
    let flat_value = future_value(&flat)?;
    let returns = balance - invested;

    if input.annual_step_up_pct > dec!(25) {
        warnings.push(format!(
            "Step-up of {}% a year compounds quickly; final contribution is {}",
            input.annual_step_up_pct,
            round_money(contribution)
        ));
    }

    let output = StepUpSipOutput {
        months: input.years * 12,
        final_monthly_contribution: round_money(contribution),
        total_invested: round_money(invested),
        maturity_value: round_money(balance),
        returns: round_money(returns),
        return_percentage: round_percent(return_percentage(returns, invested)),
        flat_sip_maturity_value: round_money(flat_value),
        year_by_year,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Step-up SIP (annual contribution increase, monthly compounding)",
        &serde_json::json!({
            "monthly_contribution": input.monthly_contribution.to_string(),
            "years": input.years,
            "annual_return_pct": input.annual_return_pct.to_string(),
            "annual_step_up_pct": input.annual_step_up_pct.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
