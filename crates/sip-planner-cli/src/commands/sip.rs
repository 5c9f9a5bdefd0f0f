use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use sip_planner_core::sip::annuity::{self, SipInput, StepUpSipInput};
use sip_planner_core::sip::inverse::{self, RequiredSipInput, SipDurationInput};
use sip_planner_core::sip::projection::{self, ProjectionInput};

/// Arguments for a monthly SIP projection
#[derive(Args)]
pub struct SipArgs {
    /// Monthly contribution
    #[arg(long)]
    pub monthly: Decimal,

    /// Investment period in years
    #[arg(long)]
    pub years: u32,

    /// Expected annual return in percent (12 = 12%)
    #[arg(long, default_value = "12")]
    pub rate: Decimal,
}

/// Arguments for a step-up SIP
#[derive(Args)]
pub struct StepUpArgs {
    /// Starting monthly contribution
    #[arg(long)]
    pub monthly: Decimal,

    /// Investment period in years
    #[arg(long)]
    pub years: u32,

    /// Expected annual return in percent
    #[arg(long, default_value = "12")]
    pub rate: Decimal,

    /// Yearly increase of the contribution in percent
    #[arg(long, default_value = "10")]
    pub step_up: Decimal,
}

/// Arguments for solving the required monthly SIP
#[derive(Args)]
pub struct RequiredSipArgs {
    /// Target amount
    #[arg(long)]
    pub target: Decimal,

    /// Investment period in years
    #[arg(long)]
    pub years: u32,

    /// Expected annual return in percent
    #[arg(long, default_value = "12")]
    pub rate: Decimal,
}

/// Arguments for solving how long a SIP takes to reach a target
#[derive(Args)]
pub struct DurationArgs {
    /// Monthly contribution
    #[arg(long)]
    pub monthly: Decimal,

    /// Target amount
    #[arg(long)]
    pub target: Decimal,

    /// Expected annual return in percent
    #[arg(long, default_value = "12")]
    pub rate: Decimal,
}

/// Arguments for a chart-ready projection series
#[derive(Args)]
pub struct ProjectionArgs {
    /// Monthly contribution
    #[arg(long)]
    pub monthly: Decimal,

    /// Investment period in years
    #[arg(long, conflicts_with = "months", required_unless_present = "months")]
    pub years: Option<u32>,

    /// Investment period in months
    #[arg(long)]
    pub months: Option<u32>,

    /// Expected annual return in percent
    #[arg(long, default_value = "12")]
    pub rate: Decimal,

    /// Months between samples
    #[arg(long, default_value = "12")]
    pub interval: u32,

    /// Date of the first contribution (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = SipInput {
        monthly_contribution: args.monthly,
        years: args.years,
        annual_return_pct: args.rate,
    };
    let result = annuity::calculate_sip(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_step_up(args: StepUpArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = StepUpSipInput {
        monthly_contribution: args.monthly,
        years: args.years,
        annual_return_pct: args.rate,
        annual_step_up_pct: args.step_up,
    };
    let result = annuity::calculate_step_up_sip(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_required_sip(args: RequiredSipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = RequiredSipInput {
        target_amount: args.target,
        years: args.years,
        annual_return_pct: args.rate,
    };
    let result = inverse::calculate_required_sip(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_duration(args: DurationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = SipDurationInput {
        monthly_contribution: args.monthly,
        target_amount: args.target,
        annual_return_pct: args.rate,
    };
    let result = inverse::calculate_sip_duration(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_projection(args: ProjectionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let period_months = match (args.months, args.years) {
        (Some(months), _) => months,
        (None, Some(years)) => years.checked_mul(12).ok_or("--years is too large")?,
        (None, None) => return Err("--years or --months required".into()),
    };
    let input = ProjectionInput {
        monthly_contribution: args.monthly,
        period_months,
        annual_return_pct: args.rate,
        interval_months: args.interval,
        start_date: args.start_date,
    };
    let result = projection::build_projection(&input)?;
    Ok(serde_json::to_value(result)?)
}
