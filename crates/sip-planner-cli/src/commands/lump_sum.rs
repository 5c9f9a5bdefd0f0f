use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use sip_planner_core::lump_sum::{self, ComparisonInput, LumpSumInput};
use sip_planner_core::sip::annuity::SipInput;

/// Arguments for a one-off investment
#[derive(Args)]
pub struct LumpSumArgs {
    /// Amount invested today
    #[arg(long)]
    pub principal: Decimal,

    /// Investment period in years
    #[arg(long)]
    pub years: u32,

    /// Expected annual return in percent
    #[arg(long, default_value = "12")]
    pub rate: Decimal,
}

/// Arguments for SIP vs lump-sum comparison
#[derive(Args)]
pub struct CompareArgs {
    /// SIP monthly contribution
    #[arg(long)]
    pub monthly: Decimal,

    /// Investment period in years
    #[arg(long)]
    pub years: u32,

    /// Expected annual return in percent for the SIP
    #[arg(long, default_value = "12")]
    pub rate: Decimal,

    /// Lump-sum principal (defaults to total SIP contributions)
    #[arg(long)]
    pub lump_sum: Option<Decimal>,

    /// Expected annual return for the lump sum (defaults to --rate)
    #[arg(long)]
    pub lump_sum_rate: Option<Decimal>,
}

pub fn run_lump_sum(args: LumpSumArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = LumpSumInput {
        principal: args.principal,
        years: args.years,
        annual_return_pct: args.rate,
    };
    let result = lump_sum::calculate_lump_sum(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = ComparisonInput {
        sip: SipInput {
            monthly_contribution: args.monthly,
            years: args.years,
            annual_return_pct: args.rate,
        },
        lump_sum_principal: args.lump_sum,
        lump_sum_return_pct: args.lump_sum_rate,
    };
    let result = lump_sum::compare_sip_lump_sum(&input)?;
    Ok(serde_json::to_value(result)?)
}
