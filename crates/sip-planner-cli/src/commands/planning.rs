use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use sip_planner_core::goals::{self, GoalInput, GoalKind};
use sip_planner_core::portfolio::{self, PortfolioInput};
use sip_planner_core::risk_profile::allocation::{self, AllocationInput};
use sip_planner_core::risk_profile::questionnaire::{self, RiskAnswers};
use sip_planner_core::risk_profile::RiskProfile;
use sip_planner_core::scenarios::{self, ScenariosInput};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProfileArg {
    Conservative,
    Moderate,
    Aggressive,
}

impl From<ProfileArg> for RiskProfile {
    fn from(p: ProfileArg) -> Self {
        match p {
            ProfileArg::Conservative => RiskProfile::Conservative,
            ProfileArg::Moderate => RiskProfile::Moderate,
            ProfileArg::Aggressive => RiskProfile::Aggressive,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GoalArg {
    Retirement,
    Education,
    Home,
    Wedding,
    Emergency,
    Vacation,
    Custom,
}

impl From<GoalArg> for GoalKind {
    fn from(g: GoalArg) -> Self {
        match g {
            GoalArg::Retirement => GoalKind::Retirement,
            GoalArg::Education => GoalKind::Education,
            GoalArg::Home => GoalKind::Home,
            GoalArg::Wedding => GoalKind::Wedding,
            GoalArg::Emergency => GoalKind::Emergency,
            GoalArg::Vacation => GoalKind::Vacation,
            GoalArg::Custom => GoalKind::Custom,
        }
    }
}

/// Arguments for multi-scenario aggregation
#[derive(Args)]
pub struct ScenariosArgs {
    /// Path to JSON/YAML file with a `scenarios` list
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the risk-profile questionnaire. Each answer is the 0-based
/// option index; pass all six or provide `--input`.
#[derive(Args)]
pub struct RiskProfileArgs {
    /// Path to JSON/YAML file with the answers
    #[arg(long)]
    pub input: Option<String>,

    /// Age band: 0 under 30, 1 30-45, 2 45-60, 3 over 60
    #[arg(long)]
    pub age: Option<usize>,

    /// Horizon: 0 under 3y, 1 3-5y, 2 5-10y, 3 over 10y
    #[arg(long)]
    pub horizon: Option<usize>,

    /// Income stability: 0 irregular .. 3 very stable
    #[arg(long)]
    pub income_stability: Option<usize>,

    /// Experience: 0 none .. 3 active equity investor
    #[arg(long)]
    pub experience: Option<usize>,

    /// Reaction to a 20% fall: 0 sell all, 1 sell some, 2 hold, 3 buy more
    #[arg(long)]
    pub loss_reaction: Option<usize>,

    /// Objective: 0 protect capital, 1 income, 2 balanced, 3 maximum growth
    #[arg(long)]
    pub objective: Option<usize>,
}

/// Arguments for an allocation recommendation
#[derive(Args)]
pub struct AllocationArgs {
    /// Risk profile
    #[arg(long, value_enum)]
    pub profile: ProfileArg,

    /// Investor age, for the equity cap
    #[arg(long)]
    pub age: Option<u32>,

    /// Investment horizon in years
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Monthly amount to split across asset classes
    #[arg(long)]
    pub monthly: Option<Decimal>,
}

/// Arguments for goal planning
#[derive(Args)]
pub struct GoalArgs {
    /// Path to JSON/YAML goal file (overrides the flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Goal type
    #[arg(long, value_enum, default_value = "custom")]
    pub kind: GoalArg,

    /// Goal cost in today's money
    #[arg(long)]
    pub target: Option<Decimal>,

    /// Years until the goal
    #[arg(long)]
    pub years: Option<u32>,

    /// Expected annual return in percent
    #[arg(long, default_value = "12")]
    pub rate: Decimal,

    /// Annual inflation in percent (defaults per goal type)
    #[arg(long)]
    pub inflation: Option<Decimal>,

    /// Savings already set aside for the goal
    #[arg(long)]
    pub savings: Option<Decimal>,
}

/// Arguments for portfolio aggregation
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to JSON/YAML file with a `holdings` list
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_scenarios(args: ScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenarios_input: ScenariosInput =
        input::read_structured(args.input.as_deref(), "scenario aggregation")?;
    let result = scenarios::run_scenarios(&scenarios_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_risk_profile(args: RiskProfileArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let answers = match (
        args.age,
        args.horizon,
        args.income_stability,
        args.experience,
        args.loss_reaction,
        args.objective,
    ) {
        (Some(age), Some(horizon), Some(income_stability), Some(experience), Some(loss_reaction), Some(objective))
            if args.input.is_none() =>
        {
            RiskAnswers {
                age,
                horizon,
                income_stability,
                experience,
                loss_reaction,
                objective,
            }
        }
        _ => input::read_structured(args.input.as_deref(), "the risk questionnaire")?,
    };
    let result = questionnaire::assess_risk_profile(&answers)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_allocation(args: AllocationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let alloc_input = AllocationInput {
        profile: args.profile.into(),
        age: args.age,
        horizon_years: args.horizon,
        monthly_investment: args.monthly,
    };
    let result = allocation::recommend_allocation(&alloc_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_goal(args: GoalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let goal_input: GoalInput = match (args.target, args.years) {
        (Some(target_today), Some(years)) if args.input.is_none() => GoalInput {
            kind: args.kind.into(),
            name: None,
            target_today,
            years,
            expected_return_pct: args.rate,
            inflation_pct: args.inflation,
            current_savings: args.savings,
        },
        _ => input::read_structured(args.input.as_deref(), "goal planning")?,
    };
    let result = goals::plan_goal(&goal_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let portfolio_input: PortfolioInput =
        input::read_structured(args.input.as_deref(), "portfolio aggregation")?;
    let result = portfolio::summarise_portfolio(&portfolio_input)?;
    Ok(serde_json::to_value(result)?)
}
