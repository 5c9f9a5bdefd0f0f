mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::lump_sum::{CompareArgs, LumpSumArgs};
use commands::planning::{AllocationArgs, GoalArgs, PortfolioArgs, RiskProfileArgs, ScenariosArgs};
use commands::sip::{DurationArgs, ProjectionArgs, RequiredSipArgs, SipArgs, StepUpArgs};

/// SIP, lump-sum and goal planning calculations
#[derive(Parser)]
#[command(
    name = "sip",
    version,
    about = "SIP, lump-sum and goal planning calculations",
    long_about = "A CLI for systematic investment plan projections with decimal precision. \
                  Supports SIP and step-up SIP maturity, required SIP and duration solvers, \
                  lump-sum comparison, chart-ready projections, scenario aggregation, \
                  risk profiling, allocation, goal planning and portfolio summaries."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Maturity value of a monthly SIP
    Sip(SipArgs),
    /// SIP with a yearly contribution increase
    StepUpSip(StepUpArgs),
    /// Monthly SIP needed to reach a target
    RequiredSip(RequiredSipArgs),
    /// Time a monthly SIP needs to reach a target
    SipDuration(DurationArgs),
    /// Maturity value of a one-off investment
    LumpSum(LumpSumArgs),
    /// Compare a SIP with a lump sum over the same horizon
    Compare(CompareArgs),
    /// Sampled SIP values for charting or CSV export
    Projection(ProjectionArgs),
    /// Evaluate and summarise named scenarios
    Scenarios(ScenariosArgs),
    /// Score the risk-profile questionnaire
    RiskProfile(RiskProfileArgs),
    /// Recommend an asset allocation for a risk profile
    Allocation(AllocationArgs),
    /// Plan a financial goal
    Goal(GoalArgs),
    /// Summarise portfolio holdings
    Portfolio(PortfolioArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Sip(args) => commands::sip::run_sip(args),
        Commands::StepUpSip(args) => commands::sip::run_step_up(args),
        Commands::RequiredSip(args) => commands::sip::run_required_sip(args),
        Commands::SipDuration(args) => commands::sip::run_duration(args),
        Commands::LumpSum(args) => commands::lump_sum::run_lump_sum(args),
        Commands::Compare(args) => commands::lump_sum::run_compare(args),
        Commands::Projection(args) => commands::sip::run_projection(args),
        Commands::Scenarios(args) => commands::planning::run_scenarios(args),
        Commands::RiskProfile(args) => commands::planning::run_risk_profile(args),
        Commands::Allocation(args) => commands::planning::run_allocation(args),
        Commands::Goal(args) => commands::planning::run_goal(args),
        Commands::Portfolio(args) => commands::planning::run_portfolio(args),
        Commands::Version => {
            println!("sip {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
