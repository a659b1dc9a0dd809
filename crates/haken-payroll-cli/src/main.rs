mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::debug;

use haken_payroll_core::config::InsuranceRateConfig;

use commands::analytics::{BatchArgs, TrendArgs};
use commands::margin::ClassifyMarginArgs;
use commands::payroll::CalculateArgs;
use commands::period::SortPeriodsArgs;

/// Dispatch-staffing payroll, billing and margin calculations
#[derive(Parser)]
#[command(
    name = "haken",
    version,
    about = "Dispatch-staffing payroll, billing and margin calculations",
    long_about = "A CLI for computing per-employee billing, gross salary, employer \
                  statutory cost, gross profit and margin with decimal precision. \
                  Also aggregates payroll batches by period and orders \
                  <year>年<month>月 period labels chronologically."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Key/value settings file (.json or .yaml) with insurance rates
    #[arg(long, global = true)]
    settings: Option<String>,

    /// Log debug events to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Billing, cost and margin breakdown for one employee-period
    Calculate(CalculateArgs),
    /// Margin rows and period summaries for a batch of records
    Batch(BatchArgs),
    /// Per-period totals with previous-period margin deltas
    Summary(BatchArgs),
    /// One employee's margin by period
    Trend(TrendArgs),
    /// Sort period labels chronologically
    SortPeriods(SortPeriodsArgs),
    /// Classify a margin percentage
    ClassifyMargin(ClassifyMarginArgs),
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

fn load_settings(path: Option<&str>) -> Result<Option<InsuranceRateConfig>, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let settings = input::file::read_settings(path)?;
    let config = InsuranceRateConfig::from_settings(&settings)?;
    debug!(?config, "loaded insurance settings");
    Ok(Some(config))
}

fn run(cli: Cli) -> Result<Option<serde_json::Value>, Box<dyn std::error::Error>> {
    let settings = load_settings(cli.settings.as_deref())?;

    let value = match cli.command {
        Commands::Calculate(args) => commands::payroll::run_calculate(args, settings)?,
        Commands::Batch(args) => commands::analytics::run_batch(args, settings)?,
        Commands::Summary(args) => commands::analytics::run_summary(args, settings)?,
        Commands::Trend(args) => commands::analytics::run_trend(args, settings)?,
        Commands::SortPeriods(args) => commands::period::run_sort_periods(args)?,
        Commands::ClassifyMargin(args) => commands::margin::run_classify_margin(args, settings)?,
        Commands::Version => {
            println!("haken {}", env!("CARGO_PKG_VERSION"));
            return Ok(None);
        }
    };
    Ok(Some(value))
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let format = cli.output.clone();
    match run(cli) {
        Ok(Some(value)) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
