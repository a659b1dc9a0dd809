use clap::Args;
use serde_json::Value;
use tracing::debug;

use haken_payroll_core::analytics::{self, PayrollBatchInput};
use haken_payroll_core::config::InsuranceRateConfig;

use crate::input;

/// Arguments for commands that read a batch of employee-period records
#[derive(Args)]
pub struct BatchArgs {
    /// Path to JSON input file ({"records": [...], "insurance": {...}})
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for an employee margin trend
#[derive(Args)]
pub struct TrendArgs {
    /// Employee identifier to follow
    #[arg(long)]
    pub employee: String,

    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

fn load_batch(
    path: &Option<String>,
    settings: Option<InsuranceRateConfig>,
) -> Result<PayrollBatchInput, Box<dyn std::error::Error>> {
    let mut batch: PayrollBatchInput = if let Some(path) = path {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json> or stdin required for batch analysis".into());
    };
    if let Some(config) = settings {
        batch.insurance = config;
    }
    debug!(records = batch.records.len(), "loaded payroll batch");
    Ok(batch)
}

pub fn run_batch(
    args: BatchArgs,
    settings: Option<InsuranceRateConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let batch = load_batch(&args.input, settings)?;
    let result = analytics::analyze_payroll_batch(&batch)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_summary(
    args: BatchArgs,
    settings: Option<InsuranceRateConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let batch = load_batch(&args.input, settings)?;
    batch.insurance.validate()?;
    let summaries = analytics::summarize_periods(&batch.records, &batch.insurance)?;
    Ok(serde_json::to_value(summaries)?)
}

pub fn run_trend(
    args: TrendArgs,
    settings: Option<InsuranceRateConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let batch = load_batch(&args.input, settings)?;
    batch.insurance.validate()?;
    let trend =
        analytics::employee_margin_trend(&batch.records, &args.employee, &batch.insurance)?;
    if trend.is_empty() {
        return Err(format!("No records for employee '{}'", args.employee).into());
    }
    Ok(serde_json::to_value(trend)?)
}
