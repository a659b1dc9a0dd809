use clap::Args;
use serde_json::Value;

use haken_payroll_core::period::compare_periods;

/// Arguments for sorting period labels
#[derive(Args)]
pub struct SortPeriodsArgs {
    /// Period labels, e.g. 2025年2月 2025年10月
    #[arg(required = true)]
    pub labels: Vec<String>,

    /// Newest first
    #[arg(long)]
    pub desc: bool,
}

pub fn run_sort_periods(args: SortPeriodsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut labels = args.labels;
    if args.desc {
        labels.sort_by(|a, b| compare_periods(b, a));
    } else {
        labels.sort_by(|a, b| compare_periods(a, b));
    }
    Ok(serde_json::to_value(labels)?)
}
