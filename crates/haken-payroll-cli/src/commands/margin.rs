use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use haken_payroll_core::config::InsuranceRateConfig;
use haken_payroll_core::format::format_signed_percent;
use haken_payroll_core::payroll::margin::{classify_margin_relaxed, classify_margin_strict};

/// Arguments for margin classification
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ClassifyMarginArgs {
    /// Gross margin in percent (15 = 15%)
    #[arg(long)]
    pub margin: Decimal,

    /// Use the four-band scheme relative to the target
    #[arg(long)]
    pub relaxed: bool,

    /// Target margin for the four-band scheme (defaults to settings, then 15)
    #[arg(long)]
    pub target: Option<Decimal>,
}

pub fn run_classify_margin(
    args: ClassifyMarginArgs,
    settings: Option<InsuranceRateConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let margin = args.margin;
    if args.relaxed {
        let target = args
            .target
            .unwrap_or_else(|| settings.unwrap_or_default().target_margin_percent);
        let band = classify_margin_relaxed(margin, target);
        Ok(json!({
            "margin": format_signed_percent(margin),
            "target": target,
            "band": band.as_str(),
            "rank": band.rank(),
        }))
    } else {
        let tier = classify_margin_strict(margin);
        Ok(json!({
            "margin": format_signed_percent(margin),
            "tier": tier.as_str(),
            "label": tier.label_ja(),
        }))
    }
}
