use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use haken_payroll_core::config::InsuranceRateConfig;
use haken_payroll_core::payroll::calculator::{self, PayrollInput};
use haken_payroll_core::record::{RawEmployee, RawPayrollRecord};

use crate::input;

/// Arguments for a single employee-period calculation
#[derive(Args)]
pub struct CalculateArgs {
    /// Hourly pay rate (時給)
    #[arg(long)]
    pub hourly_rate: Option<Decimal>,

    /// Hourly billing rate charged to the client (請求単価)
    #[arg(long)]
    pub billing_rate: Option<Decimal>,

    /// Period label, e.g. 2025年2月
    #[arg(long)]
    pub period: Option<String>,

    /// Days worked
    #[arg(long)]
    pub work_days: Option<Decimal>,

    /// Regular hours worked
    #[arg(long)]
    pub work_hours: Option<Decimal>,

    /// Overtime hours within the 60h bracket
    #[arg(long)]
    pub overtime_hours: Option<Decimal>,

    /// Overtime hours beyond 60h
    #[arg(long = "overtime-over-60h")]
    pub overtime_over_60h: Option<Decimal>,

    /// Late-night hours (premium only)
    #[arg(long)]
    pub night_hours: Option<Decimal>,

    /// Statutory holiday hours
    #[arg(long)]
    pub holiday_hours: Option<Decimal>,

    /// Paid-leave compensation in yen
    #[arg(long)]
    pub paid_leave_amount: Option<Decimal>,

    /// Explicit paid-leave day count (skips reconstruction)
    #[arg(long)]
    pub paid_leave_days: Option<Decimal>,

    /// Transport allowance
    #[arg(long)]
    pub transport_allowance: Option<Decimal>,

    /// Allowances billed to the client
    #[arg(long)]
    pub other_allowances: Option<Decimal>,

    /// Allowances borne by the employer only
    #[arg(long)]
    pub non_billable_allowances: Option<Decimal>,

    /// Employee health-insurance withholding
    #[arg(long)]
    pub social_insurance: Option<Decimal>,

    /// Employee welfare-pension withholding
    #[arg(long)]
    pub welfare_pension: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_calculate(
    args: CalculateArgs,
    settings: Option<InsuranceRateConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut payroll_input: PayrollInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        PayrollInput {
            employee: RawEmployee {
                hourly_rate: Some(
                    args.hourly_rate
                        .ok_or("--hourly-rate is required (or provide --input)")?,
                ),
                billing_rate: Some(
                    args.billing_rate
                        .ok_or("--billing-rate is required (or provide --input)")?,
                ),
            },
            record: RawPayrollRecord {
                period: args.period,
                work_days: args.work_days,
                work_hours: args.work_hours,
                overtime_hours: args.overtime_hours,
                overtime_over_60h: args.overtime_over_60h,
                night_hours: args.night_hours,
                holiday_hours: args.holiday_hours,
                paid_leave_amount: args.paid_leave_amount,
                paid_leave_days: args.paid_leave_days,
                transport_allowance: args.transport_allowance,
                other_allowances: args.other_allowances,
                non_billable_allowances: args.non_billable_allowances,
                social_insurance: args.social_insurance,
                welfare_pension: args.welfare_pension,
                ..Default::default()
            },
            insurance: InsuranceRateConfig::default(),
        }
    };
    if let Some(config) = settings {
        payroll_input.insurance = config;
    }

    let result = calculator::calculate_payroll(&payroll_input)?;
    Ok(serde_json::to_value(result)?)
}
