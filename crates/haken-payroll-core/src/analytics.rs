//! Dashboard aggregations over many employee-period records.
//!
//! Each record is evaluated once with [`compute_breakdown`]; table rows,
//! period summaries and trends are built from those results so that no view
//! re-derives the billing or cost formulas. Records are bounds-checked on
//! the way in, so a bad record fails the batch with its employee id.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use crate::config::InsuranceRateConfig;
use crate::payroll::calculator::{compute_breakdown, margin_percent, CalculationResult};
use crate::payroll::margin::{
    classify_margin_relaxed, classify_margin_strict, MarginBand, MarginTier,
};
use crate::period::{compare_periods, PeriodLabel};
use crate::record::{RateProfile, RawEmployee, RawPayrollRecord};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::{PayrollError, PayrollResult};

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// One employee's record for one period, as delivered by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeePeriodRecord {
    pub employee_id: String,
    #[serde(default)]
    pub employee_name: String,
    #[serde(default)]
    pub employee: RawEmployee,
    #[serde(default)]
    pub record: RawPayrollRecord,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayrollBatchInput {
    pub records: Vec<EmployeePeriodRecord>,
    #[serde(default)]
    pub insurance: InsuranceRateConfig,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One dashboard table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeMarginRow {
    pub employee_id: String,
    pub employee_name: String,
    pub period: String,
    pub hourly_rate: Money,
    pub billing_rate: Money,
    pub tier: MarginTier,
    pub band: MarginBand,
    pub breakdown: CalculationResult,
}

/// Totals for every employee in one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: String,
    pub employee_count: usize,
    pub billing_amount: Money,
    pub gross_salary: Money,
    pub total_company_cost: Money,
    pub gross_profit: Money,
    /// Total profit over total billing.
    pub profit_margin_percent: Percent,
    /// Margin change in percentage points versus the preceding period in
    /// the data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_delta: Option<Percent>,
    pub tier: MarginTier,
}

/// One point of an employee's margin history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginTrendPoint {
    pub period: String,
    pub billing_amount: Money,
    pub gross_profit: Money,
    pub profit_margin_percent: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_delta: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollBatchOutput {
    pub rows: Vec<EmployeeMarginRow>,
    pub periods: Vec<PeriodSummary>,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Evaluate every record, newest period first, then highest margin first.
pub fn employee_margin_rows(
    records: &[EmployeePeriodRecord],
    config: &InsuranceRateConfig,
) -> PayrollResult<Vec<EmployeeMarginRow>> {
    let mut rows = records
        .iter()
        .map(|r| evaluate(r, config))
        .collect::<PayrollResult<Vec<_>>>()?;
    rows.sort_by(|a, b| {
        compare_periods(&b.period, &a.period).then_with(|| {
            b.breakdown
                .profit_margin_percent
                .cmp(&a.breakdown.profit_margin_percent)
        })
    });
    Ok(rows)
}

/// Aggregate records by period, oldest first.
pub fn summarize_periods(
    records: &[EmployeePeriodRecord],
    config: &InsuranceRateConfig,
) -> PayrollResult<Vec<PeriodSummary>> {
    let rows = employee_margin_rows(records, config)?;
    Ok(summarize_rows(&rows))
}

/// Aggregate already-evaluated rows by period, oldest first.
///
/// Labels naming the same month (`"2025年02月"`, `"2025年2月"`) share one
/// summary under the canonical label. Unparseable labels are grouped by
/// their raw text and come first.
pub fn summarize_rows(rows: &[EmployeeMarginRow]) -> Vec<PeriodSummary> {
    let mut by_period: BTreeMap<PeriodKey, Vec<&CalculationResult>> = BTreeMap::new();
    for row in rows {
        by_period
            .entry(PeriodKey::from_label(&row.period))
            .or_default()
            .push(&row.breakdown);
    }

    let mut summaries: Vec<PeriodSummary> = by_period
        .into_iter()
        .map(|(key, results)| summarize(key.to_string(), &results))
        .collect();
    summaries.sort_by(|a, b| compare_periods(&a.period, &b.period));

    let mut previous: Option<Percent> = None;
    for summary in &mut summaries {
        summary.margin_delta =
            previous.map(|prev| summary.profit_margin_percent.saturating_sub(prev));
        previous = Some(summary.profit_margin_percent);
    }
    summaries
}

/// Margin history for one employee, oldest first.
pub fn employee_margin_trend(
    records: &[EmployeePeriodRecord],
    employee_id: &str,
    config: &InsuranceRateConfig,
) -> PayrollResult<Vec<MarginTrendPoint>> {
    let mut points = records
        .iter()
        .filter(|r| r.employee_id == employee_id)
        .map(|r| -> PayrollResult<MarginTrendPoint> {
            let row = evaluate(r, config)?;
            Ok(MarginTrendPoint {
                period: row.period,
                billing_amount: row.breakdown.billing_amount,
                gross_profit: row.breakdown.gross_profit,
                profit_margin_percent: row.breakdown.profit_margin_percent,
                margin_delta: None,
            })
        })
        .collect::<PayrollResult<Vec<_>>>()?;
    points.sort_by(|a, b| compare_periods(&a.period, &b.period));

    for i in 1..points.len() {
        let delta = points[i]
            .profit_margin_percent
            .saturating_sub(points[i - 1].profit_margin_percent);
        points[i].margin_delta = Some(delta);
    }
    Ok(points)
}

/// Rows and period summaries for a whole batch in the output envelope.
pub fn analyze_payroll_batch(
    input: &PayrollBatchInput,
) -> PayrollResult<ComputationOutput<PayrollBatchOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.insurance.validate()?;

    for record in &input.records {
        let label = record.record.period.as_deref().unwrap_or_default();
        if PeriodLabel::parse(label).is_none() {
            warnings.push(format!(
                "Employee {}: period label {label:?} is not <year>年<month>月; sorted first",
                record.employee_id
            ));
        }
    }

    let rows = employee_margin_rows(&input.records, &input.insurance)?;
    let negative = rows
        .iter()
        .filter(|r| r.breakdown.gross_profit < Decimal::ZERO)
        .count();
    if negative > 0 {
        warnings.push(format!("{negative} record(s) with negative gross profit"));
    }

    let periods = summarize_rows(&rows);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Per-record payroll breakdown aggregated by period",
        &input.insurance,
        warnings,
        elapsed,
        PayrollBatchOutput { rows, periods },
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Grouping key for period summaries. Unparsed labels order before parsed
/// ones, as they do under [`compare_periods`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PeriodKey {
    Unparsed(String),
    Label(PeriodLabel),
}

impl PeriodKey {
    fn from_label(label: &str) -> Self {
        match PeriodLabel::parse(label) {
            Some(parsed) => PeriodKey::Label(parsed),
            None => PeriodKey::Unparsed(label.to_string()),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Unparsed(raw) => f.write_str(raw),
            PeriodKey::Label(label) => write!(f, "{label}"),
        }
    }
}

fn evaluate(
    record: &EmployeePeriodRecord,
    config: &InsuranceRateConfig,
) -> PayrollResult<EmployeeMarginRow> {
    let rates: RateProfile = record.employee.clone().into_rate_profile();
    let attendance = record.record.clone().normalize();
    rates
        .validate()
        .and_then(|()| attendance.validate())
        .map_err(|e| for_employee(e, &record.employee_id))?;

    let breakdown = compute_breakdown(&rates, &attendance, config);
    let margin = breakdown.profit_margin_percent;
    Ok(EmployeeMarginRow {
        employee_id: record.employee_id.clone(),
        employee_name: record.employee_name.clone(),
        period: attendance.period,
        hourly_rate: rates.hourly_rate,
        billing_rate: rates.billing_rate,
        tier: classify_margin_strict(margin),
        band: classify_margin_relaxed(margin, config.target_margin_percent),
        breakdown,
    })
}

/// Prefix the failing field with the employee it belongs to.
fn for_employee(error: PayrollError, employee_id: &str) -> PayrollError {
    match error {
        PayrollError::InvalidInput { field, reason } => PayrollError::InvalidInput {
            field: format!("employee {employee_id}: {field}"),
            reason,
        },
        other => other,
    }
}

fn total(results: &[&CalculationResult], figure: impl Fn(&CalculationResult) -> Money) -> Money {
    results
        .iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(figure(r)))
}

fn summarize(period: String, results: &[&CalculationResult]) -> PeriodSummary {
    let billing_amount = total(results, |r| r.billing_amount);
    let gross_salary = total(results, |r| r.gross_salary);
    let total_company_cost = total(results, |r| r.total_company_cost);
    let gross_profit = total(results, |r| r.gross_profit);
    let profit_margin_percent = margin_percent(gross_profit, billing_amount);
    PeriodSummary {
        period,
        employee_count: results.len(),
        billing_amount,
        gross_salary,
        total_company_cost,
        gross_profit,
        profit_margin_percent,
        margin_delta: None,
        tier: classify_margin_strict(profit_margin_percent),
    }
}
