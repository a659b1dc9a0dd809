use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::InsuranceRateConfig;
use crate::payroll::paid_leave::resolve_paid_leave_days;
use crate::payroll::premiums::{price_hours, HourBuckets};
use crate::record::{AttendanceRecord, RateProfile, RawEmployee, RawPayrollRecord};
use crate::types::{round_half_up, with_metadata, ComputationOutput, Money, Percent};
use crate::PayrollResult;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Wire-format input for a single employee-period calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayrollInput {
    pub employee: RawEmployee,
    pub record: RawPayrollRecord,
    #[serde(default)]
    pub insurance: InsuranceRateConfig,
}

/// Full financial breakdown for one employee and one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    // Billing side
    pub base_billing: Money,
    pub overtime_billing: Money,
    pub overtime_over_60h_billing: Money,
    pub night_billing: Money,
    pub holiday_billing: Money,
    /// Hour billing plus billable allowances.
    pub billing_amount: Money,

    // Pay side
    pub base_salary: Money,
    pub overtime_pay: Money,
    pub overtime_over_60h_pay: Money,
    pub night_pay: Money,
    pub holiday_pay: Money,
    /// Premium pay plus all allowances and paid leave.
    pub gross_salary: Money,

    // Statutory employer cost (法定福利費)
    /// Employer half of health insurance and welfare pension (労使折半).
    pub company_social_insurance: Money,
    pub company_employment_insurance: Money,
    pub company_workers_comp: Money,
    pub total_company_cost: Money,

    pub gross_profit: Money,
    /// Gross profit over billing, in percent. 0 when nothing was billed.
    pub profit_margin_percent: Percent,

    pub paid_leave_days: Decimal,

    // Payroll slip
    pub total_deductions: Money,
    pub net_pay: Money,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// The canonical payroll calculation.
///
/// Every view that shows billing, cost or margin figures derives them from
/// this function. It has no error path: zero denominators produce zero.
/// Inputs are expected to have passed [`RateProfile::validate`] and
/// [`AttendanceRecord::validate`], which bound every operand.
pub fn compute_breakdown(
    rates: &RateProfile,
    record: &AttendanceRecord,
    config: &InsuranceRateConfig,
) -> CalculationResult {
    let hours = HourBuckets::from(record);

    // Billing: client rate
    let billing = price_hours(&hours, rates.billing_rate);
    let billing_amount = billing.total() + record.other_allowances;

    // Pay: employee rate
    let pay = price_hours(&hours, rates.hourly_rate);
    let gross_salary = pay.total()
        + record.transport_allowance
        + record.other_allowances
        + record.non_billable_allowances
        + record.paid_leave_amount;

    // Employer statutory cost
    let company_social_insurance =
        record.deductions.social_insurance + record.deductions.welfare_pension;
    let company_employment_insurance =
        round_half_up(gross_salary * config.employment_insurance_rate);
    let company_workers_comp = round_half_up(gross_salary * config.workers_comp_rate);
    let total_company_cost = gross_salary
        + company_social_insurance
        + company_employment_insurance
        + company_workers_comp;

    let gross_profit = billing_amount - total_company_cost;
    let profit_margin_percent = margin_percent(gross_profit, billing_amount);

    let total_deductions = record.deductions.total();

    CalculationResult {
        base_billing: billing.regular,
        overtime_billing: billing.overtime,
        overtime_over_60h_billing: billing.overtime_over_60h,
        night_billing: billing.night,
        holiday_billing: billing.holiday,
        billing_amount,
        base_salary: pay.regular,
        overtime_pay: pay.overtime,
        overtime_over_60h_pay: pay.overtime_over_60h,
        night_pay: pay.night,
        holiday_pay: pay.holiday,
        gross_salary,
        company_social_insurance,
        company_employment_insurance,
        company_workers_comp,
        total_company_cost,
        gross_profit,
        profit_margin_percent,
        paid_leave_days: resolve_paid_leave_days(record, rates.hourly_rate),
        total_deductions,
        net_pay: gross_salary - total_deductions,
    }
}

/// Profit as a percentage of billing; 0 unless billing is positive.
///
/// A sub-yen bill against a real cost has no representable margin and
/// saturates at `Decimal::MIN` or `Decimal::MAX`.
pub fn margin_percent(gross_profit: Money, billing_amount: Money) -> Percent {
    if billing_amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match gross_profit
        .checked_div(billing_amount)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
    {
        Some(margin) => margin,
        None if gross_profit.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

/// Normalize a wire-format input and run the calculation inside the
/// standard output envelope.
pub fn calculate_payroll(
    input: &PayrollInput,
) -> PayrollResult<ComputationOutput<CalculationResult>> {
    let start = Instant::now();

    input.insurance.validate()?;

    let rates = input.employee.clone().into_rate_profile();
    let record = input.record.clone().normalize();
    rates.validate()?;
    record.validate()?;
    let result = compute_breakdown(&rates, &record, &input.insurance);
    let warnings = review_breakdown(&rates, &record, &result);

    let assumptions = serde_json::json!({
        "rates": rates,
        "attendance": record,
        "insurance": input.insurance,
    });

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Hourly billing less gross salary and employer statutory cost",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

/// Business flags that do not stop the calculation.
pub fn review_breakdown(
    rates: &RateProfile,
    record: &AttendanceRecord,
    result: &CalculationResult,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if rates.billing_rate < rates.hourly_rate {
        warnings.push(format!(
            "Billing rate {} is below pay rate {}",
            rates.billing_rate, rates.hourly_rate
        ));
    }
    if result.gross_profit < Decimal::ZERO {
        warnings.push(format!(
            "Negative gross profit {} ({}% margin)",
            result.gross_profit,
            result.profit_margin_percent.round_dp(1)
        ));
    }
    if record.paid_leave_days.is_none()
        && record.paid_leave_amount > Decimal::ZERO
        && rates.hourly_rate <= Decimal::ZERO
    {
        warnings.push(
            "Paid leave days not reconstructed: hourly rate is zero".to_string(),
        );
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Deductions;

    fn rates() -> RateProfile {
        RateProfile {
            hourly_rate: dec!(1400),
            billing_rate: dec!(1700),
        }
    }

    fn hours(work_hours: Decimal) -> AttendanceRecord {
        AttendanceRecord {
            period: "2025年2月".into(),
            work_days: dec!(21),
            work_hours,
            ..Default::default()
        }
    }

    #[test]
    fn test_base_billing() {
        let result = compute_breakdown(&rates(), &hours(dec!(168)), &InsuranceRateConfig::default());
        assert_eq!(result.billing_amount, dec!(285600));
        assert_eq!(result.base_salary, dec!(235200));
    }

    #[test]
    fn test_other_allowances_billed_and_paid() {
        let mut record = hours(dec!(160));
        record.other_allowances = dec!(5000);
        record.transport_allowance = dec!(8000);
        record.non_billable_allowances = dec!(3000);
        let result = compute_breakdown(&rates(), &record, &InsuranceRateConfig::default());
        // Only other_allowances reach the invoice
        assert_eq!(result.billing_amount, dec!(272000) + dec!(5000));
        assert_eq!(result.gross_salary, dec!(224000) + dec!(16000));
    }

    #[test]
    fn test_statutory_costs() {
        let record = AttendanceRecord {
            work_hours: dec!(200),
            deductions: Deductions {
                social_insurance: dec!(18000),
                welfare_pension: dec!(35000),
                ..Default::default()
            },
            ..Default::default()
        };
        let rates = RateProfile {
            hourly_rate: dec!(1500),
            billing_rate: dec!(2000),
        };
        let result = compute_breakdown(&rates, &record, &InsuranceRateConfig::default());
        assert_eq!(result.gross_salary, dec!(300000));
        assert_eq!(result.company_social_insurance, dec!(53000));
        assert_eq!(result.company_employment_insurance, dec!(2700));
        assert_eq!(result.company_workers_comp, dec!(900));
        assert_eq!(result.total_company_cost, dec!(356600));
        assert_eq!(result.gross_profit, dec!(43400));
        assert_eq!(result.profit_margin_percent, dec!(10.85));
    }

    #[test]
    fn test_employment_insurance_rounds_to_yen() {
        // 123457 × 0.009 = 1111.113
        let record = AttendanceRecord {
            paid_leave_amount: dec!(123457),
            ..Default::default()
        };
        let result = compute_breakdown(&rates(), &record, &InsuranceRateConfig::default());
        assert_eq!(result.company_employment_insurance, dec!(1111));
        // 123457 × 0.003 = 370.371
        assert_eq!(result.company_workers_comp, dec!(370));
    }

    #[test]
    fn test_zero_billing_margin_is_zero() {
        let record = AttendanceRecord {
            transport_allowance: dec!(10000),
            ..Default::default()
        };
        let result = compute_breakdown(&rates(), &record, &InsuranceRateConfig::default());
        assert_eq!(result.billing_amount, Decimal::ZERO);
        assert_eq!(result.profit_margin_percent, Decimal::ZERO);
        assert!(result.gross_profit < Decimal::ZERO);
    }

    #[test]
    fn test_net_pay() {
        let mut record = hours(dec!(160));
        record.deductions = Deductions {
            social_insurance: dec!(11000),
            welfare_pension: dec!(20000),
            employment_insurance: dec!(1300),
            income_tax: dec!(5000),
            ..Default::default()
        };
        let result = compute_breakdown(&rates(), &record, &InsuranceRateConfig::default());
        assert_eq!(result.total_deductions, dec!(37300));
        assert_eq!(result.net_pay, dec!(224000) - dec!(37300));
    }

    #[test]
    fn test_inverted_rates_warn() {
        let input = PayrollInput {
            employee: RawEmployee {
                hourly_rate: Some(dec!(1800)),
                billing_rate: Some(dec!(1500)),
            },
            record: RawPayrollRecord {
                work_hours: Some(dec!(160)),
                ..Default::default()
            },
            insurance: InsuranceRateConfig::default(),
        };
        let output = calculate_payroll(&input).unwrap();
        assert!(output.result.gross_profit < Decimal::ZERO);
        assert!(output.warnings.iter().any(|w| w.contains("below pay rate")));
        assert!(output.warnings.iter().any(|w| w.contains("Negative gross profit")));
    }

    #[test]
    fn test_zero_rate_paid_leave_warns() {
        let input = PayrollInput {
            record: RawPayrollRecord {
                paid_leave_amount: Some(dec!(12000)),
                work_days: Some(dec!(20)),
                ..Default::default()
            },
            ..Default::default()
        };
        let output = calculate_payroll(&input).unwrap();
        assert_eq!(output.result.paid_leave_days, Decimal::ZERO);
        assert!(output.warnings.iter().any(|w| w.contains("Paid leave days")));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let input = PayrollInput {
            insurance: InsuranceRateConfig {
                workers_comp_rate: dec!(-0.01),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(calculate_payroll(&input).is_err());
    }

    #[test]
    fn test_methodology_string() {
        let output = calculate_payroll(&PayrollInput::default()).unwrap();
        assert_eq!(
            output.methodology,
            "Hourly billing less gross salary and employer statutory cost"
        );
    }

    #[test]
    fn test_oversized_rates_rejected() {
        let json = r#"{
            "employee": { "hourly_rate": "1000000000000000", "billing_rate": "1000000000000000" },
            "record": { "work_hours": "100000000000000" }
        }"#;
        let input: PayrollInput = serde_json::from_str(json).unwrap();
        match calculate_payroll(&input) {
            Err(crate::PayrollError::InvalidInput { field, .. }) => {
                assert_eq!(field, "hourly_rate")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_every_field_at_bound_computes() {
        use crate::record::MAX_INPUT_MAGNITUDE as M;
        let input = PayrollInput {
            employee: RawEmployee {
                hourly_rate: Some(M),
                billing_rate: Some(M),
            },
            record: RawPayrollRecord {
                work_days: Some(dec!(1)),
                work_hours: Some(M),
                overtime_hours: Some(M),
                overtime_over_60h: Some(M),
                night_hours: Some(M),
                holiday_hours: Some(M),
                paid_leave_amount: Some(M),
                transport_allowance: Some(M),
                other_allowances: Some(M),
                non_billable_allowances: Some(M),
                social_insurance: Some(M),
                welfare_pension: Some(M),
                income_tax: Some(M),
                ..Default::default()
            },
            insurance: InsuranceRateConfig {
                employment_insurance_rate: Decimal::ONE,
                workers_comp_rate: Decimal::ONE,
                ..Default::default()
            },
        };
        let output = calculate_payroll(&input).unwrap();
        assert!(output.result.billing_amount > Decimal::ZERO);
        assert!(output.result.gross_profit < Decimal::ZERO);
    }

    #[test]
    fn test_margin_saturates_on_sub_yen_billing() {
        let tiny = Decimal::new(1, 28);
        assert_eq!(margin_percent(dec!(-1000000), tiny), Decimal::MIN);
        assert_eq!(margin_percent(dec!(1000000), tiny), Decimal::MAX);
        assert_eq!(margin_percent(dec!(-1000000), Decimal::ZERO), Decimal::ZERO);
    }
}
