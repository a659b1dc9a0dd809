//! Calculation inputs and their wire-format counterparts.
//!
//! Backend and Excel-ingest records arrive with every numeric field
//! optional. `RawEmployee` and `RawPayrollRecord` accept that shape; the
//! `normalize` step defaults each missing value to zero exactly once so
//! the calculator only ever sees fully-populated numbers.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PayrollError;
use crate::types::{Hours, Money};
use crate::PayrollResult;

/// Largest magnitude accepted for any rate, hour count, day count or yen
/// amount (¥10 billion). Within this bound no step of the calculation can
/// leave the range of `Decimal`, even after summing a large batch.
pub const MAX_INPUT_MAGNITUDE: Decimal = dec!(10000000000);

// ---------------------------------------------------------------------------
// Normalized inputs
// ---------------------------------------------------------------------------

/// Pay rate and client billing rate for one dispatched employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateProfile {
    /// Hourly amount paid to the employee.
    pub hourly_rate: Money,
    /// Hourly amount invoiced to the client company.
    pub billing_rate: Money,
}

impl RateProfile {
    pub fn validate(&self) -> PayrollResult<()> {
        check_magnitude("hourly_rate", self.hourly_rate)?;
        check_magnitude("billing_rate", self.billing_rate)
    }
}

/// Employee-side withholdings shown on the payroll slip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deductions {
    /// 健康保険
    pub social_insurance: Money,
    /// 厚生年金
    pub welfare_pension: Money,
    /// 雇用保険 (employee share)
    pub employment_insurance: Money,
    pub income_tax: Money,
    pub resident_tax: Money,
    pub rent: Money,
    pub utilities: Money,
    pub meals: Money,
    pub advance_payment: Money,
    /// 年末調整. Negative when it is a refund.
    pub year_end_adjustment: Money,
    pub other: Money,
}

impl Deductions {
    pub fn total(&self) -> Money {
        self.social_insurance
            + self.welfare_pension
            + self.employment_insurance
            + self.income_tax
            + self.resident_tax
            + self.rent
            + self.utilities
            + self.meals
            + self.advance_payment
            + self.year_end_adjustment
            + self.other
    }
}

/// One employee's attendance and allowances for one payroll period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Period label, e.g. `"2025年2月"`.
    pub period: String,
    pub work_days: Decimal,
    pub work_hours: Hours,
    /// Overtime within the 60h monthly bracket.
    pub overtime_hours: Hours,
    /// Overtime beyond the 60h monthly threshold.
    pub overtime_over_60h: Hours,
    pub night_hours: Hours,
    pub holiday_hours: Hours,
    pub paid_leave_amount: Money,
    /// Explicit paid-leave day count, when the source carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_leave_days: Option<Decimal>,
    pub transport_allowance: Money,
    /// Allowances passed through to the client invoice.
    pub other_allowances: Money,
    /// Allowances borne by the employer only.
    pub non_billable_allowances: Money,
    pub deductions: Deductions,
}

impl AttendanceRecord {
    /// Reject any numeric field beyond [`MAX_INPUT_MAGNITUDE`].
    pub fn validate(&self) -> PayrollResult<()> {
        let d = &self.deductions;
        let fields = [
            ("work_days", self.work_days),
            ("work_hours", self.work_hours),
            ("overtime_hours", self.overtime_hours),
            ("overtime_over_60h", self.overtime_over_60h),
            ("night_hours", self.night_hours),
            ("holiday_hours", self.holiday_hours),
            ("paid_leave_amount", self.paid_leave_amount),
            ("paid_leave_days", self.paid_leave_days.unwrap_or_default()),
            ("transport_allowance", self.transport_allowance),
            ("other_allowances", self.other_allowances),
            ("non_billable_allowances", self.non_billable_allowances),
            ("social_insurance", d.social_insurance),
            ("welfare_pension", d.welfare_pension),
            ("employment_insurance", d.employment_insurance),
            ("income_tax", d.income_tax),
            ("resident_tax", d.resident_tax),
            ("rent_deduction", d.rent),
            ("utilities_deduction", d.utilities),
            ("meal_deduction", d.meals),
            ("advance_payment", d.advance_payment),
            ("year_end_adjustment", d.year_end_adjustment),
            ("other_deductions", d.other),
        ];
        for (field, value) in fields {
            check_magnitude(field, value)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wire formats
// ---------------------------------------------------------------------------

/// Employee rates as delivered by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEmployee {
    pub hourly_rate: Option<Money>,
    pub billing_rate: Option<Money>,
}

impl RawEmployee {
    pub fn into_rate_profile(self) -> RateProfile {
        RateProfile {
            hourly_rate: or_zero(self.hourly_rate),
            billing_rate: or_zero(self.billing_rate),
        }
    }
}

/// A payroll record as delivered by the backend or Excel ingest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPayrollRecord {
    pub period: Option<String>,
    pub work_days: Option<Decimal>,
    pub work_hours: Option<Hours>,
    pub overtime_hours: Option<Hours>,
    pub overtime_over_60h: Option<Hours>,
    pub night_hours: Option<Hours>,
    pub holiday_hours: Option<Hours>,
    pub paid_leave_amount: Option<Money>,
    pub paid_leave_days: Option<Decimal>,
    pub transport_allowance: Option<Money>,
    pub other_allowances: Option<Money>,
    pub non_billable_allowances: Option<Money>,
    pub social_insurance: Option<Money>,
    pub welfare_pension: Option<Money>,
    pub employment_insurance: Option<Money>,
    pub income_tax: Option<Money>,
    pub resident_tax: Option<Money>,
    pub rent_deduction: Option<Money>,
    pub utilities_deduction: Option<Money>,
    pub meal_deduction: Option<Money>,
    pub advance_payment: Option<Money>,
    pub year_end_adjustment: Option<Money>,
    pub other_deductions: Option<Money>,
}

impl RawPayrollRecord {
    /// Default every missing numeric to zero.
    pub fn normalize(self) -> AttendanceRecord {
        AttendanceRecord {
            period: self.period.unwrap_or_default(),
            work_days: or_zero(self.work_days),
            work_hours: or_zero(self.work_hours),
            overtime_hours: or_zero(self.overtime_hours),
            overtime_over_60h: or_zero(self.overtime_over_60h),
            night_hours: or_zero(self.night_hours),
            holiday_hours: or_zero(self.holiday_hours),
            paid_leave_amount: or_zero(self.paid_leave_amount),
            paid_leave_days: self.paid_leave_days,
            transport_allowance: or_zero(self.transport_allowance),
            other_allowances: or_zero(self.other_allowances),
            non_billable_allowances: or_zero(self.non_billable_allowances),
            deductions: Deductions {
                social_insurance: or_zero(self.social_insurance),
                welfare_pension: or_zero(self.welfare_pension),
                employment_insurance: or_zero(self.employment_insurance),
                income_tax: or_zero(self.income_tax),
                resident_tax: or_zero(self.resident_tax),
                rent: or_zero(self.rent_deduction),
                utilities: or_zero(self.utilities_deduction),
                meals: or_zero(self.meal_deduction),
                advance_payment: or_zero(self.advance_payment),
                year_end_adjustment: or_zero(self.year_end_adjustment),
                other: or_zero(self.other_deductions),
            },
        }
    }
}

fn or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

fn check_magnitude(field: &str, value: Decimal) -> PayrollResult<()> {
    if value.abs() > MAX_INPUT_MAGNITUDE {
        return Err(PayrollError::InvalidInput {
            field: field.into(),
            reason: format!("{value} exceeds the supported magnitude {MAX_INPUT_MAGNITUDE}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_missing_fields_default_to_zero() {
        let raw: RawPayrollRecord =
            serde_json::from_str(r#"{"period": "2025年2月", "work_hours": 7.5}"#).unwrap();
        let record = raw.normalize();
        assert_eq!(record.period, "2025年2月");
        assert_eq!(record.work_hours, dec!(7.5));
        assert_eq!(record.overtime_hours, Decimal::ZERO);
        assert_eq!(record.deductions.total(), Decimal::ZERO);
        assert!(record.paid_leave_days.is_none());
    }

    #[test]
    fn test_null_fields_default_to_zero() {
        let raw: RawPayrollRecord =
            serde_json::from_str(r#"{"night_hours": null, "income_tax": "4200"}"#).unwrap();
        let record = raw.normalize();
        assert_eq!(record.night_hours, Decimal::ZERO);
        assert_eq!(record.deductions.income_tax, dec!(4200));
        assert_eq!(record.period, "");
    }

    #[test]
    fn test_explicit_paid_leave_days_preserved() {
        let raw = RawPayrollRecord {
            paid_leave_days: Some(dec!(1.5)),
            ..Default::default()
        };
        assert_eq!(raw.normalize().paid_leave_days, Some(dec!(1.5)));
    }

    #[test]
    fn test_deduction_total_includes_refunds() {
        let deductions = Deductions {
            income_tax: dec!(5000),
            resident_tax: dec!(8000),
            year_end_adjustment: dec!(-3000),
            ..Default::default()
        };
        assert_eq!(deductions.total(), dec!(10000));
    }

    #[test]
    fn test_raw_employee_missing_rate() {
        let raw: RawEmployee = serde_json::from_str(r#"{"billing_rate": 1700}"#).unwrap();
        let rates = raw.into_rate_profile();
        assert_eq!(rates.hourly_rate, Decimal::ZERO);
        assert_eq!(rates.billing_rate, dec!(1700));
    }

    #[test]
    fn test_validate_accepts_bound() {
        let record = RawPayrollRecord {
            work_hours: Some(MAX_INPUT_MAGNITUDE),
            year_end_adjustment: Some(-MAX_INPUT_MAGNITUDE),
            ..Default::default()
        }
        .normalize();
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_values() {
        let record = RawPayrollRecord {
            work_hours: Some(dec!(100000000000000)),
            ..Default::default()
        }
        .normalize();
        match record.validate() {
            Err(PayrollError::InvalidInput { field, .. }) => assert_eq!(field, "work_hours"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }

        let rates = RateProfile {
            hourly_rate: dec!(1400),
            billing_rate: dec!(1000000000000000),
        };
        match rates.validate() {
            Err(PayrollError::InvalidInput { field, .. }) => assert_eq!(field, "billing_rate"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_checks_explicit_leave_days() {
        let record = RawPayrollRecord {
            paid_leave_days: Some(Decimal::MIN),
            ..Default::default()
        }
        .normalize();
        assert!(record.validate().is_err());
    }
}
