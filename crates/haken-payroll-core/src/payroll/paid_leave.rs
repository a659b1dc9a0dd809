//! Paid-leave day reconstruction.
//!
//! Many source records carry only the paid-leave amount in yen. The day
//! count shown on the payroll slip is rebuilt from that amount, the pay rate
//! and the employee's average workday, snapped to half days.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::record::AttendanceRecord;
use crate::types::{round_half_up, safe_div, Hours, Money};

/// Workday length assumed when the record has days but no hours.
pub const DEFAULT_DAILY_WORK_HOURS: Hours = dec!(8.0);

/// Average hours per workday.
///
/// Zero or negative `work_days` yield 0. When days are known but hours are
/// not, the default eight-hour day applies.
pub fn daily_work_hours(work_hours: Hours, work_days: Decimal) -> Hours {
    if work_days <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if work_hours <= Decimal::ZERO {
        return DEFAULT_DAILY_WORK_HOURS;
    }
    safe_div(work_hours, work_days)
}

/// Rebuild a paid-leave day count from its yen amount, to the nearest 0.5.
pub fn reconstruct_paid_leave_days(
    paid_leave_amount: Money,
    hourly_rate: Money,
    work_hours: Hours,
    work_days: Decimal,
) -> Decimal {
    if hourly_rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let daily_hours = daily_work_hours(work_hours, work_days);
    if daily_hours.is_zero() {
        return Decimal::ZERO;
    }
    let leave_hours = safe_div(paid_leave_amount, hourly_rate);
    let raw_days = safe_div(leave_hours, daily_hours);
    // no half-day snapping once doubling would leave Decimal range
    match raw_days.checked_mul(dec!(2)) {
        Some(half_days) => round_half_up(half_days) / dec!(2),
        None => round_half_up(raw_days),
    }
}

/// Explicit count from the record if present, otherwise the reconstruction.
pub fn resolve_paid_leave_days(record: &AttendanceRecord, hourly_rate: Money) -> Decimal {
    match record.paid_leave_days {
        Some(days) => days,
        None => reconstruct_paid_leave_days(
            record.paid_leave_amount,
            hourly_rate,
            record.work_hours,
            record.work_days,
        ),
    }
}
