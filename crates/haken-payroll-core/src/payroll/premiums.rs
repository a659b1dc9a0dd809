//! Hour-category multipliers shared by the billing and pay sides.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::record::AttendanceRecord;
use crate::types::{Hours, Money};

/// Overtime within the 60h monthly bracket (時間外, 25% premium).
pub const OVERTIME_MULTIPLIER: Decimal = dec!(1.25);
/// Overtime beyond 60h in the month (60時間超, 50% premium).
pub const OVERTIME_OVER_60H_MULTIPLIER: Decimal = dec!(1.50);
/// Late-night premium. Additive: the hours are already counted in the base
/// or overtime buckets, so only the 25% uplift is applied here.
pub const NIGHT_PREMIUM: Decimal = dec!(0.25);
/// Statutory holiday work (休日, 35% premium).
pub const HOLIDAY_MULTIPLIER: Decimal = dec!(1.35);

/// Hours per category, taken from an attendance record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HourBuckets {
    pub regular: Hours,
    pub overtime: Hours,
    pub overtime_over_60h: Hours,
    pub night: Hours,
    pub holiday: Hours,
}

impl From<&AttendanceRecord> for HourBuckets {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            regular: record.work_hours,
            overtime: record.overtime_hours,
            overtime_over_60h: record.overtime_over_60h,
            night: record.night_hours,
            holiday: record.holiday_hours,
        }
    }
}

/// Amount per category at a single hourly rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PricedHours {
    pub regular: Money,
    pub overtime: Money,
    pub overtime_over_60h: Money,
    pub night: Money,
    pub holiday: Money,
}

impl PricedHours {
    pub fn total(&self) -> Money {
        self.regular + self.overtime + self.overtime_over_60h + self.night + self.holiday
    }
}

/// Price every hour bucket at `rate`.
pub fn price_hours(hours: &HourBuckets, rate: Money) -> PricedHours {
    PricedHours {
        regular: hours.regular * rate,
        overtime: hours.overtime * rate * OVERTIME_MULTIPLIER,
        overtime_over_60h: hours.overtime_over_60h * rate * OVERTIME_OVER_60H_MULTIPLIER,
        night: hours.night * rate * NIGHT_PREMIUM,
        holiday: hours.holiday * rate * HOLIDAY_MULTIPLIER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_is_premium_only() {
        let hours = HourBuckets {
            night: dec!(20),
            ..Default::default()
        };
        let priced = price_hours(&hours, dec!(1700));
        assert_eq!(priced.night, dec!(8500));
        assert_eq!(priced.total(), dec!(8500));
    }

    #[test]
    fn test_each_multiplier() {
        let hours = HourBuckets {
            regular: dec!(1),
            overtime: dec!(1),
            overtime_over_60h: dec!(1),
            night: dec!(1),
            holiday: dec!(1),
        };
        let priced = price_hours(&hours, dec!(1000));
        assert_eq!(priced.regular, dec!(1000));
        assert_eq!(priced.overtime, dec!(1250));
        assert_eq!(priced.overtime_over_60h, dec!(1500));
        assert_eq!(priced.night, dec!(250));
        assert_eq!(priced.holiday, dec!(1350));
    }

    #[test]
    fn test_fractional_hours() {
        let hours = HourBuckets {
            regular: dec!(7.5),
            ..Default::default()
        };
        assert_eq!(price_hours(&hours, dec!(1450)).regular, dec!(10875));
    }
}
