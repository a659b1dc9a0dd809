//! Payroll period labels (`"2025年2月"`) and their chronological order.
//!
//! Sorting the labels as strings puts `"2025年10月"` before `"2025年2月"`.
//! Every list, chart axis and previous-period lookup orders labels with
//! [`compare_periods`] instead.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::PayrollError;

const YEAR_MARK: char = '年';
const MONTH_MARK: char = '月';

/// A parsed `<year>年<month>月` label.
///
/// Field order gives the derived `Ord` its chronological meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodLabel {
    pub year: u32,
    pub month: u32,
}

impl PeriodLabel {
    pub fn new(year: u32, month: u32) -> Self {
        Self { year, month }
    }

    /// Parse the first `<digits>年<digits>月` occurrence in `label`.
    ///
    /// Surrounding text is ignored. The month is not range-checked, matching
    /// how the ordinal is built.
    pub fn parse(label: &str) -> Option<Self> {
        let chars: Vec<char> = label.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if !chars[i].is_ascii_digit() {
                i += 1;
                continue;
            }
            let year_start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let year_end = i;
            if chars.get(i) != Some(&YEAR_MARK) {
                continue;
            }
            let month_start = i + 1;
            let mut j = month_start;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            if j > month_start && chars.get(j) == Some(&MONTH_MARK) {
                let year = digits(&chars[year_start..year_end])?;
                let month = digits(&chars[month_start..j])?;
                return Some(Self { year, month });
            }
            i = month_start;
        }
        None
    }

    /// `year × 100 + month`
    pub fn ordinal(&self) -> u64 {
        u64::from(self.year) * 100 + u64::from(self.month)
    }

    /// The calendar month before this one, if the month is in 1-12.
    pub fn previous(&self) -> Option<Self> {
        match self.month {
            1 => self.year.checked_sub(1).map(|year| Self::new(year, 12)),
            2..=12 => Some(Self::new(self.year, self.month - 1)),
            _ => None,
        }
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", self.year, YEAR_MARK, self.month, MONTH_MARK)
    }
}

impl FromStr for PeriodLabel {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| PayrollError::InvalidInput {
            field: "period".into(),
            reason: format!("Expected <year>年<month>月, got {s:?}"),
        })
    }
}

fn digits(chars: &[char]) -> Option<u32> {
    chars.iter().collect::<String>().parse().ok()
}

/// Sort key for a label; 0 when the label does not parse.
pub fn period_ordinal(label: &str) -> u64 {
    PeriodLabel::parse(label).map_or(0, |p| p.ordinal())
}

/// Chronological ascending order over period labels.
///
/// Unparseable labels compare as ordinal 0 and therefore sort first. For
/// newest-first order, swap the arguments: `compare_periods(b, a)`.
pub fn compare_periods(a: &str, b: &str) -> Ordering {
    period_ordinal(a).cmp(&period_ordinal(b))
}

/// Label of the calendar month preceding `label`.
pub fn previous_period(label: &str) -> Option<String> {
    PeriodLabel::parse(label)
        .and_then(|p| p.previous())
        .map(|p| p.to_string())
}
