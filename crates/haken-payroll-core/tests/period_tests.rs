use haken_payroll_core::period::{compare_periods, period_ordinal, previous_period, PeriodLabel};
use pretty_assertions::assert_eq;
use std::cmp::Ordering;

fn sorted(labels: &[&str]) -> Vec<String> {
    let mut v: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
    v.sort_by(|a, b| compare_periods(a, b));
    v
}

#[test]
fn test_sort_ascending_is_chronological() {
    let result = sorted(&["2025年2月", "2025年10月", "2024年12月", "2025年1月"]);
    assert_eq!(result, vec!["2024年12月", "2025年1月", "2025年2月", "2025年10月"]);
}

#[test]
fn test_descending_by_swapping_operands() {
    let mut labels = vec!["2025年2月", "2025年10月", "2024年12月", "2025年1月"];
    labels.sort_by(|a, b| compare_periods(b, a));
    assert_eq!(labels, vec!["2025年10月", "2025年2月", "2025年1月", "2024年12月"]);
}

#[test]
fn test_same_month_different_year() {
    let result = sorted(&["2025年3月", "2023年3月", "2024年3月"]);
    assert_eq!(result, vec!["2023年3月", "2024年3月", "2025年3月"]);
}

#[test]
fn test_single_digit_months_numeric() {
    let result = sorted(&["2025年9月", "2025年11月", "2025年1月", "2025年12月"]);
    assert_eq!(result, vec!["2025年1月", "2025年9月", "2025年11月", "2025年12月"]);
}

#[test]
fn test_malformed_labels_do_not_abort_sort() {
    let result = sorted(&["2025年2月", "bad", "2024年1月"]);
    assert_eq!(result, vec!["bad", "2024年1月", "2025年2月"]);
}

#[test]
fn test_comparator_antisymmetric_and_reflexive() {
    let labels = [
        "2024年12月",
        "2025年1月",
        "2025年2月",
        "2025年10月",
        "2026年1月",
        "1999年7月",
    ];
    for a in labels {
        assert_eq!(compare_periods(a, a), Ordering::Equal);
        for b in labels {
            assert_eq!(compare_periods(a, b), compare_periods(b, a).reverse());
        }
    }
}

#[test]
fn test_ordinal_matches_label_order() {
    assert!(period_ordinal("2024年12月") < period_ordinal("2025年1月"));
    assert_eq!(PeriodLabel::new(2025, 1).ordinal(), period_ordinal("2025年1月"));
}

#[test]
fn test_previous_period_lookup_key() {
    let labels = ["2025年1月", "2024年12月", "2025年2月"];
    let prev = previous_period("2025年1月").unwrap();
    assert!(labels.contains(&prev.as_str()));
    assert_eq!(prev, "2024年12月");
}
