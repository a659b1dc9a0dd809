use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::cmp::Ordering;

use haken_payroll_core::config::InsuranceRateConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// JavaScript numbers arrive as f64; convert once at the boundary.
fn to_decimal(value: f64, field: &str) -> NapiResult<Decimal> {
    Decimal::try_from(value)
        .map_err(|e| to_napi_error(format!("{field}: {value} is not a finite decimal ({e})")))
}

// ---------------------------------------------------------------------------
// Payroll
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_payroll(input_json: String) -> NapiResult<String> {
    let input: haken_payroll_core::payroll::calculator::PayrollInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = haken_payroll_core::payroll::calculator::calculate_payroll(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_payroll_batch(input_json: String) -> NapiResult<String> {
    let input: haken_payroll_core::analytics::PayrollBatchInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        haken_payroll_core::analytics::analyze_payroll_batch(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Build the insurance config from the settings store's key/value pairs.
#[napi]
pub fn load_insurance_settings(settings_json: String) -> NapiResult<String> {
    let settings: std::collections::HashMap<String, String> =
        serde_json::from_str(&settings_json).map_err(to_napi_error)?;
    let config = InsuranceRateConfig::from_settings(&settings).map_err(to_napi_error)?;
    serde_json::to_string(&config).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// Comparator for `Array.prototype.sort`: -1, 0 or 1.
#[napi]
pub fn compare_periods(a: String, b: String) -> i32 {
    match haken_payroll_core::period::compare_periods(&a, &b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

#[napi]
pub fn sort_periods(labels: Vec<String>, descending: Option<bool>) -> Vec<String> {
    let mut labels = labels;
    if descending.unwrap_or(false) {
        labels.sort_by(|a, b| haken_payroll_core::period::compare_periods(b, a));
    } else {
        labels.sort_by(|a, b| haken_payroll_core::period::compare_periods(a, b));
    }
    labels
}

#[napi]
pub fn previous_period(label: String) -> Option<String> {
    haken_payroll_core::period::previous_period(&label)
}

// ---------------------------------------------------------------------------
// Classification and formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn classify_margin_strict(margin_percent: f64) -> NapiResult<String> {
    let margin = to_decimal(margin_percent, "margin_percent")?;
    Ok(haken_payroll_core::payroll::margin::classify_margin_strict(margin)
        .as_str()
        .to_string())
}

#[napi]
pub fn classify_margin_relaxed(margin_percent: f64, target_percent: Option<f64>) -> NapiResult<u32> {
    let margin = to_decimal(margin_percent, "margin_percent")?;
    let target = match target_percent {
        Some(t) => to_decimal(t, "target_percent")?,
        None => InsuranceRateConfig::default().target_margin_percent,
    };
    let band = haken_payroll_core::payroll::margin::classify_margin_relaxed(margin, target);
    Ok(u32::from(band.rank()))
}

#[napi]
pub fn format_yen(amount: f64) -> NapiResult<String> {
    let amount = to_decimal(amount, "amount")?;
    Ok(haken_payroll_core::format::format_yen(amount))
}

#[napi]
pub fn format_signed_percent(value: f64) -> NapiResult<String> {
    let value = to_decimal(value, "value")?;
    Ok(haken_payroll_core::format::format_signed_percent(value))
}
