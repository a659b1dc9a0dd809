//! Insurance-rate settings.
//!
//! Rates live in the backend's key/value settings store. They are read once
//! here, defaulted, validated and then passed explicitly into every
//! calculation.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PayrollError;
use crate::types::{Percent, Rate};
use crate::PayrollResult;

/// Settings key for the company-side employment-insurance rate.
pub const EMPLOYMENT_INSURANCE_RATE_KEY: &str = "employment_insurance_rate";
/// Settings key for the company-side workers'-compensation rate.
pub const WORKERS_COMP_RATE_KEY: &str = "workers_comp_rate";
/// Settings key for the target gross margin percentage.
pub const TARGET_MARGIN_KEY: &str = "target_margin";

pub const DEFAULT_EMPLOYMENT_INSURANCE_RATE: Rate = dec!(0.0090);
pub const DEFAULT_WORKERS_COMP_RATE: Rate = dec!(0.0030);
pub const DEFAULT_TARGET_MARGIN_PERCENT: Percent = dec!(15);

/// Company-side statutory insurance rates plus the margin target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsuranceRateConfig {
    /// Employer share of employment insurance (0.009 = 0.9%).
    pub employment_insurance_rate: Rate,
    /// Workers' compensation rate, employer only.
    pub workers_comp_rate: Rate,
    /// Target gross margin. Only affects classification, never arithmetic.
    pub target_margin_percent: Percent,
}

impl Default for InsuranceRateConfig {
    fn default() -> Self {
        Self {
            employment_insurance_rate: DEFAULT_EMPLOYMENT_INSURANCE_RATE,
            workers_comp_rate: DEFAULT_WORKERS_COMP_RATE,
            target_margin_percent: DEFAULT_TARGET_MARGIN_PERCENT,
        }
    }
}

impl InsuranceRateConfig {
    /// Build the config from a key/value settings map.
    ///
    /// Missing or blank keys fall back to their defaults. Values that do not
    /// parse as decimals, and rates outside `[0, 1]`, are rejected.
    pub fn from_settings(settings: &HashMap<String, String>) -> PayrollResult<Self> {
        let config = Self {
            employment_insurance_rate: read_setting(
                settings,
                EMPLOYMENT_INSURANCE_RATE_KEY,
                DEFAULT_EMPLOYMENT_INSURANCE_RATE,
            )?,
            workers_comp_rate: read_setting(
                settings,
                WORKERS_COMP_RATE_KEY,
                DEFAULT_WORKERS_COMP_RATE,
            )?,
            target_margin_percent: read_setting(
                settings,
                TARGET_MARGIN_KEY,
                DEFAULT_TARGET_MARGIN_PERCENT,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that both statutory rates are fractions in `[0, 1]`.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_rate("employment_insurance_rate", self.employment_insurance_rate)?;
        validate_rate("workers_comp_rate", self.workers_comp_rate)?;
        Ok(())
    }
}

fn read_setting(
    settings: &HashMap<String, String>,
    key: &str,
    default: Decimal,
) -> PayrollResult<Decimal> {
    let raw = match settings.get(key).map(|v| v.trim()) {
        Some(v) if !v.is_empty() => v,
        _ => {
            debug!(key, %default, "setting missing, using default");
            return Ok(default);
        }
    };
    Decimal::from_str(raw).map_err(|e| PayrollError::InvalidSetting {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn validate_rate(field: &str, rate: Rate) -> PayrollResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(PayrollError::InvalidInput {
            field: field.into(),
            reason: format!("Rate must be between 0 and 1, got {rate}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let config = InsuranceRateConfig::from_settings(&HashMap::new()).unwrap();
        assert_eq!(config, InsuranceRateConfig::default());
        assert_eq!(config.employment_insurance_rate, dec!(0.009));
        assert_eq!(config.workers_comp_rate, dec!(0.003));
        assert_eq!(config.target_margin_percent, dec!(15));
    }

    #[test]
    fn test_settings_override_defaults() {
        let config = InsuranceRateConfig::from_settings(&settings(&[
            ("employment_insurance_rate", "0.0095"),
            ("target_margin", " 18 "),
        ]))
        .unwrap();
        assert_eq!(config.employment_insurance_rate, dec!(0.0095));
        assert_eq!(config.workers_comp_rate, DEFAULT_WORKERS_COMP_RATE);
        assert_eq!(config.target_margin_percent, dec!(18));
    }

    #[test]
    fn test_blank_setting_falls_back() {
        let config =
            InsuranceRateConfig::from_settings(&settings(&[("workers_comp_rate", "  ")])).unwrap();
        assert_eq!(config.workers_comp_rate, DEFAULT_WORKERS_COMP_RATE);
    }

    #[test]
    fn test_unparseable_setting_rejected() {
        let err = InsuranceRateConfig::from_settings(&settings(&[("workers_comp_rate", "abc")]))
            .unwrap_err();
        match err {
            PayrollError::InvalidSetting { key, .. } => assert_eq!(key, "workers_comp_rate"),
            e => panic!("Expected InvalidSetting, got {e:?}"),
        }
    }

    #[test]
    fn test_rate_out_of_range_rejected() {
        let result =
            InsuranceRateConfig::from_settings(&settings(&[("employment_insurance_rate", "1.5")]));
        assert!(matches!(
            result,
            Err(PayrollError::InvalidInput { ref field, .. }) if field == "employment_insurance_rate"
        ));
    }

    #[test]
    fn test_json_partial_uses_field_defaults() {
        let config: InsuranceRateConfig =
            serde_json::from_str(r#"{"workers_comp_rate": "0.0045"}"#).unwrap();
        assert_eq!(config.workers_comp_rate, dec!(0.0045));
        assert_eq!(config.employment_insurance_rate, DEFAULT_EMPLOYMENT_INSURANCE_RATE);
    }
}
