//! Margin classification.
//!
//! Two schemes are in use across the dashboard and they do not agree on
//! breakpoints: the five-tier strict scheme (18/15/12/10) and the four-band
//! relaxed scheme (target/10/7). Both are kept so that displayed categories
//! stay exactly as each view expects.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Percent;

/// Five-tier margin classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarginTier {
    Excellent,
    Target,
    Close,
    Improve,
    BelowStandard,
}

impl MarginTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarginTier::Excellent => "excellent",
            MarginTier::Target => "target",
            MarginTier::Close => "close",
            MarginTier::Improve => "improve",
            MarginTier::BelowStandard => "below-standard",
        }
    }

    pub fn label_ja(&self) -> &'static str {
        match self {
            MarginTier::Excellent => "優秀",
            MarginTier::Target => "目標達成",
            MarginTier::Close => "目標間近",
            MarginTier::Improve => "要改善",
            MarginTier::BelowStandard => "基準未満",
        }
    }
}

impl std::fmt::Display for MarginTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds of each strict tier. A margin equal to a bound belongs to
/// that bound's tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginThresholds {
    pub excellent: Percent,
    pub target: Percent,
    pub close: Percent,
    pub improve: Percent,
}

impl Default for MarginThresholds {
    fn default() -> Self {
        Self {
            excellent: dec!(18),
            target: dec!(15),
            close: dec!(12),
            improve: dec!(10),
        }
    }
}

/// Classify with the canonical 18/15/12/10 breakpoints.
pub fn classify_margin_strict(margin_percent: Percent) -> MarginTier {
    classify_margin_strict_with(margin_percent, &MarginThresholds::default())
}

pub fn classify_margin_strict_with(
    margin_percent: Percent,
    thresholds: &MarginThresholds,
) -> MarginTier {
    if margin_percent >= thresholds.excellent {
        MarginTier::Excellent
    } else if margin_percent >= thresholds.target {
        MarginTier::Target
    } else if margin_percent >= thresholds.close {
        MarginTier::Close
    } else if margin_percent >= thresholds.improve {
        MarginTier::Improve
    } else {
        MarginTier::BelowStandard
    }
}

/// Four-band classification relative to a configurable target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginBand {
    /// At or above target.
    OnTarget,
    /// At least 10%.
    Acceptable,
    /// At least 7%.
    Warning,
    Critical,
}

impl MarginBand {
    /// 1 (best) through 4 (worst).
    pub fn rank(&self) -> u8 {
        match self {
            MarginBand::OnTarget => 1,
            MarginBand::Acceptable => 2,
            MarginBand::Warning => 3,
            MarginBand::Critical => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarginBand::OnTarget => "on_target",
            MarginBand::Acceptable => "acceptable",
            MarginBand::Warning => "warning",
            MarginBand::Critical => "critical",
        }
    }
}

impl std::fmt::Display for MarginBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const ACCEPTABLE_FLOOR: Decimal = dec!(10);
const WARNING_FLOOR: Decimal = dec!(7);

pub fn classify_margin_relaxed(margin_percent: Percent, target_percent: Percent) -> MarginBand {
    if margin_percent >= target_percent {
        MarginBand::OnTarget
    } else if margin_percent >= ACCEPTABLE_FLOOR {
        MarginBand::Acceptable
    } else if margin_percent >= WARNING_FLOOR {
        MarginBand::Warning
    } else {
        MarginBand::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_boundaries() {
        assert_eq!(classify_margin_strict(dec!(18)), MarginTier::Excellent);
        assert_eq!(classify_margin_strict(dec!(17.9)), MarginTier::Target);
        assert_eq!(classify_margin_strict(dec!(15)), MarginTier::Target);
        assert_eq!(classify_margin_strict(dec!(12)), MarginTier::Close);
        assert_eq!(classify_margin_strict(dec!(11.9)), MarginTier::Improve);
        assert_eq!(classify_margin_strict(dec!(10)), MarginTier::Improve);
        assert_eq!(classify_margin_strict(dec!(9.9)), MarginTier::BelowStandard);
        assert_eq!(classify_margin_strict(dec!(-5)), MarginTier::BelowStandard);
    }

    #[test]
    fn test_strict_custom_thresholds() {
        let thresholds = MarginThresholds {
            excellent: dec!(25),
            ..Default::default()
        };
        assert_eq!(
            classify_margin_strict_with(dec!(20), &thresholds),
            MarginTier::Target
        );
    }

    #[test]
    fn test_relaxed_bands() {
        let target = dec!(15);
        assert_eq!(classify_margin_relaxed(dec!(15), target), MarginBand::OnTarget);
        assert_eq!(classify_margin_relaxed(dec!(14.9), target), MarginBand::Acceptable);
        assert_eq!(classify_margin_relaxed(dec!(10), target), MarginBand::Acceptable);
        assert_eq!(classify_margin_relaxed(dec!(7), target), MarginBand::Warning);
        assert_eq!(classify_margin_relaxed(dec!(6.99), target), MarginBand::Critical);
        assert_eq!(classify_margin_relaxed(dec!(-12), target).rank(), 4);
    }

    #[test]
    fn test_schemes_differ_at_twelve() {
        // 12% is "close" in the strict scheme but only "acceptable" in the relaxed one
        assert_eq!(classify_margin_strict(dec!(12)), MarginTier::Close);
        assert_eq!(classify_margin_relaxed(dec!(12), dec!(15)), MarginBand::Acceptable);
    }

    #[test]
    fn test_tier_serializes_kebab_case() {
        let json = serde_json::to_string(&MarginTier::BelowStandard).unwrap();
        assert_eq!(json, "\"below-standard\"");
    }
}
