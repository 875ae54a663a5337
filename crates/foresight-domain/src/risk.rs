//! Risk value objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discrete risk band derived from a composite score
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Composite below the medium threshold
    Low,
    /// Composite below the high threshold
    Medium,
    /// Composite below the critical threshold
    High,
    /// Composite at or above the critical threshold
    Critical,
}

impl RiskLevel {
    /// Get the risk level as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Parse a risk level from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid risk level: {}", s))
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One risk dimension (geopolitical, financial, operational, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Dimension name, unique within an assessment
    pub name: String,
    /// Signal as observed, in its own units
    pub raw_value: f64,
    /// Signal mapped onto [0, 100]
    pub normalized_score: f64,
    /// Share of the composite score; weights of an assessment sum to 1
    pub weight: f64,
}

impl RiskFactor {
    /// Create a factor whose score is already normalized
    pub fn new(name: impl Into<String>, normalized_score: f64, weight: f64) -> Self {
        Self {
            name: name.into(),
            raw_value: normalized_score,
            normalized_score,
            weight,
        }
    }

    /// Min-max normalize a raw signal between `floor` and `ceiling`
    ///
    /// The score is clamped to [0, 100]; a degenerate range scores 50.
    ///
    /// # Examples
    ///
    /// ```
    /// use foresight_domain::RiskFactor;
    ///
    /// let factor = RiskFactor::from_raw("financial", 3.0, 0.0, 12.0, 0.5);
    /// assert_eq!(factor.normalized_score, 25.0);
    /// ```
    pub fn from_raw(
        name: impl Into<String>,
        raw_value: f64,
        floor: f64,
        ceiling: f64,
        weight: f64,
    ) -> Self {
        let span = ceiling - floor;
        let normalized_score = if span.abs() < f64::EPSILON {
            50.0
        } else {
            ((raw_value - floor) / span * 100.0).clamp(0.0, 100.0)
        };

        Self {
            name: name.into(),
            raw_value,
            normalized_score,
            weight,
        }
    }

    /// Weighted contribution to the composite score
    pub fn contribution(&self) -> f64 {
        self.normalized_score * self.weight
    }
}

/// A factor's share of the composite, used to rank the top risks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskContribution {
    /// Factor name
    pub name: String,
    /// Factor's normalized score
    pub normalized_score: f64,
    /// Weighted contribution to the composite
    pub contribution: f64,
}

/// Composite risk assessment for a scope (supplier, product, supply chain)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// What was assessed
    pub scope: String,
    /// Factors that went into the composite
    pub factors: Vec<RiskFactor>,
    /// Weighted sum of normalized scores, in [0, 100]
    pub composite_score: f64,
    /// Banded composite score
    pub risk_level: RiskLevel,
    /// Largest weighted contributions, most severe first
    pub top_risks: Vec<RiskContribution>,
    /// Horizon the assessment covers
    pub time_horizon_days: u32,
    /// When the assessment was computed
    pub assessed_at: DateTime<Utc>,
    /// When the assessment should be recomputed
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn test_risk_level_parse() {
        assert_eq!("HIGH".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert!("severe".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_from_raw_clamps() {
        assert_eq!(RiskFactor::from_raw("x", 20.0, 0.0, 10.0, 1.0).normalized_score, 100.0);
        assert_eq!(RiskFactor::from_raw("x", -5.0, 0.0, 10.0, 1.0).normalized_score, 0.0);
        assert_eq!(RiskFactor::from_raw("x", 3.0, 4.0, 4.0, 1.0).normalized_score, 50.0);
    }

    #[test]
    fn test_contribution() {
        let factor = RiskFactor::new("geopolitical", 80.0, 0.4);
        assert!((factor.contribution() - 32.0).abs() < 1e-9);
    }
}
