//! Configuration for the Risk Scorer

use foresight_domain::RiskLevel;
use serde::{Deserialize, Serialize};

/// Upper bound for `max_horizon_days`: ten years
pub const MAX_HORIZON_DAYS_LIMIT: u32 = 3_650;

/// Configuration for the Risk Scorer
///
/// Band thresholds are inclusive lower bounds of the next level:
/// a composite below `medium_threshold` is low, below `high_threshold` is
/// medium, below `critical_threshold` is high, and anything else is critical.
///
/// # Examples
///
/// ```
/// use foresight_domain::RiskLevel;
/// use foresight_risk::RiskConfig;
///
/// let config = RiskConfig::default();
/// assert_eq!(config.band(24.9), RiskLevel::Low);
/// assert_eq!(config.band(25.0), RiskLevel::Medium);
/// assert_eq!(config.band(75.0), RiskLevel::Critical);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Lowest composite reported as medium
    pub medium_threshold: f64,

    /// Lowest composite reported as high
    pub high_threshold: f64,

    /// Lowest composite reported as critical
    pub critical_threshold: f64,

    /// Allowed distance of the weight sum from 1.0
    pub weight_tolerance: f64,

    /// Number of factors reported in `top_risks`
    pub top_risks: usize,

    /// Longest accepted time horizon, in days
    pub max_horizon_days: u32,
}

impl RiskConfig {
    /// Risk level for a composite score
    pub fn band(&self, composite: f64) -> RiskLevel {
        if composite < self.medium_threshold {
            RiskLevel::Low
        } else if composite < self.high_threshold {
            RiskLevel::Medium
        } else if composite < self.critical_threshold {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let thresholds = [
            self.medium_threshold,
            self.high_threshold,
            self.critical_threshold,
        ];
        if thresholds.iter().any(|t| !t.is_finite() || *t < 0.0 || *t > 100.0) {
            return Err("thresholds must be within [0, 100]".to_string());
        }
        if !(self.medium_threshold < self.high_threshold
            && self.high_threshold < self.critical_threshold)
        {
            return Err("thresholds must be strictly increasing".to_string());
        }
        if !self.weight_tolerance.is_finite() || self.weight_tolerance < 0.0 {
            return Err("weight_tolerance must be non-negative".to_string());
        }
        if self.max_horizon_days == 0 || self.max_horizon_days > MAX_HORIZON_DAYS_LIMIT {
            return Err(format!(
                "max_horizon_days must be between 1 and {}, got {}",
                MAX_HORIZON_DAYS_LIMIT, self.max_horizon_days
            ));
        }
        Ok(())
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            medium_threshold: 25.0,
            high_threshold: 50.0,
            critical_threshold: 75.0,
            weight_tolerance: 1e-6,
            top_risks: 3,
            max_horizon_days: 365,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RiskConfig::default().validate().is_ok());
    }

    #[test]
    fn test_horizon_limit() {
        let config = RiskConfig {
            max_horizon_days: u32::MAX,
            ..RiskConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RiskConfig {
            max_horizon_days: MAX_HORIZON_DAYS_LIMIT,
            ..RiskConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_band_boundaries() {
        let config = RiskConfig::default();
        assert_eq!(config.band(0.0), RiskLevel::Low);
        assert_eq!(config.band(49.999), RiskLevel::Medium);
        assert_eq!(config.band(50.0), RiskLevel::High);
        assert_eq!(config.band(74.999), RiskLevel::High);
        assert_eq!(config.band(100.0), RiskLevel::Critical);
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let config = RiskConfig {
            high_threshold: 20.0,
            ..RiskConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = RiskConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RiskConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
