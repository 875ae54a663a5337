//! Configuration for the Supplier Benchmarker

use serde::{Deserialize, Serialize};

/// Configuration for the Supplier Benchmarker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Dimensions where a smaller raw value is better
    /// Their normalized scores are inverted
    pub lower_is_better: Vec<String>,

    /// Composite scores closer than this share a percentile rank
    pub tie_tolerance: f64,

    /// Score given when every supplier reports the same value
    pub neutral_score: f64,
}

impl BenchmarkConfig {
    /// Whether `dimension` is scored inverted
    pub fn is_lower_better(&self, dimension: &str) -> bool {
        self.lower_is_better.iter().any(|d| d == dimension)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.tie_tolerance.is_finite() || self.tie_tolerance < 0.0 {
            return Err("tie_tolerance must be non-negative".to_string());
        }
        if !(0.0..=100.0).contains(&self.neutral_score) {
            return Err("neutral_score must be within [0, 100]".to_string());
        }
        Ok(())
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            lower_is_better: vec![
                "defects_rate".to_string(),
                "cost_variance".to_string(),
                "response_time_hours".to_string(),
            ],
            tie_tolerance: 1e-9,
            neutral_score: 50.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BenchmarkConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.is_lower_better("defects_rate"));
        assert!(!config.is_lower_better("quality_score"));
    }

    #[test]
    fn test_invalid_neutral_score() {
        let config = BenchmarkConfig {
            neutral_score: 101.0,
            ..BenchmarkConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
