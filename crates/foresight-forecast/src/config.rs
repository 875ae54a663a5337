//! Configuration for the forecasting components

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Largest accepted sampling step: one leap year
pub const MAX_STEP_SECS: i64 = 366 * 86_400;

/// Configuration for the Feature Builder
///
/// # Examples
///
/// ```
/// use foresight_forecast::FeatureConfig;
///
/// let config = FeatureConfig::default();
/// assert_eq!(config.min_window, 14);
/// assert_eq!(config.lags, vec![1, 7, 14]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Minimum number of history points required
    pub min_window: usize,

    /// Sampling step of the series (seconds)
    /// Default: one day
    pub step_secs: i64,

    /// Largest run of missing steps that is forward-filled
    /// Larger gaps are rejected
    pub max_gap_steps: u32,

    /// Lag offsets, in steps
    pub lags: Vec<usize>,

    /// Trailing windows for rolling mean/std, in points
    pub rolling_windows: Vec<usize>,

    /// String attributes of the latest point to hash-encode
    pub categorical_attributes: Vec<String>,

    /// Numeric attributes of the latest point to carry through
    pub numeric_attributes: Vec<String>,
}

impl FeatureConfig {
    /// Get the sampling step as a Duration
    pub fn step(&self) -> Duration {
        Duration::seconds(self.step_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_window == 0 {
            return Err("min_window must be greater than 0".to_string());
        }
        if self.step_secs <= 0 || self.step_secs > MAX_STEP_SECS {
            return Err(format!(
                "step_secs must be between 1 and {}, got {}",
                MAX_STEP_SECS, self.step_secs
            ));
        }
        if self.lags.is_empty() {
            return Err("at least one lag is required".to_string());
        }
        if self.lags.contains(&0) {
            return Err("lags must be greater than 0".to_string());
        }
        if self.rolling_windows.contains(&0) {
            return Err("rolling windows must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            min_window: 14,
            step_secs: 86_400,
            max_gap_steps: 3,
            lags: vec![1, 7, 14],
            rolling_windows: vec![7, 14, 30],
            categorical_attributes: Vec::new(),
            numeric_attributes: Vec::new(),
        }
    }
}

/// Weights used to combine the two models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Weight of the tree ensemble
    pub tree_weight: f64,

    /// Weight of the sequence model
    pub sequence_weight: f64,
}

impl EnsembleConfig {
    /// Create a config with explicit weights
    pub fn new(tree_weight: f64, sequence_weight: f64) -> Self {
        Self {
            tree_weight,
            sequence_weight,
        }
    }

    /// Weight assigned to a model kind
    pub fn weight(&self, kind: foresight_domain::ModelKind) -> f64 {
        match kind {
            foresight_domain::ModelKind::TreeEnsemble => self.tree_weight,
            foresight_domain::ModelKind::Sequence => self.sequence_weight,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (name, w) in [("tree_weight", self.tree_weight), ("sequence_weight", self.sequence_weight)] {
            if !w.is_finite() || w < 0.0 {
                return Err(format!("{} must be finite and non-negative, got {}", name, w));
            }
        }
        if self.tree_weight + self.sequence_weight <= 0.0 {
            return Err("at least one ensemble weight must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}

/// Configuration for the Uncertainty Estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UncertaintyConfig {
    /// Residuals needed before residual calibration is trusted
    pub min_residuals: usize,

    /// Fallback half-width as a fraction of the mean absolute estimate
    pub fallback_band: f64,

    /// Per-step widening factor (>= 1)
    pub growth_factor: f64,

    /// Confidence level used when the caller does not give one
    pub default_confidence: f64,
}

impl UncertaintyConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.fallback_band.is_finite() || self.fallback_band <= 0.0 {
            return Err("fallback_band must be positive".to_string());
        }
        if !self.growth_factor.is_finite() || self.growth_factor < 1.0 {
            return Err(format!(
                "growth_factor must be at least 1.0, got {}",
                self.growth_factor
            ));
        }
        if !(self.default_confidence > 0.0 && self.default_confidence < 1.0) {
            return Err("default_confidence must be strictly between 0 and 1".to_string());
        }
        Ok(())
    }
}

impl Default for UncertaintyConfig {
    fn default() -> Self {
        Self {
            min_residuals: 10,
            fallback_band: 0.25,
            growth_factor: 1.05,
            default_confidence: 0.95,
        }
    }
}

/// Configuration for the Trend Analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Number of trailing values forming the recent mean
    pub recent_window: usize,

    /// Changes within +/- this percentage are reported as stable
    pub stable_band_pct: f64,

    /// Change, in percent, beyond which a rise or fall earns an insight
    pub insight_change_pct: f64,

    /// Volatility above which smoothing is recommended
    pub volatility_threshold: f64,
}

impl TrendConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.recent_window == 0 {
            return Err("recent_window must be greater than 0".to_string());
        }
        for (name, value) in [
            ("stable_band_pct", self.stable_band_pct),
            ("insight_change_pct", self.insight_change_pct),
            ("volatility_threshold", self.volatility_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be non-negative", name));
            }
        }
        Ok(())
    }
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            recent_window: 7,
            stable_band_pct: 0.0,
            insight_change_pct: 5.0,
            volatility_threshold: 10.0,
        }
    }
}
