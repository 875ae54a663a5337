//! Engine configuration
//!
//! One explicit struct aggregating every component's settings. Loaded from
//! TOML; any section left out of the file takes its defaults.

use foresight_forecast::{EnsembleConfig, FeatureConfig, TrendConfig, UncertaintyConfig};
use foresight_risk::RiskConfig;
use foresight_supplier::BenchmarkConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Upper bound for `max_horizon`
pub const MAX_HORIZON_LIMIT: usize = 10_000;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize config TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the analytics engine
///
/// # Examples
///
/// ```
/// use foresight_engine::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.request_timeout_ms, 30_000);
///
/// let config = EngineConfig::from_toml("max_horizon = 90\n[ensemble]\ntree_weight = 0.7\nsequence_weight = 0.3\n").unwrap();
/// assert_eq!(config.max_horizon, 90);
/// assert_eq!(config.ensemble.tree_weight, 0.7);
/// assert_eq!(config.features.min_window, 14);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Time budget for a single request (milliseconds)
    pub request_timeout_ms: u64,

    /// Largest accepted forecast horizon, in steps
    pub max_horizon: usize,

    /// History points used for one-step-ahead backtesting
    pub backtest_points: usize,

    /// Clamp combined point estimates at zero
    pub clamp_non_negative: bool,

    /// Feature Builder settings
    pub features: FeatureConfig,

    /// Ensemble weights
    pub ensemble: EnsembleConfig,

    /// Uncertainty Estimator settings
    pub uncertainty: UncertaintyConfig,

    /// Risk Scorer settings
    pub risk: RiskConfig,

    /// Supplier Benchmarker settings
    pub benchmark: BenchmarkConfig,

    /// Trend Analyzer settings
    pub trend: TrendConfig,
}

impl EngineConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validate the configuration and every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.max_horizon == 0 || self.max_horizon > MAX_HORIZON_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_horizon must be between 1 and {}, got {}",
                MAX_HORIZON_LIMIT, self.max_horizon
            )));
        }

        let sections = [
            ("features", self.features.validate()),
            ("ensemble", self.ensemble.validate()),
            ("uncertainty", self.uncertainty.validate()),
            ("risk", self.risk.validate()),
            ("benchmark", self.benchmark.validate()),
            ("trend", self.trend.validate()),
        ];
        for (name, result) in sections {
            result.map_err(|e| ConfigError::Invalid(format!("[{}] {}", name, e)))?;
        }
        Ok(())
    }

    /// Conservative preset: longer history, wider bounds, stricter gaps
    pub fn conservative() -> Self {
        Self {
            request_timeout_ms: 60_000,
            backtest_points: 28,
            features: FeatureConfig {
                min_window: 28,
                max_gap_steps: 1,
                ..FeatureConfig::default()
            },
            uncertainty: UncertaintyConfig {
                min_residuals: 20,
                fallback_band: 0.35,
                growth_factor: 1.08,
                default_confidence: 0.99,
            },
            risk: RiskConfig {
                medium_threshold: 20.0,
                high_threshold: 40.0,
                critical_threshold: 60.0,
                ..RiskConfig::default()
            },
            ..Self::default()
        }
    }

    /// Responsive preset: short budgets and shorter history requirements
    pub fn responsive() -> Self {
        Self {
            request_timeout_ms: 5_000,
            max_horizon: 90,
            backtest_points: 7,
            features: FeatureConfig {
                min_window: 7,
                max_gap_steps: 5,
                ..FeatureConfig::default()
            },
            uncertainty: UncertaintyConfig {
                min_residuals: 5,
                growth_factor: 1.02,
                default_confidence: 0.9,
                ..UncertaintyConfig::default()
            },
            trend: TrendConfig {
                recent_window: 3,
                stable_band_pct: 1.0,
                ..TrendConfig::default()
            },
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            max_horizon: 365,
            backtest_points: 14,
            clamp_non_negative: true,
            features: FeatureConfig::default(),
            ensemble: EnsembleConfig::default(),
            uncertainty: UncertaintyConfig::default(),
            risk: RiskConfig::default(),
            benchmark: BenchmarkConfig::default(),
            trend: TrendConfig::default(),
        }
    }
}
