//! Request types accepted by the engine

use chrono::{DateTime, Utc};
use foresight_domain::{RiskFactor, SupplierMetric};
use serde::{Deserialize, Serialize};

/// Demand forecast request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Entity to forecast
    pub entity_id: String,

    /// Number of future steps
    pub horizon: usize,

    /// Interval confidence level; the configured default when absent
    #[serde(default)]
    pub confidence_level: Option<f64>,

    /// Whether to compute prediction intervals
    #[serde(default = "default_include_uncertainty")]
    pub include_uncertainty: bool,

    /// Forecast origin; the last recorded point when absent
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

fn default_include_uncertainty() -> bool {
    true
}

impl ForecastRequest {
    /// Create a request with default confidence and uncertainty enabled
    pub fn new(entity_id: impl Into<String>, horizon: usize) -> Self {
        Self {
            entity_id: entity_id.into(),
            horizon,
            confidence_level: None,
            include_uncertainty: true,
            as_of: None,
        }
    }

    /// Set the confidence level
    pub fn with_confidence(mut self, confidence_level: f64) -> Self {
        self.confidence_level = Some(confidence_level);
        self
    }

    /// Skip prediction intervals
    pub fn without_uncertainty(mut self) -> Self {
        self.include_uncertainty = false;
        self
    }

    /// Forecast from a given origin
    pub fn as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }
}

/// Risk assessment request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRequest {
    /// What is being assessed (supplier, region, portfolio, ...)
    pub scope: String,

    /// Factors to combine
    pub risk_factors: Vec<RiskFactor>,

    /// Validity of the assessment, in days
    #[serde(default = "default_time_horizon_days")]
    pub time_horizon_days: u32,
}

fn default_time_horizon_days() -> u32 {
    30
}

impl RiskRequest {
    /// Create a request with the default 30-day horizon
    pub fn new(scope: impl Into<String>, risk_factors: Vec<RiskFactor>) -> Self {
        Self {
            scope: scope.into(),
            risk_factors,
            time_horizon_days: default_time_horizon_days(),
        }
    }

    /// Set the time horizon
    pub fn with_time_horizon(mut self, days: u32) -> Self {
        self.time_horizon_days = days;
        self
    }
}

/// Trend analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRequest {
    /// Entity to analyze
    pub entity_id: String,

    /// Also forecast the entity
    #[serde(default)]
    pub include_forecasting: bool,

    /// Steps to forecast when `include_forecasting` is set
    #[serde(default = "default_forecast_horizon")]
    pub forecast_horizon: usize,
}

fn default_forecast_horizon() -> usize {
    30
}

impl TrendRequest {
    /// Create a request without a forecast
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            include_forecasting: false,
            forecast_horizon: default_forecast_horizon(),
        }
    }

    /// Attach a forecast of `horizon` steps
    pub fn with_forecast(mut self, horizon: usize) -> Self {
        self.include_forecasting = true;
        self.forecast_horizon = horizon;
        self
    }
}

/// Supplier benchmark request
///
/// An empty `supplier_ids` list benchmarks every supplier in `metrics`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BenchmarkRequest {
    /// Suppliers to include
    #[serde(default)]
    pub supplier_ids: Vec<String>,

    /// Metrics across the population
    pub metrics: Vec<SupplierMetric>,
}
