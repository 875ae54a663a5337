//! Forecast value objects: feature vectors in, forecast results out

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The fixed set of forecast model variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Gradient-boosted tree ensemble over engineered features
    TreeEnsemble,
    /// Autoregressive model over the raw trailing value window
    Sequence,
}

impl ModelKind {
    /// Get the model kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::TreeEnsemble => "tree_ensemble",
            ModelKind::Sequence => "sequence",
        }
    }

    /// Parse a model kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tree_ensemble" | "tree" => Some(ModelKind::TreeEnsemble),
            "sequence" | "seq" => Some(ModelKind::Sequence),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model-ready view of an entity's history at one future timestamp
///
/// Ephemeral: owned by a single forecast request and never persisted.
#[derive(Debug, Clone)]
pub struct FeatureVector {
    /// Timestamp being forecast
    pub timestamp: DateTime<Utc>,

    /// Steps ahead of the last history point (1-based)
    pub step_ahead: usize,

    /// Feature names, shared by every vector of one build
    pub names: Arc<[String]>,

    /// Feature values, aligned with `names`
    pub values: Vec<f64>,

    /// Gap-filled history values, oldest first, shared by every vector of one build
    pub history: Arc<[f64]>,

    /// History contained forward-filled points
    pub gap_filled: bool,

    /// Lag features that had to be imputed with the series mean
    pub imputed: Vec<String>,
}

impl FeatureVector {
    /// Look up a feature by name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i).copied())
    }
}

/// One forecast step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Forecast timestamp
    pub timestamp: DateTime<Utc>,
    /// Combined point estimate
    pub point_estimate: f64,
    /// Lower prediction bound (absent when uncertainty was not requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
    /// Upper prediction bound (absent when uncertainty was not requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
}

impl ForecastPoint {
    /// Width of the prediction interval, if bounds are present
    pub fn width(&self) -> Option<f64> {
        match (self.lower_bound, self.upper_bound) {
            (Some(lower), Some(upper)) => Some(upper - lower),
            _ => None,
        }
    }
}

/// Raw predictions of a single model, kept for explainability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelForecast {
    /// Which model produced the predictions
    pub model: ModelKind,
    /// Raw point estimates, one per horizon step
    pub predictions: Vec<f64>,
}

/// Demand forecast for one entity
///
/// Produced fresh per request and immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Forecast entity
    pub entity_id: String,

    /// One point per horizon step, ordered by timestamp
    pub horizon_points: Vec<ForecastPoint>,

    /// Backtest accuracy in [0, 1] (absent when it could not be computed)
    pub accuracy_score: Option<f64>,

    /// Version of the model parameters used
    pub model_version: String,

    /// Confidence level of the bounds
    pub confidence_level: f64,

    /// A model failed and the surviving model was used alone
    pub degraded: bool,

    /// Bounds fell back to the fixed percentage band
    pub low_confidence: bool,

    /// History contained forward-filled gaps
    pub gap_filled: bool,

    /// Sum of point estimates over the horizon
    pub total_forecasted_demand: f64,

    /// Raw predictions of each model that contributed
    pub model_forecasts: Vec<ModelForecast>,
}
