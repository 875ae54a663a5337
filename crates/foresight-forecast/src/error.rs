//! Error types for forecasting

use chrono::{DateTime, Utc};
use foresight_domain::ModelKind;
use thiserror::Error;

/// Errors that can occur while building features, predicting or estimating bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Not enough history to build features
    #[error("Insufficient history: {available} points available, {required} required")]
    InsufficientHistory {
        /// Minimum number of points
        required: usize,
        /// Points actually available
        available: usize,
    },

    /// Consecutive points are further apart than the gap tolerance
    #[error("Data gap after {after}: {missing_steps} missing steps exceeds tolerance of {tolerance}")]
    DataGap {
        /// Timestamp of the point before the gap
        after: DateTime<Utc>,
        /// Number of missing steps
        missing_steps: i64,
        /// Configured tolerance
        tolerance: u32,
    },

    /// Spacing between points is not a whole number of steps
    #[error("Irregular spacing at {at}: interval is not a multiple of {step_secs}s")]
    IrregularSpacing {
        /// Timestamp of the offending point
        at: DateTime<Utc>,
        /// Configured step
        step_secs: i64,
    },

    /// History ends too long before the forecast origin
    #[error("Stale history: last point {last} is too far before {as_of}")]
    StaleHistory {
        /// Last history timestamp
        last: DateTime<Utc>,
        /// Requested forecast origin
        as_of: DateTime<Utc>,
    },

    /// Horizon outside the accepted range
    #[error("Invalid horizon: {0}")]
    InvalidHorizon(usize),

    /// Confidence level outside (0, 1)
    #[error("Invalid confidence level: {0} (must be strictly between 0 and 1)")]
    InvalidConfidenceLevel(f64),

    /// A model could not produce predictions
    #[error("Model '{model}' unavailable: {reason}")]
    ModelUnavailable {
        /// Which model failed
        model: ModelKind,
        /// Why it failed
        reason: String,
    },

    /// Model outputs disagree in length
    #[error("Prediction length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        /// Expected number of predictions
        expected: usize,
        /// Number received
        found: usize,
    },

    /// A prediction was NaN or infinite
    #[error("Non-finite prediction at step {0}")]
    NonFinitePrediction(usize),

    /// Ensemble weights cannot be applied
    #[error("Invalid ensemble weights: {0}")]
    InvalidWeights(String),

    /// Model parameters are malformed
    #[error("Invalid model parameters: {0}")]
    InvalidParameters(String),

    /// Model parameter storage failed
    #[error("Model store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ForecastError {
    fn from(e: serde_json::Error) -> Self {
        ForecastError::InvalidParameters(e.to_string())
    }
}
