//! Error types for the analytics engine

use crate::config::ConfigError;
use foresight_forecast::ForecastError;
use foresight_risk::RiskError;
use foresight_supplier::SupplierError;
use thiserror::Error;

/// Failure category reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input; not retried
    Validation,
    /// Too little history to forecast
    InsufficientHistory,
    /// History has a gap or irregular spacing
    DataGap,
    /// No model could produce a forecast
    ModelUnavailable,
    /// The request ran past its time budget
    Timeout,
    /// Unknown entity
    NotFound,
    /// Collaborator or runtime failure
    Internal,
}

impl ErrorKind {
    /// Get the kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::InsufficientHistory => "insufficient_history",
            ErrorKind::DataGap => "data_gap",
            ErrorKind::ModelUnavailable => "model_unavailable",
            ErrorKind::Timeout => "timeout",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the analytics engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Request failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Forecasting error
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// Risk scoring error
    #[error(transparent)]
    Risk(#[from] RiskError),

    /// Benchmarking error
    #[error(transparent)]
    Supplier(#[from] SupplierError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Entity has no recorded history
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Request exceeded its time budget
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Historical data source failed
    #[error("Data source error: {0}")]
    Source(String),

    /// Runtime failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Failure category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Validation(_) | EngineError::Risk(_) | EngineError::Supplier(_) => {
                ErrorKind::Validation
            }
            EngineError::Forecast(e) => match e {
                ForecastError::InsufficientHistory { .. } => ErrorKind::InsufficientHistory,
                ForecastError::DataGap { .. }
                | ForecastError::IrregularSpacing { .. }
                | ForecastError::StaleHistory { .. } => ErrorKind::DataGap,
                ForecastError::ModelUnavailable { .. } => ErrorKind::ModelUnavailable,
                ForecastError::InvalidHorizon(_)
                | ForecastError::InvalidConfidenceLevel(_)
                | ForecastError::InvalidWeights(_)
                | ForecastError::InvalidParameters(_)
                | ForecastError::Config(_) => ErrorKind::Validation,
                ForecastError::LengthMismatch { .. }
                | ForecastError::NonFinitePrediction(_)
                | ForecastError::Store(_) => ErrorKind::Internal,
            },
            EngineError::Config(_) => ErrorKind::Validation,
            EngineError::NotFound(_) => ErrorKind::NotFound,
            EngineError::Timeout(_) => ErrorKind::Timeout,
            EngineError::Source(_) | EngineError::Internal(_) => ErrorKind::Internal,
        }
    }
}
