//! Error types for risk scoring

use thiserror::Error;

/// Errors that can occur during risk scoring
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    /// No factors were supplied
    #[error("No risk factors supplied")]
    NoRiskFactors,

    /// A normalized score is outside [0, 100]
    #[error("Risk factor '{name}' has score {score} outside [0, 100]")]
    FactorOutOfRange {
        /// Factor name
        name: String,
        /// Offending score
        score: f64,
    },

    /// Weights are negative, non-finite, or do not sum to 1
    #[error("Invalid weighting: {0}")]
    InvalidWeighting(String),

    /// The same factor name appears twice
    #[error("Duplicate risk factor: {0}")]
    DuplicateFactor(String),

    /// Factor name is blank
    #[error("Risk factor name must not be empty")]
    EmptyFactorName,

    /// Scope is blank
    #[error("Risk scope must not be empty")]
    EmptyScope,

    /// Time horizon outside the accepted range
    #[error("Invalid time horizon: {days} days (must be 1..={max})")]
    InvalidTimeHorizon {
        /// Requested horizon
        days: u32,
        /// Largest accepted horizon
        max: u32,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
