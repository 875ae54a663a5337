//! Foresight Forecasting
//!
//! Everything needed to turn a history into a bounded demand forecast:
//!
//! - [`FeatureBuilder`]: calendar, lag, rolling and attribute features
//! - [`models`]: the tree ensemble and the sequence model
//! - [`combine`] / [`resolve`]: weighted ensemble with single-model fallback
//! - [`spread`]: per-step disagreement between the models
//! - [`UncertaintyEstimator`]: residual-calibrated prediction intervals
//! - [`ModelRegistry`]: atomically swapped model snapshots
//! - [`TrendAnalyzer`]: recent direction and volatility of a series
//!
//! Components never call each other; the engine composes them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod ensemble;
pub mod error;
pub mod features;
pub mod models;
pub mod registry;
pub mod trend;
pub mod uncertainty;

pub use config::{EnsembleConfig, FeatureConfig, TrendConfig, UncertaintyConfig};
pub use ensemble::{combine, resolve, spread, EnsembleOutcome};
pub use error::ForecastError;
pub use features::{encode_category, FeatureBuilder};
pub use models::{ForecastModel, SequenceModel, SequenceParams, TreeEnsemble, TreeEnsembleParams};
pub use registry::{ModelParameterStore, ModelParameters, ModelRegistry, ModelSnapshot};
pub use trend::TrendAnalyzer;
pub use uncertainty::{z_score, UncertaintyEstimate, UncertaintyEstimator};
