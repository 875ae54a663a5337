//! Forecast models
//!
//! Two fixed strategies share the [`ForecastModel`] interface:
//! - [`TreeEnsemble`]: gradient-boosted trees over the feature vector
//! - [`SequenceModel`]: autoregression over the raw trailing window

pub mod sequence;
pub mod tree;

pub use sequence::{SequenceModel, SequenceParams};
pub use tree::{BaseTerm, TreeEnsemble, TreeEnsembleParams, TreeNode};

use crate::error::ForecastError;
use foresight_domain::{FeatureVector, ModelKind};

/// Common prediction interface
///
/// Implementations are pure: the same features and parameters always give
/// the same predictions.
pub trait ForecastModel: Send + Sync {
    /// Which variant this is
    fn kind(&self) -> ModelKind;

    /// Predict one value per feature vector, in input order
    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>, ForecastError>;
}
