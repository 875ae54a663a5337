//! Model registry
//!
//! Holds the current [`ModelSnapshot`]. Readers clone the `Arc` and keep
//! using that snapshot for the rest of their request; a reload builds a new
//! snapshot completely before swapping it in under a short write lock.

use crate::error::ForecastError;
use crate::models::{
    ForecastModel, SequenceModel, SequenceParams, TreeEnsemble, TreeEnsembleParams,
};
use chrono::{DateTime, Utc};
use foresight_domain::ModelKind;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

/// Serialized parameters for both models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Version label reported on every forecast
    pub version: String,
    /// Tree ensemble parameters
    pub tree: TreeEnsembleParams,
    /// Sequence model parameters
    pub sequence: SequenceParams,
}

impl ModelParameters {
    /// Parse parameters from JSON
    pub fn from_json(json: &str) -> Result<Self, ForecastError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize parameters to pretty JSON
    pub fn to_json(&self) -> Result<String, ForecastError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            version: "builtin-1".to_string(),
            tree: TreeEnsembleParams::default(),
            sequence: SequenceParams::default(),
        }
    }
}

/// Storage for model parameters
///
/// Implemented by the infrastructure layer (foresight-engine)
pub trait ModelParameterStore {
    /// Error type for store operations
    type Error: Display;

    /// Load the latest parameters
    fn load_parameters(&self) -> Result<ModelParameters, Self::Error>;
}

/// Immutable set of loaded models
#[derive(Debug)]
pub struct ModelSnapshot {
    version: String,
    tree: TreeEnsemble,
    sequence: SequenceModel,
    loaded_at: DateTime<Utc>,
}

impl ModelSnapshot {
    /// Build a snapshot, validating every parameter
    pub fn from_parameters(params: ModelParameters) -> Result<Self, ForecastError> {
        if params.version.trim().is_empty() {
            return Err(ForecastError::InvalidParameters(
                "model version must not be empty".to_string(),
            ));
        }
        Ok(Self {
            tree: TreeEnsemble::new(params.tree)?,
            sequence: SequenceModel::new(params.sequence)?,
            version: params.version,
            loaded_at: Utc::now(),
        })
    }

    /// Snapshot of the built-in parameters
    pub fn builtin() -> Result<Self, ForecastError> {
        Self::from_parameters(ModelParameters::default())
    }

    /// Version label
    pub fn version(&self) -> &str {
        &self.version
    }

    /// When the snapshot was built
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// The tree ensemble
    pub fn tree(&self) -> &TreeEnsemble {
        &self.tree
    }

    /// The sequence model
    pub fn sequence(&self) -> &SequenceModel {
        &self.sequence
    }

    /// Look up a model by kind
    pub fn model(&self, kind: ModelKind) -> &dyn ForecastModel {
        match kind {
            ModelKind::TreeEnsemble => &self.tree,
            ModelKind::Sequence => &self.sequence,
        }
    }
}

/// Registry publishing the current model snapshot
pub struct ModelRegistry {
    current: RwLock<Arc<ModelSnapshot>>,
}

impl ModelRegistry {
    /// Create a registry serving `snapshot`
    pub fn new(snapshot: ModelSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Create a registry serving the built-in parameters
    pub fn builtin() -> Result<Self, ForecastError> {
        Ok(Self::new(ModelSnapshot::builtin()?))
    }

    /// Current snapshot
    pub fn current(&self) -> Arc<ModelSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Swap in a new snapshot, returning the previous one
    pub fn publish(&self, snapshot: ModelSnapshot) -> Arc<ModelSnapshot> {
        let next = Arc::new(snapshot);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Load parameters from `store` and publish them
    ///
    /// On any failure the current snapshot stays in place.
    pub fn reload<S: ModelParameterStore>(&self, store: &S) -> Result<String, ForecastError> {
        let params = store.load_parameters().map_err(|e| {
            warn!(error = %e, "Model parameter load failed");
            ForecastError::Store(e.to_string())
        })?;
        let snapshot = ModelSnapshot::from_parameters(params).map_err(|e| {
            warn!(error = %e, "Rejected model parameters");
            e
        })?;
        let version = snapshot.version().to_string();
        let previous = self.publish(snapshot);

        info!(
            previous = %previous.version(),
            current = %version,
            "Published model snapshot"
        );
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedStore(Result<ModelParameters, String>);

    impl ModelParameterStore for FixedStore {
        type Error = String;

        fn load_parameters(&self) -> Result<ModelParameters, Self::Error> {
            self.0.clone()
        }
    }

    #[test]
    fn test_builtin_snapshot() {
        let registry = ModelRegistry::builtin().unwrap();
        assert_eq!(registry.current().version(), "builtin-1");
        assert_eq!(
            registry.current().model(ModelKind::Sequence).kind(),
            ModelKind::Sequence
        );
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let registry = ModelRegistry::builtin().unwrap();
        let in_flight = registry.current();

        let params = ModelParameters {
            version: "2025-06-01".to_string(),
            ..ModelParameters::default()
        };
        let version = registry.reload(&FixedStore(Ok(params))).unwrap();

        assert_eq!(version, "2025-06-01");
        assert_eq!(registry.current().version(), "2025-06-01");
        // readers holding the old snapshot are unaffected
        assert_eq!(in_flight.version(), "builtin-1");
    }

    #[test]
    fn test_failed_load_keeps_current() {
        let registry = ModelRegistry::builtin().unwrap();
        let err = registry
            .reload(&FixedStore(Err("disk on fire".to_string())))
            .unwrap_err();

        assert_eq!(err, ForecastError::Store("disk on fire".to_string()));
        assert_eq!(registry.current().version(), "builtin-1");
    }

    #[test]
    fn test_invalid_parameters_keep_current() {
        let registry = ModelRegistry::builtin().unwrap();
        let mut params = ModelParameters::default();
        params.version = "broken".to_string();
        params.sequence.coefficients.pop();

        assert!(registry.reload(&FixedStore(Ok(params))).is_err());
        assert_eq!(registry.current().version(), "builtin-1");
    }

    #[test]
    fn test_parameters_json_round_trip() {
        let params = ModelParameters::default();
        let json = params.to_json().unwrap();
        assert_eq!(ModelParameters::from_json(&json).unwrap(), params);
    }

    #[test]
    fn test_malformed_json() {
        let err = ModelParameters::from_json("{not json").unwrap_err();
        assert!(matches!(err, ForecastError::InvalidParameters(_)));
    }
}
