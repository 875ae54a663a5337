//! Ensemble combination
//!
//! Combines per-model predictions as `sum(w * p) / sum(w)`. When one model
//! fails, the survivor is used alone and the outcome is marked degraded.

use crate::config::EnsembleConfig;
use crate::error::ForecastError;
use foresight_domain::{ModelForecast, ModelKind};
use tracing::warn;

/// Result of combining model outputs
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleOutcome {
    /// Combined predictions
    pub predictions: Vec<f64>,
    /// Raw predictions of each model that succeeded
    pub contributions: Vec<ModelForecast>,
    /// A model failed and the survivor was used alone
    pub degraded: bool,
    /// Models that failed, with their errors
    pub failures: Vec<(ModelKind, ForecastError)>,
}

/// Weighted average of model outputs
///
/// Models with weight 0 still count toward the length check but contribute
/// nothing. Returns `InvalidWeights` when the total weight is not positive.
///
/// # Examples
///
/// ```
/// use foresight_domain::ModelKind;
/// use foresight_forecast::{combine, EnsembleConfig};
///
/// let outputs = vec![
///     (ModelKind::TreeEnsemble, vec![10.0, 20.0]),
///     (ModelKind::Sequence, vec![30.0, 40.0]),
/// ];
/// let combined = combine(&outputs, &EnsembleConfig::new(1.0, 1.0)).unwrap();
/// assert_eq!(combined, vec![20.0, 30.0]);
/// ```
pub fn combine(
    outputs: &[(ModelKind, Vec<f64>)],
    config: &EnsembleConfig,
) -> Result<Vec<f64>, ForecastError> {
    let Some((_, first)) = outputs.first() else {
        return Err(ForecastError::InvalidWeights(
            "no model outputs to combine".to_string(),
        ));
    };
    let len = first.len();
    if let Some((_, other)) = outputs.iter().find(|(_, p)| p.len() != len) {
        return Err(ForecastError::LengthMismatch {
            expected: len,
            found: other.len(),
        });
    }

    let active: Vec<(f64, &Vec<f64>)> = outputs
        .iter()
        .map(|(kind, p)| (config.weight(*kind), p))
        .filter(|(w, _)| *w > 0.0)
        .collect();
    let total: f64 = active.iter().map(|(w, _)| w).sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(ForecastError::InvalidWeights(format!(
            "total weight of available models is {}",
            total
        )));
    }

    let combined = (0..len)
        .map(|i| active.iter().map(|(w, p)| w * p[i]).sum::<f64>() / total)
        .collect::<Vec<_>>();

    if let Some(step) = combined.iter().position(|v| !v.is_finite()) {
        return Err(ForecastError::NonFinitePrediction(step));
    }
    Ok(combined)
}

/// Weighted standard deviation of the model predictions at each step
///
/// All zeros when fewer than two weighted models contributed. Deviations are
/// scaled by their largest magnitude so large predictions do not overflow.
pub fn spread(contributions: &[ModelForecast], config: &EnsembleConfig) -> Vec<f64> {
    let active: Vec<(f64, &[f64])> = contributions
        .iter()
        .map(|c| (config.weight(c.model), c.predictions.as_slice()))
        .filter(|(w, _)| *w > 0.0)
        .collect();
    let len = contributions.first().map_or(0, |c| c.predictions.len());
    let total: f64 = active.iter().map(|(w, _)| w).sum();
    if active.len() < 2 || !total.is_finite() || total <= 0.0 {
        return vec![0.0; len];
    }

    (0..len)
        .map(|i| {
            let values: Vec<(f64, f64)> = active
                .iter()
                .filter_map(|(w, p)| p.get(i).map(|v| (*w / total, *v)))
                .collect();
            let mean: f64 = values.iter().map(|(w, v)| w * v).sum();
            let scale = values
                .iter()
                .fold(0.0f64, |m, (_, v)| m.max((v - mean).abs()));
            if scale == 0.0 {
                return 0.0;
            }
            let variance: f64 = values
                .iter()
                .map(|(w, v)| w * ((v - mean) / scale).powi(2))
                .sum();
            scale * variance.sqrt()
        })
        .collect()
}

/// Combine per-model results, falling back to the survivor on failure
///
/// Fails with the first model's error when no model succeeded.
pub fn resolve(
    results: Vec<(ModelKind, Result<Vec<f64>, ForecastError>)>,
    config: &EnsembleConfig,
) -> Result<EnsembleOutcome, ForecastError> {
    let mut succeeded = Vec::new();
    let mut failures = Vec::new();

    for (kind, result) in results {
        match result {
            Ok(predictions) => succeeded.push((kind, predictions)),
            Err(e) => {
                warn!(model = %kind, error = %e, "Model failed");
                failures.push((kind, e));
            }
        }
    }

    if succeeded.is_empty() {
        return Err(match failures.into_iter().next() {
            Some((_, e @ ForecastError::ModelUnavailable { .. })) => e,
            Some((kind, e)) => ForecastError::ModelUnavailable {
                model: kind,
                reason: e.to_string(),
            },
            None => ForecastError::InvalidWeights("no models were run".to_string()),
        });
    }

    let predictions = combine(&succeeded, config)?;
    let degraded = !failures.is_empty();
    if degraded {
        warn!(
            survivors = succeeded.len(),
            failed = failures.len(),
            "Falling back to surviving model"
        );
    }

    Ok(EnsembleOutcome {
        predictions,
        contributions: succeeded
            .into_iter()
            .map(|(model, predictions)| ModelForecast { model, predictions })
            .collect(),
        degraded,
        failures,
    })
}
