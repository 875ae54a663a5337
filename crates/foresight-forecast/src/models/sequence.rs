//! Autoregressive sequence model
//!
//! Works on the raw trailing window carried in the feature metadata rather
//! than on the engineered features. The window is divided by its mean so the
//! coefficients transfer across entities of different volume, and each
//! prediction is fed back into the window for the next step.

use super::ForecastModel;
use crate::error::ForecastError;
use foresight_domain::{FeatureVector, ModelKind};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Serialized parameters of the sequence model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceParams {
    /// Trailing window length, in points
    pub window: usize,
    /// `coefficients[i]` multiplies the value `i + 1` steps back
    pub coefficients: Vec<f64>,
    /// Constant term, in normalized units
    #[serde(default)]
    pub intercept: f64,
}

impl SequenceParams {
    /// Validate the parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.window == 0 {
            return Err("window must be greater than 0".to_string());
        }
        if self.coefficients.len() != self.window {
            return Err(format!(
                "expected {} coefficients, found {}",
                self.window,
                self.coefficients.len()
            ));
        }
        if self.coefficients.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err("coefficients must be finite".to_string());
        }
        Ok(())
    }
}

impl Default for SequenceParams {
    /// Four-week seasonal autoregression
    fn default() -> Self {
        let mut coefficients = vec![0.0; 28];
        coefficients[6] = 0.4;
        coefficients[13] = 0.3;
        coefficients[20] = 0.2;
        coefficients[27] = 0.1;
        Self {
            window: 28,
            coefficients,
            intercept: 0.0,
        }
    }
}

/// Sequence model
#[derive(Debug, Clone)]
pub struct SequenceModel {
    params: SequenceParams,
}

impl SequenceModel {
    /// Create a model from validated parameters
    pub fn new(params: SequenceParams) -> Result<Self, ForecastError> {
        params.validate().map_err(ForecastError::InvalidParameters)?;
        Ok(Self { params })
    }

    /// Get the parameters
    pub fn params(&self) -> &SequenceParams {
        &self.params
    }
}

impl ForecastModel for SequenceModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Sequence
    }

    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>, ForecastError> {
        let Some(first) = features.first() else {
            return Ok(Vec::new());
        };
        let history = &first.history;
        let window = self.params.window;
        if history.len() < window {
            return Err(ForecastError::ModelUnavailable {
                model: ModelKind::Sequence,
                reason: format!(
                    "needs {} history points, found {}",
                    window,
                    history.len()
                ),
            });
        }

        let tail = &history[history.len() - window..];
        let mean = tail.iter().sum::<f64>() / window as f64;
        let scale = if mean.abs() > f64::EPSILON { mean } else { 1.0 };

        let mut buffer: VecDeque<f64> = tail.iter().map(|v| v / scale).collect();
        let mut predictions = Vec::with_capacity(features.len());

        for _ in features {
            let next = self.params.intercept
                + self
                    .params
                    .coefficients
                    .iter()
                    .zip(buffer.iter().rev())
                    .map(|(c, v)| c * v)
                    .sum::<f64>();
            buffer.pop_front();
            buffer.push_back(next);
            predictions.push(next * scale);
        }

        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    fn vectors(history: Vec<f64>, horizon: usize) -> Vec<FeatureVector> {
        let history: Arc<[f64]> = history.into();
        (1..=horizon)
            .map(|k| FeatureVector {
                timestamp: Utc::now(),
                step_ahead: k,
                names: Arc::from(Vec::new()),
                values: Vec::new(),
                history: Arc::clone(&history),
                gap_filled: false,
                imputed: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_constant_history_stays_constant() {
        let model = SequenceModel::new(SequenceParams::default()).unwrap();
        let y = model.predict(&vectors(vec![50.0; 40], 10)).unwrap();
        assert_eq!(y.len(), 10);
        for v in y {
            assert!((v - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_repeats_weekly_pattern() {
        let week = [10.0, 12.0, 14.0, 16.0, 18.0, 30.0, 30.0];
        let history: Vec<f64> = week.iter().cycle().take(35).copied().collect();
        let model = SequenceModel::new(SequenceParams::default()).unwrap();

        let y = model.predict(&vectors(history, 7)).unwrap();
        for (predicted, expected) in y.iter().zip(week.iter()) {
            assert!((predicted - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_short_history_is_unavailable() {
        let model = SequenceModel::new(SequenceParams::default()).unwrap();
        let err = model.predict(&vectors(vec![1.0; 20], 3)).unwrap_err();
        assert!(matches!(err, ForecastError::ModelUnavailable { model: ModelKind::Sequence, .. }));
    }

    #[test]
    fn test_zero_history_does_not_divide_by_zero() {
        let model = SequenceModel::new(SequenceParams::default()).unwrap();
        let y = model.predict(&vectors(vec![0.0; 28], 3)).unwrap();
        assert_eq!(y, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_coefficient_count_must_match_window() {
        let params = SequenceParams {
            window: 7,
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        assert!(SequenceModel::new(params).is_err());
    }

    #[test]
    fn test_empty_features() {
        let model = SequenceModel::new(SequenceParams::default()).unwrap();
        assert!(model.predict(&[]).unwrap().is_empty());
    }
}
