//! Analytics Orchestrator
//!
//! The only component callers talk to. Each operation validates its request,
//! runs the relevant sub-engines under the request's time budget and wraps
//! the result in an [`Envelope`]. No scoring or modelling happens here.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::request::{BenchmarkRequest, ForecastRequest, RiskRequest, TrendRequest};
use crate::response::Envelope;
use chrono::{DateTime, Utc};
use foresight_domain::traits::{HistoricalDataSource, HolidayCalendar};
use foresight_domain::{
    FeatureVector, ForecastPoint, ForecastResult, ModelKind, RiskAssessment, Series,
    SupplierScore, TrendAnalysis,
};
use foresight_forecast::{
    resolve, spread, EnsembleConfig, EnsembleOutcome, FeatureBuilder, ForecastError,
    ModelParameterStore, ModelRegistry, ModelSnapshot, TrendAnalyzer, UncertaintyEstimator,
};
use foresight_risk::RiskScorer;
use foresight_supplier::SupplierBenchmarker;
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

const MODEL_KINDS: [ModelKind; 2] = [ModelKind::TreeEnsemble, ModelKind::Sequence];

/// Backtest residuals and the accuracy they imply
#[derive(Debug, Clone, Default)]
struct Backtest {
    residuals: Vec<f64>,
    accuracy: Option<f64>,
    /// Folds whose features or models failed
    skipped: usize,
}

/// Shared flag telling blocking work its request was abandoned
#[derive(Debug, Clone, Default)]
struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Raises its flag when dropped, e.g. when a timed-out request future is discarded
struct CancelOnDrop(CancelFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Entry point for forecasting, risk scoring, benchmarking and trends
pub struct AnalyticsEngine<D, C>
where
    D: HistoricalDataSource,
    C: HolidayCalendar,
{
    source: Arc<D>,
    features: Arc<FeatureBuilder<C>>,
    registry: Arc<ModelRegistry>,
    uncertainty: UncertaintyEstimator,
    risk: RiskScorer,
    benchmarker: SupplierBenchmarker,
    trend: TrendAnalyzer,
    config: EngineConfig,
}

impl<D, C> AnalyticsEngine<D, C>
where
    D: HistoricalDataSource + Send + Sync + 'static,
    C: HolidayCalendar + Send + Sync + 'static,
    D::Error: std::fmt::Display,
{
    /// Create an engine serving the built-in model parameters
    pub fn new(source: D, calendar: C, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            source: Arc::new(source),
            features: Arc::new(FeatureBuilder::new(config.features.clone(), calendar)?),
            registry: Arc::new(ModelRegistry::builtin()?),
            uncertainty: UncertaintyEstimator::new(config.uncertainty.clone())?,
            risk: RiskScorer::new(config.risk.clone())?,
            benchmarker: SupplierBenchmarker::new(config.benchmark.clone())?,
            trend: TrendAnalyzer::new(config.trend.clone())?,
            config,
        })
    }

    /// Serve models from a shared registry
    pub fn with_registry(mut self, registry: Arc<ModelRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Version of the model snapshot new requests will use
    pub fn model_version(&self) -> String {
        self.registry.current().version().to_string()
    }

    /// Forecast demand for one entity
    pub async fn forecast_demand(
        &self,
        request: ForecastRequest,
    ) -> Result<Envelope<ForecastResult>, EngineError> {
        let started = Instant::now();
        let request_id = Uuid::now_v7();
        let confidence = self.validate_forecast(&request)?;

        info!(
            %request_id,
            entity_id = %request.entity_id,
            horizon = request.horizon,
            "Forecast requested"
        );

        let result = self
            .with_budget(self.run_forecast(request, confidence))
            .await?;

        info!(
            %request_id,
            entity_id = %result.entity_id,
            degraded = result.degraded,
            low_confidence = result.low_confidence,
            "Forecast complete"
        );
        Ok(Envelope::new(request_id, started, result))
    }

    /// Score a set of risk factors
    pub async fn assess_risk(
        &self,
        request: RiskRequest,
    ) -> Result<Envelope<RiskAssessment>, EngineError> {
        let started = Instant::now();
        let request_id = Uuid::now_v7();
        debug!(%request_id, scope = %request.scope, "Risk assessment requested");

        let assessment = self
            .with_budget(async {
                Ok(self.risk.assess(
                    &request.scope,
                    request.risk_factors,
                    request.time_horizon_days,
                    Utc::now(),
                )?)
            })
            .await?;

        info!(
            %request_id,
            scope = %assessment.scope,
            level = %assessment.risk_level,
            "Risk assessed"
        );
        Ok(Envelope::new(request_id, started, assessment))
    }

    /// Benchmark suppliers against each other
    ///
    /// Metrics for suppliers not in `supplier_ids` are ignored; an empty id
    /// list benchmarks everyone in `metrics`.
    pub async fn benchmark_suppliers(
        &self,
        request: BenchmarkRequest,
    ) -> Result<Envelope<Vec<SupplierScore>>, EngineError> {
        let started = Instant::now();
        let request_id = Uuid::now_v7();

        let scores = self
            .with_budget(async {
                let metrics = if request.supplier_ids.is_empty() {
                    request.metrics
                } else {
                    let wanted: BTreeSet<&str> =
                        request.supplier_ids.iter().map(String::as_str).collect();
                    let reported: BTreeSet<&str> = request
                        .metrics
                        .iter()
                        .map(|m| m.supplier_id.as_str())
                        .collect();
                    if let Some(missing) = wanted.difference(&reported).next() {
                        return Err(EngineError::Validation(format!(
                            "no metrics supplied for supplier '{}'",
                            missing
                        )));
                    }
                    request
                        .metrics
                        .iter()
                        .filter(|m| wanted.contains(m.supplier_id.as_str()))
                        .cloned()
                        .collect()
                };
                Ok(self.benchmarker.benchmark(&metrics)?)
            })
            .await?;

        info!(%request_id, suppliers = scores.len(), "Suppliers benchmarked");
        Ok(Envelope::new(request_id, started, scores))
    }

    /// Summarize the recent trend of an entity's history
    ///
    /// With `include_forecasting` the analysis carries a forecast of
    /// `forecast_horizon` steps at the default confidence, produced under the
    /// same time budget.
    pub async fn analyze_trend(
        &self,
        request: TrendRequest,
    ) -> Result<Envelope<TrendAnalysis>, EngineError> {
        let started = Instant::now();
        let request_id = Uuid::now_v7();
        if request.entity_id.trim().is_empty() {
            return Err(EngineError::Validation("entity_id must not be empty".to_string()));
        }
        let forecast = if request.include_forecasting {
            let forecast = ForecastRequest::new(&request.entity_id, request.forecast_horizon);
            Some((self.validate_forecast(&forecast)?, forecast))
        } else {
            None
        };

        let analysis = self
            .with_budget(async {
                let series = self.load_series(&request.entity_id).await?;
                let mut analysis = self.trend.analyze(&series)?;
                if let Some((confidence, forecast)) = forecast {
                    analysis.forecast =
                        Some(self.forecast_series(series, forecast, confidence).await?);
                }
                Ok(analysis)
            })
            .await?;

        info!(
            %request_id,
            entity_id = %request.entity_id,
            direction = analysis.direction.as_str(),
            forecast = analysis.forecast.is_some(),
            "Trend analyzed"
        );
        Ok(Envelope::new(request_id, started, analysis))
    }

    /// Load new model parameters and publish them
    ///
    /// In-flight requests finish on the snapshot they started with. A failed
    /// load leaves the current snapshot in place.
    pub async fn reload_models<S: ModelParameterStore>(
        &self,
        store: &S,
    ) -> Result<String, EngineError> {
        Ok(self.registry.reload(store)?)
    }

    fn validate_forecast(&self, request: &ForecastRequest) -> Result<f64, EngineError> {
        if request.entity_id.trim().is_empty() {
            return Err(EngineError::Validation("entity_id must not be empty".to_string()));
        }
        if request.horizon == 0 || request.horizon > self.config.max_horizon {
            return Err(EngineError::Validation(format!(
                "horizon must be between 1 and {}, got {}",
                self.config.max_horizon, request.horizon
            )));
        }
        let confidence = request
            .confidence_level
            .unwrap_or(self.config.uncertainty.default_confidence);
        if !confidence.is_finite() || confidence <= 0.0 || confidence >= 1.0 {
            return Err(ForecastError::InvalidConfidenceLevel(confidence).into());
        }
        Ok(confidence)
    }

    async fn with_budget<T, F>(&self, work: F) -> Result<T, EngineError>
    where
        F: Future<Output = Result<T, EngineError>>,
    {
        let budget = self.config.request_timeout();
        match timeout(budget, work).await {
            Ok(result) => result,
            Err(_) => {
                warn!(budget_ms = self.config.request_timeout_ms, "Request timed out");
                Err(EngineError::Timeout(self.config.request_timeout_ms))
            }
        }
    }

    async fn load_series(&self, entity_id: &str) -> Result<Series, EngineError> {
        let source = Arc::clone(&self.source);
        let id = entity_id.to_string();
        let found = tokio::task::spawn_blocking(move || {
            source
                .get_series(&id)
                .map_err(|e| EngineError::Source(e.to_string()))
        })
        .await
        .map_err(|e| EngineError::Internal(format!("data source task failed: {}", e)))??;

        found.ok_or_else(|| EngineError::NotFound(entity_id.to_string()))
    }

    async fn run_forecast(
        &self,
        request: ForecastRequest,
        confidence: f64,
    ) -> Result<ForecastResult, EngineError> {
        let series = self.load_series(&request.entity_id).await?;
        self.forecast_series(series, request, confidence).await
    }

    async fn forecast_series(
        &self,
        series: Series,
        request: ForecastRequest,
        confidence: f64,
    ) -> Result<ForecastResult, EngineError> {
        let as_of = request
            .as_of
            .or_else(|| series.last().map(|p| p.timestamp))
            .unwrap_or_else(Utc::now);

        // pin the snapshot for the whole request
        let snapshot = self.registry.current();
        let cancel = CancelFlag::default();
        let _guard = CancelOnDrop(cancel.clone());
        let features = Arc::new(self.features.build(&series, as_of, request.horizon)?);
        let outcome = self.predict(&snapshot, Arc::clone(&features)).await?;
        let model_spread = spread(&outcome.contributions, &self.config.ensemble);

        let mut predictions = outcome.predictions;
        if self.config.clamp_non_negative {
            for p in predictions.iter_mut() {
                *p = p.max(0.0);
            }
        }

        let backtest = self
            .backtest(series, as_of, Arc::clone(&snapshot), cancel)
            .await?;

        let (bounds, low_confidence) = if request.include_uncertainty {
            let estimate = self.uncertainty.estimate_with_spread(
                &predictions,
                &model_spread,
                &backtest.residuals,
                confidence,
            )?;
            if estimate.low_confidence {
                warn!(
                    entity_id = %request.entity_id,
                    residuals = backtest.residuals.len(),
                    skipped = backtest.skipped,
                    "Too few residuals for calibration, using fixed band"
                );
            }
            let bounds: Vec<(Option<f64>, Option<f64>)> = estimate
                .intervals
                .into_iter()
                .map(|i| (Some(i.lower), Some(i.upper)))
                .collect();
            (bounds, estimate.low_confidence)
        } else {
            (vec![(None, None); predictions.len()], false)
        };

        let horizon_points: Vec<ForecastPoint> = features
            .iter()
            .zip(&predictions)
            .zip(bounds)
            .map(|((f, p), (lower_bound, upper_bound))| ForecastPoint {
                timestamp: f.timestamp,
                point_estimate: *p,
                lower_bound,
                upper_bound,
            })
            .collect();

        Ok(ForecastResult {
            entity_id: request.entity_id,
            total_forecasted_demand: predictions.iter().sum(),
            horizon_points,
            accuracy_score: backtest.accuracy,
            model_version: snapshot.version().to_string(),
            confidence_level: confidence,
            degraded: outcome.degraded,
            low_confidence,
            gap_filled: features.first().is_some_and(|f| f.gap_filled),
            model_forecasts: outcome.contributions,
        })
    }

    /// Run every weighted model concurrently on the blocking pool
    ///
    /// A single model prediction always runs to completion, even when the
    /// request times out while it is in flight.
    async fn predict(
        &self,
        snapshot: &Arc<ModelSnapshot>,
        features: Arc<Vec<FeatureVector>>,
    ) -> Result<EnsembleOutcome, EngineError> {
        let handles: Vec<_> = active_models(&self.config.ensemble)
            .map(|kind| {
                let snapshot = Arc::clone(snapshot);
                let features = Arc::clone(&features);
                let handle = tokio::task::spawn_blocking(move || {
                    snapshot.model(kind).predict(&features)
                });
                (kind, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (kind, handle) in handles {
            let result = handle.await.unwrap_or_else(|e| {
                Err(ForecastError::ModelUnavailable {
                    model: kind,
                    reason: format!("model task failed: {}", e),
                })
            });
            results.push((kind, result));
        }

        Ok(resolve(results, &self.config.ensemble)?)
    }

    /// One-step-ahead backtest over the tail of the history
    ///
    /// The loop stops between folds once `cancel` is raised. When every fold
    /// fails the forecast still stands, with no residuals to calibrate on.
    async fn backtest(
        &self,
        series: Series,
        as_of: DateTime<Utc>,
        snapshot: Arc<ModelSnapshot>,
        cancel: CancelFlag,
    ) -> Result<Backtest, EngineError> {
        if self.config.backtest_points == 0 {
            return Ok(Backtest::default());
        }
        let features = Arc::clone(&self.features);
        let ensemble = self.config.ensemble.clone();
        let points = self.config.backtest_points;
        let entity_id = series.entity_id().to_string();

        let result = tokio::task::spawn_blocking(move || {
            run_backtest(
                features.as_ref(),
                &snapshot,
                &ensemble,
                &series,
                as_of,
                points,
                &cancel,
            )
        })
        .await
        .map_err(|e| EngineError::Internal(format!("backtest task failed: {}", e)))?;

        Ok(result.unwrap_or_else(|e| {
            warn!(%entity_id, error = %e, "Backtest produced no residuals");
            Backtest::default()
        }))
    }
}

fn active_models(ensemble: &EnsembleConfig) -> impl Iterator<Item = ModelKind> + '_ {
    MODEL_KINDS
        .into_iter()
        .filter(move |kind| ensemble.weight(*kind) > 0.0)
}

/// Score one-step-ahead predictions over the last `points` origins
///
/// Folds that fail are counted and skipped. Fails with the last fold error
/// when folds were attempted and none succeeded.
fn run_backtest<C: HolidayCalendar>(
    features: &FeatureBuilder<C>,
    snapshot: &ModelSnapshot,
    ensemble: &EnsembleConfig,
    series: &Series,
    as_of: DateTime<Utc>,
    points: usize,
    cancel: &CancelFlag,
) -> Result<Backtest, ForecastError> {
    let history = series.history_until(as_of);
    let step = features.config().step();
    let first = history
        .len()
        .saturating_sub(points)
        .max(features.config().min_window);

    let mut residuals = Vec::new();
    let mut relative_errors = Vec::new();
    let mut skipped = 0;
    let mut last_error = None;

    for i in first..history.len() {
        if cancel.is_cancelled() {
            debug!(entity_id = %series.entity_id(), "Backtest abandoned");
            return Ok(Backtest::default());
        }
        let origin = history[i - 1].timestamp;
        let target = &history[i];
        // only score the point that directly follows its origin
        if origin.checked_add_signed(step) != Some(target.timestamp) {
            continue;
        }
        let predicted = features.build(series, origin, 1).and_then(|vectors| {
            let results = active_models(ensemble)
                .map(|kind| (kind, snapshot.model(kind).predict(&vectors)))
                .collect();
            resolve(results, ensemble)
        });
        let predicted = match predicted {
            Ok(outcome) => match outcome.predictions.first() {
                Some(p) => *p,
                None => continue,
            },
            Err(e) => {
                debug!(origin = %origin, error = %e, "Skipping backtest fold");
                skipped += 1;
                last_error = Some(e);
                continue;
            }
        };

        let residual = target.value - predicted;
        residuals.push(residual);
        if target.value != 0.0 {
            relative_errors.push((residual / target.value).abs());
        }
    }

    if skipped > 0 {
        warn!(
            entity_id = %series.entity_id(),
            skipped,
            scored = residuals.len(),
            "Backtest folds skipped"
        );
    }
    if residuals.is_empty() {
        if let Some(e) = last_error {
            return Err(e);
        }
    }

    let accuracy = if relative_errors.is_empty() {
        None
    } else {
        let mape = relative_errors.iter().sum::<f64>() / relative_errors.len() as f64;
        Some((1.0 - mape).clamp(0.0, 1.0))
    };

    debug!(
        entity_id = %series.entity_id(),
        residuals = residuals.len(),
        accuracy = ?accuracy,
        "Backtest complete"
    );
    Ok(Backtest {
        residuals,
        accuracy,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use foresight_domain::traits::NoHolidays;
    use foresight_domain::TimeSeriesPoint;
    use foresight_forecast::FeatureConfig;

    fn weekly(entity: &str, days: usize) -> Series {
        let start = Utc.with_ymd_and_hms(2025, 2, 3, 0, 0, 0).unwrap();
        let pattern = [40.0, 42.0, 38.0, 45.0, 60.0, 75.0, 70.0];
        let points = (0..days)
            .map(|i| TimeSeriesPoint::new(entity, start + Duration::days(i as i64), pattern[i % 7]))
            .collect();
        Series::new(entity, points).unwrap()
    }

    #[test]
    fn test_backtest_on_exact_pattern() {
        let series = weekly("SKU", 60);
        let builder = FeatureBuilder::new(FeatureConfig::default(), NoHolidays).unwrap();
        let snapshot = ModelSnapshot::builtin().unwrap();
        let as_of = series.last().unwrap().timestamp;

        let backtest = run_backtest(
            &builder,
            &snapshot,
            &EnsembleConfig::new(0.0, 1.0),
            &series,
            as_of,
            14,
            &CancelFlag::default(),
        )
        .unwrap();

        // the seasonal autoregression reproduces a pure weekly cycle
        assert_eq!(backtest.residuals.len(), 14);
        assert!(backtest.residuals.iter().all(|r| r.abs() < 1e-9));
        assert!((backtest.accuracy.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_backtest_respects_min_window() {
        let series = weekly("SKU", 16);
        let builder = FeatureBuilder::new(FeatureConfig::default(), NoHolidays).unwrap();
        let snapshot = ModelSnapshot::builtin().unwrap();
        let as_of = series.last().unwrap().timestamp;

        let backtest = run_backtest(
            &builder,
            &snapshot,
            &EnsembleConfig::default(),
            &series,
            as_of,
            14,
            &CancelFlag::default(),
        )
        .unwrap();
        // origins need 14 points of history: only indices 14 and 15 qualify
        assert_eq!(backtest.residuals.len(), 2);
        assert_eq!(backtest.skipped, 0);
    }

    #[test]
    fn test_backtest_counts_failed_folds() {
        let series = weekly("SKU", 30);
        let builder = FeatureBuilder::new(FeatureConfig::default(), NoHolidays).unwrap();
        let snapshot = ModelSnapshot::builtin().unwrap();
        let as_of = series.last().unwrap().timestamp;

        let backtest = run_backtest(
            &builder,
            &snapshot,
            &EnsembleConfig::new(0.0, 1.0),
            &series,
            as_of,
            14,
            &CancelFlag::default(),
        )
        .unwrap();
        // the sequence model needs 28 points of history: folds 16..=27 fail
        assert_eq!(backtest.residuals.len(), 2);
        assert_eq!(backtest.skipped, 12);
    }

    #[test]
    fn test_backtest_fails_when_no_fold_succeeds() {
        let series = weekly("SKU", 27);
        let builder = FeatureBuilder::new(FeatureConfig::default(), NoHolidays).unwrap();
        let snapshot = ModelSnapshot::builtin().unwrap();
        let as_of = series.last().unwrap().timestamp;

        let err = run_backtest(
            &builder,
            &snapshot,
            &EnsembleConfig::new(0.0, 1.0),
            &series,
            as_of,
            14,
            &CancelFlag::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ForecastError::ModelUnavailable {
                model: ModelKind::Sequence,
                ..
            }
        ));
    }

    #[test]
    fn test_cancelled_backtest_stops() {
        let series = weekly("SKU", 60);
        let builder = FeatureBuilder::new(FeatureConfig::default(), NoHolidays).unwrap();
        let snapshot = ModelSnapshot::builtin().unwrap();
        let as_of = series.last().unwrap().timestamp;
        let cancel = CancelFlag::default();
        drop(CancelOnDrop(cancel.clone()));
        assert!(cancel.is_cancelled());

        let backtest = run_backtest(
            &builder,
            &snapshot,
            &EnsembleConfig::default(),
            &series,
            as_of,
            14,
            &cancel,
        )
        .unwrap();
        assert!(backtest.residuals.is_empty());
        assert_eq!(backtest.accuracy, None);
    }

    #[test]
    fn test_active_models_skip_zero_weight() {
        let kinds: Vec<_> = active_models(&EnsembleConfig::new(1.0, 0.0)).collect();
        assert_eq!(kinds, vec![ModelKind::TreeEnsemble]);
        let kinds: Vec<_> = active_models(&EnsembleConfig::default()).collect();
        assert_eq!(kinds.len(), 2);
    }
}
