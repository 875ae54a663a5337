//! Feature Builder
//!
//! Turns a validated [`Series`] into one [`FeatureVector`] per future
//! timestamp. Feature order is fixed for a given [`FeatureConfig`]:
//!
//! 1. calendar: `day_of_week`, `day_of_month`, `month`, `is_holiday`
//! 2. lags: `lag_{k}` for each configured lag
//! 3. rolling statistics: `rolling_mean_{w}`, `rolling_std_{w}` per window
//! 4. attributes: `attr_{name}` (numeric), then `cat_{name}` (categorical)
//!
//! Gaps of up to `max_gap_steps` missing steps are forward-filled and
//! flagged; anything larger, or spacing that is not a whole number of
//! steps, is rejected.

use crate::config::FeatureConfig;
use crate::error::ForecastError;
use chrono::{DateTime, Datelike, Utc};
use foresight_domain::traits::HolidayCalendar;
use foresight_domain::{FeatureVector, Series, TimeSeriesPoint};
use std::sync::Arc;
use tracing::debug;

/// Builds model-ready feature vectors from raw history
pub struct FeatureBuilder<C: HolidayCalendar> {
    config: FeatureConfig,
    calendar: C,
    names: Arc<[String]>,
}

/// History after gap filling
struct FilledHistory {
    values: Vec<f64>,
    gap_filled: bool,
}

impl<C: HolidayCalendar> FeatureBuilder<C> {
    /// Create a builder
    pub fn new(config: FeatureConfig, calendar: C) -> Result<Self, ForecastError> {
        config.validate().map_err(ForecastError::Config)?;
        let names = feature_names(&config).into();
        Ok(Self {
            config,
            calendar,
            names,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Feature names in vector order
    pub fn feature_names(&self) -> &[String] {
        &self.names
    }

    /// Build one feature vector per future step
    ///
    /// History is every point at or before `as_of`. Returned vectors are
    /// strictly ordered by timestamp, `last + k * step` for `k = 1..=horizon`.
    pub fn build(
        &self,
        series: &Series,
        as_of: DateTime<Utc>,
        horizon: usize,
    ) -> Result<Vec<FeatureVector>, ForecastError> {
        if horizon == 0 {
            return Err(ForecastError::InvalidHorizon(horizon));
        }

        let history = series.history_until(as_of);
        if history.len() < self.config.min_window {
            return Err(ForecastError::InsufficientHistory {
                required: self.config.min_window,
                available: history.len(),
            });
        }
        // min_window > 0, so history is non-empty here
        let latest = &history[history.len() - 1];
        self.check_freshness(latest.timestamp, as_of)?;

        let filled = self.fill_gaps(history)?;
        let mean = history.iter().map(|p| p.value).sum::<f64>() / history.len() as f64;
        let rolling = self.rolling_features(&filled.values);
        let attributes = self.attribute_features(latest);
        let shared_history: Arc<[f64]> = filled.values.clone().into();

        let step = self.config.step();
        let n = filled.values.len();
        let mut vectors = Vec::with_capacity(horizon);

        for k in 1..=horizon {
            let timestamp = i32::try_from(k)
                .ok()
                .and_then(|k| step.checked_mul(k))
                .and_then(|offset| latest.timestamp.checked_add_signed(offset))
                .ok_or(ForecastError::InvalidHorizon(horizon))?;
            let mut values = Vec::with_capacity(self.names.len());
            let mut imputed = Vec::new();

            values.push(timestamp.weekday().num_days_from_monday() as f64);
            values.push(timestamp.day() as f64);
            values.push(timestamp.month() as f64);
            values.push(if self.calendar.is_holiday(timestamp.date_naive()) {
                1.0
            } else {
                0.0
            });

            // target sits at index n - 1 + k of the filled history
            for &lag in &self.config.lags {
                if lag >= k && lag - k < n {
                    values.push(filled.values[n - 1 - (lag - k)]);
                } else {
                    values.push(mean);
                    imputed.push(format!("lag_{}", lag));
                }
            }

            values.extend_from_slice(&rolling);
            values.extend_from_slice(&attributes);

            vectors.push(FeatureVector {
                timestamp,
                step_ahead: k,
                names: Arc::clone(&self.names),
                values,
                history: Arc::clone(&shared_history),
                gap_filled: filled.gap_filled,
                imputed,
            });
        }

        debug!(
            entity_id = %series.entity_id(),
            history = history.len(),
            horizon,
            gap_filled = filled.gap_filled,
            "Built feature vectors"
        );

        Ok(vectors)
    }

    fn check_freshness(
        &self,
        last: DateTime<Utc>,
        as_of: DateTime<Utc>,
    ) -> Result<(), ForecastError> {
        let elapsed = (as_of - last).num_seconds();
        if elapsed / self.config.step_secs > i64::from(self.config.max_gap_steps) {
            return Err(ForecastError::StaleHistory { last, as_of });
        }
        Ok(())
    }

    fn fill_gaps(&self, history: &[TimeSeriesPoint]) -> Result<FilledHistory, ForecastError> {
        let step = self.config.step_secs;
        let mut values = Vec::with_capacity(history.len());
        let mut gap_filled = false;

        for (i, point) in history.iter().enumerate() {
            if i > 0 {
                let previous = &history[i - 1];
                let elapsed = (point.timestamp - previous.timestamp).num_seconds();
                if elapsed % step != 0 {
                    return Err(ForecastError::IrregularSpacing {
                        at: point.timestamp,
                        step_secs: step,
                    });
                }
                let missing = elapsed / step - 1;
                if missing > i64::from(self.config.max_gap_steps) {
                    return Err(ForecastError::DataGap {
                        after: previous.timestamp,
                        missing_steps: missing,
                        tolerance: self.config.max_gap_steps,
                    });
                }
                for _ in 0..missing {
                    values.push(previous.value);
                }
                gap_filled |= missing > 0;
            }
            values.push(point.value);
        }

        Ok(FilledHistory { values, gap_filled })
    }

    fn rolling_features(&self, values: &[f64]) -> Vec<f64> {
        let mut features = Vec::with_capacity(self.config.rolling_windows.len() * 2);
        for &window in &self.config.rolling_windows {
            let tail = &values[values.len().saturating_sub(window)..];
            let (mean, std) = mean_and_std(tail);
            features.push(mean);
            features.push(std);
        }
        features
    }

    fn attribute_features(&self, latest: &TimeSeriesPoint) -> Vec<f64> {
        let numeric = self.config.numeric_attributes.iter().map(|name| {
            latest
                .attributes
                .get(name)
                .and_then(|v| v.as_number())
                .unwrap_or(0.0)
        });
        let categorical = self.config.categorical_attributes.iter().map(|name| {
            latest
                .attributes
                .get(name)
                .and_then(|v| v.as_text())
                .map(encode_category)
                .unwrap_or(0.0)
        });
        numeric.chain(categorical).collect()
    }
}

fn feature_names(config: &FeatureConfig) -> Vec<String> {
    let mut names: Vec<String> = ["day_of_week", "day_of_month", "month", "is_holiday"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    names.extend(config.lags.iter().map(|k| format!("lag_{}", k)));
    for w in &config.rolling_windows {
        names.push(format!("rolling_mean_{}", w));
        names.push(format!("rolling_std_{}", w));
    }
    names.extend(config.numeric_attributes.iter().map(|a| format!("attr_{}", a)));
    names.extend(config.categorical_attributes.iter().map(|a| format!("cat_{}", a)));
    names
}

/// Mean and sample standard deviation (0 for fewer than two values)
fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance.sqrt())
}

/// Stable encoding of a category label into [0, 1)
///
/// 32-bit FNV-1a, scaled by 2^32.
pub fn encode_category(label: &str) -> f64 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    let hash = label.bytes().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(PRIME)
    });
    f64::from(hash) / 4_294_967_296.0
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use foresight_domain::traits::NoHolidays;
    use proptest::prelude::*;

    proptest! {
        /// Any regular series of at least the minimum window yields exactly
        /// `horizon` vectors in strictly increasing timestamp order
        #[test]
        fn test_build_count_and_order(
            values in prop::collection::vec(0.0f64..1_000.0, 14..60),
            horizon in 1usize..40,
        ) {
            let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
            let points = values
                .iter()
                .enumerate()
                .map(|(i, v)| TimeSeriesPoint::new("E", start + Duration::days(i as i64), *v))
                .collect();
            let series = Series::new("E", points).unwrap();
            let as_of = start + Duration::days(values.len() as i64 - 1);

            let builder = FeatureBuilder::new(FeatureConfig::default(), NoHolidays).unwrap();
            let vectors = builder.build(&series, as_of, horizon).unwrap();

            prop_assert_eq!(vectors.len(), horizon);
            for pair in vectors.windows(2) {
                prop_assert!(pair[0].timestamp < pair[1].timestamp);
            }
        }
    }
}
