//! Uncertainty Estimator
//!
//! Prediction intervals come from backtest residuals when there are enough
//! of them, otherwise from a fixed percentage band. Disagreement between the
//! ensemble members widens the band further. Either way the half-width at
//! step `k` (0-based) is multiplied by `growth_factor^k`, so widths never
//! shrink with horizon distance.

use crate::config::UncertaintyConfig;
use crate::error::ForecastError;
use foresight_domain::PredictionInterval;
use tracing::debug;

/// Intervals for one forecast
#[derive(Debug, Clone, PartialEq)]
pub struct UncertaintyEstimate {
    /// One interval per point estimate
    pub intervals: Vec<PredictionInterval>,
    /// Residual calibration was not possible; the fixed band was used
    pub low_confidence: bool,
}

/// Derives prediction intervals around point estimates
#[derive(Debug, Clone)]
pub struct UncertaintyEstimator {
    config: UncertaintyConfig,
}

impl UncertaintyEstimator {
    /// Create an estimator
    pub fn new(config: UncertaintyConfig) -> Result<Self, ForecastError> {
        config.validate().map_err(ForecastError::Config)?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &UncertaintyConfig {
        &self.config
    }

    /// Compute bounds at `confidence` for each point estimate
    pub fn estimate(
        &self,
        points: &[f64],
        residuals: &[f64],
        confidence: f64,
    ) -> Result<UncertaintyEstimate, ForecastError> {
        self.estimate_with_spread(points, &[], residuals, confidence)
    }

    /// Compute bounds that also cover disagreement between models
    ///
    /// `spread[k]` is the weighted standard deviation of the individual
    /// model predictions at step `k`; missing entries count as zero. The
    /// model term is combined with the residual (or fallback) term in
    /// quadrature. Fails with `NonFinitePrediction` when a bound would not
    /// be finite.
    pub fn estimate_with_spread(
        &self,
        points: &[f64],
        spread: &[f64],
        residuals: &[f64],
        confidence: f64,
    ) -> Result<UncertaintyEstimate, ForecastError> {
        if !confidence.is_finite() || confidence <= 0.0 || confidence >= 1.0 {
            return Err(ForecastError::InvalidConfidenceLevel(confidence));
        }
        if let Some(step) = points.iter().position(|p| !p.is_finite()) {
            return Err(ForecastError::NonFinitePrediction(step));
        }
        if let Some(step) = spread.iter().position(|s| !s.is_finite() || *s < 0.0) {
            return Err(ForecastError::NonFinitePrediction(step));
        }

        let z = z_score(confidence);
        let usable: Vec<f64> = residuals.iter().copied().filter(|r| r.is_finite()).collect();
        let low_confidence = usable.len() < self.config.min_residuals;

        let base_half_width = if low_confidence {
            let anchor = if points.is_empty() {
                0.0
            } else {
                let n = points.len() as f64;
                points.iter().map(|p| p.abs() / n).sum::<f64>()
            };
            debug!(
                residuals = usable.len(),
                required = self.config.min_residuals,
                "Using fixed band for prediction intervals"
            );
            self.config.fallback_band * anchor
        } else {
            z * root_mean_square(&usable)
        };

        let mut growth = 1.0;
        let mut model_spread: f64 = 0.0;
        let mut intervals = Vec::with_capacity(points.len());
        for (step, &p) in points.iter().enumerate() {
            // running max keeps widths monotone when models re-converge
            model_spread = model_spread.max(spread.get(step).copied().unwrap_or(0.0));
            let half_width = base_half_width.hypot(z * model_spread) * growth;
            let interval = PredictionInterval::try_around(p, half_width)
                .ok_or(ForecastError::NonFinitePrediction(step))?;
            intervals.push(interval);
            growth *= self.config.growth_factor;
        }

        Ok(UncertaintyEstimate {
            intervals,
            low_confidence,
        })
    }
}

/// RMS of finite values, scaled by the largest magnitude so squares stay finite
fn root_mean_square(values: &[f64]) -> f64 {
    let scale = values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if scale == 0.0 {
        return 0.0;
    }
    let n = values.len() as f64;
    scale * values.iter().map(|v| (v / scale).powi(2) / n).sum::<f64>().sqrt()
}

/// Two-sided critical value: the `(1 + confidence) / 2` normal quantile
pub fn z_score(confidence: f64) -> f64 {
    inverse_normal_cdf((1.0 + confidence) / 2.0)
}

/// Standard normal quantile function
///
/// Acklam's rational approximation (relative error below 1.15e-9).
/// `p` must lie in (0, 1).
pub fn inverse_normal_cdf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.024_25;
    const P_HIGH: f64 = 1.0 - P_LOW;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> UncertaintyEstimator {
        UncertaintyEstimator::new(UncertaintyConfig::default()).unwrap()
    }

    #[test]
    fn test_z_scores() {
        assert!((z_score(0.95) - 1.959_964).abs() < 1e-5);
        assert!((z_score(0.80) - 1.281_552).abs() < 1e-5);
        assert!((z_score(0.99) - 2.575_829).abs() < 1e-5);
        assert!(inverse_normal_cdf(0.5).abs() < 1e-12);
    }

    #[test]
    fn test_residual_mode() {
        let residuals = vec![2.0, -2.0, 2.0, -2.0, 2.0, -2.0, 2.0, -2.0, 2.0, -2.0];
        let estimate = estimator().estimate(&[100.0, 100.0], &residuals, 0.95).unwrap();

        assert!(!estimate.low_confidence);
        let first = estimate.intervals[0];
        assert!((first.width() / 2.0 - 1.959_964 * 2.0).abs() < 1e-4);
        assert!((first.midpoint() - 100.0).abs() < 1e-12);
        let second = estimate.intervals[1];
        assert!((second.width() - first.width() * 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_band_when_few_residuals() {
        let estimate = estimator().estimate(&[80.0, 120.0], &[1.0, -1.0], 0.95).unwrap();

        assert!(estimate.low_confidence);
        // 25% of the mean absolute estimate (100)
        assert!((estimate.intervals[0].upper - 105.0).abs() < 1e-9);
        assert!((estimate.intervals[0].lower - 55.0).abs() < 1e-9);
        assert!((estimate.intervals[1].width() - 52.5).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_residuals_ignored() {
        let mut residuals = vec![1.0; 9];
        residuals.push(f64::NAN);
        let estimate = estimator().estimate(&[10.0], &residuals, 0.9).unwrap();
        assert!(estimate.low_confidence);
    }

    #[test]
    fn test_invalid_confidence() {
        for c in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let err = estimator().estimate(&[1.0], &[], c).unwrap_err();
            assert!(matches!(err, ForecastError::InvalidConfidenceLevel(_)));
        }
    }

    #[test]
    fn test_huge_residuals_stay_finite() {
        let residuals = vec![1e200; 10];
        let estimate = estimator().estimate(&[1e200], &residuals, 0.95).unwrap();

        let interval = estimate.intervals[0];
        assert!(interval.lower.is_finite() && interval.upper.is_finite());
        assert!((interval.width() / 2.0 / 1e200 - 1.959_964).abs() < 1e-5);
    }

    #[test]
    fn test_overflowing_bound_is_an_error() {
        let err = estimator().estimate(&[1.7e308, 1.7e308], &[], 0.95).unwrap_err();
        assert_eq!(err, ForecastError::NonFinitePrediction(0));
    }

    #[test]
    fn test_model_spread_widens_intervals() {
        let residuals = vec![2.0, -2.0, 2.0, -2.0, 2.0, -2.0, 2.0, -2.0, 2.0, -2.0];
        let agreeing = estimator()
            .estimate_with_spread(&[100.0, 100.0], &[0.0, 0.0], &residuals, 0.95)
            .unwrap();
        let disagreeing = estimator()
            .estimate_with_spread(&[100.0, 100.0], &[1.5, 1.5], &residuals, 0.95)
            .unwrap();

        // half-width = z * sqrt(2^2 + 1.5^2) = z * 2.5
        assert!((disagreeing.intervals[0].width() / 2.0 - 1.959_964 * 2.5).abs() < 1e-4);
        assert!(disagreeing.intervals[0].width() > agreeing.intervals[0].width());
        assert_eq!(agreeing, estimator().estimate(&[100.0, 100.0], &residuals, 0.95).unwrap());
    }

    #[test]
    fn test_spread_is_carried_forward() {
        let estimate = estimator()
            .estimate_with_spread(&[50.0, 50.0, 50.0], &[4.0, 0.0, 1.0], &[0.0; 10], 0.95)
            .unwrap();
        let widths: Vec<f64> = estimate.intervals.iter().map(|i| i.width()).collect();
        assert!((widths[1] - widths[0] * 1.05).abs() < 1e-9);
        assert!((widths[2] - widths[1] * 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_negative_spread_rejected() {
        let err = estimator()
            .estimate_with_spread(&[1.0, 2.0], &[0.5, -1.0], &[], 0.95)
            .unwrap_err();
        assert_eq!(err, ForecastError::NonFinitePrediction(1));
    }

    #[test]
    fn test_higher_confidence_is_wider() {
        let residuals: Vec<f64> = (0..20).map(|i| (i as f64 - 10.0) / 3.0).collect();
        let narrow = estimator().estimate(&[50.0], &residuals, 0.8).unwrap();
        let wide = estimator().estimate(&[50.0], &residuals, 0.99).unwrap();
        assert!(wide.intervals[0].width() > narrow.intervals[0].width());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Interval widths never decrease with horizon distance
        #[test]
        fn test_widths_non_decreasing(
            points in prop::collection::vec(-1e4f64..1e4, 1..50),
            residuals in prop::collection::vec(-100.0f64..100.0, 0..40),
            confidence in 0.01f64..0.999,
            spread in prop::collection::vec(0.0f64..500.0, 0..50),
            growth in 1.0f64..1.5,
        ) {
            let config = UncertaintyConfig { growth_factor: growth, ..UncertaintyConfig::default() };
            let estimator = UncertaintyEstimator::new(config).unwrap();
            let estimate = estimator
                .estimate_with_spread(&points, &spread, &residuals, confidence)
                .unwrap();

            prop_assert_eq!(estimate.intervals.len(), points.len());
            for pair in estimate.intervals.windows(2) {
                prop_assert!(pair[1].width() >= pair[0].width() - 1e-9 * pair[0].width().abs().max(1.0));
            }
        }
    }
}
