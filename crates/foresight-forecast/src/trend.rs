//! Trend Analyzer
//!
//! Compares the mean of the most recent values against the mean of the
//! first half of the series, then attaches rule-based insights and
//! recommendations.

use crate::config::TrendConfig;
use crate::error::ForecastError;
use foresight_domain::{Series, TrendAnalysis, TrendDirection};

/// Summarizes the recent direction of a series
#[derive(Debug, Clone, Default)]
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    /// Create an analyzer
    pub fn new(config: TrendConfig) -> Result<Self, ForecastError> {
        config.validate().map_err(ForecastError::Config)?;
        Ok(Self { config })
    }

    /// Analyze a series of at least two points
    pub fn analyze(&self, series: &Series) -> Result<TrendAnalysis, ForecastError> {
        let values = series.values();
        let n = values.len();
        if n < 2 {
            return Err(ForecastError::InsufficientHistory {
                required: 2,
                available: n,
            });
        }

        let recent_len = if n >= self.config.recent_window {
            self.config.recent_window
        } else {
            n.div_ceil(2)
        };
        let recent = mean(&values[n - recent_len..]);
        let earlier = mean(&values[..n / 2]);

        let change_percentage = if earlier == 0.0 {
            0.0
        } else {
            (recent - earlier) / earlier * 100.0
        };

        let band = self.config.stable_band_pct;
        let direction = if change_percentage > band {
            TrendDirection::Up
        } else if change_percentage < -band {
            TrendDirection::Down
        } else {
            TrendDirection::Stable
        };

        let overall = mean(&values);
        let volatility =
            (values.iter().map(|v| (v - overall).powi(2)).sum::<f64>() / n as f64).sqrt();

        Ok(TrendAnalysis {
            entity_id: series.entity_id().to_string(),
            direction,
            change_percentage,
            volatility,
            trend_strength: change_percentage.abs(),
            points: n,
            insights: self.insights(direction, change_percentage),
            recommendations: self.recommendations(direction, volatility),
            forecast: None,
        })
    }

    fn insights(&self, direction: TrendDirection, change_percentage: f64) -> Vec<String> {
        let threshold = self.config.insight_change_pct;
        let insight = match direction {
            TrendDirection::Up if change_percentage > threshold => {
                "Strong upward trend: consider scaling current strategies"
            }
            TrendDirection::Down if change_percentage < -threshold => {
                "Declining trend: corrective action is needed"
            }
            TrendDirection::Stable => "Stable series: a good basis for consistency planning",
            _ => return Vec::new(),
        };
        vec![insight.to_string()]
    }

    fn recommendations(&self, direction: TrendDirection, volatility: f64) -> Vec<String> {
        let mut recommendations = Vec::new();
        if volatility > self.config.volatility_threshold {
            recommendations.push("High volatility: consider smoothing strategies".to_string());
        }
        if direction == TrendDirection::Down {
            recommendations.push("Investigate the root causes of the decline".to_string());
            recommendations.push("Review current operational procedures".to_string());
        }
        recommendations
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
