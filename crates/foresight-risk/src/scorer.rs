//! Risk Scorer
//!
//! Pure computation: validated factors in, composite score and level out.
//! Factors are summed in name order so the result does not depend on the
//! order the caller listed them in.

use crate::config::RiskConfig;
use crate::error::RiskError;
use chrono::{DateTime, Duration, Utc};
use foresight_domain::{RiskAssessment, RiskContribution, RiskFactor, RiskLevel};
use std::collections::HashSet;
use tracing::debug;

/// Composite score of a factor set
#[derive(Debug, Clone, PartialEq)]
pub struct RiskScore {
    /// Weighted sum of normalized scores, in [0, 100]
    pub composite_score: f64,
    /// Banded level
    pub risk_level: RiskLevel,
    /// Factors with the largest weighted contribution, largest first
    pub top_risks: Vec<RiskContribution>,
}

/// Combines normalized risk factors into a composite
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: RiskConfig,
}

impl RiskScorer {
    /// Create a scorer
    pub fn new(config: RiskConfig) -> Result<Self, RiskError> {
        config.validate().map_err(RiskError::Config)?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Score a factor set
    ///
    /// # Examples
    ///
    /// ```
    /// use foresight_domain::{RiskFactor, RiskLevel};
    /// use foresight_risk::RiskScorer;
    ///
    /// let factors = vec![
    ///     RiskFactor::new("geopolitical", 80.0, 0.4),
    ///     RiskFactor::new("financial", 20.0, 0.3),
    ///     RiskFactor::new("operational", 50.0, 0.3),
    /// ];
    /// let score = RiskScorer::default().score(&factors).unwrap();
    /// assert!((score.composite_score - 53.0).abs() < 1e-9);
    /// assert_eq!(score.risk_level, RiskLevel::High);
    /// ```
    pub fn score(&self, factors: &[RiskFactor]) -> Result<RiskScore, RiskError> {
        self.validate_factors(factors)?;

        let mut ordered: Vec<&RiskFactor> = factors.iter().collect();
        ordered.sort_by(|a, b| a.name.cmp(&b.name));

        let composite_score = ordered
            .iter()
            .map(|f| f.contribution())
            .sum::<f64>()
            .clamp(0.0, 100.0);
        let risk_level = self.config.band(composite_score);

        let mut contributions: Vec<RiskContribution> = ordered
            .iter()
            .map(|f| RiskContribution {
                name: f.name.clone(),
                normalized_score: f.normalized_score,
                contribution: f.contribution(),
            })
            .collect();
        contributions.sort_by(|a, b| {
            b.contribution
                .total_cmp(&a.contribution)
                .then_with(|| a.name.cmp(&b.name))
        });
        contributions.truncate(self.config.top_risks);

        Ok(RiskScore {
            composite_score,
            risk_level,
            top_risks: contributions,
        })
    }

    /// Produce a full assessment for `scope`, valid for `time_horizon_days`
    pub fn assess(
        &self,
        scope: &str,
        factors: Vec<RiskFactor>,
        time_horizon_days: u32,
        assessed_at: DateTime<Utc>,
    ) -> Result<RiskAssessment, RiskError> {
        if scope.trim().is_empty() {
            return Err(RiskError::EmptyScope);
        }
        if time_horizon_days == 0 || time_horizon_days > self.config.max_horizon_days {
            return Err(RiskError::InvalidTimeHorizon {
                days: time_horizon_days,
                max: self.config.max_horizon_days,
            });
        }

        let expires_at = assessed_at
            .checked_add_signed(Duration::days(i64::from(time_horizon_days)))
            .ok_or(RiskError::InvalidTimeHorizon {
                days: time_horizon_days,
                max: self.config.max_horizon_days,
            })?;

        let score = self.score(&factors)?;
        debug!(
            scope,
            factors = factors.len(),
            composite = score.composite_score,
            level = %score.risk_level,
            "Scored risk factors"
        );

        Ok(RiskAssessment {
            scope: scope.to_string(),
            factors,
            composite_score: score.composite_score,
            risk_level: score.risk_level,
            top_risks: score.top_risks,
            time_horizon_days,
            assessed_at,
            expires_at,
        })
    }

    fn validate_factors(&self, factors: &[RiskFactor]) -> Result<(), RiskError> {
        if factors.is_empty() {
            return Err(RiskError::NoRiskFactors);
        }

        let mut seen = HashSet::with_capacity(factors.len());
        for factor in factors {
            if factor.name.trim().is_empty() {
                return Err(RiskError::EmptyFactorName);
            }
            if !seen.insert(factor.name.as_str()) {
                return Err(RiskError::DuplicateFactor(factor.name.clone()));
            }
            if !factor.normalized_score.is_finite()
                || !(0.0..=100.0).contains(&factor.normalized_score)
            {
                return Err(RiskError::FactorOutOfRange {
                    name: factor.name.clone(),
                    score: factor.normalized_score,
                });
            }
            if !factor.weight.is_finite() || factor.weight < 0.0 {
                return Err(RiskError::InvalidWeighting(format!(
                    "weight of '{}' must be finite and non-negative, got {}",
                    factor.name, factor.weight
                )));
            }
        }

        let mut weights: Vec<(&str, f64)> =
            factors.iter().map(|f| (f.name.as_str(), f.weight)).collect();
        weights.sort_by(|a, b| a.0.cmp(b.0));
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if (total - 1.0).abs() > self.config.weight_tolerance {
            return Err(RiskError::InvalidWeighting(format!(
                "weights sum to {}, expected 1.0",
                total
            )));
        }
        Ok(())
    }
}
