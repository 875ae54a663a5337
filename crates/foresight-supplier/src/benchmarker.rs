//! Supplier Benchmarker
//!
//! Each dimension is min-max normalized across the suppliers that report it,
//! the per-supplier mean becomes the composite, and composites are ranked
//! with mid-rank percentiles so tied suppliers share a rank.

use crate::config::BenchmarkConfig;
use crate::error::SupplierError;
use foresight_domain::{SupplierMetric, SupplierScore, Tier};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

/// Benchmarks suppliers against each other
#[derive(Debug, Clone, Default)]
pub struct SupplierBenchmarker {
    config: BenchmarkConfig,
}

impl SupplierBenchmarker {
    /// Create a benchmarker
    pub fn new(config: BenchmarkConfig) -> Result<Self, SupplierError> {
        config.validate().map_err(SupplierError::Config)?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Score every supplier appearing in `metrics`
    ///
    /// Output is ordered by composite score, highest first, then by id.
    ///
    /// # Examples
    ///
    /// ```
    /// use foresight_domain::{SupplierMetric, Tier};
    /// use foresight_supplier::SupplierBenchmarker;
    ///
    /// let metrics = vec![SupplierMetric::new("ACME", "quality_score", 0.92)];
    /// let scores = SupplierBenchmarker::default().benchmark(&metrics).unwrap();
    /// assert_eq!(scores[0].composite_score, 50.0);
    /// assert_eq!(scores[0].percentile_rank, 50.0);
    /// assert_eq!(scores[0].tier, Tier::Good);
    /// ```
    pub fn benchmark(&self, metrics: &[SupplierMetric]) -> Result<Vec<SupplierScore>, SupplierError> {
        if metrics.is_empty() {
            return Err(SupplierError::NoSuppliers);
        }

        // dimension -> supplier -> raw value
        let mut by_dimension: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
        for metric in metrics {
            if metric.supplier_id.trim().is_empty() {
                return Err(SupplierError::EmptyIdentifier("supplier id"));
            }
            if metric.dimension.trim().is_empty() {
                return Err(SupplierError::EmptyIdentifier("dimension"));
            }
            if !metric.raw_value.is_finite() {
                return Err(SupplierError::NonFiniteMetric {
                    supplier_id: metric.supplier_id.clone(),
                    dimension: metric.dimension.clone(),
                });
            }
            match by_dimension
                .entry(&metric.dimension)
                .or_default()
                .entry(&metric.supplier_id)
            {
                Entry::Occupied(_) => {
                    return Err(SupplierError::DuplicateMetric {
                        supplier_id: metric.supplier_id.clone(),
                        dimension: metric.dimension.clone(),
                    })
                }
                Entry::Vacant(slot) => {
                    slot.insert(metric.raw_value);
                }
            }
        }

        // supplier -> dimension -> normalized score
        let mut by_supplier: BTreeMap<&str, BTreeMap<String, f64>> = BTreeMap::new();
        for (dimension, values) in &by_dimension {
            let min = values.values().copied().fold(f64::INFINITY, f64::min);
            let max = values.values().copied().fold(f64::NEG_INFINITY, f64::max);
            let span = max - min;
            // values near f64::MAX overflow the span; normalize them on a unit scale
            let scale = if span.is_finite() {
                1.0
            } else {
                min.abs().max(max.abs())
            };
            let scaled_span = max / scale - min / scale;
            let invert = self.config.is_lower_better(dimension);

            for (supplier, raw) in values {
                let score = if span <= self.config.tie_tolerance {
                    self.config.neutral_score
                } else {
                    let normalized = (raw / scale - min / scale) / scaled_span * 100.0;
                    if invert {
                        100.0 - normalized
                    } else {
                        normalized
                    }
                };
                by_supplier
                    .entry(supplier)
                    .or_default()
                    .insert(dimension.to_string(), score);
            }
        }

        let composites: Vec<(&str, f64)> = by_supplier
            .iter()
            .map(|(supplier, scores)| {
                let mean = scores.values().sum::<f64>() / scores.len() as f64;
                (*supplier, mean)
            })
            .collect();
        let percentiles = self.percentile_ranks(&composites);

        let mut results: Vec<SupplierScore> = composites
            .iter()
            .zip(percentiles)
            .map(|((supplier, composite), percentile)| SupplierScore {
                supplier_id: supplier.to_string(),
                composite_score: *composite,
                percentile_rank: percentile,
                tier: Tier::from_percentile(percentile),
                dimension_scores: by_supplier.remove(supplier).unwrap_or_default(),
            })
            .collect();
        results.sort_by(|a, b| {
            b.composite_score
                .total_cmp(&a.composite_score)
                .then_with(|| a.supplier_id.cmp(&b.supplier_id))
        });

        debug!(
            suppliers = results.len(),
            dimensions = by_dimension.len(),
            "Benchmarked suppliers"
        );
        Ok(results)
    }

    /// Mid-rank percentile for each composite, aligned with the input
    ///
    /// Composites are sorted and chained into tie groups: a value within
    /// `tie_tolerance` of its predecessor joins the predecessor's group.
    fn percentile_ranks(&self, composites: &[(&str, f64)]) -> Vec<f64> {
        let n = composites.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| composites[a].1.total_cmp(&composites[b].1));

        let mut ranks = vec![0.0; n];
        let mut start = 0;
        while start < n {
            let mut end = start + 1;
            while end < n
                && composites[order[end]].1 - composites[order[end - 1]].1 <= self.config.tie_tolerance
            {
                end += 1;
            }
            let below = start as f64;
            let equal = (end - start) as f64;
            let percentile = 100.0 * (below + 0.5 * equal) / n as f64;
            for &i in &order[start..end] {
                ranks[i] = percentile;
            }
            start = end;
        }
        ranks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(supplier: &str, dimension: &str, value: f64) -> SupplierMetric {
        SupplierMetric::new(supplier, dimension, value)
    }

    fn score<'a>(scores: &'a [SupplierScore], id: &str) -> &'a SupplierScore {
        scores.iter().find(|s| s.supplier_id == id).unwrap()
    }

    #[test]
    fn test_single_supplier_scores_fifty() {
        let metrics = vec![
            metric("ACME", "on_time_delivery_rate", 0.97),
            metric("ACME", "quality_score", 88.0),
            metric("ACME", "defects_rate", 0.02),
        ];
        let scores = SupplierBenchmarker::default().benchmark(&metrics).unwrap();

        assert_eq!(scores.len(), 1);
        for value in scores[0].dimension_scores.values() {
            assert_eq!(*value, 50.0);
        }
        assert_eq!(scores[0].composite_score, 50.0);
    }

    #[test]
    fn test_min_max_normalization() {
        let metrics = vec![
            metric("A", "quality_score", 60.0),
            metric("B", "quality_score", 80.0),
            metric("C", "quality_score", 100.0),
        ];
        let scores = SupplierBenchmarker::default().benchmark(&metrics).unwrap();

        assert_eq!(score(&scores, "A").composite_score, 0.0);
        assert_eq!(score(&scores, "B").composite_score, 50.0);
        assert_eq!(score(&scores, "C").composite_score, 100.0);
        assert_eq!(scores[0].supplier_id, "C");
    }

    #[test]
    fn test_extreme_values_normalize() {
        let metrics = vec![
            metric("A", "quality_score", -1e308),
            metric("B", "quality_score", 1e308),
            metric("C", "quality_score", 0.0),
        ];
        let scores = SupplierBenchmarker::default().benchmark(&metrics).unwrap();

        assert_eq!(scores[0].supplier_id, "B");
        assert_eq!(score(&scores, "B").composite_score, 100.0);
        assert_eq!(score(&scores, "C").composite_score, 50.0);
        assert_eq!(score(&scores, "A").composite_score, 0.0);
        assert!((score(&scores, "B").percentile_rank - 250.0 / 3.0).abs() < 1e-9);
        assert!(scores.iter().all(|s| s.composite_score.is_finite()));
    }

    #[test]
    fn test_lower_is_better_inverted() {
        let metrics = vec![
            metric("A", "defects_rate", 0.01),
            metric("B", "defects_rate", 0.05),
        ];
        let scores = SupplierBenchmarker::default().benchmark(&metrics).unwrap();

        assert_eq!(score(&scores, "A").composite_score, 100.0);
        assert_eq!(score(&scores, "B").composite_score, 0.0);
    }

    #[test]
    fn test_percentiles_and_tiers() {
        let metrics = vec![
            metric("A", "quality_score", 10.0),
            metric("B", "quality_score", 20.0),
            metric("C", "quality_score", 30.0),
            metric("D", "quality_score", 40.0),
        ];
        let scores = SupplierBenchmarker::default().benchmark(&metrics).unwrap();

        assert_eq!(score(&scores, "A").percentile_rank, 12.5);
        assert_eq!(score(&scores, "B").percentile_rank, 37.5);
        assert_eq!(score(&scores, "C").percentile_rank, 62.5);
        assert_eq!(score(&scores, "D").percentile_rank, 87.5);
        assert_eq!(score(&scores, "A").tier, Tier::Poor);
        assert_eq!(score(&scores, "B").tier, Tier::Average);
        assert_eq!(score(&scores, "C").tier, Tier::Good);
        assert_eq!(score(&scores, "D").tier, Tier::Top);
    }

    #[test]
    fn test_ties_share_rank() {
        let metrics = vec![
            metric("A", "quality_score", 10.0),
            metric("B", "quality_score", 50.0),
            metric("C", "quality_score", 50.0),
            metric("D", "quality_score", 90.0),
        ];
        let scores = SupplierBenchmarker::default().benchmark(&metrics).unwrap();

        assert_eq!(score(&scores, "B").percentile_rank, 50.0);
        assert_eq!(score(&scores, "C").percentile_rank, 50.0);
        // ties are ordered by id
        assert_eq!(scores[1].supplier_id, "B");
        assert_eq!(scores[2].supplier_id, "C");
    }

    #[test]
    fn test_composite_uses_only_reported_dimensions() {
        let metrics = vec![
            metric("A", "quality_score", 100.0),
            metric("B", "quality_score", 0.0),
            metric("B", "on_time_delivery_rate", 0.9),
        ];
        let scores = SupplierBenchmarker::default().benchmark(&metrics).unwrap();

        assert_eq!(score(&scores, "A").dimension_scores.len(), 1);
        assert_eq!(score(&scores, "A").composite_score, 100.0);
        // B: quality 0, delivery 50 (only reporter)
        assert_eq!(score(&scores, "B").composite_score, 25.0);
    }

    #[test]
    fn test_validation_errors() {
        let benchmarker = SupplierBenchmarker::default();
        assert_eq!(benchmarker.benchmark(&[]).unwrap_err(), SupplierError::NoSuppliers);

        let nan = vec![metric("A", "quality_score", f64::NAN)];
        assert!(matches!(
            benchmarker.benchmark(&nan).unwrap_err(),
            SupplierError::NonFiniteMetric { .. }
        ));

        let duplicate = vec![
            metric("A", "quality_score", 1.0),
            metric("A", "quality_score", 2.0),
        ];
        assert!(matches!(
            benchmarker.benchmark(&duplicate).unwrap_err(),
            SupplierError::DuplicateMetric { .. }
        ));

        let blank = vec![metric(" ", "quality_score", 1.0)];
        assert_eq!(
            benchmarker.benchmark(&blank).unwrap_err(),
            SupplierError::EmptyIdentifier("supplier id")
        );
    }
}
