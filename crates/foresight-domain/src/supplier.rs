//! Supplier benchmarking value objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quartile tier of a supplier within its benchmarked population
///
/// Suppliers move between tiers only through re-benchmarking:
/// - Top: percentile rank of 75 or more
/// - Good: 50 to 75
/// - Average: 25 to 50
/// - Poor: below 25
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Top quartile
    Top,

    /// Second quartile
    Good,

    /// Third quartile
    Average,

    /// Bottom quartile
    Poor,
}

impl Tier {
    /// Tier for a percentile rank in [0, 100]
    pub fn from_percentile(percentile: f64) -> Self {
        if percentile >= 75.0 {
            Tier::Top
        } else if percentile >= 50.0 {
            Tier::Good
        } else if percentile >= 25.0 {
            Tier::Average
        } else {
            Tier::Poor
        }
    }

    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Top => "top",
            Tier::Good => "good",
            Tier::Average => "average",
            Tier::Poor => "poor",
        }
    }

    /// Parse a tier from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "top" => Some(Tier::Top),
            "good" => Some(Tier::Good),
            "average" => Some(Tier::Average),
            "poor" => Some(Tier::Poor),
            _ => None,
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid tier: {}", s))
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One measured dimension for one supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierMetric {
    /// Supplier identifier
    pub supplier_id: String,
    /// Dimension name (on_time_delivery_rate, quality_score, ...)
    pub dimension: String,
    /// Value as measured
    pub raw_value: f64,
}

impl SupplierMetric {
    /// Create a metric
    pub fn new(supplier_id: impl Into<String>, dimension: impl Into<String>, raw_value: f64) -> Self {
        Self {
            supplier_id: supplier_id.into(),
            dimension: dimension.into(),
            raw_value,
        }
    }
}

/// Benchmark outcome for one supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierScore {
    /// Supplier identifier
    pub supplier_id: String,
    /// Mean of the normalized dimension scores, in [0, 100]
    pub composite_score: f64,
    /// Position within the population, in [0, 100]
    pub percentile_rank: f64,
    /// Quartile tier
    pub tier: Tier,
    /// Normalized score per dimension
    pub dimension_scores: BTreeMap<String, f64>,
}
