//! Trend summary value objects

use crate::forecast::ForecastResult;
use serde::{Deserialize, Serialize};

/// Direction of a series' recent movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Recent values above earlier values
    Up,
    /// Recent values below earlier values
    Down,
    /// Change within the dead band
    Stable,
}

impl TrendDirection {
    /// Get the direction as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Summary of how a series has been moving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    /// Analyzed entity
    pub entity_id: String,
    /// Direction of the change
    pub direction: TrendDirection,
    /// Recent mean relative to the earlier mean, in percent
    pub change_percentage: f64,
    /// Population standard deviation of all values
    pub volatility: f64,
    /// Absolute change percentage
    pub trend_strength: f64,
    /// Number of points analyzed
    pub points: usize,
    /// Observations drawn from the direction and size of the change
    #[serde(default)]
    pub insights: Vec<String>,
    /// Suggested follow-up actions
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Forecast of the same entity, when one was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<ForecastResult>,
}
