//! Prediction interval module

use serde::{Deserialize, Serialize};

/// Prediction interval `[lower, upper]` around a point estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

impl PredictionInterval {
    /// Create a new prediction interval
    ///
    /// # Panics
    /// Panics if a bound is not finite or `lower > upper`
    pub fn new(lower: f64, upper: f64) -> Self {
        assert!(lower.is_finite() && upper.is_finite(), "Bounds must be finite");
        assert!(lower <= upper, "Lower bound must be <= upper bound");

        Self { lower, upper }
    }

    /// Create an interval, or `None` if a bound is not finite or `lower > upper`
    pub fn try_new(lower: f64, upper: f64) -> Option<Self> {
        (lower.is_finite() && upper.is_finite() && lower <= upper).then_some(Self { lower, upper })
    }

    /// Symmetric interval of `half_width` around `center`
    ///
    /// # Panics
    /// Panics if either bound overflows to infinity
    pub fn around(center: f64, half_width: f64) -> Self {
        let half_width = half_width.abs();
        Self::new(center - half_width, center + half_width)
    }

    /// Symmetric interval, or `None` when a bound is not finite
    pub fn try_around(center: f64, half_width: f64) -> Option<Self> {
        let half_width = half_width.abs();
        Self::try_new(center - half_width, center + half_width)
    }

    /// Get the midpoint of the interval
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    /// Get the width of the interval (uncertainty measure)
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Check if the interval contains a value
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}
