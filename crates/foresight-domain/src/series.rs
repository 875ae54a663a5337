//! Series module - ordered observations for a single entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Attribute attached to an observation (promotion flag, channel, region, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Numeric attribute
    Number(f64),
    /// Categorical attribute
    Text(String),
}

impl AttributeValue {
    /// Numeric value, if this attribute is numeric
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Text(_) => None,
        }
    }

    /// Text value, if this attribute is categorical
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Number(_) => None,
            AttributeValue::Text(s) => Some(s),
        }
    }
}

/// A single recorded observation
///
/// Immutable once recorded: corrections are appended as new points or
/// published as a new series version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Entity the observation belongs to (e.g. a product SKU)
    pub entity_id: String,

    /// Observation time
    pub timestamp: DateTime<Utc>,

    /// Observed value (e.g. units sold)
    pub value: f64,

    /// Additional attributes recorded with the observation
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl TimeSeriesPoint {
    /// Create a point without attributes
    pub fn new(entity_id: impl Into<String>, timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            timestamp,
            value,
            attributes: BTreeMap::new(),
        }
    }

    /// Attach an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

/// Errors raised when a series would violate its ordering invariants
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    /// Entity id was empty
    #[error("series entity id must not be empty")]
    EmptyEntityId,

    /// A point belongs to another entity
    #[error("point for entity '{found}' cannot join series '{expected}'")]
    EntityMismatch {
        /// Series entity
        expected: String,
        /// Offending point's entity
        found: String,
    },

    /// Timestamps were not strictly increasing
    #[error("timestamps must be strictly increasing: {previous} is not before {next}")]
    NotIncreasing {
        /// Earlier point's timestamp
        previous: DateTime<Utc>,
        /// Later point's timestamp
        next: DateTime<Utc>,
    },

    /// A value was NaN or infinite
    #[error("non-finite value at {0}")]
    NonFiniteValue(DateTime<Utc>),
}

/// Ordered-by-timestamp observations for one entity
///
/// Invariants: every point carries the series' entity id, timestamps are
/// strictly increasing and values are finite. A `Series` is never mutated in
/// place; [`Series::append`] yields a new version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    entity_id: String,
    points: Vec<TimeSeriesPoint>,
}

impl Series {
    /// Build a series, validating its invariants
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use foresight_domain::{Series, TimeSeriesPoint};
    ///
    /// let day = |d| Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap();
    /// let series = Series::new("SKU-1", vec![
    ///     TimeSeriesPoint::new("SKU-1", day(1), 10.0),
    ///     TimeSeriesPoint::new("SKU-1", day(2), 12.0),
    /// ]).unwrap();
    /// assert_eq!(series.len(), 2);
    ///
    /// let unordered = Series::new("SKU-1", vec![
    ///     TimeSeriesPoint::new("SKU-1", day(2), 12.0),
    ///     TimeSeriesPoint::new("SKU-1", day(1), 10.0),
    /// ]);
    /// assert!(unordered.is_err());
    /// ```
    pub fn new(
        entity_id: impl Into<String>,
        points: Vec<TimeSeriesPoint>,
    ) -> Result<Self, SeriesError> {
        let entity_id = entity_id.into();
        if entity_id.trim().is_empty() {
            return Err(SeriesError::EmptyEntityId);
        }

        for point in &points {
            Self::check_point(&entity_id, point)?;
        }
        for pair in points.windows(2) {
            if pair[0].timestamp >= pair[1].timestamp {
                return Err(SeriesError::NotIncreasing {
                    previous: pair[0].timestamp,
                    next: pair[1].timestamp,
                });
            }
        }

        Ok(Self { entity_id, points })
    }

    /// Return a new series version with `point` appended
    pub fn append(&self, point: TimeSeriesPoint) -> Result<Self, SeriesError> {
        Self::check_point(&self.entity_id, &point)?;
        if let Some(last) = self.points.last() {
            if last.timestamp >= point.timestamp {
                return Err(SeriesError::NotIncreasing {
                    previous: last.timestamp,
                    next: point.timestamp,
                });
            }
        }

        let mut points = self.points.clone();
        points.push(point);
        Ok(Self {
            entity_id: self.entity_id.clone(),
            points,
        })
    }

    fn check_point(entity_id: &str, point: &TimeSeriesPoint) -> Result<(), SeriesError> {
        if point.entity_id != entity_id {
            return Err(SeriesError::EntityMismatch {
                expected: entity_id.to_string(),
                found: point.entity_id.clone(),
            });
        }
        if !point.value.is_finite() {
            return Err(SeriesError::NonFiniteValue(point.timestamp));
        }
        Ok(())
    }

    /// Entity this series describes
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// All points, oldest first
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point
    pub fn last(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }

    /// Observed values, oldest first
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Points recorded at or before `as_of`
    pub fn history_until(&self, as_of: DateTime<Utc>) -> &[TimeSeriesPoint] {
        let end = self.points.partition_point(|p| p.timestamp <= as_of);
        &self.points[..end]
    }
}

impl<'de> Deserialize<'de> for Series {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawSeries {
            entity_id: String,
            points: Vec<TimeSeriesPoint>,
        }

        let raw = RawSeries::deserialize(deserializer)?;
        Series::new(raw.entity_id, raw.points).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn points(n: i64) -> Vec<TimeSeriesPoint> {
        (0..n)
            .map(|i| TimeSeriesPoint::new("SKU-1", day(i), i as f64))
            .collect()
    }

    #[test]
    fn test_series_creation() {
        let series = Series::new("SKU-1", points(5)).unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(series.entity_id(), "SKU-1");
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let mut pts = points(3);
        pts[2].timestamp = pts[1].timestamp;
        assert!(matches!(
            Series::new("SKU-1", pts),
            Err(SeriesError::NotIncreasing { .. })
        ));
    }

    #[test]
    fn test_entity_mismatch_rejected() {
        let mut pts = points(2);
        pts[1].entity_id = "SKU-2".to_string();
        assert!(matches!(
            Series::new("SKU-1", pts),
            Err(SeriesError::EntityMismatch { .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut pts = points(2);
        pts[0].value = f64::NAN;
        assert!(matches!(
            Series::new("SKU-1", pts),
            Err(SeriesError::NonFiniteValue(_))
        ));
    }

    #[test]
    fn test_append_returns_new_version() {
        let series = Series::new("SKU-1", points(3)).unwrap();
        let next = series
            .append(TimeSeriesPoint::new("SKU-1", day(3), 3.0))
            .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(next.len(), 4);

        let stale = series.append(TimeSeriesPoint::new("SKU-1", day(1), 9.0));
        assert!(stale.is_err());
    }

    #[test]
    fn test_history_until() {
        let series = Series::new("SKU-1", points(10)).unwrap();
        assert_eq!(series.history_until(day(4)).len(), 5);
        assert_eq!(series.history_until(day(-1)).len(), 0);
        assert_eq!(series.history_until(day(100)).len(), 10);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{
            "entity_id": "SKU-1",
            "points": [
                {"entity_id": "SKU-1", "timestamp": "2025-01-02T00:00:00Z", "value": 2.0},
                {"entity_id": "SKU-1", "timestamp": "2025-01-01T00:00:00Z", "value": 1.0}
            ]
        }"#;
        assert!(serde_json::from_str::<Series>(json).is_err());
    }

    #[test]
    fn test_attribute_values() {
        let point = TimeSeriesPoint::new("SKU-1", day(0), 1.0)
            .with_attribute("promo", AttributeValue::Number(1.0))
            .with_attribute("channel", AttributeValue::Text("online".into()));
        assert_eq!(point.attributes["promo"].as_number(), Some(1.0));
        assert_eq!(point.attributes["channel"].as_text(), Some("online"));
    }
}
