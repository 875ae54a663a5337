//! Collaborator implementations
//!
//! In-memory and JSON-file backed implementations of the engine's
//! collaborators: historical data, holiday calendar and model parameters.

use chrono::NaiveDate;
use foresight_domain::traits::{HistoricalDataSource, HolidayCalendar};
use foresight_domain::{Series, SeriesError, TimeSeriesPoint};
use foresight_forecast::{ModelParameterStore, ModelParameters};
use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

/// Errors from file-backed collaborators
#[derive(Debug, Error)]
pub enum SourceError {
    /// File could not be read
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File content is not valid JSON for the expected type
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// Recorded points do not form a valid series
    #[error("Invalid series: {0}")]
    Series(#[from] SeriesError),
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SourceError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Series held in memory, keyed by entity
#[derive(Debug, Default)]
pub struct InMemorySeriesSource {
    series: RwLock<HashMap<String, Series>>,
}

impl InMemorySeriesSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding `series`
    pub fn with_series(series: impl IntoIterator<Item = Series>) -> Self {
        let source = Self::new();
        for s in series {
            source.insert(s);
        }
        source
    }

    /// Store a series, replacing any previous version for its entity
    pub fn insert(&self, series: Series) {
        let mut map = self.series.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(series.entity_id().to_string(), series);
    }

    /// Number of entities held
    pub fn len(&self) -> usize {
        self.series.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no entity is held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistoricalDataSource for InMemorySeriesSource {
    type Error = Infallible;

    fn get_series(&self, entity_id: &str) -> Result<Option<Series>, Self::Error> {
        let map = self.series.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(entity_id).cloned())
    }
}

/// Series read from a JSON file on every lookup
///
/// The file holds an array of points, possibly for several entities, in
/// any order:
///
/// ```json
/// [{"entity_id": "SKU-1", "timestamp": "2025-01-01T00:00:00Z", "value": 12.0}]
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileSeriesSource {
    path: PathBuf,
}

impl JsonFileSeriesSource {
    /// Create a source reading `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoricalDataSource for JsonFileSeriesSource {
    type Error = SourceError;

    fn get_series(&self, entity_id: &str) -> Result<Option<Series>, Self::Error> {
        let points: Vec<TimeSeriesPoint> = read_json(&self.path)?;
        let mut points: Vec<TimeSeriesPoint> = points
            .into_iter()
            .filter(|p| p.entity_id == entity_id)
            .collect();
        if points.is_empty() {
            return Ok(None);
        }
        points.sort_by_key(|p| p.timestamp);
        Ok(Some(Series::new(entity_id, points)?))
    }
}

/// Fixed set of holiday dates
#[derive(Debug, Clone, Default)]
pub struct StaticHolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl StaticHolidayCalendar {
    /// Create a calendar from a list of dates
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Load a JSON array of `YYYY-MM-DD` dates
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let dates: Vec<NaiveDate> = read_json(path.as_ref())?;
        Ok(Self::new(dates))
    }

    /// Number of holidays
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the calendar has no holidays
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl HolidayCalendar for StaticHolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

/// Model parameters stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileModelStore {
    path: PathBuf,
}

impl JsonFileModelStore {
    /// Create a store reading `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ModelParameterStore for JsonFileModelStore {
    type Error = SourceError;

    fn load_parameters(&self) -> Result<ModelParameters, Self::Error> {
        read_json(&self.path)
    }
}
