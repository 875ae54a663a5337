//! Command implementations.

pub mod benchmark;
pub mod config;
pub mod forecast;
pub mod risk;
pub mod trend;

pub use self::benchmark::execute_benchmark;
pub use self::config::execute_config;
pub use self::forecast::execute_forecast;
pub use self::risk::execute_risk;
pub use self::trend::execute_trend;

use crate::error::Result;
use foresight_domain::traits::NoHolidays;
use foresight_engine::{
    AnalyticsEngine, EngineConfig, InMemorySeriesSource, JsonFileSeriesSource,
    StaticHolidayCalendar,
};
use std::path::Path;

/// Engine reading history from a JSON file.
pub(crate) type FileEngine = AnalyticsEngine<JsonFileSeriesSource, StaticHolidayCalendar>;

/// Engine for operations that never touch history.
pub(crate) type StatelessEngine = AnalyticsEngine<InMemorySeriesSource, NoHolidays>;

/// Build an engine over a history file and an optional holiday file.
pub(crate) fn file_engine(
    history: &Path,
    holidays: Option<&Path>,
    config: &EngineConfig,
) -> Result<FileEngine> {
    let calendar = match holidays {
        Some(path) => StaticHolidayCalendar::from_json_file(path)?,
        None => StaticHolidayCalendar::default(),
    };
    Ok(AnalyticsEngine::new(
        JsonFileSeriesSource::new(history),
        calendar,
        config.clone(),
    )?)
}

/// Build an engine with no history.
pub(crate) fn stateless_engine(config: &EngineConfig) -> Result<StatelessEngine> {
    Ok(AnalyticsEngine::new(
        InMemorySeriesSource::new(),
        NoHolidays,
        config.clone(),
    )?)
}
