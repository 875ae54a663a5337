//! Foresight Analytics Engine
//!
//! The orchestration layer over the Foresight sub-engines. Callers build an
//! [`AnalyticsEngine`] from a historical-data source, a holiday calendar and
//! an [`EngineConfig`], then call its async operations:
//!
//! - `forecast_demand`: bounded demand forecast for one entity
//! - `assess_risk`: composite risk score and level
//! - `benchmark_suppliers`: percentile-ranked supplier scores
//! - `analyze_trend`: recent direction, volatility, insights and an optional forecast
//! - `reload_models`: atomically publish new model parameters
//!
//! Every successful result is wrapped in an [`Envelope`]; every failure is an
//! [`EngineError`] whose [`kind`](EngineError::kind) names its category.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod request;
pub mod response;
pub mod sources;

pub use config::{ConfigError, EngineConfig};
pub use error::{EngineError, ErrorKind};
pub use orchestrator::AnalyticsEngine;
pub use request::{BenchmarkRequest, ForecastRequest, RiskRequest, TrendRequest};
pub use response::Envelope;
pub use sources::{
    InMemorySeriesSource, JsonFileModelStore, JsonFileSeriesSource, SourceError,
    StaticHolidayCalendar,
};
