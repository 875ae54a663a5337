//! Foresight Domain Layer
//!
//! This crate contains the value objects and collaborator traits shared by
//! every Foresight sub-engine. It holds no engine logic of its own: feature
//! construction, models, scoring and orchestration live in other crates.
//!
//! ## Key Concepts
//!
//! - **Series**: strictly time-ordered observations for one entity (e.g. a SKU)
//! - **Feature vector**: model-ready view of a series at one future timestamp
//! - **Forecast result**: point estimates with optional prediction intervals
//! - **Risk assessment**: weighted composite of normalized risk factors
//! - **Supplier score**: percentile-ranked supplier performance
//!
//! ## Architecture
//!
//! - Value objects are immutable once constructed and owned per request
//! - External data (history, holidays) is reached only through [`traits`]
//! - Infrastructure implementations live in `foresight-engine`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod forecast;
pub mod interval;
pub mod risk;
pub mod series;
pub mod supplier;
pub mod traits;
pub mod trend;

// Re-exports for convenience
pub use forecast::{FeatureVector, ForecastPoint, ForecastResult, ModelForecast, ModelKind};
pub use interval::PredictionInterval;
pub use risk::{RiskAssessment, RiskContribution, RiskFactor, RiskLevel};
pub use series::{AttributeValue, Series, SeriesError, TimeSeriesPoint};
pub use supplier::{SupplierMetric, SupplierScore, Tier};
pub use trend::{TrendAnalysis, TrendDirection};
