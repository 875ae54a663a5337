//! Foresight Supplier Benchmarker
//!
//! Aggregates supplier metrics into percentile-ranked performance scores.
//! Scores are relative: the same supplier can rank differently depending on
//! who else is in the request.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod benchmarker;
pub mod config;
pub mod error;

pub use benchmarker::SupplierBenchmarker;
pub use config::BenchmarkConfig;
pub use error::SupplierError;
