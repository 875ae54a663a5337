//! Error types for supplier benchmarking

use thiserror::Error;

/// Errors that can occur during benchmarking
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SupplierError {
    /// No metrics were supplied
    #[error("No suppliers to benchmark")]
    NoSuppliers,

    /// A metric value is NaN or infinite
    #[error("Metric '{dimension}' for supplier '{supplier_id}' is not finite")]
    NonFiniteMetric {
        /// Supplier identifier
        supplier_id: String,
        /// Dimension name
        dimension: String,
    },

    /// The same supplier reported a dimension twice
    #[error("Duplicate metric '{dimension}' for supplier '{supplier_id}'")]
    DuplicateMetric {
        /// Supplier identifier
        supplier_id: String,
        /// Dimension name
        dimension: String,
    },

    /// A supplier or dimension identifier is blank
    #[error("Supplier metric has an empty {0}")]
    EmptyIdentifier(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
