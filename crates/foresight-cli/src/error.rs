//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Engine configuration could not be loaded or is invalid
    #[error(transparent)]
    EngineConfig(#[from] foresight_engine::ConfigError),

    /// Engine rejected or failed the request
    #[error("{} error: {}", .0.kind(), .0)]
    Engine(#[from] foresight_engine::EngineError),

    /// Input file could not be read as a collaborator
    #[error("Data source error: {0}")]
    Source(#[from] foresight_engine::SourceError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use foresight_engine::EngineError;

    #[test]
    fn test_engine_error_shows_kind() {
        let err = CliError::from(EngineError::NotFound("SKU-9".to_string()));
        let message = err.to_string();
        assert!(message.starts_with("not_found error"));
        assert!(message.contains("SKU-9"));
    }
}
