use std::path::PathBuf;

use checks_happy_core::error::CoreError;

/// Errors raised while loading inputs, reading configuration, or writing
/// results.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A domain-level error from `checks_happy_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file exists but is not the expected JSON shape.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// An environment variable is set but cannot be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience alias for command return values.
pub type CliResult<T> = Result<T, CliError>;
