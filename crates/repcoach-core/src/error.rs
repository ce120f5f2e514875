use thiserror::Error;

/// Top-level error type for the RepCoach system.
///
/// Subsystem crates define their own error types and implement
/// `From<RepcoachError>` so that the `?` operator works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RepcoachError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for RepcoachError {
    fn from(err: toml::de::Error) -> Self {
        RepcoachError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for RepcoachError {
    fn from(err: toml::ser::Error) -> Self {
        RepcoachError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for RepcoachError {
    fn from(err: serde_json::Error) -> Self {
        RepcoachError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for RepCoach operations.
pub type Result<T> = std::result::Result<T, RepcoachError>;
