use thiserror::Error;

/// Top-level error type for the A.T.A assistant.
///
/// Subsystem crates define their own error types; this one covers the
/// concerns shared by every crate: configuration, I/O and serialization.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AtaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for AtaError {
    fn from(err: toml::de::Error) -> Self {
        AtaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AtaError {
    fn from(err: toml::ser::Error) -> Self {
        AtaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for core operations.
pub type Result<T> = std::result::Result<T, AtaError>;
