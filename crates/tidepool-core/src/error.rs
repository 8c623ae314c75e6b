use thiserror::Error;

/// Pipeline-wide error types for the Tidepool proof of contribution.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Schema layer error (payload not a mapping, unreadable input).
    #[error("Schema error: {0}")]
    Schema(String),

    /// Identity provider error (transport failure, bad endpoint).
    #[error("Identity error: {0}")]
    Identity(String),

    /// Ledger error (RPC failure, malformed call result).
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Configuration error (missing or malformed setting).
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Filesystem error while reading input or writing the proof.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for PoolError {
    fn from(e: serde_json::Error) -> Self {
        PoolError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for PoolError {
    fn from(e: std::io::Error) -> Self {
        PoolError::Io(e.to_string())
    }
}
