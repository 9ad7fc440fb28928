//! Error types for the bloom_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bloom_core operations.
///
/// Engines and the schema codec never fail; this type covers the
/// collaborator boundaries (store, journal, alarm backend, config IO).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key-value store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Alarm backend registration failure
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
