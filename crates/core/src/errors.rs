//! Core error types for the sector analytics pipeline.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use sectorwatch_market_data::MarketDataError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    /// A fatal upstream gap (only the universe fetch is allowed to raise this).
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    /// A batched merge-write was rejected as a whole.
    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Invalid sector proxy table: {0}")]
    SectorTable(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage-agnostic error type for record store operations.
///
/// Uses `String` for all details so the storage layer can convert
/// backend-specific errors into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_data_error_converts() {
        let err: Error = MarketDataError::Timeout {
            provider: "FMP".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Market data operation failed: Timeout: FMP");
    }

    #[test]
    fn test_database_error_display() {
        let err: Error = DatabaseError::TransactionFailed("disk full".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Database operation failed: Transaction failed: disk full"
        );
    }
}
