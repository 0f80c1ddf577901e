//! Storage-specific error types for SQLite operations.
//!
//! Diesel, r2d2 and JSON decoding errors stay inside this crate and are
//! converted to `sectorwatch_core::Error` before crossing the boundary.

use diesel::result::Error as DieselError;
use sectorwatch_core::errors::{DatabaseError, Error};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    /// A stored document is not a JSON object.
    #[error("Corrupt document {collection}/{id}: {message}")]
    CorruptDocument {
        collection: String,
        id: String,
        message: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A core error raised inside a writer job, carried back unchanged.
    #[error("{0}")]
    CoreError(Error),
}

/// Lets core errors raised inside a writer job abort the transaction.
impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::CoreError(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e.to_string()))
            }
            StorageError::PoolError(e) => {
                Error::Database(DatabaseError::PoolCreationFailed(e.to_string()))
            }
            StorageError::QueryFailed(DieselError::RollbackTransaction) => {
                Error::Database(DatabaseError::TransactionFailed(err.to_string()))
            }
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            StorageError::CorruptDocument { .. } => Error::Serialization(err.to_string()),
            StorageError::SerializationError(e) => Error::Serialization(e.to_string()),
            StorageError::CoreError(e) => e,
        }
    }
}

/// Adds `.into_core()` to Diesel and r2d2 results.
pub trait IntoCore<T> {
    fn into_core(self) -> sectorwatch_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> sectorwatch_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, r2d2::Error> {
    fn into_core(self) -> sectorwatch_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_maps_to_database_error() {
        let err: Error = StorageError::QueryFailed(DieselError::NotFound).into();
        assert!(matches!(err, Error::Database(DatabaseError::QueryFailed(_))));
    }

    #[test]
    fn test_corrupt_document_maps_to_serialization() {
        let err: Error = StorageError::CorruptDocument {
            collection: "sector_analytics".to_string(),
            id: "Energy".to_string(),
            message: "expected object".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().contains("sector_analytics/Energy"));
    }

    #[test]
    fn test_core_error_keeps_its_class_through_storage() {
        let original = Error::Serialization("Corrupt document sector_analytics/Broken".to_string());
        let err: Error = StorageError::from(original).into();
        match err {
            Error::Serialization(message) => {
                assert_eq!(message, "Corrupt document sector_analytics/Broken")
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err: Error = StorageError::from(Error::UpstreamUnavailable("feed".to_string())).into();
        assert!(matches!(err, Error::UpstreamUnavailable(_)));
    }
}
