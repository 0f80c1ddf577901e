//! SQLite storage implementation for Sectorwatch.
//!
//! This crate is the only place in the workspace where Diesel dependencies
//! exist. It implements [`RecordStoreTrait`] from `sectorwatch-core` on top of
//! a single `documents` table holding one JSON object per (collection, id).
//!
//! ```text
//!      core (pipeline)
//!            │
//!            ▼  RecordStoreTrait
//!  storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```
//!
//! Reads go through the r2d2 pool. Writes go through a single writer task
//! that runs each batch inside one immediate transaction.

pub mod db;
pub mod errors;
pub mod records;
pub mod schema;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool, WriteHandle};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use records::SqliteRecordStore;

// Re-export from sectorwatch-core for convenience
pub use sectorwatch_core::errors::{DatabaseError, Error, Result};
pub use sectorwatch_core::records::RecordStoreTrait;
