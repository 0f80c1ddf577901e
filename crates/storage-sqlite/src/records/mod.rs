//! Document store backed by the `documents` table.

mod model;
mod repository;

pub use model::DocumentDB;
pub use repository::SqliteRecordStore;
