//! Keyed JSON documents with field-level merge writes.
//!
//! Each pipeline stage owns a disjoint set of fields in the sector document
//! and writes only those. Merges are idempotent, so re-running a stage after
//! a partial failure converges on the same document.

mod memory_store;
mod records_constants;
mod records_model;
mod records_traits;

pub use memory_store::InMemoryRecordStore;
pub use records_constants::*;
pub use records_model::{merge_fields, Document, MergeWrite, SectorRecord, SectorRecordPatch};
pub use records_traits::RecordStoreTrait;
