//! Sectorwatch Core - sector analytics domain and the updater pipeline.
//!
//! This crate holds the business logic: grouping the index universe by
//! sector, ranking, valuation, breadth and benchmark returns, and the
//! orchestrator that merges the results into per-sector documents. It is
//! storage-agnostic; the `storage-sqlite` crate implements
//! [`records::RecordStoreTrait`].

pub mod breadth;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipeline;
pub mod ranking;
pub mod records;
pub mod roi;
pub mod sectors;
pub mod universe;
pub mod utils;
pub mod valuation;

#[cfg(test)]
mod test_support;

pub use config::PipelineConfig;
pub use pipeline::{PipelineOrchestrator, PipelineStage, RunSummary, StageReport};
pub use records::{InMemoryRecordStore, RecordStoreTrait};
pub use sectors::SectorProxyTable;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
