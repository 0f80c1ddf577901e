//! The updater run: universe, rankings, valuation and ROI, breadth.

mod pipeline_model;
mod pipeline_service;


pub use pipeline_model::{PipelineStage, RunSummary, StageReport};
pub use pipeline_service::PipelineOrchestrator;
