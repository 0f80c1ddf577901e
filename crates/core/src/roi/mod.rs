//! Multi-horizon returns of sector proxy funds and the market benchmark.

mod roi_model;
mod roi_service;

pub use roi_model::RoiSummary;
pub use roi_service::BenchmarkRoiCollector;
