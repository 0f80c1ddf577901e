//! Sector P/E level, week-over-week change and one-year range.

mod valuation_model;
mod valuation_service;


pub use valuation_model::{summarize_series, ValuationSummary};
pub use valuation_service::ValuationAnalytics;
