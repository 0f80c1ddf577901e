//! Share of a sector's constituents trading above their long moving average.

mod breadth_model;
mod breadth_service;

#[cfg(test)]
mod breadth_service_tests;

pub use breadth_model::BreadthSummary;
pub use breadth_service::BreadthCalculator;
