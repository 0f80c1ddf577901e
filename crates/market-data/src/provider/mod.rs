//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataGateway` trait every provider implements
//! - Provider rate limiting configuration
//! - The Financial Modeling Prep provider

mod capabilities;
mod traits;

pub mod fmp;

// Re-exports
pub use capabilities::RateLimit;
pub use traits::{FetchResult, MarketDataGateway};
