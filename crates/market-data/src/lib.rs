//! Sectorwatch Market Data Crate
//!
//! Provider-neutral access to the market data the sector pipeline consumes.
//!
//! # Overview
//!
//! - Index constituents with sector classification
//! - Batch market capitalization and quote lookups
//! - Sector P/E snapshots and history
//! - Close vs. 200-day moving average samples
//! - Multi-horizon returns for sector proxy funds
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +---------------------+
//! |   Domain Layer   | --> |  MarketDataGateway  |  (trait, one method per data need)
//! +------------------+     +---------------------+
//!          |                          |
//!          v                          v
//! +------------------+     +---------------------+
//! |      Pacer       |     |     FmpProvider     |  (HTTP + JSON)
//! +------------------+     +---------------------+
//! ```
//!
//! Every gateway method returns a [`FetchResult`]: `Ok(Some(_))` with data,
//! `Ok(None)` when the provider answered with nothing, `Err(_)` when the call
//! itself failed. Nothing in this crate retries or caches.

pub mod errors;
pub mod models;
pub mod pacing;
pub mod provider;

pub use errors::MarketDataError;

pub use models::{
    Constituent, MovingAverageSample, PeHistoryPoint, QuoteSnapshot, RoiHorizon, RoiValues,
    SectorPeSnapshot,
};

pub use pacing::{FixedIntervalPacer, NoPacing, Pacer, RateLimitConfig, TokenBucketPacer};

pub use provider::fmp::FmpProvider;
pub use provider::{FetchResult, MarketDataGateway, RateLimit};
