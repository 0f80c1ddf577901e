//! Top-K constituents per sector by market capitalization.

mod ranking_model;
mod ranking_service;


pub use ranking_model::{rank_by_market_cap, SectorRanking};
pub use ranking_service::SectorAggregator;
