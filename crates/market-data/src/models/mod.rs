//! Market data models
//!
//! Provider-neutral shapes returned by the [`MarketDataGateway`](crate::MarketDataGateway):
//! - `constituent` - Index constituents with their sector classification
//! - `quote` - Live price snapshots
//! - `valuation` - Sector P/E snapshots and history points
//! - `technical` - Close vs. simple moving average samples
//! - `roi` - Multi-horizon return percentages

mod constituent;
mod quote;
mod roi;
mod technical;
mod valuation;

pub use constituent::Constituent;
pub use quote::QuoteSnapshot;
pub use roi::{RoiHorizon, RoiValues};
pub use technical::MovingAverageSample;
pub use valuation::{PeHistoryPoint, SectorPeSnapshot};
