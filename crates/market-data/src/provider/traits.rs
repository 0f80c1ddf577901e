//! Market data gateway trait definition.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{
    Constituent, MovingAverageSample, PeHistoryPoint, QuoteSnapshot, RoiHorizon, RoiValues,
    SectorPeSnapshot,
};

use super::capabilities::RateLimit;

/// Outcome of a single gateway call.
///
/// - `Ok(Some(_))` - the provider returned data
/// - `Ok(None)` - the call succeeded but the payload was empty or absent
/// - `Err(_)` - the provider could not be reached or rejected the call
pub type FetchResult<T> = Result<Option<T>, MarketDataError>;

/// Every external market data lookup the sector pipeline needs.
///
/// Implementations are pure request/response: no caching and no retries.
/// Batch-capable lookups (`market_caps`, `quotes`) take the full symbol list
/// so callers can issue one request per sector.
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Unique identifier for this provider, used in logs.
    fn id(&self) -> &'static str;

    /// Rate limiting configuration.
    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    /// Current index constituents with their sector classification.
    async fn constituents(&self) -> FetchResult<Vec<Constituent>>;

    /// Market capitalization per symbol.
    async fn market_caps(&self, symbols: &[String]) -> FetchResult<HashMap<String, Decimal>>;

    /// Latest price and daily change per symbol.
    async fn quotes(&self, symbols: &[String]) -> FetchResult<HashMap<String, QuoteSnapshot>>;

    /// Cross-sector P/E snapshot. `None` means today.
    async fn sector_pe_snapshot(&self, date: Option<NaiveDate>) -> FetchResult<SectorPeSnapshot>;

    /// Daily P/E series for one sector over `[from, to]`.
    async fn sector_pe_history(
        &self,
        sector: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> FetchResult<Vec<PeHistoryPoint>>;

    /// Latest close and simple moving average over `period` daily bars.
    async fn moving_average_sample(
        &self,
        symbol: &str,
        period: u32,
    ) -> FetchResult<MovingAverageSample>;

    /// Return percentages of a tradeable instrument for the requested horizons.
    async fn proxy_roi(&self, symbol: &str, horizons: &[RoiHorizon]) -> FetchResult<RoiValues>;
}
