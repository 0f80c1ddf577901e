//! Financial Modeling Prep API response models.
//!
//! Every endpoint used here answers with a JSON array of rows. Fields are
//! optional because the provider omits them freely for thinly covered symbols.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Row from /api/v3/sp500_constituent
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstituentRow {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub sub_sector: Option<String>,
    // Note: headQuarter, dateFirstAdded, cik, founded exist but are not used
}

/// Row from /api/v3/market-capitalization/{symbols}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketCapRow {
    pub symbol: String,
    pub market_cap: Option<Decimal>,
}

/// Row from /api/v3/quote/{symbols}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRow {
    pub symbol: String,
    pub price: Option<Decimal>,
    pub changes_percentage: Option<Decimal>,
}

/// Row from /stable/sector-pe-snapshot and /stable/historical-sector-pe
#[derive(Debug, Deserialize)]
pub struct SectorPeRow {
    pub date: String,
    pub sector: String,
    pub exchange: Option<String>,
    pub pe: Option<f64>,
}

/// Row from /stable/technical-indicators/sma
#[derive(Debug, Deserialize)]
pub struct SmaRow {
    pub date: String,
    pub close: Option<f64>,
    pub sma: Option<f64>,
}

/// Row from /api/v3/stock-price-change/{symbol}
#[derive(Debug, Deserialize)]
pub struct PriceChangeRow {
    pub symbol: String,
    #[serde(rename = "1D")]
    pub one_day: Option<f64>,
    #[serde(rename = "5D")]
    pub five_days: Option<f64>,
    #[serde(rename = "1M")]
    pub one_month: Option<f64>,
    #[serde(rename = "3M")]
    pub three_months: Option<f64>,
    #[serde(rename = "6M")]
    pub six_months: Option<f64>,
    #[serde(rename = "1Y")]
    pub one_year: Option<f64>,
    // Note: ytd, 3Y, 5Y, 10Y, max exist but are not tracked
}

/// Error body FMP sends for bad keys and exhausted plans.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
}
