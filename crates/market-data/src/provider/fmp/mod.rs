//! Financial Modeling Prep market data provider.
//!
//! Endpoints used:
//! - `/api/v3/sp500_constituent` - index universe with sectors
//! - `/api/v3/market-capitalization/{symbols}` - batch market caps
//! - `/api/v3/quote/{symbols}` - batch quotes
//! - `/stable/sector-pe-snapshot` - cross-sector P/E for one date
//! - `/stable/historical-sector-pe` - P/E series for one sector
//! - `/stable/technical-indicators/sma` - close vs. simple moving average
//! - `/api/v3/stock-price-change/{symbol}` - multi-horizon returns
//!
//! The API key travels as the `apikey` query parameter.
//! API documentation: https://site.financialmodelingprep.com/developer/docs

mod models;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{
    Constituent, MovingAverageSample, PeHistoryPoint, QuoteSnapshot, RoiHorizon, RoiValues,
    SectorPeSnapshot,
};
use crate::provider::{FetchResult, MarketDataGateway, RateLimit};

use models::{
    ConstituentRow, ErrorBody, MarketCapRow, PriceChangeRow, QuoteRow, SectorPeRow, SmaRow,
};

const BASE_URL: &str = "https://financialmodelingprep.com";
const PROVIDER_ID: &str = "FMP";
const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// FmpProvider
// ============================================================================

/// Financial Modeling Prep provider.
///
/// Starter plans allow 300 calls per minute; the breadth stage is the only
/// caller that comes close, and it paces itself.
pub struct FmpProvider {
    client: Client,
    api_key: String,
    base_url: String,
    pe_exchange: Option<String>,
}

impl FmpProvider {
    /// Create a new provider with the given API key.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
            pe_exchange: None,
        }
    }

    /// Restrict sector P/E lookups to one exchange (e.g. "NYSE").
    pub fn with_pe_exchange(mut self, exchange: Option<String>) -> Self {
        self.pe_exchange = exchange.filter(|e| !e.trim().is_empty());
        self
    }

    /// Point the provider at another host (staging, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Make a GET request and return the raw body of a 2xx response.
    async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, MarketDataError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut request = self.client.get(&url).query(&[("apikey", &self.api_key)]);
        for (key, value) in params {
            request = request.query(&[(key, value)]);
        }

        debug!("FMP request: {} with {} params", endpoint, params.len());

        let response = request.send().await.map_err(request_error)?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MarketDataError::Unauthorized {
                provider: PROVIDER_ID.to_string(),
            });
        }

        // FMP answers 403 when the plan's daily quota is spent
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if let Ok(error_body) = serde_json::from_str::<ErrorBody>(&body) {
                if let Some(message) = error_body.error_message {
                    return Err(MarketDataError::ProviderError {
                        provider: PROVIDER_ID.to_string(),
                        message,
                    });
                }
            }

            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        response.text().await.map_err(request_error)
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> FetchResult<Vec<T>> {
        let body = self.fetch(endpoint, params).await?;
        let rows = parse_rows(&body)?;
        if rows.is_none() {
            debug!("FMP returned no rows for {}", endpoint);
        }
        Ok(rows)
    }

    fn exchange_param(&self, params: &mut Vec<(&'static str, String)>) {
        if let Some(exchange) = &self.pe_exchange {
            params.push(("exchange", exchange.clone()));
        }
    }
}

#[async_trait]
impl MarketDataGateway for FmpProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 300,
            min_delay: Duration::from_millis(200),
        }
    }

    async fn constituents(&self) -> FetchResult<Vec<Constituent>> {
        let rows: Option<Vec<ConstituentRow>> =
            self.fetch_rows("api/v3/sp500_constituent", &[]).await?;
        Ok(rows.and_then(constituents_from_rows))
    }

    async fn market_caps(&self, symbols: &[String]) -> FetchResult<HashMap<String, Decimal>> {
        if symbols.is_empty() {
            return Ok(None);
        }
        let endpoint = format!("api/v3/market-capitalization/{}", symbol_path(symbols));
        let rows: Option<Vec<MarketCapRow>> = self.fetch_rows(&endpoint, &[]).await?;

        Ok(rows.and_then(|rows| {
            let caps: HashMap<String, Decimal> = rows
                .into_iter()
                .filter_map(|row| row.market_cap.map(|cap| (row.symbol, cap)))
                .collect();
            (!caps.is_empty()).then_some(caps)
        }))
    }

    async fn quotes(&self, symbols: &[String]) -> FetchResult<HashMap<String, QuoteSnapshot>> {
        if symbols.is_empty() {
            return Ok(None);
        }
        let endpoint = format!("api/v3/quote/{}", symbol_path(symbols));
        let rows: Option<Vec<QuoteRow>> = self.fetch_rows(&endpoint, &[]).await?;

        Ok(rows.and_then(|rows| {
            let quotes: HashMap<String, QuoteSnapshot> = rows
                .into_iter()
                .filter_map(|row| {
                    let price = row.price?;
                    Some((
                        row.symbol.clone(),
                        QuoteSnapshot {
                            symbol: row.symbol,
                            price,
                            change_percent: row.changes_percentage,
                        },
                    ))
                })
                .collect();
            (!quotes.is_empty()).then_some(quotes)
        }))
    }

    async fn sector_pe_snapshot(&self, date: Option<NaiveDate>) -> FetchResult<SectorPeSnapshot> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let mut params = vec![("date", date.format(DATE_FORMAT).to_string())];
        self.exchange_param(&mut params);

        let rows: Option<Vec<SectorPeRow>> =
            self.fetch_rows("stable/sector-pe-snapshot", &params).await?;
        Ok(rows.and_then(snapshot_from_rows))
    }

    async fn sector_pe_history(
        &self,
        sector: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> FetchResult<Vec<PeHistoryPoint>> {
        if from > to {
            return Err(MarketDataError::InvalidRequest(format!(
                "history window starts after it ends: {} > {}",
                from, to
            )));
        }
        let mut params = vec![
            ("sector", sector.trim().to_string()),
            ("from", from.format(DATE_FORMAT).to_string()),
            ("to", to.format(DATE_FORMAT).to_string()),
        ];
        self.exchange_param(&mut params);

        let rows: Option<Vec<SectorPeRow>> =
            self.fetch_rows("stable/historical-sector-pe", &params).await?;
        Ok(rows.and_then(history_from_rows))
    }

    async fn moving_average_sample(
        &self,
        symbol: &str,
        period: u32,
    ) -> FetchResult<MovingAverageSample> {
        let params = [
            ("symbol", symbol.to_string()),
            ("periodLength", period.to_string()),
            ("timeframe", "1day".to_string()),
        ];
        let rows: Option<Vec<SmaRow>> = self
            .fetch_rows("stable/technical-indicators/sma", &params)
            .await?;
        Ok(rows.and_then(|rows| latest_sma_sample(symbol, rows)))
    }

    async fn proxy_roi(&self, symbol: &str, horizons: &[RoiHorizon]) -> FetchResult<RoiValues> {
        let endpoint = format!(
            "api/v3/stock-price-change/{}",
            urlencoding::encode(symbol.trim())
        );
        let rows: Option<Vec<PriceChangeRow>> = self.fetch_rows(&endpoint, &[]).await?;
        Ok(rows
            .and_then(|rows| rows.into_iter().next())
            .and_then(|row| roi_from_row(&row, horizons)))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Decode an FMP body into rows. Empty arrays, empty objects and `null`
/// mean "no data"; an object carrying "Error Message" is a provider error.
fn parse_rows<T: DeserializeOwned>(body: &str) -> FetchResult<Vec<T>> {
    let value: Value = serde_json::from_str(body).map_err(|e| MarketDataError::InvalidResponse {
        provider: PROVIDER_ID.to_string(),
        message: e.to_string(),
    })?;

    match value {
        Value::Null => Ok(None),
        Value::Array(ref items) if items.is_empty() => Ok(None),
        Value::Array(_) => serde_json::from_value::<Vec<T>>(value)
            .map(Some)
            .map_err(|e| MarketDataError::InvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            }),
        Value::Object(ref map) if map.is_empty() => Ok(None),
        Value::Object(map) => match map.get("Error Message").and_then(Value::as_str) {
            Some(message) => Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: message.to_string(),
            }),
            None => Err(MarketDataError::InvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: "expected a JSON array".to_string(),
            }),
        },
        other => Err(MarketDataError::InvalidResponse {
            provider: PROVIDER_ID.to_string(),
            message: format!("unexpected JSON value: {}", other),
        }),
    }
}

/// Classify a transport failure. The URL is stripped because it carries
/// the API key.
fn request_error(error: reqwest::Error) -> MarketDataError {
    if error.is_timeout() {
        MarketDataError::Timeout {
            provider: PROVIDER_ID.to_string(),
        }
    } else {
        MarketDataError::Network(error.without_url())
    }
}

/// Comma-separated, individually escaped symbol list for path segments.
fn symbol_path(symbols: &[String]) -> String {
    symbols
        .iter()
        .map(|s| urlencoding::encode(s.trim()).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

/// FMP dates come as "YYYY-MM-DD" or "YYYY-MM-DD HH:MM:SS".
fn parse_date(raw: &str) -> Option<NaiveDate> {
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, DATE_FORMAT).ok())
}

fn constituents_from_rows(rows: Vec<ConstituentRow>) -> Option<Vec<Constituent>> {
    let mut constituents = Vec::with_capacity(rows.len());
    for row in rows {
        let symbol = row.symbol.map(|s| s.trim().to_string()).unwrap_or_default();
        let sector = row.sector.map(|s| s.trim().to_string()).unwrap_or_default();
        if symbol.is_empty() || sector.is_empty() {
            warn!("Skipping constituent row without symbol or sector: {:?}", symbol);
            continue;
        }
        constituents.push(Constituent {
            symbol,
            name: row.name,
            sector,
            sub_sector: row.sub_sector,
        });
    }
    (!constituents.is_empty()).then_some(constituents)
}

fn snapshot_from_rows(rows: Vec<SectorPeRow>) -> Option<SectorPeSnapshot> {
    let mut snapshot = SectorPeSnapshot::default();
    for row in rows {
        let Some(pe) = row.pe.filter(|pe| pe.is_finite()) else {
            continue;
        };
        if snapshot.date.is_none() {
            snapshot.date = parse_date(&row.date);
        }
        let sector = row.sector.trim().to_string();
        if snapshot.values.contains_key(&sector) {
            debug!(
                "Duplicate P/E row for '{}' ({:?}), keeping the first",
                sector, row.exchange
            );
            continue;
        }
        snapshot.values.insert(sector, pe);
    }
    (!snapshot.is_empty()).then_some(snapshot)
}

fn history_from_rows(rows: Vec<SectorPeRow>) -> Option<Vec<PeHistoryPoint>> {
    let points: Vec<PeHistoryPoint> = rows
        .into_iter()
        .filter_map(|row| {
            let date = parse_date(&row.date)?;
            let pe = row.pe.filter(|pe| pe.is_finite())?;
            Some(PeHistoryPoint::new(date, pe))
        })
        .collect();
    (!points.is_empty()).then_some(points)
}

/// Picks the most recent bar that carries both a close and an average.
fn latest_sma_sample(symbol: &str, rows: Vec<SmaRow>) -> Option<MovingAverageSample> {
    rows.into_iter()
        .filter_map(|row| {
            let close = row.close?;
            let sma = row.sma?;
            Some(MovingAverageSample {
                symbol: symbol.to_string(),
                date: parse_date(&row.date),
                close,
                sma,
            })
        })
        .max_by_key(|sample| sample.date)
}

fn roi_from_row(row: &PriceChangeRow, horizons: &[RoiHorizon]) -> Option<RoiValues> {
    let values: RoiValues = horizons
        .iter()
        .filter_map(|horizon| {
            let value = match horizon {
                RoiHorizon::OneDay => row.one_day,
                RoiHorizon::FiveDays => row.five_days,
                RoiHorizon::OneMonth => row.one_month,
                RoiHorizon::ThreeMonths => row.three_months,
                RoiHorizon::SixMonths => row.six_months,
                RoiHorizon::OneYear => row.one_year,
            }?;
            value.is_finite().then_some((*horizon, value))
        })
        .collect();
    (!values.is_empty()).then_some(values)
}

// ============================================================================
// Tests
// ============================================================================
