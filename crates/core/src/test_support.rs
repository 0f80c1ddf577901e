//! Scriptable gateway shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use sectorwatch_market_data::{
    Constituent, FetchResult, MarketDataError, MarketDataGateway, MovingAverageSample,
    PeHistoryPoint, QuoteSnapshot, RoiHorizon, RoiValues, SectorPeSnapshot,
};

fn unavailable<T>(what: &str) -> FetchResult<T> {
    Err(MarketDataError::ProviderError {
        provider: "MOCK".to_string(),
        message: format!("{} unavailable", what),
    })
}

#[derive(Default)]
pub struct MockGateway {
    pub constituents: Option<Vec<Constituent>>,
    pub fail_constituents: bool,
    pub caps: HashMap<String, Decimal>,
    pub fail_caps_for: HashSet<String>,
    pub quotes: HashMap<String, QuoteSnapshot>,
    pub fail_quotes: bool,
    pub snapshot: Option<SectorPeSnapshot>,
    pub history: HashMap<String, Vec<PeHistoryPoint>>,
    pub fail_history_for: HashSet<String>,
    pub samples: HashMap<String, MovingAverageSample>,
    pub fail_samples_for: HashSet<String>,
    pub roi: HashMap<String, RoiValues>,
    pub fail_roi_for: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constituent(mut self, symbol: &str, sector: &str) -> Self {
        self.constituents
            .get_or_insert_with(Vec::new)
            .push(Constituent::new(symbol, sector));
        self
    }

    pub fn with_cap(mut self, symbol: &str, cap: Decimal) -> Self {
        self.caps.insert(symbol.to_string(), cap);
        self
    }

    pub fn with_quote(mut self, symbol: &str, price: Decimal, change: Decimal) -> Self {
        self.quotes.insert(
            symbol.to_string(),
            QuoteSnapshot {
                symbol: symbol.to_string(),
                price,
                change_percent: Some(change),
            },
        );
        self
    }

    pub fn with_snapshot(mut self, date: NaiveDate, values: &[(&str, f64)]) -> Self {
        self.snapshot = Some(SectorPeSnapshot {
            date: Some(date),
            values: values
                .iter()
                .map(|(sector, pe)| (sector.to_string(), *pe))
                .collect(),
        });
        self
    }

    pub fn with_history(mut self, sector: &str, points: &[(NaiveDate, f64)]) -> Self {
        self.history.insert(
            sector.to_string(),
            points
                .iter()
                .map(|(date, pe)| PeHistoryPoint::new(*date, *pe))
                .collect(),
        );
        self
    }

    pub fn with_sample(mut self, symbol: &str, close: f64, sma: f64) -> Self {
        self.samples.insert(
            symbol.to_string(),
            MovingAverageSample {
                symbol: symbol.to_string(),
                date: None,
                close,
                sma,
            },
        );
        self
    }

    pub fn with_roi(mut self, symbol: &str, one_year: f64) -> Self {
        let mut values = RoiValues::new();
        values.insert(RoiHorizon::OneDay, 0.5);
        values.insert(RoiHorizon::OneYear, one_year);
        self.roi.insert(symbol.to_string(), values);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MarketDataGateway for MockGateway {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn constituents(&self) -> FetchResult<Vec<Constituent>> {
        self.record("constituents".to_string());
        if self.fail_constituents {
            return unavailable("constituents");
        }
        Ok(self.constituents.clone())
    }

    async fn market_caps(&self, symbols: &[String]) -> FetchResult<HashMap<String, Decimal>> {
        self.record(format!("market_caps:{}", symbols.join(",")));
        if symbols.iter().any(|s| self.fail_caps_for.contains(s)) {
            return unavailable("market caps");
        }
        let caps: HashMap<String, Decimal> = symbols
            .iter()
            .filter_map(|s| self.caps.get(s).map(|cap| (s.clone(), *cap)))
            .collect();
        Ok(if caps.is_empty() { None } else { Some(caps) })
    }

    async fn quotes(&self, symbols: &[String]) -> FetchResult<HashMap<String, QuoteSnapshot>> {
        self.record(format!("quotes:{}", symbols.join(",")));
        if self.fail_quotes {
            return unavailable("quotes");
        }
        let quotes: HashMap<String, QuoteSnapshot> = symbols
            .iter()
            .filter_map(|s| self.quotes.get(s).map(|q| (s.clone(), q.clone())))
            .collect();
        Ok(if quotes.is_empty() { None } else { Some(quotes) })
    }

    async fn sector_pe_snapshot(&self, _date: Option<NaiveDate>) -> FetchResult<SectorPeSnapshot> {
        self.record("sector_pe_snapshot".to_string());
        Ok(self.snapshot.clone())
    }

    async fn sector_pe_history(
        &self,
        sector: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> FetchResult<Vec<PeHistoryPoint>> {
        self.record(format!("sector_pe_history:{}", sector));
        if self.fail_history_for.contains(sector) {
            return unavailable("history");
        }
        Ok(self.history.get(sector).map(|points| {
            points
                .iter()
                .filter(|p| p.date >= from && p.date <= to)
                .cloned()
                .collect()
        }))
    }

    async fn moving_average_sample(
        &self,
        symbol: &str,
        _period: u32,
    ) -> FetchResult<MovingAverageSample> {
        self.record(format!("moving_average_sample:{}", symbol));
        if self.fail_samples_for.contains(symbol) {
            return unavailable("moving average");
        }
        Ok(self.samples.get(symbol).cloned())
    }

    async fn proxy_roi(&self, symbol: &str, _horizons: &[RoiHorizon]) -> FetchResult<RoiValues> {
        self.record(format!("proxy_roi:{}", symbol));
        if self.fail_roi_for.contains(symbol) {
            return unavailable("roi");
        }
        Ok(self.roi.get(symbol).cloned())
    }
}
