use std::sync::Arc;

use log::{debug, info};

use sectorwatch_market_data::MarketDataGateway;

use crate::errors::Result;
use crate::ranking::ranking_model::{rank_by_market_cap, SectorRanking};
use crate::universe::Equity;
use crate::utils::settle;

/// Ranks a sector's constituents and prices the winners.
///
/// Two gateway calls per sector: one market cap batch for every constituent,
/// one quote batch for the top `k` only.
pub struct SectorAggregator {
    gateway: Arc<dyn MarketDataGateway>,
}

impl SectorAggregator {
    pub fn new(gateway: Arc<dyn MarketDataGateway>) -> Self {
        Self { gateway }
    }

    /// Top `k` equities of `sector` with quotes attached where available.
    ///
    /// A failed cap batch is returned as an error so the caller can skip the
    /// sector. An empty cap batch yields `Ok(None)`. A failed or empty quote
    /// batch leaves prices unset but still produces the ranking.
    pub async fn rank_top_k(
        &self,
        sector: &str,
        equities: &[Equity],
        k: usize,
    ) -> Result<Option<SectorRanking>> {
        if equities.is_empty() || k == 0 {
            debug!("Nothing to rank for {}", sector);
            return Ok(None);
        }

        let symbols: Vec<String> = equities.iter().map(|e| e.symbol.clone()).collect();
        let caps = match self.gateway.market_caps(&symbols).await? {
            Some(caps) => caps,
            None => {
                info!("No market caps returned for {}, skipping ranking", sector);
                return Ok(None);
            }
        };

        let mut top_stocks = rank_by_market_cap(equities, &caps, k);

        let top_symbols: Vec<String> = top_stocks.iter().map(|e| e.symbol.clone()).collect();
        let what = format!("quotes for {}", sector);
        if let Some(quotes) = settle(self.gateway.quotes(&top_symbols).await, &what) {
            for equity in top_stocks.iter_mut() {
                if let Some(quote) = quotes.get(&equity.symbol) {
                    equity.apply_quote(quote);
                }
            }
        }

        debug!(
            "Ranked {} of {} constituents for {}",
            top_stocks.len(),
            equities.len(),
            sector
        );

        Ok(Some(SectorRanking {
            sector: sector.to_string(),
            top_stocks,
        }))
    }
}
