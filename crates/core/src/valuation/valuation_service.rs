use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use log::debug;

use sectorwatch_market_data::{MarketDataGateway, PeHistoryPoint, SectorPeSnapshot};

use crate::valuation::valuation_model::{summarize_series, ValuationSummary};
use crate::utils::settle;

/// P/E analytics per sector.
///
/// The cross-sector snapshot is fetched once per run through
/// [`ValuationAnalytics::fetch_snapshot`] and handed to every
/// [`ValuationAnalytics::summarize`] call.
pub struct ValuationAnalytics {
    gateway: Arc<dyn MarketDataGateway>,
    history_days: i64,
    lookback_days: i64,
}

impl ValuationAnalytics {
    pub fn new(gateway: Arc<dyn MarketDataGateway>, history_days: i64, lookback_days: i64) -> Self {
        Self {
            gateway,
            history_days,
            lookback_days,
        }
    }

    pub async fn fetch_snapshot(&self, date: NaiveDate) -> Option<SectorPeSnapshot> {
        settle(
            self.gateway.sector_pe_snapshot(Some(date)).await,
            "sector P/E snapshot",
        )
        .filter(|snapshot| !snapshot.is_empty())
    }

    /// Summarize `sector` as of `today`.
    pub async fn summarize(
        &self,
        sector: &str,
        snapshot: Option<&SectorPeSnapshot>,
        today: NaiveDate,
    ) -> ValuationSummary {
        let from = today - Duration::days(self.history_days);
        let what = format!("P/E history for {}", sector);
        let history = settle(
            self.gateway.sector_pe_history(sector, from, today).await,
            &what,
        )
        .unwrap_or_default();

        let overlay = snapshot.and_then(|snapshot| {
            snapshot
                .pe_for(sector)
                .map(|pe| PeHistoryPoint::new(snapshot.date.unwrap_or(today), pe))
        });

        debug!(
            "{}: {} history points, snapshot {}",
            sector,
            history.len(),
            if overlay.is_some() { "present" } else { "absent" }
        );

        summarize_series(&history, overlay, self.lookback_days)
    }
}
