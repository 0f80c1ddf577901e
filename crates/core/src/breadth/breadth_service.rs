use std::sync::Arc;

use log::{debug, info};

use sectorwatch_market_data::{MarketDataGateway, Pacer};

use crate::breadth::breadth_model::BreadthSummary;
use crate::utils::settle;

/// Samples every constituent's close against its moving average.
///
/// One gateway call per symbol, each preceded by `pacer.wait()`. This is
/// the slow part of a run, bounded by the provider's rate budget.
pub struct BreadthCalculator {
    gateway: Arc<dyn MarketDataGateway>,
    pacer: Arc<dyn Pacer>,
    period: u32,
}

impl BreadthCalculator {
    pub fn new(gateway: Arc<dyn MarketDataGateway>, pacer: Arc<dyn Pacer>, period: u32) -> Self {
        Self {
            gateway,
            pacer,
            period,
        }
    }

    pub async fn compute_breadth(&self, sector: &str, symbols: &[String]) -> BreadthSummary {
        let mut summary = BreadthSummary::default();

        for symbol in symbols {
            self.pacer.wait().await;

            let what = format!("SMA{} sample for {}", self.period, symbol);
            match settle(
                self.gateway.moving_average_sample(symbol, self.period).await,
                &what,
            ) {
                Some(sample) if sample.is_usable() => summary.record(sample.is_above()),
                Some(_) => {
                    debug!("Discarding unusable sample for {}", symbol);
                    summary.record_missing();
                }
                None => summary.record_missing(),
            }
        }

        info!(
            "{}: {} of {} sampled above SMA{} ({} without data)",
            sector, summary.above, summary.sampled, self.period, summary.failed
        );
        summary
    }
}
