use std::sync::Arc;

use log::debug;

use sectorwatch_market_data::{MarketDataGateway, RoiHorizon};

use crate::roi::roi_model::RoiSummary;
use crate::sectors::SectorProxyTable;
use crate::utils::settle;

pub struct BenchmarkRoiCollector {
    gateway: Arc<dyn MarketDataGateway>,
    proxies: Arc<SectorProxyTable>,
}

impl BenchmarkRoiCollector {
    pub fn new(gateway: Arc<dyn MarketDataGateway>, proxies: Arc<SectorProxyTable>) -> Self {
        Self { gateway, proxies }
    }

    /// Returns of the sector's proxy fund. `None` for sectors outside the
    /// proxy table or when the lookup yields nothing.
    pub async fn collect(&self, sector: &str) -> Option<RoiSummary> {
        let Some(symbol) = self.proxies.proxy_for(sector) else {
            debug!("No proxy fund for sector '{}'", sector);
            return None;
        };
        self.fetch(symbol).await
    }

    pub async fn collect_benchmark(&self) -> Option<RoiSummary> {
        self.fetch(self.proxies.benchmark_symbol()).await
    }

    async fn fetch(&self, symbol: &str) -> Option<RoiSummary> {
        let what = format!("ROI for {}", symbol);
        settle(
            self.gateway.proxy_roi(symbol, &RoiHorizon::ALL).await,
            &what,
        )
        .filter(|values| !values.is_empty())
        .map(|values| RoiSummary {
            symbol: symbol.to_string(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockGateway;

    fn collector(gateway: MockGateway) -> BenchmarkRoiCollector {
        let table = SectorProxyTable::standard().unwrap();
        BenchmarkRoiCollector::new(Arc::new(gateway), Arc::new(table))
    }

    #[tokio::test]
    async fn test_collect_uses_sector_proxy() {
        let collector = collector(MockGateway::new().with_roi("XLE", 12.5));

        let roi = collector.collect(" Energy ").await.unwrap();

        assert_eq!(roi.symbol, "XLE");
        assert_eq!(roi.values.get(&RoiHorizon::OneYear), Some(&12.5));
    }

    #[tokio::test]
    async fn test_unknown_sector_is_absent_without_a_call() {
        let gateway = Arc::new(MockGateway::new().with_roi("XLE", 12.5));
        let table = Arc::new(SectorProxyTable::standard().unwrap());
        let collector = BenchmarkRoiCollector::new(gateway.clone(), table);

        assert!(collector.collect("Crypto").await.is_none());
        assert_eq!(gateway.count_calls("proxy_roi:"), 0);
    }

    #[tokio::test]
    async fn test_failed_proxy_is_absent() {
        let mut gateway = MockGateway::new().with_roi("XLE", 12.5);
        gateway.fail_roi_for.insert("XLE".to_string());

        assert!(collector(gateway).collect("Energy").await.is_none());
    }

    #[tokio::test]
    async fn test_benchmark_uses_spy() {
        let collector = collector(MockGateway::new().with_roi("SPY", 24.0));

        let roi = collector.collect_benchmark().await.unwrap();

        assert_eq!(roi.symbol, "SPY");
    }
}
