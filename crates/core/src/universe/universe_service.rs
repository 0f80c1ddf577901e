use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info};

use sectorwatch_market_data::MarketDataGateway;

use crate::errors::{Error, Result};
use crate::universe::universe_model::Equity;
use crate::universe::universe_traits::UniverseProviderTrait;

/// Universe backed by the gateway's constituent list.
pub struct GatewayUniverseProvider {
    gateway: Arc<dyn MarketDataGateway>,
}

impl GatewayUniverseProvider {
    pub fn new(gateway: Arc<dyn MarketDataGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl UniverseProviderTrait for GatewayUniverseProvider {
    async fn fetch_universe(&self) -> Result<Vec<Equity>> {
        debug!("Fetching constituents from {}", self.gateway.id());

        let constituents = match self.gateway.constituents().await {
            Ok(Some(constituents)) => constituents,
            Ok(None) => {
                error!("Constituent feed from {} was empty", self.gateway.id());
                return Err(Error::UpstreamUnavailable(
                    "constituent feed returned no data".to_string(),
                ));
            }
            Err(e) => {
                error!("Constituent feed from {} failed: {}", self.gateway.id(), e);
                return Err(Error::UpstreamUnavailable(format!(
                    "constituent feed failed: {}",
                    e
                )));
            }
        };

        let equities: Vec<Equity> = constituents
            .into_iter()
            .map(Equity::from)
            .filter(|equity| !equity.symbol.is_empty() && !equity.sector.is_empty())
            .collect();

        if equities.is_empty() {
            return Err(Error::UpstreamUnavailable(
                "constituent feed had no usable rows".to_string(),
            ));
        }

        info!("Fetched {} constituents", equities.len());
        Ok(equities)
    }
}
