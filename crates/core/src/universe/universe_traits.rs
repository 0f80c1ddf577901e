use async_trait::async_trait;

use crate::errors::Result;
use crate::universe::universe_model::Equity;

/// Source of the tracked equity universe.
#[async_trait]
pub trait UniverseProviderTrait: Send + Sync {
    /// Current constituents with their canonical sector.
    ///
    /// An empty or failed feed is `Error::UpstreamUnavailable`: without a
    /// universe there is nothing to group, so the run stops here.
    async fn fetch_universe(&self) -> Result<Vec<Equity>>;
}
