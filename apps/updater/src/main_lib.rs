use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use sectorwatch_core::{
    records::RecordStoreTrait, universe::GatewayUniverseProvider, InMemoryRecordStore,
    PipelineConfig, PipelineOrchestrator, SectorProxyTable,
};
use sectorwatch_market_data::{
    FixedIntervalPacer, FmpProvider, MarketDataGateway, Pacer, RateLimitConfig, TokenBucketPacer,
};
use sectorwatch_storage_sqlite::{db, SqliteRecordStore};

use crate::config::Config;

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

fn build_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStoreTrait>> {
    if config.dry_run {
        tracing::warn!("Dry run: results are kept in memory only");
        return Ok(Arc::new(InMemoryRecordStore::new()));
    }

    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    Ok(Arc::new(SqliteRecordStore::new(pool, writer)))
}

pub fn build_pipeline(config: &Config) -> anyhow::Result<PipelineOrchestrator> {
    let mut provider =
        FmpProvider::new(config.fmp_api_key.clone()).with_pe_exchange(config.pe_exchange.clone());
    if let Some(base_url) = &config.fmp_base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    let gateway: Arc<dyn MarketDataGateway> = Arc::new(provider);

    let limit = gateway.rate_limit();
    tracing::info!(
        "Market data provider {} ({} req/min)",
        gateway.id(),
        limit.requests_per_minute
    );
    let pacer: Arc<dyn Pacer> = match config.breadth_requests_per_minute {
        Some(rpm) => {
            let rpm = rpm.clamp(1, limit.requests_per_minute);
            tracing::info!("Breadth paced by token bucket at {} req/min", rpm);
            Arc::new(TokenBucketPacer::new(RateLimitConfig {
                requests_per_minute: rpm,
                burst_capacity: 1.0,
            }))
        }
        None => {
            let interval = config.breadth_interval.max(limit.min_delay);
            tracing::info!("Breadth paced at one call per {:?}", interval);
            Arc::new(FixedIntervalPacer::new(interval))
        }
    };

    let proxies = Arc::new(SectorProxyTable::standard()?);
    let universe = Arc::new(GatewayUniverseProvider::new(gateway.clone()));
    let pipeline_config = PipelineConfig::default().with_top_k(config.top_k);

    let pipeline = PipelineOrchestrator::new(
        universe,
        gateway,
        build_store(config)?,
        proxies,
        pacer,
        pipeline_config,
    )?;
    Ok(pipeline)
}
