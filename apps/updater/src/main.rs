mod config;
mod main_lib;
mod scheduler;

use config::Config;
use main_lib::{build_pipeline, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_format);
    let pipeline = build_pipeline(&config)?;

    if config.run_once {
        let summary = pipeline.run().await?;
        tracing::info!("{}", serde_json::to_string(&summary)?);
        return Ok(());
    }

    scheduler::run_daily(pipeline, config.schedule_hour_utc).await;
    Ok(())
}
