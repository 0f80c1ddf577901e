use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};

use sectorwatch_core::constants::DEFAULT_TOP_K;

const DEFAULT_DB_PATH: &str = "./data/sectorwatch.db";
const DEFAULT_BREADTH_INTERVAL_MS: u64 = 250;
const DEFAULT_PE_EXCHANGE: &str = "NYSE";
/// 07:00 in Asia/Taipei
const DEFAULT_SCHEDULE_HOUR_UTC: u32 = 23;

pub struct Config {
    pub fmp_api_key: String,
    pub fmp_base_url: Option<String>,
    pub db_path: String,
    /// Keep everything in memory and write nothing to disk
    pub dry_run: bool,
    pub top_k: usize,
    pub breadth_interval: Duration,
    /// Per-minute budget; when set, breadth uses a token bucket instead of
    /// the fixed interval
    pub breadth_requests_per_minute: Option<u32>,
    pub pe_exchange: Option<String>,
    pub run_once: bool,
    pub schedule_hour_utc: u32,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let fmp_api_key = lookup("FMP_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow!("FMP_API_KEY is not set"))?;

        let schedule_hour_utc: u32 =
            parse_or(&lookup, "SW_SCHEDULE_HOUR_UTC", DEFAULT_SCHEDULE_HOUR_UTC)?;
        if schedule_hour_utc > 23 {
            return Err(anyhow!(
                "SW_SCHEDULE_HOUR_UTC must be between 0 and 23, got {}",
                schedule_hour_utc
            ));
        }

        let pe_exchange = match lookup("SW_PE_EXCHANGE") {
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(value.trim().to_uppercase()),
            None => Some(DEFAULT_PE_EXCHANGE.to_string()),
        };

        Ok(Self {
            fmp_api_key,
            fmp_base_url: lookup("SW_FMP_BASE_URL").filter(|url| !url.trim().is_empty()),
            db_path: lookup("SW_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into()),
            dry_run: flag(&lookup, "SW_DRY_RUN"),
            top_k: parse_or(&lookup, "SW_TOP_K", DEFAULT_TOP_K)?,
            breadth_interval: Duration::from_millis(parse_or(
                &lookup,
                "SW_BREADTH_INTERVAL_MS",
                DEFAULT_BREADTH_INTERVAL_MS,
            )?),
            breadth_requests_per_minute: match lookup("SW_BREADTH_RPM") {
                Some(raw) => Some(
                    raw.trim()
                        .parse()
                        .with_context(|| format!("Invalid SW_BREADTH_RPM: '{}'", raw))?,
                ),
                None => None,
            },
            pe_exchange,
            run_once: flag(&lookup, "SW_RUN_ONCE"),
            schedule_hour_utc,
            log_format: lookup("SW_LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: '{}'", key, raw)),
        None => Ok(default),
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    lookup(key)
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
