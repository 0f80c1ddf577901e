//! Daily trigger for the updater run.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::{error, info};

use sectorwatch_core::PipelineOrchestrator;

/// First instant at `hour:00` UTC strictly after `now`.
pub fn next_run_after(now: DateTime<Utc>, hour: u32) -> DateTime<Utc> {
    let at = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or_default();
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Run the pipeline every day at `hour` UTC. Never returns.
pub async fn run_daily(pipeline: PipelineOrchestrator, hour: u32) {
    info!("Sector updater scheduled daily at {:02}:00 UTC", hour);

    loop {
        let now = Utc::now();
        let next = next_run_after(now, hour);
        let wait = (next - now).to_std().unwrap_or_default();
        info!("Next run at {}", next.to_rfc3339());
        tokio::time::sleep(wait).await;

        match pipeline.run().await {
            Ok(summary) => info!(
                "Run {} done: {} sectors, all batches committed: {}",
                summary.run_id,
                summary.sector_count,
                summary.all_committed()
            ),
            // Only the universe fetch can fail a run; try again tomorrow.
            Err(e) => error!("Sector update run aborted: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_next_run_later_today() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(
            next_run_after(now, 23),
            Utc.with_ymd_and_hms(2024, 1, 15, 23, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_next_run_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 23, 0, 0).unwrap();
        assert_eq!(
            next_run_after(now, 23),
            Utc.with_ymd_and_hms(2024, 1, 16, 23, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_next_run_crosses_month_end() {
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 0).unwrap();
        assert_eq!(
            next_run_after(now, 6),
            Utc.with_ymd_and_hms(2024, 2, 1, 6, 0, 0).unwrap()
        );
    }
}
