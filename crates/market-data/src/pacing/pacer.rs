use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::debug;
use tokio::sync::Mutex;

/// Gate awaited before every paced outbound call.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Returns once the caller may issue its next request.
    async fn wait(&self);
}

/// Lets every call through immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPacing;

#[async_trait]
impl Pacer for NoPacing {
    async fn wait(&self) {}
}

/// Enforces a minimum interval between successive calls.
///
/// The first call passes immediately; every later call waits until
/// `interval` has elapsed since the previous one was let through.
#[derive(Debug)]
pub struct FixedIntervalPacer {
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl FixedIntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl Pacer for FixedIntervalPacer {
    async fn wait(&self) {
        // Held across the sleep so concurrent callers queue up in order
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                let remaining = self.interval - elapsed;
                debug!("Pacer: waiting {:?} before next call", remaining);
                tokio::time::sleep(remaining).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}
