use serde::{Deserialize, Serialize};

use crate::utils::round_to;

/// Tally of one sector's moving-average samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadthSummary {
    /// Symbols with a usable sample
    pub sampled: usize,
    /// Sampled symbols whose close is strictly above the average
    pub above: usize,
    /// Symbols whose lookup failed or came back empty
    pub failed: usize,
}

impl BreadthSummary {
    pub fn record(&mut self, above: bool) {
        self.sampled += 1;
        if above {
            self.above += 1;
        }
    }

    pub fn record_missing(&mut self) {
        self.failed += 1;
    }

    /// Percent above, to one decimal. `None` when nothing was sampled.
    pub fn market_breadth_pct(&self) -> Option<f64> {
        if self.sampled == 0 {
            return None;
        }
        Some(round_to(
            100.0 * self.above as f64 / self.sampled as f64,
            1,
        ))
    }
}
