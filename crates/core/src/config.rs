//! Pipeline tuning knobs.
//!
//! Loading these from the environment is the binary's job; the core only
//! validates them.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_TOP_K, MAX_TOP_K, PE_HISTORY_DAYS, SMA_PERIOD, WEEKLY_LOOKBACK_DAYS,
};
use crate::errors::{Error, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Constituents kept per sector ranking
    pub top_k: usize,
    /// Trailing P/E history window, in days
    pub pe_history_days: i64,
    /// Distance of the "week ago" P/E sample, in days
    pub weekly_lookback_days: i64,
    /// Moving average period for breadth sampling
    pub sma_period: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            pe_history_days: PE_HISTORY_DAYS,
            weekly_lookback_days: WEEKLY_LOOKBACK_DAYS,
            sma_period: SMA_PERIOD,
        }
    }
}

impl PipelineConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 || self.top_k > MAX_TOP_K {
            return Err(Error::InvalidConfigValue(format!(
                "top_k must be between 1 and {}, got {}",
                MAX_TOP_K, self.top_k
            )));
        }
        if self.weekly_lookback_days <= 0 {
            return Err(Error::InvalidConfigValue(format!(
                "weekly_lookback_days must be positive, got {}",
                self.weekly_lookback_days
            )));
        }
        if self.pe_history_days < self.weekly_lookback_days {
            return Err(Error::InvalidConfigValue(format!(
                "pe_history_days ({}) must cover the weekly lookback ({})",
                self.pe_history_days, self.weekly_lookback_days
            )));
        }
        if self.sma_period < 2 {
            return Err(Error::InvalidConfigValue(format!(
                "sma_period must be at least 2, got {}",
                self.sma_period
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_top_k_bounds() {
        assert!(PipelineConfig::default().with_top_k(0).validate().is_err());
        assert!(PipelineConfig::default().with_top_k(5).validate().is_ok());
        assert!(PipelineConfig::default()
            .with_top_k(MAX_TOP_K + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_history_must_cover_lookback() {
        let config = PipelineConfig {
            pe_history_days: 3,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfigValue(_))
        ));
    }
}
