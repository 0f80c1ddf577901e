use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Latest close of a symbol next to its simple moving average.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageSample {
    pub symbol: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    pub close: f64,

    /// Simple moving average over the requested period
    pub sma: f64,
}

impl MovingAverageSample {
    /// Strictly above; a close equal to the average does not count.
    pub fn is_above(&self) -> bool {
        self.close > self.sma
    }

    /// Both values are finite and the average is positive.
    pub fn is_usable(&self) -> bool {
        self.close.is_finite() && self.sma.is_finite() && self.sma > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(close: f64, sma: f64) -> MovingAverageSample {
        MovingAverageSample {
            symbol: "XOM".to_string(),
            date: None,
            close,
            sma,
        }
    }

    #[test]
    fn test_is_above_is_strict() {
        assert!(sample(101.0, 100.0).is_above());
        assert!(!sample(100.0, 100.0).is_above());
        assert!(!sample(99.0, 100.0).is_above());
    }

    #[test]
    fn test_is_usable() {
        assert!(sample(10.0, 9.0).is_usable());
        assert!(!sample(10.0, 0.0).is_usable());
        assert!(!sample(f64::NAN, 9.0).is_usable());
    }
}
