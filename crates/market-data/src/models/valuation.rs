use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's sector P/E ratio.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeHistoryPoint {
    pub date: NaiveDate,
    pub pe: f64,
}

impl PeHistoryPoint {
    pub fn new(date: NaiveDate, pe: f64) -> Self {
        Self { date, pe }
    }
}

/// Cross-sector P/E snapshot for a single date.
///
/// Keyed by the provider's sector display name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectorPeSnapshot {
    pub date: Option<NaiveDate>,
    pub values: HashMap<String, f64>,
}

impl SectorPeSnapshot {
    /// P/E for a sector, ignoring surrounding whitespace in the lookup key.
    pub fn pe_for(&self, sector: &str) -> Option<f64> {
        self.values.get(sector.trim()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pe_for_trims_key() {
        let mut values = HashMap::new();
        values.insert("Energy".to_string(), 14.2);
        let snapshot = SectorPeSnapshot { date: None, values };

        assert_eq!(snapshot.pe_for(" Energy "), Some(14.2));
        assert_eq!(snapshot.pe_for("Utilities"), None);
    }
}
