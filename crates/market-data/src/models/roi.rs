use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed return horizons tracked for every proxy instrument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoiHorizon {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "5D")]
    FiveDays,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl RoiHorizon {
    pub const ALL: [RoiHorizon; 6] = [
        RoiHorizon::OneDay,
        RoiHorizon::FiveDays,
        RoiHorizon::OneMonth,
        RoiHorizon::ThreeMonths,
        RoiHorizon::SixMonths,
        RoiHorizon::OneYear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RoiHorizon::OneDay => "1D",
            RoiHorizon::FiveDays => "5D",
            RoiHorizon::OneMonth => "1M",
            RoiHorizon::ThreeMonths => "3M",
            RoiHorizon::SixMonths => "6M",
            RoiHorizon::OneYear => "1Y",
        }
    }
}

impl fmt::Display for RoiHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Percentage return per horizon. Horizons the provider did not report are absent.
pub type RoiValues = BTreeMap<RoiHorizon, f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_serde_names() {
        for horizon in RoiHorizon::ALL {
            let json = serde_json::to_string(&horizon).unwrap();
            assert_eq!(json, format!("\"{}\"", horizon.label()));
        }
    }

    #[test]
    fn test_values_serialize_as_label_map() {
        let mut values = RoiValues::new();
        values.insert(RoiHorizon::OneYear, 12.5);
        values.insert(RoiHorizon::OneDay, -0.4);

        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json["1D"], -0.4);
        assert_eq!(json["1Y"], 12.5);
    }
}
