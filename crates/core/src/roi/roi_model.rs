use serde::{Deserialize, Serialize};

use sectorwatch_market_data::RoiValues;

/// Returns of one tradeable proxy, keyed by horizon label ("1D", "1Y", ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoiSummary {
    pub symbol: String,
    pub values: RoiValues,
}
