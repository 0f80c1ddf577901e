use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest traded price of a symbol together with its daily change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    pub symbol: String,

    /// Last price
    pub price: Decimal,

    /// Change versus the previous close, in percent (1.5 = +1.5%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<Decimal>,
}
