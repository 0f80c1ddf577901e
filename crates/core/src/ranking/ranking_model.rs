use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::universe::Equity;

/// The largest constituents of one sector, by descending market cap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorRanking {
    pub sector: String,
    pub top_stocks: Vec<Equity>,
}

impl SectorRanking {
    pub fn len(&self) -> usize {
        self.top_stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top_stocks.is_empty()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.top_stocks.iter().map(|e| e.symbol.clone()).collect()
    }
}

/// Attach caps, order by descending cap and keep the first `k`.
///
/// Symbols missing from `caps` rank with a cap of zero rather than being
/// dropped. The sort is stable, so equal caps keep feed order.
pub fn rank_by_market_cap(
    equities: &[Equity],
    caps: &HashMap<String, Decimal>,
    k: usize,
) -> Vec<Equity> {
    let mut ranked: Vec<Equity> = equities
        .iter()
        .map(|equity| {
            let cap = caps.get(&equity.symbol).copied().unwrap_or(Decimal::ZERO);
            equity.clone().with_market_cap(cap)
        })
        .collect();

    ranked.sort_by(|a, b| b.market_cap.cmp(&a.market_cap));
    ranked.truncate(k);
    ranked
}
