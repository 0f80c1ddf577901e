use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sectorwatch_market_data::{Constituent, QuoteSnapshot};

use crate::sectors::canonical_sector_name;

/// One constituent of the index, snapshotted for a single run.
///
/// The universe feed fills identity and sector. `market_cap`, `price` and
/// `change_percent` are attached during ranking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equity {
    pub symbol: String,
    pub sector: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_sector: Option<String>,

    /// Zero when the provider has no capitalization for the symbol
    pub market_cap: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<Decimal>,
}

impl Equity {
    pub fn new(symbol: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            sector: sector.into(),
            name: None,
            sub_sector: None,
            market_cap: Decimal::ZERO,
            price: None,
            change_percent: None,
        }
    }

    pub fn with_market_cap(mut self, market_cap: Decimal) -> Self {
        self.market_cap = market_cap;
        self
    }

    pub fn apply_quote(&mut self, quote: &QuoteSnapshot) {
        self.price = Some(quote.price);
        self.change_percent = quote.change_percent;
    }
}

impl From<Constituent> for Equity {
    fn from(constituent: Constituent) -> Self {
        Self {
            symbol: constituent.symbol.trim().to_uppercase(),
            sector: canonical_sector_name(&constituent.sector),
            name: constituent.name,
            sub_sector: constituent.sub_sector,
            market_cap: Decimal::ZERO,
            price: None,
            change_percent: None,
        }
    }
}

/// Equities grouped by sector, keeping feed order inside each group.
///
/// Sectors iterate in name order so stage logs and batches are stable
/// across runs. A symbol listed twice keeps its first occurrence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectorUniverse {
    sectors: BTreeMap<String, Vec<Equity>>,
}

impl SectorUniverse {
    pub fn group(equities: impl IntoIterator<Item = Equity>) -> Self {
        let mut seen = HashSet::new();
        let mut sectors: BTreeMap<String, Vec<Equity>> = BTreeMap::new();

        for equity in equities {
            if equity.sector.trim().is_empty() || !seen.insert(equity.symbol.clone()) {
                continue;
            }
            sectors
                .entry(equity.sector.trim().to_string())
                .or_default()
                .push(equity);
        }

        Self { sectors }
    }

    pub fn sectors(&self) -> impl Iterator<Item = (&str, &[Equity])> {
        self.sectors
            .iter()
            .map(|(sector, equities)| (sector.as_str(), equities.as_slice()))
    }

    pub fn sector_names(&self) -> impl Iterator<Item = &str> {
        self.sectors.keys().map(String::as_str)
    }

    pub fn equities(&self, sector: &str) -> &[Equity] {
        self.sectors
            .get(sector.trim())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    pub fn equity_count(&self) -> usize {
        self.sectors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}
