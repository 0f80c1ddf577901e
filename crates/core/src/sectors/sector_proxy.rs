use std::collections::{BTreeMap, BTreeSet};

use crate::constants::MARKET_BENCHMARK_SYMBOL;
use crate::errors::{Error, Result};

use super::sectors_constants::{CANONICAL_SECTORS, GICS_SECTOR_ALIASES, STANDARD_SECTOR_PROXIES};

/// Normalise a provider sector label to its canonical name.
///
/// Trims whitespace and folds GICS labels ("Information Technology") onto
/// the names the P/E endpoints use ("Technology"). Unknown labels come back
/// trimmed but otherwise untouched.
pub fn canonical_sector_name(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(canonical) = CANONICAL_SECTORS
        .iter()
        .find(|name| name.eq_ignore_ascii_case(trimmed))
    {
        return (*canonical).to_string();
    }

    GICS_SECTOR_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Immutable sector → proxy symbol mapping, plus the broad-market benchmark.
///
/// Construction fails unless the table covers exactly the canonical sector
/// set, so a typo surfaces at startup instead of as a silently missing ROI.
#[derive(Clone, Debug, PartialEq)]
pub struct SectorProxyTable {
    proxies: BTreeMap<String, String>,
    benchmark: String,
}

impl SectorProxyTable {
    pub fn new<I, S, T>(entries: I, benchmark: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut proxies = BTreeMap::new();
        for (sector, symbol) in entries {
            let sector = sector.into().trim().to_string();
            let symbol = symbol.into().trim().to_uppercase();
            if symbol.is_empty() {
                return Err(Error::SectorTable(format!(
                    "empty proxy symbol for '{}'",
                    sector
                )));
            }
            if proxies.insert(sector.clone(), symbol).is_some() {
                return Err(Error::SectorTable(format!("duplicate sector '{}'", sector)));
            }
        }

        let expected: BTreeSet<&str> = CANONICAL_SECTORS.iter().copied().collect();
        let actual: BTreeSet<&str> = proxies.keys().map(String::as_str).collect();

        let unknown: Vec<&str> = actual.difference(&expected).copied().collect();
        if !unknown.is_empty() {
            return Err(Error::SectorTable(format!(
                "unknown sectors: {}",
                unknown.join(", ")
            )));
        }
        let missing: Vec<&str> = expected.difference(&actual).copied().collect();
        if !missing.is_empty() {
            return Err(Error::SectorTable(format!(
                "missing sectors: {}",
                missing.join(", ")
            )));
        }

        let benchmark = benchmark.into().trim().to_uppercase();
        if benchmark.is_empty() {
            return Err(Error::SectorTable("empty benchmark symbol".to_string()));
        }

        Ok(Self { proxies, benchmark })
    }

    /// The SPDR sector funds with SPY as benchmark.
    pub fn standard() -> Result<Self> {
        Self::new(STANDARD_SECTOR_PROXIES, MARKET_BENCHMARK_SYMBOL)
    }

    /// Proxy symbol for a sector; `None` for sectors outside the table.
    pub fn proxy_for(&self, sector: &str) -> Option<&str> {
        self.proxies.get(sector.trim()).map(String::as_str)
    }

    pub fn benchmark_symbol(&self) -> &str {
        &self.benchmark
    }

    pub fn sectors(&self) -> impl Iterator<Item = &str> {
        self.proxies.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}
