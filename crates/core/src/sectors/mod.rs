//! Sector naming and the sector → proxy fund lookup table.

mod sector_proxy;
mod sectors_constants;

pub use sector_proxy::{canonical_sector_name, SectorProxyTable};
pub use sectors_constants::{CANONICAL_SECTORS, GICS_SECTOR_ALIASES, STANDARD_SECTOR_PROXIES};
