/// The eleven standard economic sectors, as the P/E endpoints name them.
pub const CANONICAL_SECTORS: [&str; 11] = [
    "Basic Materials",
    "Communication Services",
    "Consumer Cyclical",
    "Consumer Defensive",
    "Energy",
    "Financial Services",
    "Healthcare",
    "Industrials",
    "Real Estate",
    "Technology",
    "Utilities",
];

/// SPDR sector funds used as tradeable stand-ins for each sector.
pub const STANDARD_SECTOR_PROXIES: [(&str, &str); 11] = [
    ("Basic Materials", "XLB"),
    ("Communication Services", "XLC"),
    ("Consumer Cyclical", "XLY"),
    ("Consumer Defensive", "XLP"),
    ("Energy", "XLE"),
    ("Financial Services", "XLF"),
    ("Healthcare", "XLV"),
    ("Industrials", "XLI"),
    ("Real Estate", "XLRE"),
    ("Technology", "XLK"),
    ("Utilities", "XLU"),
];

/// GICS names used by index constituent feeds, mapped to canonical names.
pub const GICS_SECTOR_ALIASES: [(&str, &str); 6] = [
    ("Information Technology", "Technology"),
    ("Health Care", "Healthcare"),
    ("Financials", "Financial Services"),
    ("Consumer Discretionary", "Consumer Cyclical"),
    ("Consumer Staples", "Consumer Defensive"),
    ("Materials", "Basic Materials"),
];
