/// Collection holding one merged analytics document per sector
pub const SECTOR_ANALYTICS_COLLECTION: &str = "sector_analytics";

/// Collection holding the latest constituent snapshot, keyed by symbol
pub const CONSTITUENTS_COLLECTION: &str = "sp500_symbols";

/// Document id for the broad-market benchmark; never a real sector name
pub const MARKET_BENCHMARK_RECORD_ID: &str = "__market_benchmark__";

/// Broad-market reference instrument
pub const MARKET_BENCHMARK_SYMBOL: &str = "SPY";

/// Number of constituents kept in each sector ranking
pub const DEFAULT_TOP_K: usize = 10;

/// Upper bound accepted for the ranking size
pub const MAX_TOP_K: usize = 50;

/// Trailing window for the sector P/E history, in calendar days
pub const PE_HISTORY_DAYS: i64 = 365;

/// Distance of the "week ago" P/E sample, in calendar days
pub const WEEKLY_LOOKBACK_DAYS: i64 = 7;

/// Moving average period used for market breadth
pub const SMA_PERIOD: u32 = 200;
