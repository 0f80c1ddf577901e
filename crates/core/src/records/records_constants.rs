pub const SECTOR_FIELD: &str = "sector";
pub const TOP_STOCKS_FIELD: &str = "top_stocks";
pub const PE_TODAY_FIELD: &str = "pe_today";
pub const PE_7_DAYS_AGO_FIELD: &str = "pe_7_days_ago";
pub const PE_WEEKLY_CHANGE_FIELD: &str = "pe_weekly_change_percent";
pub const PE_HIGH_1Y_FIELD: &str = "pe_high_1y";
pub const PE_LOW_1Y_FIELD: &str = "pe_low_1y";
pub const MARKET_BREADTH_FIELD: &str = "market_breadth_pct";
pub const ETF_ROI_FIELD: &str = "etf_roi";
pub const ETF_SYMBOL_FIELD: &str = "etf_symbol";

/// Written by the report generator; only ever read and republished here
pub const PREVIEW_SUMMARY_FIELD: &str = "preview_summary";
