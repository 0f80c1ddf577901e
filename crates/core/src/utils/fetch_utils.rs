use log::{info, warn};
use sectorwatch_market_data::FetchResult;

/// Collapse a gateway outcome into "have data or not", logging why not.
///
/// A failed call is logged as a warning, an empty answer at info: both end
/// up omitting the derived field downstream.
pub fn settle<T>(result: FetchResult<T>, what: &str) -> Option<T> {
    match result {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            info!("No data returned for {}", what);
            None
        }
        Err(e) if e.is_transient() => {
            warn!("{} unavailable (transient): {}", what, e);
            None
        }
        Err(e) => {
            warn!("{} unavailable: {}", what, e);
            None
        }
    }
}
