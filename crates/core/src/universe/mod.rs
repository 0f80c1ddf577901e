//! Index universe: constituents with sector classification, grouped by sector.

mod universe_model;
mod universe_service;
mod universe_traits;


pub use universe_model::{Equity, SectorUniverse};
pub use universe_service::GatewayUniverseProvider;
pub use universe_traits::UniverseProviderTrait;
