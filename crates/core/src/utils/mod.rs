pub mod fetch_utils;
pub mod math_utils;

pub use fetch_utils::settle;
pub use math_utils::round_to;
