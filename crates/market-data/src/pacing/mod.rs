//! Outbound call pacing.
//!
//! Upstream rate budgets are respected by spacing calls, not by retrying
//! rejected ones. Stages that issue many calls in a row receive a [`Pacer`]
//! and await it before each call.

mod pacer;
mod rate_limiter;

pub use pacer::{FixedIntervalPacer, NoPacing, Pacer};
pub use rate_limiter::{RateLimitConfig, TokenBucketPacer};
