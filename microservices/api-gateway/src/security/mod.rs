//! Security Module

mod rate_limiter;
mod waf;

pub use rate_limiter::RateLimiter;
pub use waf::Waf;
