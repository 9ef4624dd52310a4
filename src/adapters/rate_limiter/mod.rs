//! Rate limiter adapters.
//!
//! - `InMemoryRateLimiter` - process-local counters; tests and single-instance deployments
//! - `RedisRateLimiter` - shared counters for multi-instance deployments

mod in_memory;
mod redis;

pub use in_memory::InMemoryRateLimiter;
pub use redis::RedisRateLimiter;

use crate::config::RateLimitConfig;
use crate::ports::RateLimitScope;

/// Requests allowed per window for a scope.
fn limit_for(config: &RateLimitConfig, scope: RateLimitScope) -> u32 {
    match scope {
        RateLimitScope::Global => config.global_per_minute,
        RateLimitScope::Ip => config.per_ip_per_minute,
        RateLimitScope::User => config.per_user_per_minute,
    }
}
