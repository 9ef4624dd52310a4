//! Redis-backed rate limiter.
//!
//! Fixed-window counters shared by every instance:
//! 1. `INCR` the window key
//! 2. On the first hit, `EXPIRE` it for the window length
//! 3. Deny once the count exceeds the limit
//!
//! A key left without a TTL (process died between INCR and EXPIRE) gets one
//! on the next check.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::config::RateLimitConfig;
use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

use super::limit_for;

#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: MultiplexedConnection,
    config: RateLimitConfig,
}

impl RedisRateLimiter {
    pub fn new(conn: MultiplexedConnection, config: RateLimitConfig) -> Self {
        Self { conn, config }
    }

    /// Seconds until the window for `key` closes, fixing a missing TTL.
    async fn seconds_left(
        conn: &mut MultiplexedConnection,
        key: &str,
        count: i64,
    ) -> Result<u64, RateLimitError> {
        let window = RateLimitConfig::WINDOW_SECS as i64;

        if count == 1 {
            conn.expire::<_, ()>(key, window).await.map_err(unavailable)?;
            return Ok(window as u64);
        }

        let ttl: i64 = conn.ttl(key).await.map_err(unavailable)?;
        if ttl > 0 {
            return Ok(ttl as u64);
        }

        conn.expire::<_, ()>(key, window).await.map_err(unavailable)?;
        Ok(window as u64)
    }
}

fn unavailable(e: redis::RedisError) -> RateLimitError {
    RateLimitError::Unavailable(e.to_string())
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let storage_key = key.storage_key();
        let limit = limit_for(&self.config, key.scope);
        let mut conn = self.conn.clone();

        let count: i64 = conn.incr(&storage_key, 1_i64).await.map_err(unavailable)?;
        let seconds_left = Self::seconds_left(&mut conn, &storage_key, count).await?;

        if count > limit as i64 {
            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs: (seconds_left as u32).max(1),
                scope: key.scope,
            }));
        }

        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(count as u32),
            reset_at: Timestamp::now().plus_secs(seconds_left),
            window_secs: RateLimitConfig::WINDOW_SECS,
        }))
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        let storage_key = key.storage_key();
        let limit = limit_for(&self.config, key.scope);
        let mut conn = self.conn.clone();

        let count: Option<u32> = conn.get(&storage_key).await.map_err(unavailable)?;
        let ttl: i64 = conn.ttl(&storage_key).await.map_err(unavailable)?;
        let seconds_left = if ttl > 0 {
            ttl as u64
        } else {
            RateLimitConfig::WINDOW_SECS as u64
        };

        Ok(RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(count.unwrap_or(0)),
            reset_at: Timestamp::now().plus_secs(seconds_left),
            window_secs: RateLimitConfig::WINDOW_SECS,
        })
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key.storage_key())
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRateLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
