//! In-memory rate limiter.
//!
//! Fixed-window counters in a process-local map. Each instance counts only
//! the traffic it sees, so with N instances the effective limit is N times
//! the configured one. Use `RedisRateLimiter` when more than one instance
//! serves traffic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::RateLimitConfig;
use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

use super::limit_for;

#[derive(Debug)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    windows: Arc<RwLock<HashMap<String, Window>>>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started_at: u64,
}

impl Window {
    fn ends_at(&self) -> u64 {
        self.started_at + RateLimitConfig::WINDOW_SECS as u64
    }
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    /// Number of keys currently tracked, expired windows included.
    pub async fn tracked_keys(&self) -> usize {
        self.windows.read().await.len()
    }

    /// Drops windows that have ended.
    pub async fn purge_expired(&self) {
        let now = Timestamp::now().as_unix_secs();
        self.windows.write().await.retain(|_, w| now < w.ends_at());
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let limit = limit_for(&self.config, key.scope);
        let now = Timestamp::now().as_unix_secs();

        let mut windows = self.windows.write().await;
        let window = windows.entry(key.storage_key()).or_insert(Window {
            count: 0,
            started_at: now,
        });

        if now >= window.ends_at() {
            *window = Window {
                count: 0,
                started_at: now,
            };
        }

        if window.count >= limit {
            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs: (window.ends_at().saturating_sub(now) as u32).max(1),
                scope: key.scope,
            }));
        }

        window.count += 1;

        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit,
            remaining: limit - window.count,
            reset_at: Timestamp::from_unix_secs(window.ends_at()),
            window_secs: RateLimitConfig::WINDOW_SECS,
        }))
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        let limit = limit_for(&self.config, key.scope);
        let now = Timestamp::now().as_unix_secs();

        let current = self
            .windows
            .read()
            .await
            .get(&key.storage_key())
            .copied()
            .filter(|w| now < w.ends_at())
            .unwrap_or(Window {
                count: 0,
                started_at: now,
            });

        Ok(RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(current.count),
            reset_at: Timestamp::from_unix_secs(current.ends_at()),
            window_secs: RateLimitConfig::WINDOW_SECS,
        })
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        self.windows.write().await.remove(&key.storage_key());
        Ok(())
    }
}
