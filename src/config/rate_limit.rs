//! Rate limit configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Fixed-window limits for the payment routes.
///
/// Checked in order global, per-IP, per-user. Every window is one minute.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Where counters are kept
    #[serde(default)]
    pub backend: StateBackend,

    /// Requests per minute across all clients
    #[serde(default = "default_global")]
    pub global_per_minute: u32,

    /// Requests per minute from one client address
    #[serde(default = "default_per_ip")]
    pub per_ip_per_minute: u32,

    /// Requests per minute from one authenticated user
    #[serde(default = "default_per_user")]
    pub per_user_per_minute: u32,

    /// Key the per-IP scope on `X-Forwarded-For` / `X-Real-IP`. Enable only
    /// behind a proxy that overwrites those headers.
    #[serde(default)]
    pub trust_forwarded_headers: bool,
}

/// Storage for shared counters and dedup records.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StateBackend {
    /// Process memory. Correct only with a single instance.
    #[default]
    Memory,
    /// Redis, shared by every instance.
    Redis,
}

impl RateLimitConfig {
    pub const WINDOW_SECS: u32 = 60;

    /// Validate rate limit configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.global_per_minute == 0 || self.per_ip_per_minute == 0 || self.per_user_per_minute == 0
        {
            return Err(ValidationError::InvalidRateLimit);
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            backend: StateBackend::default(),
            global_per_minute: default_global(),
            per_ip_per_minute: default_per_ip(),
            per_user_per_minute: default_per_user(),
            trust_forwarded_headers: false,
        }
    }
}

fn default_global() -> u32 {
    10_000
}

fn default_per_ip() -> u32 {
    60
}

fn default_per_user() -> u32 {
    30
}
