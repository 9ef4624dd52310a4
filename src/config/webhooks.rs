//! Webhook deduplication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::rate_limit::StateBackend;

/// Where processed webhook keys are recorded, and for how long.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub store: StateBackend,

    /// How long a processed key suppresses redeliveries
    #[serde(default = "default_dedup_ttl")]
    pub dedup_ttl_secs: u64,
}

impl WebhookConfig {
    pub fn dedup_ttl(&self) -> Duration {
        Duration::from_secs(self.dedup_ttl_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dedup_ttl_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            store: StateBackend::default(),
            dedup_ttl_secs: default_dedup_ttl(),
        }
    }
}

// Seven days; the gateway stops redelivering well before that.
fn default_dedup_ttl() -> u64 {
    7 * 24 * 60 * 60
}
