//! WebhookEventRepository port - remembers which webhook deliveries were handled.
//!
//! The gateway may deliver the same notification several times:
//! - our endpoint timed out
//! - our response never reached the gateway
//! - the gateway's own retry policy fired
//!
//! Records are keyed by [`GatewayWebhookEvent::idempotency_key`].
//!
//! [`GatewayWebhookEvent::idempotency_key`]: crate::domain::payment::GatewayWebhookEvent::idempotency_key

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::Timestamp;
use crate::domain::payment::GatewayWebhookEvent;

/// Record of a webhook delivery that claimed its idempotency key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEventRecord {
    pub key: String,
    pub order_id: String,
    pub status: Option<String>,
    pub processed_at: Timestamp,
}

impl WebhookEventRecord {
    /// Creates a record for an event claimed just now.
    pub fn processed(event: &GatewayWebhookEvent) -> Self {
        Self {
            key: event.idempotency_key(),
            order_id: event.order_id.clone(),
            status: event
                .payment_status
                .clone()
                .or_else(|| event.order_status.clone()),
            processed_at: Timestamp::now(),
        }
    }
}

/// Result of attempting to save a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// First time this key was seen.
    Inserted,
    /// Another delivery already stored this key.
    AlreadyExists,
}

/// Failure talking to the backing store.
#[derive(Debug, Clone, Error)]
#[error("webhook event store unavailable: {0}")]
pub struct RepositoryError(pub String);

/// Port for storing and retrieving processed webhook keys.
///
/// `save` must be atomic insert-if-absent so that concurrent deliveries
/// agree on a single winner. Records older than the store's retention
/// window count as absent.
#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    /// Returns the record for `key`, if the event was already claimed.
    async fn find_by_key(&self, key: &str) -> Result<Option<WebhookEventRecord>, RepositoryError>;

    /// Stores a record unless one already exists under the same key.
    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, RepositoryError>;

    /// Drops the record for `key` so the next delivery runs the effects.
    async fn release(&self, key: &str) -> Result<(), RepositoryError>;

    /// Deletes records processed before `cutoff`. Returns how many went.
    async fn delete_before(&self, cutoff: Timestamp) -> Result<u64, RepositoryError>;
}
