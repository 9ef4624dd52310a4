//! Downstream effects of a verified webhook.
//!
//! Gateways redeliver on timeout, so both capabilities must tolerate being
//! invoked more than once for the same event. The processor claims each
//! idempotency key before dispatching, but a dedup store outage or a failed
//! earlier attempt still lets the same event through again.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::payment::GatewayWebhookEvent;

/// Receives verified payment status changes.
#[async_trait]
pub trait PaymentEventSink: Send + Sync {
    /// Records the reported order/payment status.
    async fn record_status(&self, event: &GatewayWebhookEvent) -> Result<(), SinkError>;

    /// Lets the customer know about the outcome. Implementations decide
    /// which statuses warrant a message.
    async fn notify_customer(&self, event: &GatewayWebhookEvent) -> Result<(), SinkError>;
}

/// Failure inside a downstream effect.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    #[error("status store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("notification failed: {0}")]
    NotificationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_is_object_safe_and_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn PaymentEventSink>();
    }
}
