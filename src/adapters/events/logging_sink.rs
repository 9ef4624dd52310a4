//! Payment event sink that only logs.
//!
//! Default downstream for verified webhooks until an order store and a
//! mailer exist. Both methods are naturally idempotent.

use async_trait::async_trait;

use crate::domain::payment::GatewayWebhookEvent;
use crate::ports::{PaymentEventSink, SinkError};

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingPaymentEventSink;

impl LoggingPaymentEventSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentEventSink for LoggingPaymentEventSink {
    async fn record_status(&self, event: &GatewayWebhookEvent) -> Result<(), SinkError> {
        tracing::info!(
            order_id = %event.order_id,
            order_status = event.order_status.as_deref().unwrap_or("-"),
            payment_status = event.payment_status.as_deref().unwrap_or("-"),
            event_type = event.event_type.as_deref().unwrap_or("-"),
            "Payment status reported"
        );
        Ok(())
    }

    async fn notify_customer(&self, event: &GatewayWebhookEvent) -> Result<(), SinkError> {
        if event.indicates_payment_success() {
            tracing::info!(order_id = %event.order_id, "Payment confirmation due");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn never_fails() {
        let sink = LoggingPaymentEventSink::new();
        let event = GatewayWebhookEvent {
            order_id: "order_1".into(),
            order_status: None,
            payment_status: Some("FAILED".into()),
            payment_id: None,
            event_type: None,
        };

        assert!(sink.record_status(&event).await.is_ok());
        assert!(sink.notify_customer(&event).await.is_ok());
    }
}
