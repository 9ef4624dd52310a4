//! Payment event sink that records calls, for tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::payment::GatewayWebhookEvent;
use crate::ports::{PaymentEventSink, SinkError};

/// Captures every dispatched event and can fail on demand.
///
/// # Panics
///
/// Methods panic if the internal lock is poisoned. Test use only.
#[derive(Debug, Default)]
pub struct RecordingPaymentEventSink {
    statuses: Mutex<Vec<GatewayWebhookEvent>>,
    notifications: Mutex<Vec<GatewayWebhookEvent>>,
    next_status_error: Mutex<Option<SinkError>>,
    next_notification_error: Mutex<Option<SinkError>>,
}

impl RecordingPaymentEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `record_status` call fails with `error` and records nothing.
    pub fn fail_next_status(&self, error: SinkError) {
        *self.next_status_error.lock().unwrap() = Some(error);
    }

    /// The next `notify_customer` call fails with `error` and records nothing.
    pub fn fail_next_notification(&self, error: SinkError) {
        *self.next_notification_error.lock().unwrap() = Some(error);
    }

    pub fn status_count(&self) -> usize {
        self.statuses.lock().unwrap().len()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    /// Events passed to `record_status`, in order.
    pub fn recorded(&self) -> Vec<GatewayWebhookEvent> {
        self.statuses.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentEventSink for RecordingPaymentEventSink {
    async fn record_status(&self, event: &GatewayWebhookEvent) -> Result<(), SinkError> {
        if let Some(error) = self.next_status_error.lock().unwrap().take() {
            return Err(error);
        }
        self.statuses.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn notify_customer(&self, event: &GatewayWebhookEvent) -> Result<(), SinkError> {
        if let Some(error) = self.next_notification_error.lock().unwrap().take() {
            return Err(error);
        }
        self.notifications.lock().unwrap().push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> GatewayWebhookEvent {
        GatewayWebhookEvent {
            order_id: "order_1".into(),
            order_status: Some("PAID".into()),
            payment_status: Some("SUCCESS".into()),
            payment_id: Some("1".into()),
            event_type: None,
        }
    }

    #[tokio::test]
    async fn records_dispatches() {
        let sink = RecordingPaymentEventSink::new();

        sink.record_status(&event()).await.unwrap();
        sink.notify_customer(&event()).await.unwrap();

        assert_eq!(sink.status_count(), 1);
        assert_eq!(sink.notification_count(), 1);
        assert_eq!(sink.recorded()[0].order_id, "order_1");
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let sink = RecordingPaymentEventSink::new();
        sink.fail_next_notification(SinkError::NotificationFailed("smtp".into()));

        assert!(sink.notify_customer(&event()).await.is_err());
        assert!(sink.notify_customer(&event()).await.is_ok());
        assert_eq!(sink.notification_count(), 1);
    }
}
