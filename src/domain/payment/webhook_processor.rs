//! Webhook processor - idempotent dispatch of verified gateway events.
//!
//! ## Steps
//!
//! 1. Skip the event if its idempotency key was already recorded
//! 2. Claim the key with an atomic insert-if-absent; a delivery that loses
//!    the claim is skipped
//! 3. Dispatch to the sink: `record_status`, then `notify_customer`
//!
//! A failed dispatch releases the claim, so the next delivery of the same
//! event runs the effects again. The gateway is acknowledged either way;
//! see [`WebhookOutcome`].

use std::sync::Arc;

use crate::ports::{PaymentEventSink, SaveResult, WebhookEventRecord, WebhookEventRepository};

use super::webhook_event::GatewayWebhookEvent;

/// What happened to a verified event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Effects ran for this delivery.
    Processed,
    /// Another delivery holds the key; nothing ran.
    AlreadyProcessed,
    /// An effect failed. Logged, and still acknowledged to the gateway.
    DispatchFailed(String),
}

impl WebhookOutcome {
    /// Message returned to the gateway in the acknowledgement body.
    pub fn ack_message(&self) -> &'static str {
        match self {
            WebhookOutcome::Processed | WebhookOutcome::DispatchFailed(_) => {
                "Webhook processed successfully"
            }
            WebhookOutcome::AlreadyProcessed => "Webhook already processed",
        }
    }
}

/// Dispatches verified webhook events at most once per idempotency key
/// while the dedup store is reachable.
pub struct WebhookEventProcessor {
    repository: Arc<dyn WebhookEventRepository>,
    sink: Arc<dyn PaymentEventSink>,
}

impl WebhookEventProcessor {
    pub fn new(
        repository: Arc<dyn WebhookEventRepository>,
        sink: Arc<dyn PaymentEventSink>,
    ) -> Self {
        Self { repository, sink }
    }

    /// Processes one event. Never fails: store outages degrade to running the
    /// (idempotent) effects again, and effect failures are reported in the
    /// outcome.
    pub async fn process(&self, event: &GatewayWebhookEvent) -> WebhookOutcome {
        let key = event.idempotency_key();

        tracing::info!(
            order_id = %event.order_id,
            order_status = event.order_status.as_deref().unwrap_or("-"),
            payment_status = event.payment_status.as_deref().unwrap_or("-"),
            payment_id = event.payment_id.as_deref().unwrap_or("-"),
            "Webhook event received"
        );

        match self.repository.find_by_key(&key).await {
            Ok(Some(record)) => {
                tracing::info!(
                    order_id = %event.order_id,
                    key = %key,
                    first_processed_at = record.processed_at.as_unix_secs(),
                    "Duplicate webhook delivery skipped"
                );
                return WebhookOutcome::AlreadyProcessed;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(order_id = %event.order_id, error = %e, "Webhook dedup lookup failed");
            }
        }

        let claimed = match self.repository.save(WebhookEventRecord::processed(event)).await {
            Ok(SaveResult::Inserted) => true,
            Ok(SaveResult::AlreadyExists) => {
                tracing::info!(
                    order_id = %event.order_id,
                    key = %key,
                    "Concurrent webhook delivery already claimed"
                );
                return WebhookOutcome::AlreadyProcessed;
            }
            Err(e) => {
                tracing::warn!(
                    order_id = %event.order_id,
                    error = %e,
                    "Failed to claim webhook key, dispatching unrecorded"
                );
                false
            }
        };

        if let Err(e) = self.dispatch(event).await {
            tracing::error!(
                order_id = %event.order_id,
                key = %key,
                error = %e,
                "Webhook dispatch failed"
            );
            if claimed {
                if let Err(release_err) = self.repository.release(&key).await {
                    tracing::warn!(
                        order_id = %event.order_id,
                        key = %key,
                        error = %release_err,
                        "Failed to release webhook key; redeliveries will be skipped until it expires"
                    );
                }
            }
            return WebhookOutcome::DispatchFailed(e.to_string());
        }

        WebhookOutcome::Processed
    }

    async fn dispatch(&self, event: &GatewayWebhookEvent) -> Result<(), crate::ports::SinkError> {
        self.sink.record_status(event).await?;
        self.sink.notify_customer(event).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::{InMemoryWebhookEventRepository, RecordingPaymentEventSink};
    use crate::domain::foundation::Timestamp;
    use crate::ports::{RepositoryError, SinkError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn event(status: &str) -> GatewayWebhookEvent {
        GatewayWebhookEvent {
            order_id: "order_1".to_string(),
            order_status: Some("PAID".to_string()),
            payment_status: Some(status.to_string()),
            payment_id: Some("pay_1".to_string()),
            event_type: Some("PAYMENT_SUCCESS_WEBHOOK".to_string()),
        }
    }

    fn processor() -> (
        WebhookEventProcessor,
        Arc<InMemoryWebhookEventRepository>,
        Arc<RecordingPaymentEventSink>,
    ) {
        let repository = Arc::new(InMemoryWebhookEventRepository::new());
        let sink = Arc::new(RecordingPaymentEventSink::new());
        let processor = WebhookEventProcessor::new(repository.clone(), sink.clone());
        (processor, repository, sink)
    }

    struct UnavailableRepository;

    #[async_trait]
    impl WebhookEventRepository for UnavailableRepository {
        async fn find_by_key(
            &self,
            _key: &str,
        ) -> Result<Option<WebhookEventRecord>, RepositoryError> {
            Err(RepositoryError("connection refused".into()))
        }

        async fn save(&self, _record: WebhookEventRecord) -> Result<SaveResult, RepositoryError> {
            Err(RepositoryError("connection refused".into()))
        }

        async fn release(&self, _key: &str) -> Result<(), RepositoryError> {
            Err(RepositoryError("connection refused".into()))
        }

        async fn delete_before(&self, _cutoff: Timestamp) -> Result<u64, RepositoryError> {
            Err(RepositoryError("connection refused".into()))
        }
    }

    /// Sink whose status write takes long enough for deliveries to overlap.
    #[derive(Default)]
    struct SlowSink {
        statuses: AtomicUsize,
        notifications: AtomicUsize,
    }

    #[async_trait]
    impl PaymentEventSink for SlowSink {
        async fn record_status(&self, _event: &GatewayWebhookEvent) -> Result<(), SinkError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.statuses.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn notify_customer(&self, _event: &GatewayWebhookEvent) -> Result<(), SinkError> {
            self.notifications.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn first_delivery_dispatches_and_records() {
        let (processor, repository, sink) = processor();

        let outcome = processor.process(&event("SUCCESS")).await;

        assert_eq!(outcome, WebhookOutcome::Processed);
        assert_eq!(sink.status_count(), 1);
        assert_eq!(sink.notification_count(), 1);
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn redelivery_is_acknowledged_without_dispatch() {
        let (processor, _repository, sink) = processor();

        let first = processor.process(&event("SUCCESS")).await;
        let second = processor.process(&event("SUCCESS")).await;

        assert_eq!(first, WebhookOutcome::Processed);
        assert_eq!(second, WebhookOutcome::AlreadyProcessed);
        assert_eq!(sink.status_count(), 1);
        assert_eq!(sink.notification_count(), 1);
    }

    #[tokio::test]
    async fn status_change_for_same_order_is_processed() {
        let (processor, _repository, sink) = processor();

        processor.process(&event("PENDING")).await;
        let outcome = processor.process(&event("SUCCESS")).await;

        assert_eq!(outcome, WebhookOutcome::Processed);
        assert_eq!(sink.status_count(), 2);
    }

    #[tokio::test]
    async fn failed_dispatch_is_not_recorded_and_retries_on_redelivery() {
        let (processor, repository, sink) = processor();
        sink.fail_next_status(SinkError::StoreUnavailable("db down".into()));

        let first = processor.process(&event("SUCCESS")).await;
        assert!(matches!(first, WebhookOutcome::DispatchFailed(_)));
        assert_eq!(first.ack_message(), "Webhook processed successfully");
        assert_eq!(repository.len().await, 0);
        assert_eq!(sink.notification_count(), 0);

        let second = processor.process(&event("SUCCESS")).await;
        assert_eq!(second, WebhookOutcome::Processed);
        assert_eq!(sink.status_count(), 1);
        assert_eq!(sink.notification_count(), 1);
    }

    #[tokio::test]
    async fn unavailable_store_still_dispatches() {
        let sink = Arc::new(RecordingPaymentEventSink::new());
        let processor = WebhookEventProcessor::new(Arc::new(UnavailableRepository), sink.clone());

        let outcome = processor.process(&event("SUCCESS")).await;

        assert_eq!(outcome, WebhookOutcome::Processed);
        assert_eq!(sink.status_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_deliveries_record_one_winner() {
        let (processor, repository, sink) = processor();
        let processor = Arc::new(processor);

        let a = {
            let p = processor.clone();
            tokio::spawn(async move { p.process(&event("SUCCESS")).await })
        };
        let b = {
            let p = processor.clone();
            tokio::spawn(async move { p.process(&event("SUCCESS")).await })
        };

        let outcomes = [a.await.unwrap(), b.await.unwrap()];

        assert_eq!(repository.len().await, 1);
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| **o == WebhookOutcome::Processed)
                .count(),
            1
        );
        assert_eq!(sink.status_count(), 1);
        assert_eq!(sink.notification_count(), 1);
    }

    #[tokio::test]
    async fn overlapping_redelivery_does_not_notify_twice() {
        let sink = Arc::new(SlowSink::default());
        let processor = WebhookEventProcessor::new(
            Arc::new(InMemoryWebhookEventRepository::new()),
            sink.clone(),
        );
        let delivery = event("SUCCESS");

        let (first, second) = tokio::join!(
            processor.process(&delivery),
            processor.process(&delivery)
        );

        let mut outcomes = vec![first, second];
        outcomes.sort_by_key(|o| o == &WebhookOutcome::AlreadyProcessed);
        assert_eq!(
            outcomes,
            vec![WebhookOutcome::Processed, WebhookOutcome::AlreadyProcessed]
        );
        assert_eq!(sink.statuses.load(Ordering::SeqCst), 1);
        assert_eq!(sink.notifications.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn same_event_dispatches_again_after_dedup_ttl() {
        let repository = Arc::new(InMemoryWebhookEventRepository::with_ttl(
            Duration::from_millis(50),
        ));
        let sink = Arc::new(RecordingPaymentEventSink::new());
        let processor = WebhookEventProcessor::new(repository.clone(), sink.clone());

        assert_eq!(processor.process(&event("SUCCESS")).await, WebhookOutcome::Processed);
        assert_eq!(
            processor.process(&event("SUCCESS")).await,
            WebhookOutcome::AlreadyProcessed
        );

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(repository.purge_expired().await, 1);
        assert!(repository.is_empty().await);

        assert_eq!(processor.process(&event("SUCCESS")).await, WebhookOutcome::Processed);
        assert_eq!(sink.notification_count(), 2);
    }
}
