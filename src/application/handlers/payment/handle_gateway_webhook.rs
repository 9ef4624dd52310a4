//! HandleGatewayWebhookHandler - authenticates and processes gateway callbacks.
//!
//! Order of checks:
//! 1. Signature header present
//! 2. Signature matches the raw body
//! 3. Body has `order.order_id`
//! 4. Idempotent dispatch via [`WebhookEventProcessor`]

use std::sync::Arc;

use crate::domain::payment::{
    best_effort_order_id, GatewayWebhookEvent, PaymentError, WebhookEventProcessor,
    WebhookOutcome, WebhookSignatureVerifier,
};

/// Command to handle one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleGatewayWebhookCommand {
    /// Body exactly as received.
    pub raw_body: Vec<u8>,
    /// Value of the signature header, if sent.
    pub signature: Option<String>,
}

/// Acknowledgement details for the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleGatewayWebhookResult {
    pub order_id: String,
    pub outcome: WebhookOutcome,
}

pub struct HandleGatewayWebhookHandler {
    verifier: WebhookSignatureVerifier,
    processor: Arc<WebhookEventProcessor>,
}

impl HandleGatewayWebhookHandler {
    pub fn new(verifier: WebhookSignatureVerifier, processor: Arc<WebhookEventProcessor>) -> Self {
        Self {
            verifier,
            processor,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleGatewayWebhookCommand,
    ) -> Result<HandleGatewayWebhookResult, PaymentError> {
        let signature = cmd
            .signature
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let Some(signature) = signature else {
            tracing::warn!(
                order_id = best_effort_order_id(&cmd.raw_body).as_deref().unwrap_or("-"),
                body_len = cmd.raw_body.len(),
                "Webhook rejected: missing signature"
            );
            return Err(PaymentError::MissingSignature);
        };

        if !self.verifier.verify(&cmd.raw_body, signature) {
            tracing::warn!(
                order_id = best_effort_order_id(&cmd.raw_body).as_deref().unwrap_or("-"),
                body_len = cmd.raw_body.len(),
                "Webhook rejected: invalid signature"
            );
            return Err(PaymentError::InvalidSignature);
        }

        let event = GatewayWebhookEvent::parse(&cmd.raw_body).map_err(|e| {
            tracing::warn!(error = %e, "Webhook rejected: malformed payload");
            e
        })?;

        let outcome = self.processor.process(&event).await;

        Ok(HandleGatewayWebhookResult {
            order_id: event.order_id,
            outcome,
        })
    }
}
