//! HTTP handlers for the payment endpoints.
//!
//! Bodies are taken as raw bytes. The webhook needs the exact bytes for
//! signature verification, and the JSON endpoints hand unparseable bodies to
//! the validators as `null` so the usual rejection order (auth, then fields)
//! still applies.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{header::ALLOW, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::adapters::http::middleware::OptionalAuth;
use crate::application::{
    CreateOrderCommand, CreateOrderHandler, HandleGatewayWebhookCommand,
    HandleGatewayWebhookHandler, VerifyOrderCommand, VerifyOrderHandler,
};
use crate::config::CheckoutConfig;
use crate::domain::payment::{
    PaymentError, WebhookEventProcessor, WebhookSignatureVerifier, SIGNATURE_HEADER,
};
use crate::ports::PaymentGateway;

use super::dto::{CreateOrderResponse, ErrorResponse, VerifyOrderResponse, WebhookAckResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the payment routes.
#[derive(Clone)]
pub struct PaymentsAppState {
    pub create_order: Arc<CreateOrderHandler>,
    pub verify_order: Arc<VerifyOrderHandler>,
    pub webhook: Arc<HandleGatewayWebhookHandler>,
    /// Include configuration error details in 500 bodies. Off in production.
    pub expose_error_details: bool,
}

impl PaymentsAppState {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        checkout: CheckoutConfig,
        verifier: WebhookSignatureVerifier,
        processor: Arc<WebhookEventProcessor>,
        expose_error_details: bool,
    ) -> Self {
        Self {
            create_order: Arc::new(CreateOrderHandler::new(gateway.clone(), checkout)),
            verify_order: Arc::new(VerifyOrderHandler::new(gateway)),
            webhook: Arc::new(HandleGatewayWebhookHandler::new(verifier, processor)),
            expose_error_details,
        }
    }

    fn api_error(&self, error: PaymentError) -> PaymentApiError {
        PaymentApiError {
            error,
            expose_details: self.expose_error_details,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/create-order
pub async fn create_order(
    State(state): State<PaymentsAppState>,
    OptionalAuth(principal): OptionalAuth,
    body: Bytes,
) -> Result<Json<CreateOrderResponse>, PaymentApiError> {
    let cmd = CreateOrderCommand {
        body: parse_body(&body),
        principal,
    };

    let result = state
        .create_order
        .handle(cmd)
        .await
        .map_err(|e| state.api_error(e))?;

    Ok(Json(result.into()))
}

/// POST /api/verify-order
pub async fn verify_order(
    State(state): State<PaymentsAppState>,
    body: Bytes,
) -> Result<Json<VerifyOrderResponse>, PaymentApiError> {
    let cmd = VerifyOrderCommand {
        body: parse_body(&body),
    };

    let result = state
        .verify_order
        .handle(cmd)
        .await
        .map_err(|e| state.api_error(e))?;

    Ok(Json(result.into()))
}

/// POST /api/webhooks/cashfree
pub async fn handle_cashfree_webhook(
    State(state): State<PaymentsAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAckResponse>, PaymentApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandleGatewayWebhookCommand {
        raw_body: body.to_vec(),
        signature,
    };

    let result = state
        .webhook
        .handle(cmd)
        .await
        .map_err(|e| state.api_error(e))?;

    Ok(Json(result.into()))
}

/// Fallback for any method other than POST on the payment routes.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(ALLOW, "POST")],
        Json(ErrorResponse::new("Method not allowed")),
    )
        .into_response()
}

fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or(Value::Null)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper that maps [`PaymentError`] to an HTTP response.
///
/// Only the public message is serialized. Configuration details are added
/// when `expose_details` is set.
#[derive(Debug)]
pub struct PaymentApiError {
    pub error: PaymentError,
    pub expose_details: bool,
}

impl PaymentApiError {
    /// Wraps an error with details suppressed.
    pub fn new(error: PaymentError) -> Self {
        Self {
            error,
            expose_details: false,
        }
    }
}

impl From<PaymentError> for PaymentApiError {
    fn from(error: PaymentError) -> Self {
        Self::new(error)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();

        if self.error.is_client_error() {
            tracing::warn!(status = status.as_u16(), error = %self.error, "Payment request rejected");
        } else {
            tracing::error!(status = status.as_u16(), error = %self.error, "Payment request failed");
        }

        let message = self.error.public_message();
        let body = match self.error.details() {
            Some(details) if self.expose_details => ErrorResponse::with_details(message, details),
            _ => ErrorResponse::new(message),
        };

        (status, Json(body)).into_response()
    }
}
