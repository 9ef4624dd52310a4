//! Response bodies for the payment endpoints.
//!
//! Request bodies are not typed here: they reach the domain validators as raw
//! JSON so the first violated field can be reported with its own message.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::{CreateOrderResult, HandleGatewayWebhookResult, VerifyOrderResult};
use crate::domain::payment::OrderStatus;

/// `POST /api/create-order` success body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub payment_session_id: String,
}

impl From<CreateOrderResult> for CreateOrderResponse {
    fn from(result: CreateOrderResult) -> Self {
        Self {
            order_id: result.order_id,
            payment_session_id: result.payment_session_id,
        }
    }
}

/// `POST /api/verify-order` success body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOrderResponse {
    pub status: OrderStatus,
    pub order_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_amount: Decimal,
}

impl From<VerifyOrderResult> for VerifyOrderResponse {
    fn from(result: VerifyOrderResult) -> Self {
        Self {
            status: result.status,
            order_id: result.order_id,
            order_amount: result.amount,
        }
    }
}

/// Acknowledgement returned to the gateway.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAckResponse {
    pub success: bool,
    pub message: String,
    pub order_id: String,
}

impl From<HandleGatewayWebhookResult> for WebhookAckResponse {
    fn from(result: HandleGatewayWebhookResult) -> Self {
        Self {
            success: true,
            message: result.outcome.ack_message().to_string(),
            order_id: result.order_id,
        }
    }
}

/// Error body shared by every payment endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
