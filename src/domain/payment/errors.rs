//! Error taxonomy for the payment order lifecycle.

use http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::ValidationError;
use crate::ports::GatewayError;

/// Which gateway call failed. Selects the generic message shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOperation {
    CreateOrder,
    FetchOrder,
}

impl GatewayOperation {
    fn public_message(&self) -> &'static str {
        match self {
            GatewayOperation::CreateOrder => {
                "Failed to create payment order. Please try again later."
            }
            GatewayOperation::FetchOrder => {
                "Could not fetch payment status. Please try again later."
            }
        }
    }
}

/// Errors surfaced by the order and webhook services.
///
/// Only `public_message()` is ever returned to a caller. `Display` carries the
/// full diagnostic and is meant for logs.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("unauthorized")]
    Unauthorized,

    #[error("webhook signature header missing")]
    MissingSignature,

    #[error("webhook signature mismatch")]
    InvalidSignature,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("gateway {operation:?} failed: {source}")]
    Gateway {
        operation: GatewayOperation,
        #[source]
        source: GatewayError,
    },

    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),
}

impl PaymentError {
    pub fn gateway(operation: GatewayOperation, source: GatewayError) -> Self {
        PaymentError::Gateway { operation, source }
    }

    pub fn configuration(detail: impl Into<String>) -> Self {
        PaymentError::Configuration(detail.into())
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        PaymentError::MalformedPayload(detail.into())
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            PaymentError::Validation(_) | PaymentError::MalformedPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            PaymentError::Unauthorized
            | PaymentError::MissingSignature
            | PaymentError::InvalidSignature => StatusCode::UNAUTHORIZED,
            PaymentError::Configuration(_) | PaymentError::Gateway { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message that is safe to return to the caller.
    pub fn public_message(&self) -> String {
        match self {
            PaymentError::Validation(err) => err.to_string(),
            PaymentError::Unauthorized => "Unauthorized".to_string(),
            PaymentError::MissingSignature => "Missing signature".to_string(),
            PaymentError::InvalidSignature => "Invalid signature".to_string(),
            PaymentError::Configuration(_) => "Payment service configuration error".to_string(),
            PaymentError::Gateway { operation, .. } => operation.public_message().to_string(),
            PaymentError::MalformedPayload(_) => "Invalid payload".to_string(),
        }
    }

    /// Internal detail that may be shown outside production.
    pub fn details(&self) -> Option<&str> {
        match self {
            PaymentError::Configuration(detail) => Some(detail),
            _ => None,
        }
    }

    /// Caller-correctable errors are logged at `warn`, the rest at `error`.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}
