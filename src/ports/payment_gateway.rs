//! Payment gateway port.
//!
//! Isolates every gateway-specific request and response shape behind two
//! operations. Implementations make exactly one network call per invocation:
//! no retries and no caching.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::payment::{CreatedOrder, NewOrder, OrderSnapshot};

/// Port for the external payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates an order and returns the gateway id and checkout session token.
    async fn create_order(&self, order: &NewOrder) -> Result<CreatedOrder, GatewayError>;

    /// Reads the current state of an order.
    async fn fetch_order(&self, order_id: &str) -> Result<OrderSnapshot, GatewayError>;
}

/// Closed set of gateway failures.
///
/// Every variant carries diagnostic detail for logs only. None of it is
/// meant to reach an end user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request did not complete within the client timeout.
    #[error("gateway request timed out")]
    Timeout,

    /// The gateway answered with a non-2xx status.
    #[error("gateway rejected request ({status}): {message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The gateway has no order with this id.
    #[error("order not found: {0}")]
    NotFound(String),

    /// A 2xx response whose body did not have the expected shape.
    #[error("unexpected gateway response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Informational only. Nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport(_) | GatewayError::Timeout => true,
            GatewayError::Rejected { status, .. } => *status == 429 || *status >= 500,
            GatewayError::NotFound(_) | GatewayError::Decode(_) => false,
        }
    }

    /// HTTP status the gateway returned, when there was one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            GatewayError::Rejected { status, .. } => Some(*status),
            GatewayError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn PaymentGateway) {}

    #[test]
    fn gateway_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn PaymentGateway>();
    }

    #[test]
    fn retryable_classification() {
        assert!(GatewayError::Timeout.is_retryable());
        assert!(GatewayError::Transport("reset".into()).is_retryable());
        assert!(GatewayError::Rejected {
            status: 503,
            code: None,
            message: "down".into()
        }
        .is_retryable());
        assert!(!GatewayError::Rejected {
            status: 400,
            code: Some("request_invalid".into()),
            message: "bad".into()
        }
        .is_retryable());
        assert!(!GatewayError::Decode("missing field".into()).is_retryable());
        assert!(!GatewayError::NotFound("order_1".into()).is_retryable());
    }

    #[test]
    fn upstream_status_only_for_rejections() {
        let rejected = GatewayError::Rejected {
            status: 404,
            code: None,
            message: "not found".into(),
        };
        assert_eq!(rejected.upstream_status(), Some(404));
        assert_eq!(GatewayError::Timeout.upstream_status(), None);
    }
}
