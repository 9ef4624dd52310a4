//! CreateOrderHandler - creates a gateway order for an authenticated learner.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::config::CheckoutConfig;
use crate::domain::foundation::{AuthenticatedUser, CustomerId};
use crate::domain::payment::{
    CustomerDetails, GatewayOperation, NewOrder, OrderRequest, PaymentError, ORDER_CURRENCY,
};
use crate::ports::{GatewayError, PaymentGateway};

/// Command to create a payment order.
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    /// Raw request body, validated by the handler.
    pub body: Value,
    /// Caller, if the request carried a valid session.
    pub principal: Option<AuthenticatedUser>,
}

/// What the checkout widget needs to take payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderResult {
    pub order_id: String,
    pub payment_session_id: String,
}

/// Handler for order creation.
///
/// Every call creates a new gateway order and a new customer id, so a
/// retried request yields a second order.
pub struct CreateOrderHandler {
    gateway: Arc<dyn PaymentGateway>,
    checkout: CheckoutConfig,
}

impl CreateOrderHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, checkout: CheckoutConfig) -> Self {
        Self { gateway, checkout }
    }

    pub async fn handle(&self, cmd: CreateOrderCommand) -> Result<CreateOrderResult, PaymentError> {
        // 1. Caller must be signed in
        let principal = cmd.principal.ok_or(PaymentError::Unauthorized)?;

        // 2. Validate and normalize; first failing field wins
        let request = OrderRequest::from_json(&cmd.body)?;

        // 3. Checkout redirect must be configured
        let return_url = self
            .checkout
            .return_url_template()
            .map_err(|e| PaymentError::configuration(e.to_string()))?;

        // 4. Fresh customer per order
        let customer_id = CustomerId::generate();

        let order = NewOrder {
            amount: request.amount,
            currency: ORDER_CURRENCY,
            customer: CustomerDetails {
                customer_id: customer_id.clone(),
                name: request.customer_name.clone(),
                email: request.customer_email.clone(),
                phone: request.customer_phone.clone(),
            },
            return_url,
            course_id: request.course_id.clone(),
        };

        // 5. The gateway call runs on its own task so that a client
        //    disconnect cannot orphan an order created upstream.
        let started = Instant::now();
        let gateway = Arc::clone(&self.gateway);
        let created = tokio::spawn(async move { gateway.create_order(&order).await })
            .await
            .unwrap_or_else(|e| Err(GatewayError::Transport(format!("gateway task failed: {}", e))));
        let duration_ms = started.elapsed().as_millis() as u64;

        match created {
            Ok(created) => {
                tracing::info!(
                    order_id = %created.order_id,
                    user_id = %principal.id,
                    customer_id = %customer_id,
                    amount = %request.amount,
                    course_id = request.course_id.as_deref().unwrap_or("-"),
                    phone = %request.masked_phone(),
                    email_domain = request.email_domain(),
                    duration_ms,
                    "Payment order created"
                );
                Ok(CreateOrderResult {
                    order_id: created.order_id,
                    payment_session_id: created.payment_session_id,
                })
            }
            Err(e) => {
                tracing::error!(
                    user_id = %principal.id,
                    customer_id = %customer_id,
                    amount = %request.amount,
                    course_id = request.course_id.as_deref().unwrap_or("-"),
                    duration_ms,
                    retryable = e.is_retryable(),
                    error = %e,
                    "Payment order creation failed"
                );
                Err(PaymentError::gateway(GatewayOperation::CreateOrder, e))
            }
        }
    }
}
