//! VerifyOrderHandler - reads an order's status from the gateway.

use std::sync::Arc;
use std::time::Instant;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::payment::{GatewayOperation, OrderStatus, PaymentError, VerifyOrderRequest};
use crate::ports::PaymentGateway;

/// Command to look up an order.
#[derive(Debug, Clone)]
pub struct VerifyOrderCommand {
    pub body: Value,
}

/// Order state as the gateway reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyOrderResult {
    pub order_id: String,
    /// Passed through from the gateway without reinterpretation.
    pub status: OrderStatus,
    pub amount: Decimal,
}

/// Read-only: never changes order state.
pub struct VerifyOrderHandler {
    gateway: Arc<dyn PaymentGateway>,
}

impl VerifyOrderHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    pub async fn handle(&self, cmd: VerifyOrderCommand) -> Result<VerifyOrderResult, PaymentError> {
        let request = VerifyOrderRequest::from_json(&cmd.body)?;

        let started = Instant::now();
        let result = self.gateway.fetch_order(&request.order_id).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(snapshot) => {
                tracing::info!(
                    order_id = %snapshot.order_id,
                    status = %snapshot.status,
                    duration_ms,
                    "Order status fetched"
                );
                Ok(VerifyOrderResult {
                    order_id: snapshot.order_id,
                    status: snapshot.status,
                    amount: snapshot.amount,
                })
            }
            Err(e) => {
                tracing::error!(
                    order_id = %request.order_id,
                    duration_ms,
                    error = %e,
                    "Order status fetch failed"
                );
                Err(PaymentError::gateway(GatewayOperation::FetchOrder, e))
            }
        }
    }
}
