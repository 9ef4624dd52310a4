//! Mock payment gateway for testing.
//!
//! Supports:
//! - Seeded orders returned by `fetch_order`
//! - Error injection, per method or for the next call
//! - Call tracking, including the last order sent to `create_order`

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::payment::{CreatedOrder, NewOrder, OrderSnapshot, OrderStatus};
use crate::ports::{GatewayError, PaymentGateway};

/// Mock payment gateway.
///
/// ```ignore
/// let gateway = MockPaymentGateway::new();
/// gateway.add_order("order_1", OrderStatus::Paid, Decimal::from(2999));
/// gateway.set_method_error("create_order", GatewayError::Timeout);
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Orders known to `fetch_order`.
    orders: HashMap<String, OrderSnapshot>,

    /// Error to return on the next call to any method.
    next_error: Option<GatewayError>,

    /// Errors returned on every call to a method.
    method_errors: HashMap<String, GatewayError>,

    call_log: Vec<MethodCall>,

    last_created: Option<NewOrder>,

    sequence: u64,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an order for `fetch_order`.
    pub fn add_order(&self, order_id: &str, status: OrderStatus, amount: Decimal) {
        self.inner.lock().unwrap().orders.insert(
            order_id.to_string(),
            OrderSnapshot {
                order_id: order_id.to_string(),
                status,
                amount,
            },
        );
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: GatewayError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: GatewayError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// The order most recently passed to `create_order`.
    pub fn last_created(&self) -> Option<NewOrder> {
        self.inner.lock().unwrap().last_created.clone()
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), GatewayError> {
        let mut state = self.inner.lock().unwrap();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(&self, order: &NewOrder) -> Result<CreatedOrder, GatewayError> {
        self.record_call(
            "create_order",
            vec![order.amount.to_string(), order.customer.customer_id.to_string()],
        );
        self.inner.lock().unwrap().last_created = Some(order.clone());
        self.check_error("create_order")?;

        let mut state = self.inner.lock().unwrap();
        state.sequence += 1;
        let order_id = format!("order_mock_{}", state.sequence);

        state.orders.insert(
            order_id.clone(),
            OrderSnapshot {
                order_id: order_id.clone(),
                status: OrderStatus::Active,
                amount: order.amount,
            },
        );

        Ok(CreatedOrder {
            payment_session_id: format!("session_mock_{}", state.sequence),
            order_id,
            status: OrderStatus::Active,
        })
    }

    async fn fetch_order(&self, order_id: &str) -> Result<OrderSnapshot, GatewayError> {
        self.record_call("fetch_order", vec![order_id.to_string()]);
        self.check_error("fetch_order")?;

        self.inner
            .lock()
            .unwrap()
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(order_id.to_string()))
    }
}
