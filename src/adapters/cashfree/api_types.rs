//! Cashfree PG wire types (API version 2023-08-01).
//!
//! Only the fields this service reads or writes are modelled. Unknown
//! response fields are ignored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::payment::NewOrder;

/// `POST /orders` body.
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest<'a> {
    #[serde(with = "rust_decimal::serde::float")]
    pub order_amount: Decimal,
    pub order_currency: &'a str,
    pub customer_details: CustomerDetailsPayload<'a>,
    pub order_meta: OrderMetaPayload<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_tags: Option<OrderTagsPayload<'a>>,
}

#[derive(Debug, Serialize)]
pub struct CustomerDetailsPayload<'a> {
    pub customer_id: &'a str,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub customer_phone: &'a str,
}

#[derive(Debug, Serialize)]
pub struct OrderMetaPayload<'a> {
    pub return_url: &'a str,
}

#[derive(Debug, Serialize)]
pub struct OrderTagsPayload<'a> {
    pub course_id: &'a str,
}

impl<'a> From<&'a NewOrder> for CreateOrderRequest<'a> {
    fn from(order: &'a NewOrder) -> Self {
        Self {
            order_amount: order.amount,
            order_currency: order.currency,
            customer_details: CustomerDetailsPayload {
                customer_id: order.customer.customer_id.as_str(),
                customer_name: &order.customer.name,
                customer_email: &order.customer.email,
                customer_phone: &order.customer.phone,
            },
            order_meta: OrderMetaPayload {
                return_url: &order.return_url,
            },
            order_tags: order
                .course_id
                .as_deref()
                .map(|course_id| OrderTagsPayload { course_id }),
        }
    }
}

/// Order entity returned by both `POST /orders` and `GET /orders/{id}`.
#[derive(Debug, Deserialize)]
pub struct OrderEntity {
    pub order_id: String,
    #[serde(default)]
    pub payment_session_id: Option<String>,
    pub order_status: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_amount: Decimal,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
