//! Order values exchanged with the payment gateway.
//!
//! Orders are never stored locally. They exist for the length of a request
//! and the gateway stays the single source of truth for their status.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::CustomerId;

/// Every order is denominated in Indian rupees.
pub const ORDER_CURRENCY: &str = "INR";

/// Gateway order status.
///
/// Unknown values are kept verbatim in `Other` so the status the gateway
/// reports can be returned to callers without reinterpretation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Created,
    Active,
    Pending,
    Paid,
    Failed,
    Other(String),
}

impl OrderStatus {
    /// Maps a gateway status string. Matching is exact.
    pub fn from_gateway(raw: &str) -> Self {
        match raw {
            "CREATED" => OrderStatus::Created,
            "ACTIVE" => OrderStatus::Active,
            "PENDING" => OrderStatus::Pending,
            "PAID" => OrderStatus::Paid,
            "FAILED" => OrderStatus::Failed,
            other => OrderStatus::Other(other.to_string()),
        }
    }

    /// Returns the gateway's spelling of this status.
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Active => "ACTIVE",
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Failed => "FAILED",
            OrderStatus::Other(raw) => raw,
        }
    }

    /// PAID and FAILED are final; the gateway will not move the order again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Failed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(OrderStatus::from_gateway(&raw))
    }
}

/// Customer record sent alongside a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: String,
    /// Ten digits, no country code or separators.
    pub phone: String,
}

/// An order about to be created at the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    /// Major currency units, forwarded as-is.
    pub amount: Decimal,
    pub currency: &'static str,
    pub customer: CustomerDetails,
    /// Post-payment redirect. Contains the literal `{order_id}` placeholder
    /// which the gateway substitutes.
    pub return_url: String,
    /// Opaque metadata, only sent when present.
    pub course_id: Option<String>,
}

/// Result of a successful create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrder {
    pub order_id: String,
    pub payment_session_id: String,
    pub status: OrderStatus,
}

/// Read-only view of an order as the gateway currently reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSnapshot {
    pub order_id: String,
    pub status: OrderStatus,
    pub amount: Decimal,
}
