//! Normalized gateway webhook event.
//!
//! Deliveries arrive either flat (`{order, payment}`) or wrapped in the
//! gateway envelope (`{type, event_time, data: {order, payment, ...}}`).
//! Both are reduced to the same [`GatewayWebhookEvent`].

use serde_json::Value;

use super::errors::PaymentError;

/// A webhook delivery after shape checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayWebhookEvent {
    pub order_id: String,
    pub order_status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_id: Option<String>,
    /// Envelope `type`, e.g. `PAYMENT_SUCCESS_WEBHOOK`.
    pub event_type: Option<String>,
}

impl GatewayWebhookEvent {
    /// Parses an already-authenticated body.
    ///
    /// Fails with `MalformedPayload` when the body is not JSON or when
    /// `order.order_id` is absent or empty.
    pub fn parse(raw_body: &[u8]) -> Result<Self, PaymentError> {
        let value: Value = serde_json::from_slice(raw_body)
            .map_err(|e| PaymentError::malformed(format!("body is not valid JSON: {}", e)))?;

        let body = payload_root(&value);

        let order_id = order_id_of(body)
            .ok_or_else(|| PaymentError::malformed("missing order.order_id"))?;

        Ok(Self {
            order_id,
            order_status: string_at(body, "/order/order_status"),
            payment_status: string_at(body, "/payment/payment_status"),
            payment_id: id_at(body, "/payment/cf_payment_id")
                .or_else(|| id_at(body, "/payment/payment_id")),
            event_type: string_at(&value, "/type"),
        })
    }

    /// Deduplication key for redelivered events.
    ///
    /// Redeliveries of the same notification carry the same order, payment
    /// and status, so they collapse onto one key.
    pub fn idempotency_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.order_id,
            self.payment_id.as_deref().unwrap_or("-"),
            self.payment_status
                .as_deref()
                .or(self.order_status.as_deref())
                .unwrap_or("-"),
        )
    }

    /// True when the payment leg reports success or the order reports PAID.
    pub fn indicates_payment_success(&self) -> bool {
        self.payment_status.as_deref() == Some("SUCCESS")
            || self.order_status.as_deref() == Some("PAID")
    }
}

/// Pulls `order.order_id` out of an arbitrary body for log correlation.
///
/// Used before the signature has been checked, so the result is untrusted.
pub fn best_effort_order_id(raw_body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(raw_body).ok()?;
    order_id_of(payload_root(&value))
}

fn payload_root(value: &Value) -> &Value {
    value
        .get("data")
        .filter(|data| data.is_object())
        .unwrap_or(value)
}

fn order_id_of(body: &Value) -> Option<String> {
    id_at(body, "/order/order_id").filter(|id| !id.trim().is_empty())
}

fn string_at(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Ids may be sent as strings or numbers.
fn id_at(value: &Value, pointer: &str) -> Option<String> {
    match value.pointer(pointer)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bytes(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn parses_flat_payload() {
        let body = bytes(json!({
            "order": {"order_id": "order_1", "order_status": "PAID"},
            "payment": {"payment_status": "SUCCESS", "payment_id": "pay_9"}
        }));

        let event = GatewayWebhookEvent::parse(&body).unwrap();

        assert_eq!(event.order_id, "order_1");
        assert_eq!(event.order_status.as_deref(), Some("PAID"));
        assert_eq!(event.payment_status.as_deref(), Some("SUCCESS"));
        assert_eq!(event.payment_id.as_deref(), Some("pay_9"));
        assert!(event.event_type.is_none());
    }

    #[test]
    fn parses_enveloped_payload_with_numeric_payment_id() {
        let body = bytes(json!({
            "type": "PAYMENT_SUCCESS_WEBHOOK",
            "event_time": "2024-01-15T10:30:00+05:30",
            "data": {
                "order": {"order_id": "order_2", "order_amount": 2999},
                "payment": {"cf_payment_id": 5114910_u64, "payment_status": "SUCCESS"},
                "customer_details": {"customer_phone": "9876543210"}
            }
        }));

        let event = GatewayWebhookEvent::parse(&body).unwrap();

        assert_eq!(event.order_id, "order_2");
        assert_eq!(event.payment_id.as_deref(), Some("5114910"));
        assert_eq!(event.event_type.as_deref(), Some("PAYMENT_SUCCESS_WEBHOOK"));
        assert!(event.indicates_payment_success());
    }

    #[test]
    fn missing_order_id_is_malformed() {
        for body in [
            json!({"order": {}}),
            json!({"payment": {"payment_status": "SUCCESS"}}),
            json!({"data": {"order": {"order_id": ""}}}),
            json!([1, 2, 3]),
        ] {
            let err = GatewayWebhookEvent::parse(&bytes(body)).unwrap_err();
            assert!(matches!(err, PaymentError::MalformedPayload(_)));
        }
    }

    #[test]
    fn non_json_is_malformed() {
        let err = GatewayWebhookEvent::parse(b"order_id=1").unwrap_err();
        assert!(matches!(err, PaymentError::MalformedPayload(_)));
    }

    #[test]
    fn idempotency_key_is_stable_and_status_sensitive() {
        let pending = GatewayWebhookEvent {
            order_id: "order_1".into(),
            order_status: Some("ACTIVE".into()),
            payment_status: Some("PENDING".into()),
            payment_id: Some("77".into()),
            event_type: None,
        };
        let success = GatewayWebhookEvent {
            payment_status: Some("SUCCESS".into()),
            ..pending.clone()
        };

        assert_eq!(pending.idempotency_key(), "order_1:77:PENDING");
        assert_eq!(pending.idempotency_key(), pending.clone().idempotency_key());
        assert_ne!(pending.idempotency_key(), success.idempotency_key());
    }

    #[test]
    fn idempotency_key_falls_back_to_order_status() {
        let event = GatewayWebhookEvent {
            order_id: "order_1".into(),
            order_status: Some("PAID".into()),
            payment_status: None,
            payment_id: None,
            event_type: None,
        };
        assert_eq!(event.idempotency_key(), "order_1:-:PAID");
    }

    #[test]
    fn best_effort_order_id_tolerates_garbage() {
        assert_eq!(
            best_effort_order_id(br#"{"data":{"order":{"order_id":"o_5"}}}"#).as_deref(),
            Some("o_5")
        );
        assert_eq!(best_effort_order_id(b"\xff\xfe"), None);
        assert_eq!(best_effort_order_id(b"{}"), None);
    }
}
