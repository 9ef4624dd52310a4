//! Payment domain - order lifecycle and gateway webhook handling.
//!
//! Orders live at the gateway. This module validates what goes out, and
//! authenticates and deduplicates what comes back.

mod errors;
mod order;
mod order_request;
mod webhook_event;
mod webhook_processor;
mod webhook_verifier;

pub use errors::{GatewayOperation, PaymentError};
pub use order::{
    CreatedOrder, CustomerDetails, NewOrder, OrderSnapshot, OrderStatus, ORDER_CURRENCY,
};
pub use order_request::{
    mask_phone, normalize_phone, OrderRequest, VerifyOrderRequest, MAX_ORDER_AMOUNT,
    MIN_ORDER_AMOUNT,
};
pub use webhook_event::{best_effort_order_id, GatewayWebhookEvent};
pub use webhook_processor::{WebhookEventProcessor, WebhookOutcome};
pub use webhook_verifier::{
    sign_payload, verify_signature, WebhookSignatureVerifier, SIGNATURE_HEADER,
};
