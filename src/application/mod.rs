//! Application layer - commands and their handlers.
//!
//! Handlers validate input with domain types, call ports, and map failures
//! onto [`PaymentError`](crate::domain::payment::PaymentError).

pub mod handlers;

pub use handlers::{
    CreateOrderCommand, CreateOrderHandler, CreateOrderResult, HandleGatewayWebhookCommand,
    HandleGatewayWebhookHandler, HandleGatewayWebhookResult, VerifyOrderCommand,
    VerifyOrderHandler, VerifyOrderResult,
};
