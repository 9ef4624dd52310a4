//! Application handlers.
//!
//! Command handlers that orchestrate domain operations through ports.

pub mod payment;

pub use payment::{
    CreateOrderCommand, CreateOrderHandler, CreateOrderResult, HandleGatewayWebhookCommand,
    HandleGatewayWebhookHandler, HandleGatewayWebhookResult, VerifyOrderCommand,
    VerifyOrderHandler, VerifyOrderResult,
};
