//! Payment order handlers.

mod create_order;
mod handle_gateway_webhook;
mod verify_order;

pub use create_order::{CreateOrderCommand, CreateOrderHandler, CreateOrderResult};
pub use handle_gateway_webhook::{
    HandleGatewayWebhookCommand, HandleGatewayWebhookHandler, HandleGatewayWebhookResult,
};
pub use verify_order::{VerifyOrderCommand, VerifyOrderHandler, VerifyOrderResult};
