//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the payment domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentGateway` - order create/fetch at the payment gateway
//! - `SessionValidator` - identity provider contract
//! - `RateLimiter` - shared request counters
//! - `PaymentEventSink` - downstream effects of verified webhooks
//! - `WebhookEventRepository` - webhook redelivery tracking

mod payment_event_sink;
mod payment_gateway;
mod rate_limiter;
mod session_validator;
mod webhook_event_repository;

pub use payment_event_sink::{PaymentEventSink, SinkError};
pub use payment_gateway::{GatewayError, PaymentGateway};
pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};
pub use session_validator::SessionValidator;
pub use webhook_event_repository::{
    RepositoryError, SaveResult, WebhookEventRecord, WebhookEventRepository,
};
