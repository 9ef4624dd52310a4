//! Webhook downstream adapters.
//!
//! Sinks receive verified payment events:
//! - `LoggingPaymentEventSink` - logs only; the production default
//! - `RecordingPaymentEventSink` - captures calls for assertions
//!
//! Stores remember processed webhook keys:
//! - `InMemoryWebhookEventRepository` - single process, swept by TTL
//! - `RedisWebhookEventRepository` - shared, with TTL

mod in_memory_repository;
mod logging_sink;
mod recording_sink;
mod redis_repository;

pub use in_memory_repository::InMemoryWebhookEventRepository;
pub use logging_sink::LoggingPaymentEventSink;
pub use recording_sink::RecordingPaymentEventSink;
pub use redis_repository::RedisWebhookEventRepository;
