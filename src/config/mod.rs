//! Application configuration module
//!
//! Configuration is loaded from environment variables using the `config` and
//! `dotenvy` crates. Variables carry the `PAYMENT_ORDERS` prefix and nested
//! values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use payment_orders::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod checkout;
mod error;
mod gateway;
mod rate_limit;
mod redis;
mod server;
mod webhooks;

pub use auth::AuthConfig;
pub use checkout::{CheckoutConfig, ORDER_ID_PLACEHOLDER};
pub use error::{ConfigError, ValidationError};
pub use gateway::{GatewayConfig, GatewayEnvironment};
pub use rate_limit::{RateLimitConfig, StateBackend};
pub use redis::RedisConfig;
pub use server::{Environment, LogFormat, ServerConfig};
pub use webhooks::WebhookConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`], then call [`AppConfig::validate()`]
/// before building any adapters.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Payment gateway credentials and endpoint
    pub gateway: GatewayConfig,

    /// Checkout return URL
    pub checkout: CheckoutConfig,

    /// Session token validation
    pub auth: AuthConfig,

    /// Rate limits for the payment routes
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Redis connection, when a backend needs it
    pub redis: Option<RedisConfig>,

    /// Webhook dedup store
    #[serde(default)]
    pub webhooks: WebhookConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `PAYMENT_ORDERS__*` variables.
    ///
    /// - `PAYMENT_ORDERS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PAYMENT_ORDERS__GATEWAY__APP_ID=...` -> `gateway.app_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAYMENT_ORDERS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let environment = &self.server.environment;

        self.server.validate()?;
        self.gateway.validate(environment)?;
        self.checkout.validate(environment)?;
        self.auth.validate()?;
        self.rate_limit.validate()?;
        self.webhooks.validate()?;

        if self.gateway.timeout_secs >= self.server.request_timeout_secs {
            return Err(ValidationError::GatewayTimeoutNotBelowRequest {
                gateway_secs: self.gateway.timeout_secs,
                request_secs: self.server.request_timeout_secs,
            });
        }

        match &self.redis {
            Some(redis) => redis.validate()?,
            None if self.rate_limit.backend == StateBackend::Redis => {
                return Err(ValidationError::RedisRequired("rate limit"));
            }
            None if self.webhooks.store == StateBackend::Redis => {
                return Err(ValidationError::RedisRequired("webhook store"));
            }
            None => {}
        }

        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
