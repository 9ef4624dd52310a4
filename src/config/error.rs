//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address")]
    InvalidBindAddress,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Gateway timeout ({gateway_secs}s) must be below the request timeout ({request_secs}s)")]
    GatewayTimeoutNotBelowRequest { gateway_secs: u64, request_secs: u64 },

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Redis configuration required when {0} backend is redis")]
    RedisRequired(&'static str),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Base URL must use HTTPS in production")]
    BaseUrlMustBeHttps,

    #[error("Sandbox gateway cannot be used in production")]
    SandboxGatewayInProduction,

    #[error("Invalid gateway API base URL")]
    InvalidGatewayUrl,

    #[error("JWT secret must be at least 32 bytes")]
    JwtSecretTooShort,

    #[error("Rate limits must be greater than zero")]
    InvalidRateLimit,
}
