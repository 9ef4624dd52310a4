//! Payment gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

const SANDBOX_BASE_URL: &str = "https://sandbox.cashfree.com/pg";
const PRODUCTION_BASE_URL: &str = "https://api.cashfree.com/pg";

/// Gateway credentials and endpoint selection.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Merchant app id (`x-client-id`)
    pub app_id: String,

    /// Merchant secret key (`x-client-secret`)
    pub secret_key: SecretString,

    /// Webhook signing secret. Falls back to `secret_key` when unset.
    pub webhook_secret: Option<SecretString>,

    /// Sandbox or production endpoints
    #[serde(default)]
    pub environment: GatewayEnvironment,

    /// Value sent as `x-api-version`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Overrides the endpoint derived from `environment`
    pub api_base_url: Option<String>,
}

/// Which gateway deployment to talk to.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatewayEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl GatewayEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            GatewayEnvironment::Sandbox => SANDBOX_BASE_URL,
            GatewayEnvironment::Production => PRODUCTION_BASE_URL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayEnvironment::Sandbox => "sandbox",
            GatewayEnvironment::Production => "production",
        }
    }
}

impl GatewayConfig {
    /// Creates a sandbox configuration with defaults for everything else.
    pub fn new(app_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            secret_key: SecretString::new(secret_key.into()),
            webhook_secret: None,
            environment: GatewayEnvironment::default(),
            api_version: default_api_version(),
            timeout_secs: default_timeout(),
            api_base_url: None,
        }
    }

    /// Endpoint root, without trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
    }

    /// Secret used to verify webhook signatures.
    pub fn webhook_secret(&self) -> &SecretString {
        self.webhook_secret.as_ref().unwrap_or(&self.secret_key)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate gateway configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.app_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT_ORDERS__GATEWAY__APP_ID"));
        }
        if self.secret_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT_ORDERS__GATEWAY__SECRET_KEY"));
        }
        if let Some(secret) = &self.webhook_secret {
            if secret.expose_secret().trim().is_empty() {
                return Err(ValidationError::MissingRequired(
                    "PAYMENT_ORDERS__GATEWAY__WEBHOOK_SECRET",
                ));
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if let Some(url) = &self.api_base_url {
            reqwest::Url::parse(url).map_err(|_| ValidationError::InvalidGatewayUrl)?;
        }
        if *environment == Environment::Production
            && self.environment == GatewayEnvironment::Sandbox
        {
            return Err(ValidationError::SandboxGatewayInProduction);
        }
        Ok(())
    }
}

fn default_api_version() -> String {
    "2023-08-01".to_string()
}

fn default_timeout() -> u64 {
    15
}
