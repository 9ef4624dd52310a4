//! Checkout redirect configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Placeholder the gateway replaces with the order id after payment.
pub const ORDER_ID_PLACEHOLDER: &str = "{order_id}";

/// Where customers land after paying.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutConfig {
    /// Public site origin, e.g. `https://learn.example.com`
    pub base_url: String,
}

impl CheckoutConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// `<base_url>/payment-result?order_id={order_id}` with the placeholder
    /// left for the gateway to fill.
    pub fn return_url_template(&self) -> Result<String, ValidationError> {
        let base = self.base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT_ORDERS__CHECKOUT__BASE_URL"));
        }

        let parsed = reqwest::Url::parse(base)
            .map_err(|e| ValidationError::InvalidBaseUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ValidationError::InvalidBaseUrl(
                "expected an http(s) origin".to_string(),
            ));
        }

        Ok(format!(
            "{}/payment-result?order_id={}",
            base, ORDER_ID_PLACEHOLDER
        ))
    }

    /// Validate checkout configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        self.return_url_template()?;
        if *environment == Environment::Production && !self.base_url.trim().starts_with("https://")
        {
            return Err(ValidationError::BaseUrlMustBeHttps);
        }
        Ok(())
    }
}
