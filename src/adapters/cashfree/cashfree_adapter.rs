//! Cashfree payment gateway adapter.
//!
//! Implements the `PaymentGateway` port over the Cashfree PG REST API.
//! Every call is a single request: no retries, no caching.
//!
//! # Configuration
//!
//! ```ignore
//! let config = CashfreeConfig::from(&app_config.gateway);
//! let gateway = CashfreeGateway::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Response, Url};
use secrecy::{ExposeSecret, SecretString};
use std::time::{Duration, Instant};

use crate::config::GatewayConfig;
use crate::domain::payment::{CreatedOrder, NewOrder, OrderSnapshot, OrderStatus};
use crate::ports::{GatewayError, PaymentGateway};

use super::api_types::{CreateOrderRequest, ErrorBody, OrderEntity};

/// Longest gateway error text kept for logs.
const MAX_ERROR_TEXT: usize = 512;

/// Cashfree API configuration.
#[derive(Clone)]
pub struct CashfreeConfig {
    app_id: String,
    secret_key: SecretString,
    api_version: String,
    api_base_url: String,
    timeout: Duration,
}

impl CashfreeConfig {
    /// Sandbox configuration with default version and timeout.
    pub fn new(app_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self::from(&GatewayConfig::new(app_id, secret_key))
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.api_base_url
    }
}

impl From<&GatewayConfig> for CashfreeConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            app_id: config.app_id.clone(),
            secret_key: config.secret_key.clone(),
            api_version: config.api_version.clone(),
            api_base_url: config.base_url().to_string(),
            timeout: config.timeout(),
        }
    }
}

impl std::fmt::Debug for CashfreeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CashfreeConfig")
            .field("app_id", &self.app_id)
            .field("api_version", &self.api_version)
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Cashfree payment gateway adapter.
pub struct CashfreeGateway {
    config: CashfreeConfig,
    http_client: reqwest::Client,
}

impl CashfreeGateway {
    pub fn new(config: CashfreeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Builds `<base>/<segments...>` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.config.api_base_url)
            .map_err(|e| GatewayError::Transport(format!("invalid gateway base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::Transport("gateway base url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("x-client-id", &self.config.app_id)
            .header("x-client-secret", self.config.secret_key.expose_secret())
            .header("x-api-version", &self.config.api_version)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.config.timeout)
    }

    /// Reads a 2xx body as an order entity, or maps the failure.
    async fn read_order(response: Response) -> Result<OrderEntity, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            return Err(rejection(status.as_u16(), response).await);
        }

        response
            .json::<OrderEntity>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn send_create(&self, order: &NewOrder) -> Result<CreatedOrder, GatewayError> {
        let url = self.endpoint(&["orders"])?;
        let response = self
            .authorized(self.http_client.post(url))
            .json(&CreateOrderRequest::from(order))
            .send()
            .await
            .map_err(transport_error)?;

        let entity = Self::read_order(response).await?;
        if entity.order_id.is_empty() {
            return Err(GatewayError::Decode("empty order_id".to_string()));
        }
        let payment_session_id = entity
            .payment_session_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GatewayError::Decode("missing payment_session_id".to_string()))?;

        Ok(CreatedOrder {
            order_id: entity.order_id,
            payment_session_id,
            status: OrderStatus::from_gateway(&entity.order_status),
        })
    }

    async fn send_fetch(&self, order_id: &str) -> Result<OrderSnapshot, GatewayError> {
        let url = self.endpoint(&["orders", order_id])?;
        let response = self
            .authorized(self.http_client.get(url))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            let rejected = rejection(404, response).await;
            tracing::debug!(order_id, error = %rejected, "Cashfree order lookup returned 404");
            return Err(GatewayError::NotFound(order_id.to_string()));
        }

        let entity = Self::read_order(response).await?;
        Ok(OrderSnapshot {
            order_id: entity.order_id,
            status: OrderStatus::from_gateway(&entity.order_status),
            amount: entity.order_amount,
        })
    }
}

#[async_trait]
impl PaymentGateway for CashfreeGateway {
    async fn create_order(&self, order: &NewOrder) -> Result<CreatedOrder, GatewayError> {
        let started = Instant::now();
        let result = self.send_create(order).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(created) => tracing::info!(
                order_id = %created.order_id,
                status = %created.status,
                duration_ms,
                "Cashfree order created"
            ),
            Err(e) => log_failure("create_order", None, duration_ms, e),
        }
        result
    }

    async fn fetch_order(&self, order_id: &str) -> Result<OrderSnapshot, GatewayError> {
        let started = Instant::now();
        let result = self.send_fetch(order_id).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(snapshot) => tracing::info!(
                order_id = %snapshot.order_id,
                status = %snapshot.status,
                duration_ms,
                "Cashfree order fetched"
            ),
            Err(e) => log_failure("fetch_order", Some(order_id), duration_ms, e),
        }
        result
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(e.to_string())
    }
}

async fn rejection(status: u16, response: Response) -> GatewayError {
    let text = response.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();

    let message = body.message.unwrap_or_else(|| truncate(&text));
    GatewayError::Rejected {
        status,
        code: body.code.or(body.kind),
        message,
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_ERROR_TEXT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn log_failure(operation: &str, order_id: Option<&str>, duration_ms: u64, error: &GatewayError) {
    match error {
        GatewayError::Rejected {
            status,
            code,
            message,
        } => tracing::error!(
            operation,
            order_id = order_id.unwrap_or("-"),
            duration_ms,
            upstream_status = status,
            code = code.as_deref().unwrap_or("-"),
            gateway_message = %message,
            "Cashfree request rejected"
        ),
        other => tracing::error!(
            operation,
            order_id = order_id.unwrap_or("-"),
            duration_ms,
            error = %other,
            "Cashfree request failed"
        ),
    }
}
