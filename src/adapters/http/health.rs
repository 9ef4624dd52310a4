//! Liveness endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::config::{Environment, GatewayEnvironment};

#[derive(Debug, Clone, Copy)]
pub struct HealthState {
    pub environment: Environment,
    pub gateway_environment: GatewayEnvironment,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: &'static str,
    pub gateway_environment: &'static str,
}

/// GET /health
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.environment.as_str(),
        gateway_environment: state.gateway_environment.as_str(),
    })
}

pub fn health_routes() -> Router<HealthState> {
    Router::new().route("/health", get(health_check))
}
