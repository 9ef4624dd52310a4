//! Axum router configuration for the payment endpoints.

use axum::{middleware, routing::post, Router};

use crate::adapters::http::middleware::{
    auth_middleware, rate_limit_middleware, AuthState, RateLimiterState,
};

use super::handlers::{
    create_order, handle_cashfree_webhook, method_not_allowed, verify_order, PaymentsAppState,
};

/// Create the payment API router, suitable for mounting at `/api`.
///
/// # Routes
/// - `POST /create-order` - bearer auth, rate limited
/// - `POST /verify-order` - public, rate limited
/// - `POST /webhooks/cashfree` - signature verified, not rate limited
///
/// Every other method on these paths is answered by [`method_not_allowed`].
pub fn payment_routes(auth: AuthState, limiter: RateLimiterState) -> Router<PaymentsAppState> {
    // Layers run bottom-up: auth attaches the principal before the per-user
    // limit is checked.
    let create = Router::new()
        .route(
            "/create-order",
            post(create_order).fallback(method_not_allowed),
        )
        .route_layer(middleware::from_fn_with_state(
            limiter.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(auth, auth_middleware));

    let verify = Router::new()
        .route(
            "/verify-order",
            post(verify_order).fallback(method_not_allowed),
        )
        .route_layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));

    let webhooks = Router::new().route(
        "/webhooks/cashfree",
        post(handle_cashfree_webhook).fallback(method_not_allowed),
    );

    create.merge(verify).merge(webhooks)
}
