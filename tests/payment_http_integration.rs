//! End-to-end tests for the payment HTTP API.
//!
//! Drives the full router (auth, rate limiting, handlers, webhook
//! processing) with an in-process gateway and identity provider.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;

use payment_orders::adapters::auth::MockSessionValidator;
use payment_orders::adapters::cashfree::MockPaymentGateway;
use payment_orders::adapters::events::{InMemoryWebhookEventRepository, RecordingPaymentEventSink};
use payment_orders::adapters::http::middleware::RateLimiterState;
use payment_orders::adapters::http::{app_router, HealthState, PaymentsAppState};
use payment_orders::adapters::rate_limiter::InMemoryRateLimiter;
use payment_orders::config::{
    CheckoutConfig, Environment, GatewayEnvironment, RateLimitConfig,
};
use payment_orders::domain::payment::{
    sign_payload, OrderStatus, WebhookEventProcessor, WebhookSignatureVerifier, SIGNATURE_HEADER,
};
use payment_orders::ports::GatewayError;

// =============================================================================
// Test Infrastructure
// =============================================================================

const WEBHOOK_SECRET: &str = "cf-webhook-secret";
const TOKEN: &str = "learner-token";

struct TestApp {
    router: Router,
    gateway: MockPaymentGateway,
    sink: Arc<RecordingPaymentEventSink>,
}

struct Options {
    rate_limit: RateLimitConfig,
    checkout: CheckoutConfig,
    expose_error_details: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            checkout: CheckoutConfig::new("https://learn.example.com"),
            expose_error_details: false,
        }
    }
}

fn test_app() -> TestApp {
    test_app_with(Options::default())
}

fn test_app_with(options: Options) -> TestApp {
    let gateway = MockPaymentGateway::new();
    let sink = Arc::new(RecordingPaymentEventSink::new());

    let processor = WebhookEventProcessor::new(
        Arc::new(InMemoryWebhookEventRepository::new()),
        sink.clone(),
    );

    let payments = PaymentsAppState::new(
        Arc::new(gateway.clone()),
        options.checkout,
        WebhookSignatureVerifier::new(SecretString::new(WEBHOOK_SECRET.to_string())),
        Arc::new(processor),
        options.expose_error_details,
    );

    let router = app_router(
        payments,
        Arc::new(MockSessionValidator::new().with_learner(TOKEN, "user-42")),
        RateLimiterState::new(Arc::new(InMemoryRateLimiter::new(options.rate_limit)), true),
        HealthState {
            environment: Environment::Development,
            gateway_environment: GatewayEnvironment::Sandbox,
        },
    );

    TestApp {
        router,
        gateway,
        sink,
    }
}

fn post_json(uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "203.0.113.9");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_webhook(raw_body: &[u8], signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/webhooks/cashfree")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(Body::from(raw_body.to_vec())).unwrap()
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn order_body() -> Value {
    json!({
        "order_amount": 2999,
        "customer_name": "John Doe",
        "customer_email": "JOHN@EX.com",
        "customer_phone": "+91 98765-43210"
    })
}

fn paid_webhook_body(order_id: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "type": "PAYMENT_SUCCESS_WEBHOOK",
        "event_time": "2024-01-15T10:30:00+05:30",
        "data": {
            "order": {"order_id": order_id, "order_amount": 2999, "order_currency": "INR"},
            "payment": {"cf_payment_id": 5114910, "payment_status": "SUCCESS"}
        }
    }))
    .unwrap()
}

fn sign(raw_body: &[u8], secret: &str) -> String {
    sign_payload(raw_body, secret.as_bytes()).unwrap()
}

// =============================================================================
// Create order
// =============================================================================

#[tokio::test]
async fn create_order_normalizes_customer_before_gateway_call() {
    let app = test_app();

    let (status, body) = send(&app, post_json("/api/create-order", &order_body(), Some(TOKEN))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["orderId"].as_str().unwrap().starts_with("order_mock_"));
    assert!(body["paymentSessionId"].as_str().unwrap().starts_with("session_mock_"));

    let sent = app.gateway.last_created().unwrap();
    assert_eq!(sent.customer.email, "john@ex.com");
    assert_eq!(sent.customer.phone, "9876543210");
    assert_eq!(sent.customer.name, "John Doe");
    assert_eq!(sent.amount, Decimal::from(2999));
    assert_eq!(sent.currency, "INR");
    assert_eq!(
        sent.return_url,
        "https://learn.example.com/payment-result?order_id={order_id}"
    );
    assert!(sent.customer.customer_id.as_str().starts_with("cust_"));
}

#[tokio::test]
async fn create_order_with_zero_amount_is_rejected_without_gateway_call() {
    let app = test_app();
    let mut body = order_body();
    body["order_amount"] = json!(0);

    let (status, body) = send(&app, post_json("/api/create-order", &body, Some(TOKEN))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Minimum amount"));
    assert!(!app.gateway.was_called("create_order"));
}

#[tokio::test]
async fn create_order_requires_a_principal() {
    let app = test_app();

    let (status, body) = send(&app, post_json("/api/create-order", &order_body(), None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Unauthorized"}));
    assert!(!app.gateway.was_called("create_order"));
}

#[tokio::test]
async fn create_order_rejects_unknown_token() {
    let app = test_app();

    let (status, _) = send(
        &app,
        post_json("/api/create-order", &order_body(), Some("forged")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(!app.gateway.was_called("create_order"));
}

#[tokio::test]
async fn create_order_with_non_json_body_is_400() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/create-order")
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
        .body(Body::from("order_amount=2999"))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn create_order_gateway_failure_is_generic() {
    let app = test_app();
    app.gateway.set_error(GatewayError::Rejected {
        status: 401,
        code: Some("authentication_failed".into()),
        message: "authentication Failed".into(),
    });

    let (status, body) = send(&app, post_json("/api/create-order", &order_body(), Some(TOKEN))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "Failed to create payment order. Please try again later."})
    );
}

#[tokio::test]
async fn create_order_configuration_detail_only_outside_production() {
    let dev = test_app_with(Options {
        checkout: CheckoutConfig::new("ftp://learn.example.com"),
        expose_error_details: true,
        ..Options::default()
    });
    let prod = test_app_with(Options {
        checkout: CheckoutConfig::new("ftp://learn.example.com"),
        expose_error_details: false,
        ..Options::default()
    });

    let (dev_status, dev_body) =
        send(&dev, post_json("/api/create-order", &order_body(), Some(TOKEN))).await;
    let (prod_status, prod_body) =
        send(&prod, post_json("/api/create-order", &order_body(), Some(TOKEN))).await;

    assert_eq!(dev_status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(prod_status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(dev_body["details"].is_string());
    assert!(prod_body.get("details").is_none());
    assert!(!dev.gateway.was_called("create_order"));
}

#[tokio::test]
async fn identical_create_requests_mint_distinct_orders() {
    let app = test_app();

    let (_, first) = send(&app, post_json("/api/create-order", &order_body(), Some(TOKEN))).await;
    let (_, second) = send(&app, post_json("/api/create-order", &order_body(), Some(TOKEN))).await;

    assert_ne!(first["orderId"], second["orderId"]);
    assert_eq!(app.gateway.call_count("create_order"), 2);
}

// =============================================================================
// Verify order
// =============================================================================

#[tokio::test]
async fn verify_order_passes_gateway_status_through() {
    let app = test_app();
    app.gateway
        .add_order("order_77", OrderStatus::Paid, Decimal::from(2999));

    let (status, body) = send(
        &app,
        post_json("/api/verify-order", &json!({"orderId": "order_77"}), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "PAID", "orderId": "order_77", "orderAmount": 2999.0})
    );
}

#[tokio::test]
async fn verify_order_requires_order_id() {
    let app = test_app();

    let (status, body) = send(&app, post_json("/api/verify-order", &json!({}), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Order ID is required"}));
}

#[tokio::test]
async fn verify_unknown_order_is_generic_500() {
    let app = test_app();

    let (status, body) = send(
        &app,
        post_json("/api/verify-order", &json!({"orderId": "order_nope"}), None),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "Could not fetch payment status. Please try again later."})
    );
    let text = body.to_string();
    assert!(!text.contains("order_nope"));
    assert!(!text.contains("not found"));
}

#[tokio::test]
async fn verify_order_is_rate_limited_per_ip() {
    let app = test_app_with(Options {
        rate_limit: RateLimitConfig {
            per_ip_per_minute: 2,
            ..RateLimitConfig::default()
        },
        ..Options::default()
    });
    app.gateway
        .add_order("order_1", OrderStatus::Active, Decimal::from(10));
    let body = json!({"orderId": "order_1"});

    let (first, _) = send(&app, post_json("/api/verify-order", &body, None)).await;
    let (second, _) = send(&app, post_json("/api/verify-order", &body, None)).await;
    let response = app
        .router
        .clone()
        .oneshot(post_json("/api/verify-order", &body, None))
        .await
        .unwrap();

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    assert_eq!(app.gateway.call_count("fetch_order"), 2);
}

// =============================================================================
// Webhooks
// =============================================================================

#[tokio::test]
async fn signed_webhook_is_acknowledged_and_dispatched() {
    let app = test_app();
    let raw = paid_webhook_body("order_9");

    let (status, body) = send(&app, post_webhook(&raw, Some(&sign(&raw, WEBHOOK_SECRET)))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "message": "Webhook processed successfully", "orderId": "order_9"})
    );
    assert_eq!(app.sink.status_count(), 1);
    assert_eq!(app.sink.recorded()[0].payment_id.as_deref(), Some("5114910"));
}

#[tokio::test]
async fn webhook_signed_with_other_secret_is_401() {
    let app = test_app();
    let raw = paid_webhook_body("order_9");

    let (status, body) = send(&app, post_webhook(&raw, Some(&sign(&raw, "not-the-secret")))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Invalid signature"}));
    assert_eq!(app.sink.status_count(), 0);
}

#[tokio::test]
async fn webhook_without_signature_is_401() {
    let app = test_app();
    let raw = paid_webhook_body("order_9");

    let (status, body) = send(&app, post_webhook(&raw, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Missing signature"}));
}

#[tokio::test]
async fn webhook_with_tampered_body_is_401() {
    let app = test_app();
    let raw = paid_webhook_body("order_9");
    let signature = sign(&raw, WEBHOOK_SECRET);
    let mut tampered = raw.clone();
    let last = tampered.len() - 2;
    tampered[last] ^= 0x01;

    let (status, _) = send(&app, post_webhook(&tampered, Some(&signature))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signed_webhook_without_order_id_is_400() {
    let app = test_app();
    let raw = serde_json::to_vec(&json!({
        "data": {"payment": {"cf_payment_id": 1, "payment_status": "SUCCESS"}}
    }))
    .unwrap();

    let (status, body) = send(&app, post_webhook(&raw, Some(&sign(&raw, WEBHOOK_SECRET)))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid payload"}));
}

#[tokio::test]
async fn redelivered_webhook_is_acknowledged_once() {
    let app = test_app();
    let raw = paid_webhook_body("order_9");
    let signature = sign(&raw, WEBHOOK_SECRET);

    let (first_status, first) = send(&app, post_webhook(&raw, Some(&signature))).await;
    let (second_status, second) = send(&app, post_webhook(&raw, Some(&signature))).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first["message"], "Webhook processed successfully");
    assert_eq!(second["message"], "Webhook already processed");
    assert_eq!(app.sink.status_count(), 1);
    assert_eq!(app.sink.notification_count(), 1);
}

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn get_on_payment_routes_is_405() {
    let app = test_app();

    for uri in ["/api/create-order", "/api/verify-order", "/api/webhooks/cashfree"] {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{uri}");
        assert_eq!(response.headers()[header::ALLOW], "POST");
    }
}

#[tokio::test]
async fn health_reports_environment() {
    let app = test_app();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["gatewayEnvironment"], "sandbox");
}
