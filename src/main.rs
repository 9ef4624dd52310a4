use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use redis::aio::MultiplexedConnection;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use payment_orders::adapters::auth::JwtSessionValidator;
use payment_orders::adapters::cashfree::{CashfreeConfig, CashfreeGateway};
use payment_orders::adapters::events::{
    InMemoryWebhookEventRepository, LoggingPaymentEventSink, RedisWebhookEventRepository,
};
use payment_orders::adapters::http::middleware::RateLimiterState;
use payment_orders::adapters::http::{app_router, HealthState, PaymentsAppState};
use payment_orders::adapters::rate_limiter::{InMemoryRateLimiter, RedisRateLimiter};
use payment_orders::config::{AppConfig, LogFormat, RedisConfig, ServerConfig, StateBackend};
use payment_orders::domain::payment::{WebhookEventProcessor, WebhookSignatureVerifier};
use payment_orders::ports::{PaymentGateway, RateLimiter, WebhookEventRepository};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = config.server.environment.as_str(),
        gateway_environment = config.gateway.environment.as_str(),
        rate_limit_backend = ?config.rate_limit.backend,
        webhook_store = ?config.webhooks.store,
        "Starting payment-orders"
    );

    let uses_redis = config.rate_limit.backend == StateBackend::Redis
        || config.webhooks.store == StateBackend::Redis;
    let redis = match &config.redis {
        Some(redis) if uses_redis => Some(connect_redis(redis).await?),
        _ => None,
    };

    let limiter: Arc<dyn RateLimiter> = match config.rate_limit.backend {
        StateBackend::Memory => {
            if config.is_production() {
                tracing::warn!(
                    "In-memory rate limiter selected; limits are per instance and not shared"
                );
            }
            let limiter = Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()));
            spawn_window_sweeper(limiter.clone());
            limiter
        }
        StateBackend::Redis => {
            let conn = redis.clone().ok_or("redis connection required for rate limiting")?;
            Arc::new(RedisRateLimiter::new(conn, config.rate_limit.clone()))
        }
    };

    let webhook_store: Arc<dyn WebhookEventRepository> = match config.webhooks.store {
        StateBackend::Memory => {
            let store = Arc::new(InMemoryWebhookEventRepository::with_ttl(
                config.webhooks.dedup_ttl(),
            ));
            spawn_dedup_sweeper(store.clone());
            store
        }
        StateBackend::Redis => {
            let conn = redis
                .clone()
                .ok_or("redis connection required for the webhook store")?;
            Arc::new(RedisWebhookEventRepository::new(
                conn,
                config.webhooks.dedup_ttl(),
            ))
        }
    };

    let gateway: Arc<dyn PaymentGateway> =
        Arc::new(CashfreeGateway::new(CashfreeConfig::from(&config.gateway)));

    let processor = Arc::new(WebhookEventProcessor::new(
        webhook_store,
        Arc::new(LoggingPaymentEventSink::new()),
    ));

    let payments = PaymentsAppState::new(
        gateway,
        config.checkout.clone(),
        WebhookSignatureVerifier::new(config.gateway.webhook_secret().clone()),
        processor,
        !config.is_production(),
    );

    let health = HealthState {
        environment: config.server.environment,
        gateway_environment: config.gateway.environment,
    };

    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id,
            )
        });

    let app = app_router(
        payments,
        Arc::new(JwtSessionValidator::new(&config.auth)),
        RateLimiterState::new(limiter, config.rate_limit.trust_forwarded_headers),
        health,
    )
    .layer(TimeoutLayer::new(Duration::from_secs(
        config.server.request_timeout_secs,
    )))
    .layer(cors_layer(&config.server))
    .layer(PropagateRequestIdLayer::x_request_id())
    .layer(trace_layer)
    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over `server.log_level`.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    match server.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn connect_redis(config: &RedisConfig) -> Result<MultiplexedConnection, BoxError> {
    let client = redis::Client::open(config.url.as_str())?;
    let conn = tokio::time::timeout(
        config.timeout(),
        client.get_multiplexed_tokio_connection(),
    )
    .await
    .map_err(|_| "timed out connecting to redis")??;

    tracing::info!("Connected to redis");
    Ok(conn)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

fn spawn_window_sweeper(limiter: Arc<InMemoryRateLimiter>) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(60));
        loop {
            tick.tick().await;
            limiter.purge_expired().await;
        }
    });
}

fn spawn_dedup_sweeper(store: Arc<InMemoryWebhookEventRepository>) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(300));
        loop {
            tick.tick().await;
            store.purge_expired().await;
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
