//! # Trigger-Gate HTTP Service
//!
//! HTTP server exposing configured webhook interceptors.
//!
//! This service provides:
//! - `POST /interceptors/{name}`: run the named interceptor on the request
//! - `GET /health`: service status and the registered interceptor names
//!
//! A successful interception answers `200 OK` with the intercepted body and
//! the request headers. When the interceptor parsed a hook, `X-Hook-Kind` and
//! `X-Hook-Ref` describe it. Rejections are mapped to status codes by
//! [`InterceptHandlerError`].

pub mod config;
pub mod errors;
pub mod registry;

pub use config::{
    InlineSecret, LoggingConfig, NamedInterceptorConfig, SecretsConfig, ServerConfig,
    ServiceConfig,
};
pub use errors::{ConfigError, InterceptHandlerError, ServiceError};
pub use registry::{InterceptorName, InterceptorRegistry, InvalidInterceptorNameError};

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::{future::IntoFuture, sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, instrument, warn};
use trigger_gate_core::{build_interceptor, InterceptRequest, InterceptResponse, SecretResolver};

/// Response header naming the kind of the intercepted hook.
pub const HOOK_KIND_HEADER: &str = "x-hook-kind";

/// Response header carrying the ref of the intercepted hook.
pub const HOOK_REF_HEADER: &str = "x-hook-ref";

/// Header carrying the request correlation id.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: Arc<ServiceConfig>,

    /// Interceptors by name
    pub registry: Arc<InterceptorRegistry>,
}

impl AppState {
    pub fn new(config: ServiceConfig, registry: InterceptorRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }
}

/// Correlation id of the current request, stored in the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

/// Build the interceptor registry from configuration.
///
/// # Errors
///
/// Returns [`ConfigError`] for invalid or duplicate interceptor names.
pub fn build_registry(
    interceptors: &[NamedInterceptorConfig],
    resolver: SecretResolver,
) -> Result<InterceptorRegistry, ConfigError> {
    let mut registry = InterceptorRegistry::new();

    for config in interceptors {
        let name = InterceptorName::new(config.name.as_str()).map_err(|e| {
            ConfigError::InterceptorValidation {
                name: config.name.clone(),
                message: e.to_string(),
            }
        })?;
        if registry.contains(name.as_str()) {
            return Err(ConfigError::DuplicateInterceptor {
                name: config.name.clone(),
            });
        }

        registry.register(name, build_interceptor(&config.kind, resolver.clone()));
        info!(
            interceptor = %config.name,
            kind = config.kind.kind_name(),
            "Registered interceptor"
        );
    }

    Ok(registry)
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.timeout_seconds);

    Router::new()
        .route("/interceptors/{name}", post(handle_intercept))
        .route("/health", get(handle_health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(TimeoutLayer::new(timeout))
                .into_inner(),
        )
        .with_state(state)
}

/// Start HTTP server
///
/// Runs until Ctrl+C or SIGTERM. In-flight requests get
/// `server.shutdown_timeout_seconds` to complete after the signal.
pub async fn start_server(
    config: ServiceConfig,
    registry: InterceptorRegistry,
) -> Result<(), ServiceError> {
    let address = format!("{}:{}", config.server.host, config.server.port);
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);

    let app = create_router(AppState::new(config, registry));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| ServiceError::BindFailed {
            address: address.clone(),
            message: e.to_string(),
        })?;

    info!(address = %address, "Starting HTTP server");

    let shutdown_started = Arc::new(tokio::sync::Notify::new());
    let notify = shutdown_started.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!(
                timeout_seconds = shutdown_timeout.as_secs(),
                "Initiating graceful shutdown"
            );
            notify.notify_one();
        })
        .into_future();

    let deadline = async {
        shutdown_started.notified().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| ServiceError::ServerFailed {
                message: e.to_string(),
            })?;
        }
        _ = deadline => {
            warn!(
                timeout_seconds = shutdown_timeout.as_secs(),
                "Graceful shutdown timed out; dropping in-flight requests"
            );
        }
    }

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// A signal handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C)"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Run the named interceptor on the request.
#[instrument(skip(state, request), fields(interceptor = %name))]
pub async fn handle_intercept(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request,
) -> Result<Response, InterceptHandlerError> {
    let interceptor = state
        .registry
        .get(&name)
        .ok_or_else(|| InterceptHandlerError::InterceptorNotFound { name: name.clone() })?;

    let (parts, body) = request.into_parts();
    let intercept_request = InterceptRequest::buffer(
        parts.headers,
        axum::body::to_bytes(body, state.config.server.max_body_size),
    )
    .await?
    .with_extensions(parts.extensions);

    let response = interceptor.intercept(intercept_request).await?;

    info!(
        kind = interceptor.kind(),
        body_size = response.body().len(),
        hook_attached = response.hook().is_some(),
        "Interceptor accepted request"
    );
    Ok(into_http_response(response))
}

/// False for headers that are not copied to the response: hop-by-hop and
/// body framing headers, and headers carrying webhook credentials.
fn is_forwarded(name: &HeaderName) -> bool {
    !matches!(
        name.as_str(),
        "authorization"
            | "x-gitlab-token"
            | "x-hub-signature"
            | "x-hub-signature-256"
            | "connection"
            | "content-length"
            | "host"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Turn an interceptor response into the HTTP reply.
fn into_http_response(response: InterceptResponse) -> Response {
    let mut headers = HeaderMap::new();
    for (name, value) in response.headers() {
        if is_forwarded(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    if let Some(hook) = response.hook() {
        headers.insert(
            HeaderName::from_static(HOOK_KIND_HEADER),
            HeaderValue::from_static(hook.kind().as_str()),
        );
        let ref_value = hook
            .ref_name()
            .filter(|r| !r.is_empty())
            .and_then(|r| HeaderValue::from_str(r).ok());
        if let Some(value) = ref_value {
            headers.insert(HeaderName::from_static(HOOK_REF_HEADER), value);
        }
    }

    let (_, body, _) = response.into_parts();
    (StatusCode::OK, headers, Body::from(body)).into_response()
}

/// Basic health check endpoint
#[instrument(skip(state))]
async fn handle_health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        interceptors: state.registry.names(),
        timestamp: chrono::Utc::now(),
    })
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware
///
/// Reuses the caller's `X-Correlation-Id` or generates one, stores it in the
/// request extensions as [`CorrelationId`] and echoes it in the response.
#[instrument(skip(request, next), fields(
    method = %request.method(),
    uri = %request.uri(),
    correlation_id
))]
async fn request_logging_middleware(
    mut request: Request,
    next: middleware::Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let correlation_id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::Span::current().record("correlation_id", correlation_id.as_str());
    request
        .extensions_mut()
        .insert(CorrelationId(correlation_id.clone()));

    info!(method = %method, uri = %uri, "Request started");

    let mut response = next.run(request).await;
    let duration = start.elapsed();

    if let Ok(header_value) = HeaderValue::from_str(&correlation_id) {
        response
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, header_value);
    }

    let status = response.status();
    if status.is_server_error() {
        error!(
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        warn!(
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        info!(
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed successfully"
        );
    }

    response
}

// ============================================================================
// Response Types
// ============================================================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub interceptors: Vec<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
