//! Error types for the HTTP service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use trigger_gate_core::InterceptorError;
use tracing::{error, warn};

/// Intercept handler errors with HTTP status code mapping
///
/// - `401 Unauthorized`: the sender could not prove it holds the shared secret
///   (missing or malformed signature header, signature or token mismatch)
/// - `403 Forbidden`: the event type is not in the interceptor's allow-list
/// - `400 Bad Request`: the body could not be read or parsed
/// - `404 Not Found`: no interceptor is registered under the requested name
/// - `500 Internal Server Error`: the configured secret is missing or the
///   secret store cannot be read
///
/// # Security Considerations
///
/// Secret store failures are logged server-side and reported to the client
/// with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum InterceptHandlerError {
    /// The interceptor rejected the request
    #[error(transparent)]
    Intercept(#[from] InterceptorError),

    /// No interceptor is registered under the `{name}` URL segment
    #[error("Interceptor not found: {name}")]
    InterceptorNotFound { name: String },
}

impl InterceptHandlerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InterceptorNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Intercept(e) => match e {
                InterceptorError::MalformedSignatureHeader { .. }
                | InterceptorError::SignatureMismatch { .. } => StatusCode::UNAUTHORIZED,
                InterceptorError::EventNotAllowed { .. } => StatusCode::FORBIDDEN,
                InterceptorError::PayloadParse { .. }
                | InterceptorError::FormParse { .. }
                | InterceptorError::BodyRead { .. } => StatusCode::BAD_REQUEST,
                InterceptorError::SecretNotFound { .. } | InterceptorError::SecretAccess { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for InterceptHandlerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            Self::Intercept(e) if e.is_server_fault() => {
                error!(
                    error = %e,
                    error_category = e.error_category(),
                    interceptor = e.interceptor(),
                    "Interceptor secret could not be resolved"
                );
                "Internal server error occurred. Please try again later.".to_string()
            }
            Self::Intercept(e) => {
                warn!(
                    error = %e,
                    error_category = e.error_category(),
                    phase = %e.phase(),
                    interceptor = e.interceptor(),
                    "Request rejected by interceptor"
                );
                self.to_string()
            }
            Self::InterceptorNotFound { name } => {
                warn!(interceptor = %name, "Interceptor not found");
                self.to_string()
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (status, Json(body)).into_response()
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Invalid interceptor '{name}': {message}")]
    InterceptorValidation { name: String, message: String },

    #[error("Duplicate interceptor name: {name}")]
    DuplicateInterceptor { name: String },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
