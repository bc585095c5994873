//! Interceptor error taxonomy.
//!
//! Every failure an interceptor can produce is one [`InterceptorError`]
//! variant. All of them are terminal for the request. Each carries the
//! interceptor kind that produced it and reports the [`Phase`] it failed in,
//! so callers can log the failure and choose an HTTP status.

use crate::interceptors::FormParseError;
use crate::secrets::SecretError;
use scm_hooks::ParseError;
use std::fmt;

/// Processing phase that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Body,
    Signature,
    Parse,
    Event,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Signature => "signature",
            Self::Parse => "parse",
            Self::Event => "event",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interceptor failures.
#[derive(Debug, thiserror::Error)]
pub enum InterceptorError {
    /// The configured secret, or the key within it, does not exist
    #[error("{interceptor} interceptor: {source}")]
    SecretNotFound {
        interceptor: &'static str,
        #[source]
        source: SecretError,
    },

    /// The secret store could not be read
    #[error("{interceptor} interceptor: {source}")]
    SecretAccess {
        interceptor: &'static str,
        #[source]
        source: SecretError,
    },

    /// The signature header is absent or cannot be parsed
    #[error("{interceptor} interceptor: malformed signature header: {reason}")]
    MalformedSignatureHeader {
        interceptor: &'static str,
        reason: String,
    },

    /// The signature or token does not match the configured secret
    #[error("{interceptor} interceptor: signature does not match")]
    SignatureMismatch { interceptor: &'static str },

    /// The declared event type is not in the allow-list
    #[error("{interceptor} interceptor: event type {event_type} is not allowed")]
    EventNotAllowed {
        interceptor: &'static str,
        event_type: String,
    },

    /// The provider payload could not be parsed
    #[error("{interceptor} interceptor: failed to parse payload: {source}")]
    PayloadParse {
        interceptor: &'static str,
        #[source]
        source: ParseError,
    },

    /// The body is not valid form-encoded data
    #[error("failed to parse form data: {source}")]
    FormParse {
        #[source]
        source: FormParseError,
    },

    /// The request body could not be read
    #[error("failed to read request body: {message}")]
    BodyRead { message: String },
}

impl InterceptorError {
    /// Classify a secret lookup failure.
    pub fn from_secret(interceptor: &'static str, source: SecretError) -> Self {
        if source.is_not_found() {
            Self::SecretNotFound {
                interceptor,
                source,
            }
        } else {
            Self::SecretAccess {
                interceptor,
                source,
            }
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Self::SecretNotFound { .. }
            | Self::SecretAccess { .. }
            | Self::MalformedSignatureHeader { .. }
            | Self::SignatureMismatch { .. } => Phase::Signature,
            Self::EventNotAllowed { .. } => Phase::Event,
            Self::PayloadParse { .. } | Self::FormParse { .. } => Phase::Parse,
            Self::BodyRead { .. } => Phase::Body,
        }
    }

    /// Interceptor kind that produced the error, if it came from one.
    pub fn interceptor(&self) -> Option<&'static str> {
        match self {
            Self::SecretNotFound { interceptor, .. }
            | Self::SecretAccess { interceptor, .. }
            | Self::MalformedSignatureHeader { interceptor, .. }
            | Self::SignatureMismatch { interceptor }
            | Self::EventNotAllowed { interceptor, .. }
            | Self::PayloadParse { interceptor, .. } => Some(*interceptor),
            Self::FormParse { .. } => Some("form_decode"),
            Self::BodyRead { .. } => None,
        }
    }

    /// True when the sender failed to prove it holds the shared secret.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::MalformedSignatureHeader { .. } | Self::SignatureMismatch { .. }
        )
    }

    /// True when the failure lies with the service rather than the request.
    pub fn is_server_fault(&self) -> bool {
        matches!(self, Self::SecretNotFound { .. } | Self::SecretAccess { .. })
    }

    /// Stable label for logs.
    pub fn error_category(&self) -> &'static str {
        match self {
            Self::SecretNotFound { .. } => "secret_not_found",
            Self::SecretAccess { .. } => "secret_access",
            Self::MalformedSignatureHeader { .. } => "malformed_signature_header",
            Self::SignatureMismatch { .. } => "signature_mismatch",
            Self::EventNotAllowed { .. } => "event_not_allowed",
            Self::PayloadParse { .. } => "payload_parse",
            Self::FormParse { .. } => "form_parse",
            Self::BodyRead { .. } => "body_read",
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
