//! Error types for webhook parsing.

use crate::hook::Provider;

/// Boxed error returned by caller-supplied callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while turning a webhook delivery into a [`crate::Webhook`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The provider's event-type header was absent or not valid UTF-8.
    #[error("{provider} webhook is missing the {header} header")]
    MissingEventType {
        provider: Provider,
        header: &'static str,
    },

    /// The body could not be decoded for the declared event type.
    #[error("invalid {provider} '{event}' payload: {source}")]
    InvalidPayload {
        provider: Provider,
        event: String,
        #[source]
        source: serde_json::Error,
    },

    /// The shared token presented by the sender did not match the expected secret.
    #[error("{provider} webhook token does not match the configured secret")]
    TokenMismatch { provider: Provider },

    /// The secret callback failed to produce the expected secret.
    #[error("failed to look up the {provider} webhook secret: {source}")]
    SecretLookup {
        provider: Provider,
        #[source]
        source: BoxError,
    },
}

impl ParseError {
    /// Returns the provider whose payload failed to parse.
    pub fn provider(&self) -> Provider {
        match self {
            Self::MissingEventType { provider, .. }
            | Self::InvalidPayload { provider, .. }
            | Self::TokenMismatch { provider }
            | Self::SecretLookup { provider, .. } => *provider,
        }
    }
}
