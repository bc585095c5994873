//! Parser contracts shared by all providers.

use crate::error::{BoxError, ParseError};
use crate::hook::{OtherHook, Provider, Webhook};
use async_trait::async_trait;
use http::HeaderMap;
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;

/// Borrowed view of a buffered webhook delivery.
#[derive(Debug, Clone, Copy)]
pub struct HookRequest<'a> {
    headers: &'a HeaderMap,
    body: &'a [u8],
}

impl<'a> HookRequest<'a> {
    pub fn new(headers: &'a HeaderMap, body: &'a [u8]) -> Self {
        Self { headers, body }
    }

    pub fn headers(&self) -> &'a HeaderMap {
        self.headers
    }

    pub fn body(&self) -> &'a [u8] {
        self.body
    }

    /// Value of a header as text. Lookup is case-insensitive; values that are
    /// not visible ASCII are treated as absent.
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// Converts a provider's wire payload into a [`Webhook`].
pub trait WebhookParser: Send + Sync {
    /// Provider handled by this parser.
    fn provider(&self) -> Provider;

    /// Header carrying the event type, e.g. `X-GitHub-Event`.
    fn event_header(&self) -> &'static str;

    /// Parse the request.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingEventType`] if the event header is absent
    /// and [`ParseError::InvalidPayload`] if the body does not decode for the
    /// declared event.
    fn parse(&self, request: &HookRequest<'_>) -> Result<Webhook, ParseError>;

    /// Event type declared by the request, if any.
    fn event_type<'a>(&self, request: &HookRequest<'a>) -> Option<&'a str> {
        request.header(self.event_header())
    }
}

/// Supplies the expected shared secret for providers whose verification is
/// fused with parsing.
///
/// The parser invokes the callback after decoding the payload. Returning
/// `Ok(None)` skips verification. `Ok(Some(_))` is always enforced, and an
/// empty secret rejects every request.
#[async_trait]
pub trait SecretCallback: Send + Sync {
    async fn expected_secret(&self, hook: &Webhook) -> Result<Option<Zeroizing<Vec<u8>>>, BoxError>;
}

pub(crate) fn decode<T: DeserializeOwned>(
    provider: Provider,
    event: &str,
    body: &[u8],
) -> Result<T, ParseError> {
    serde_json::from_slice(body).map_err(|source| ParseError::InvalidPayload {
        provider,
        event: event.to_string(),
        source,
    })
}

/// Builds an [`OtherHook`] after checking the body is well-formed JSON.
pub(crate) fn other(provider: Provider, event: &str, body: &[u8]) -> Result<Webhook, ParseError> {
    decode::<serde::de::IgnoredAny>(provider, event, body)?;
    Ok(Webhook::Other(OtherHook {
        provider,
        event: event.to_string(),
    }))
}

pub(crate) fn require_event<'a>(
    parser: &dyn WebhookParser,
    request: &HookRequest<'a>,
) -> Result<&'a str, ParseError> {
    parser
        .event_type(request)
        .ok_or(ParseError::MissingEventType {
            provider: parser.provider(),
            header: parser.event_header(),
        })
}
