//! Buffered requests and interceptor responses.

use crate::context;
use crate::error::InterceptorError;
use bytes::Bytes;
use http::{Extensions, HeaderMap};
use scm_hooks::{HookRequest, Webhook};
use std::fmt::Display;
use std::future::Future;
use tracing::warn;

/// A webhook request whose body has been read into memory.
///
/// The body is held as [`Bytes`], so handing copies to downstream consumers
/// does not copy the payload. An absent body is an empty one.
#[derive(Debug, Default)]
pub struct InterceptRequest {
    headers: HeaderMap,
    body: Bytes,
    extensions: Extensions,
}

impl InterceptRequest {
    pub fn new(headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            headers,
            body: body.into(),
            extensions: Extensions::new(),
        }
    }

    /// Request without a body.
    pub fn without_body(headers: HeaderMap) -> Self {
        Self::new(headers, Bytes::new())
    }

    /// Drain a body future exactly once and buffer the result.
    ///
    /// # Errors
    ///
    /// Returns [`InterceptorError::BodyRead`] if the body future fails.
    pub async fn buffer<F, E>(headers: HeaderMap, body: F) -> Result<Self, InterceptorError>
    where
        F: Future<Output = Result<Bytes, E>>,
        E: Display,
    {
        match body.await {
            Ok(bytes) => Ok(Self::new(headers, bytes)),
            Err(e) => {
                warn!(error = %e, "Failed to read request body");
                Err(InterceptorError::BodyRead {
                    message: e.to_string(),
                })
            }
        }
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// The buffered body. Readable any number of times.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    pub fn into_parts(self) -> (HeaderMap, Bytes, Extensions) {
        (self.headers, self.body, self.extensions)
    }

    pub(crate) fn as_hook_request(&self) -> HookRequest<'_> {
        HookRequest::new(&self.headers, &self.body)
    }
}

/// Successful interceptor result.
///
/// Carries the headers and body to forward downstream and the request
/// extensions, including the intercepted hook when one was parsed.
#[derive(Debug, Default)]
pub struct InterceptResponse {
    headers: HeaderMap,
    body: Bytes,
    extensions: Extensions,
}

impl InterceptResponse {
    pub fn new(headers: HeaderMap, body: Bytes, extensions: Extensions) -> Self {
        Self {
            headers,
            body,
            extensions,
        }
    }

    /// Forward `request` unchanged, attaching `hook` if one was parsed.
    pub(crate) fn forward(request: InterceptRequest, hook: Option<Webhook>) -> Self {
        let (headers, body, mut extensions) = request.into_parts();
        if let Some(hook) = hook {
            context::with_hook(&mut extensions, hook);
        }
        Self::new(headers, body, extensions)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// The hook attached by the interceptor, if any.
    pub fn hook(&self) -> Option<&Webhook> {
        context::intercepted_hook(&self.extensions)
    }

    pub fn into_parts(self) -> (HeaderMap, Bytes, Extensions) {
        (self.headers, self.body, self.extensions)
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
