//! Form-decode transform.
//!
//! Turns an `application/x-www-form-urlencoded` body into JSON wrapped under
//! a configured prefix:
//!
//! ```text
//! field1=value1&field2=value2  =>  {"foo":{"field1":["value1"],"field2":["value2"]}}
//! ```
//!
//! With `flatten` set each field keeps only its first value. Keys are
//! emitted in sorted order.

use super::Interceptor;
use crate::config::FormDecodeConfig;
use crate::error::InterceptorError;
use crate::request::{InterceptRequest, InterceptResponse};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::HeaderValue;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Decoded form fields, each with every value in submission order.
pub type FormData = BTreeMap<String, Vec<String>>;

/// Malformed form bodies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormParseError {
    #[error("empty field at position {position}")]
    EmptyField { position: usize },

    #[error("field at position {position} has no name")]
    MissingName { position: usize },

    #[error("invalid percent-encoding in '{segment}'")]
    InvalidEscape { segment: String },

    #[error("form data is not valid UTF-8")]
    InvalidUtf8,

    #[error("failed to encode form as JSON: {message}")]
    Encode { message: String },
}

/// Parse a form-urlencoded body.
///
/// An empty body is an empty form. `+` decodes to a space.
///
/// # Errors
///
/// Rejects empty fields (`a&&b`, leading or trailing `&`), fields without a
/// name (`=value`), malformed `%XX` escapes and bytes that are not UTF-8.
pub fn parse_form(body: &[u8]) -> Result<FormData, FormParseError> {
    let text = std::str::from_utf8(body).map_err(|_| FormParseError::InvalidUtf8)?;
    let mut form = FormData::new();
    if text.is_empty() {
        return Ok(form);
    }

    for (position, pair) in text.split('&').enumerate() {
        if pair.is_empty() {
            return Err(FormParseError::EmptyField { position });
        }
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        if name.is_empty() {
            return Err(FormParseError::MissingName { position });
        }
        form.entry(decode_component(name)?)
            .or_default()
            .push(decode_component(value)?);
    }

    Ok(form)
}

fn decode_component(segment: &str) -> Result<String, FormParseError> {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(FormParseError::InvalidEscape {
                    segment: segment.to_string(),
                });
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(&segment.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|_| FormParseError::InvalidUtf8)
}

/// True for form-urlencoded media types, ignoring parameters and case.
fn is_form(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}

/// Rewrites form-urlencoded bodies as JSON.
///
/// Requests declaring another content type are not parsed and produce an
/// empty form; requests without a content type are parsed.
pub struct FormDecodeInterceptor {
    config: FormDecodeConfig,
}

impl FormDecodeInterceptor {
    pub const NAME: &'static str = "form_decode";

    pub fn new(config: FormDecodeConfig) -> Self {
        Self { config }
    }

    fn encode(&self, form: FormData) -> Result<Vec<u8>, FormParseError> {
        let fields = if self.config.flatten {
            let flat: BTreeMap<String, String> = form
                .into_iter()
                .filter_map(|(name, values)| values.into_iter().next().map(|v| (name, v)))
                .collect();
            serde_json::to_value(flat)
        } else {
            serde_json::to_value(form)
        }
        .map_err(|e| FormParseError::Encode {
            message: e.to_string(),
        })?;

        let wrapped: BTreeMap<&str, Value> =
            BTreeMap::from([(self.config.prefix.as_str(), fields)]);
        serde_json::to_vec(&wrapped).map_err(|e| FormParseError::Encode {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl Interceptor for FormDecodeInterceptor {
    fn kind(&self) -> &'static str {
        Self::NAME
    }

    #[instrument(skip(self, request), fields(interceptor = "form_decode"))]
    async fn intercept(
        &self,
        request: InterceptRequest,
    ) -> Result<InterceptResponse, InterceptorError> {
        let (mut headers, body, extensions) = request.into_parts();

        let form = match headers.get(CONTENT_TYPE).map(|v| v.to_str()) {
            Some(Ok(content_type)) if !is_form(content_type) => {
                debug!(content_type, "Not a form body, emitting empty form");
                FormData::new()
            }
            Some(Err(_)) => {
                debug!("Unreadable content type, emitting empty form");
                FormData::new()
            }
            _ => parse_form(&body)
                .inspect_err(|e| warn!(error = %e, "Rejected form body"))
                .map_err(|source| InterceptorError::FormParse { source })?,
        };

        let field_count = form.len();
        let json = self
            .encode(form)
            .map_err(|source| InterceptorError::FormParse { source })?;

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.remove(CONTENT_LENGTH);

        info!(field_count, prefix = %self.config.prefix, "Form decoded");
        Ok(InterceptResponse::new(headers, Bytes::from(json), extensions))
    }
}

#[cfg(test)]
#[path = "form_decode_tests.rs"]
mod tests;
