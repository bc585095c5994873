//! GitLab interceptor.
//!
//! GitLab sends the shared secret itself in `X-Gitlab-Token`. The comparison
//! runs inside [`GitLabParser::parse_and_verify`], which asks
//! the configured secret for the expected token after decoding the payload.

use super::Interceptor;
use crate::config::ProviderInterceptorConfig;
use crate::error::InterceptorError;
use crate::event_filter::EventFilter;
use crate::request::{InterceptRequest, InterceptResponse};
use crate::secrets::{SecretError, SecretRef, SecretResolver};
use async_trait::async_trait;
use scm_hooks::gitlab::EVENT_HEADER;
use scm_hooks::{BoxError, GitLabParser, ParseError, SecretCallback, Webhook};
use tracing::{info, instrument, warn};
use zeroize::Zeroizing;

pub struct GitLabInterceptor {
    config: ProviderInterceptorConfig,
    resolver: SecretResolver,
    event_filter: EventFilter,
    parser: GitLabParser,
}

impl GitLabInterceptor {
    pub const NAME: &'static str = "gitlab";

    pub fn new(config: ProviderInterceptorConfig, resolver: SecretResolver) -> Self {
        let event_filter = EventFilter::new(config.event_types.clone());
        Self {
            config,
            resolver,
            event_filter,
            parser: GitLabParser::new(),
        }
    }

    async fn check(
        &self,
        request: &InterceptRequest,
        event_type: &str,
    ) -> Result<Webhook, InterceptorError> {
        let secrets = ConfiguredSecret {
            resolver: &self.resolver,
            secret_ref: self.config.secret_ref.as_ref(),
        };

        let hook = self
            .parser
            .parse_and_verify(&request.as_hook_request(), &secrets)
            .await
            .map_err(|e| self.classify(e))?;

        self.event_filter.check(Self::NAME, event_type)?;
        Ok(hook)
    }

    fn classify(&self, error: ParseError) -> InterceptorError {
        match error {
            ParseError::TokenMismatch { .. } => InterceptorError::SignatureMismatch {
                interceptor: Self::NAME,
            },
            ParseError::SecretLookup { source, .. } => match source.downcast::<SecretError>() {
                Ok(secret_error) => InterceptorError::from_secret(Self::NAME, *secret_error),
                Err(other) => {
                    let (namespace, name) = self
                        .config
                        .secret_ref
                        .as_ref()
                        .map(|r| (r.namespace().to_string(), r.secret_name.clone()))
                        .unwrap_or_default();
                    InterceptorError::SecretAccess {
                        interceptor: Self::NAME,
                        source: SecretError::Access {
                            namespace,
                            name,
                            message: other.to_string(),
                        },
                    }
                }
            },
            source => InterceptorError::PayloadParse {
                interceptor: Self::NAME,
                source,
            },
        }
    }
}

#[async_trait]
impl Interceptor for GitLabInterceptor {
    fn kind(&self) -> &'static str {
        Self::NAME
    }

    #[instrument(
        skip(self, request),
        fields(interceptor = "gitlab", event_type = tracing::field::Empty)
    )]
    async fn intercept(
        &self,
        request: InterceptRequest,
    ) -> Result<InterceptResponse, InterceptorError> {
        let event_type = request.header(EVENT_HEADER).unwrap_or_default().to_string();
        tracing::Span::current().record("event_type", event_type.as_str());

        match self.check(&request, &event_type).await {
            Ok(hook) => {
                info!(
                    interceptor = Self::NAME,
                    event_type = %event_type,
                    token_checked = self.config.secret_ref.is_some(),
                    hook_kind = hook.kind().as_str(),
                    "Webhook accepted"
                );
                Ok(InterceptResponse::forward(request, Some(hook)))
            }
            Err(e) => {
                warn!(
                    interceptor = Self::NAME,
                    event_type = %event_type,
                    phase = %e.phase(),
                    error_category = e.error_category(),
                    error = %e,
                    "Webhook rejected"
                );
                Err(e)
            }
        }
    }
}

/// Supplies the configured token to the GitLab parser.
///
/// Without a secret reference no token is expected. Lookup failures are
/// returned to the parser, so the request is rejected rather than waved
/// through with an empty token.
struct ConfiguredSecret<'a> {
    resolver: &'a SecretResolver,
    secret_ref: Option<&'a SecretRef>,
}

#[async_trait]
impl<'a> SecretCallback for ConfiguredSecret<'a> {
    async fn expected_secret(
        &self,
        _hook: &Webhook,
    ) -> Result<Option<Zeroizing<Vec<u8>>>, BoxError> {
        let Some(secret_ref) = self.secret_ref else {
            return Ok(None);
        };

        let value = self.resolver.resolve(secret_ref).await?;
        Ok(Some(Zeroizing::new(value.expose_bytes().to_vec())))
    }
}

#[cfg(test)]
#[path = "gitlab_tests.rs"]
mod tests;
