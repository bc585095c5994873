//! GitHub interceptor.

use super::{Interceptor, SignedHookCheck};
use crate::config::ProviderInterceptorConfig;
use crate::error::InterceptorError;
use crate::event_filter::EventFilter;
use crate::request::{InterceptRequest, InterceptResponse};
use crate::secrets::SecretResolver;
use async_trait::async_trait;
use scm_hooks::github::SIGNATURE_HEADER;
use scm_hooks::GitHubParser;
use tracing::instrument;

/// Validates GitHub deliveries.
///
/// Checks `X-Hub-Signature` when a secret is configured, parses the payload
/// and applies the `X-GitHub-Event` allow-list.
pub struct GitHubInterceptor {
    config: ProviderInterceptorConfig,
    resolver: SecretResolver,
    event_filter: EventFilter,
    parser: GitHubParser,
}

impl GitHubInterceptor {
    pub const NAME: &'static str = "github";

    pub fn new(config: ProviderInterceptorConfig, resolver: SecretResolver) -> Self {
        let event_filter = EventFilter::new(config.event_types.clone());
        Self {
            config,
            resolver,
            event_filter,
            parser: GitHubParser::new(),
        }
    }
}

#[async_trait]
impl Interceptor for GitHubInterceptor {
    fn kind(&self) -> &'static str {
        Self::NAME
    }

    #[instrument(
        skip(self, request),
        fields(interceptor = "github", event_type = tracing::field::Empty)
    )]
    async fn intercept(
        &self,
        request: InterceptRequest,
    ) -> Result<InterceptResponse, InterceptorError> {
        SignedHookCheck {
            interceptor: Self::NAME,
            resolver: &self.resolver,
            secret_ref: self.config.secret_ref.as_ref(),
            event_filter: &self.event_filter,
            parser: &self.parser,
            signature_header: SIGNATURE_HEADER,
        }
        .run(request)
        .await
    }
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
