//! Bitbucket Server interceptor.
//!
//! Bitbucket Server signs deliveries the same way GitHub does and declares
//! the event in `X-Event-Key`, e.g. `repo:refs_changed`.

use super::{Interceptor, SignedHookCheck};
use crate::config::ProviderInterceptorConfig;
use crate::error::InterceptorError;
use crate::event_filter::EventFilter;
use crate::request::{InterceptRequest, InterceptResponse};
use crate::secrets::SecretResolver;
use async_trait::async_trait;
use scm_hooks::bitbucket::SIGNATURE_HEADER;
use scm_hooks::BitbucketParser;
use tracing::instrument;

pub struct BitbucketInterceptor {
    config: ProviderInterceptorConfig,
    resolver: SecretResolver,
    event_filter: EventFilter,
    parser: BitbucketParser,
}

impl BitbucketInterceptor {
    pub const NAME: &'static str = "bitbucket";

    pub fn new(config: ProviderInterceptorConfig, resolver: SecretResolver) -> Self {
        let event_filter = EventFilter::new(config.event_types.clone());
        Self {
            config,
            resolver,
            event_filter,
            parser: BitbucketParser::new(),
        }
    }
}

#[async_trait]
impl Interceptor for BitbucketInterceptor {
    fn kind(&self) -> &'static str {
        Self::NAME
    }

    #[instrument(
        skip(self, request),
        fields(interceptor = "bitbucket", event_type = tracing::field::Empty)
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
#[path = "bitbucket_tests.rs"]
mod tests;
