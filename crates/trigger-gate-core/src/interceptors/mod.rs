//! Webhook interceptors.
//!
//! Each provider has its own [`Interceptor`] implementation; the form-decode
//! transform is one as well. [`build_interceptor`] picks the implementation
//! for a configured [`InterceptorKind`].

use crate::config::InterceptorKind;
use crate::error::InterceptorError;
use crate::event_filter::EventFilter;
use crate::request::{InterceptRequest, InterceptResponse};
use crate::secrets::{SecretRef, SecretResolver};
use crate::signature::{self, SignatureError, Verification};
use async_trait::async_trait;
use scm_hooks::WebhookParser;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod bitbucket;
pub mod form_decode;
pub mod github;
pub mod gitlab;

pub use bitbucket::BitbucketInterceptor;
pub use form_decode::{FormDecodeInterceptor, FormParseError};
pub use github::GitHubInterceptor;
pub use gitlab::GitLabInterceptor;

/// Validates or transforms a buffered webhook request.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Interceptor type, e.g. `"github"`.
    fn kind(&self) -> &'static str;

    /// Run the interceptor.
    ///
    /// # Errors
    ///
    /// Any [`InterceptorError`] rejects the request. On error no hook is
    /// attached.
    async fn intercept(
        &self,
        request: InterceptRequest,
    ) -> Result<InterceptResponse, InterceptorError>;
}

/// Construct the interceptor described by `kind`.
pub fn build_interceptor(kind: &InterceptorKind, resolver: SecretResolver) -> Arc<dyn Interceptor> {
    match kind {
        InterceptorKind::Github(config) => {
            Arc::new(GitHubInterceptor::new(config.clone(), resolver))
        }
        InterceptorKind::Gitlab(config) => {
            Arc::new(GitLabInterceptor::new(config.clone(), resolver))
        }
        InterceptorKind::Bitbucket(config) => {
            Arc::new(BitbucketInterceptor::new(config.clone(), resolver))
        }
        InterceptorKind::FormDecode(config) => Arc::new(FormDecodeInterceptor::new(config.clone())),
    }
}

/// Signature phase of the HMAC-signing providers.
///
/// Without a secret reference the phase passes with
/// [`Verification::NotRequired`]. Otherwise the secret is resolved and the
/// value of `header` must be a valid signature of the body.
pub(crate) async fn verify_hmac_signature(
    interceptor: &'static str,
    resolver: &SecretResolver,
    secret_ref: Option<&SecretRef>,
    request: &InterceptRequest,
    header: &str,
) -> Result<Verification, InterceptorError> {
    let Some(secret_ref) = secret_ref else {
        debug!(interceptor, "No secret configured, skipping signature check");
        return Ok(Verification::NotRequired);
    };

    let secret = resolver
        .resolve(secret_ref)
        .await
        .map_err(|e| InterceptorError::from_secret(interceptor, e))?;

    let verification = Verification::from(signature::verify_hmac_sha1(
        request.body(),
        request.header(header),
        secret.expose_bytes(),
    ));
    debug!(interceptor, outcome = %verification, "Signature checked");

    match verification {
        Verification::Rejected(reason) => Err(signature_rejected(interceptor, reason)),
        outcome => Ok(outcome),
    }
}

/// Phases shared by the interceptors of HMAC-signing providers.
pub(crate) struct SignedHookCheck<'a> {
    pub interceptor: &'static str,
    pub resolver: &'a SecretResolver,
    pub secret_ref: Option<&'a SecretRef>,
    pub event_filter: &'a EventFilter,
    pub parser: &'a dyn WebhookParser,
    pub signature_header: &'static str,
}

impl SignedHookCheck<'_> {
    /// Signature, parse and event phases, in that order. An empty body is not
    /// parsed and yields no hook.
    pub(crate) async fn run(
        &self,
        request: InterceptRequest,
    ) -> Result<InterceptResponse, InterceptorError> {
        let interceptor = self.interceptor;
        let event_type = self
            .parser
            .event_type(&request.as_hook_request())
            .unwrap_or_default()
            .to_string();
        tracing::Span::current().record("event_type", event_type.as_str());

        let result = self.check(&request, &event_type).await;
        match result {
            Ok((verification, hook)) => {
                info!(
                    interceptor,
                    event_type = %event_type,
                    signature = %verification,
                    hook_kind = hook.as_ref().map(|h| h.kind().as_str()),
                    "Webhook accepted"
                );
                Ok(InterceptResponse::forward(request, hook))
            }
            Err(e) => {
                warn!(
                    interceptor,
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

    async fn check(
        &self,
        request: &InterceptRequest,
        event_type: &str,
    ) -> Result<(Verification, Option<scm_hooks::Webhook>), InterceptorError> {
        let verification = verify_hmac_signature(
            self.interceptor,
            self.resolver,
            self.secret_ref,
            request,
            self.signature_header,
        )
        .await?;

        let hook = if request.body().is_empty() {
            debug!(interceptor = self.interceptor, "Empty body, skipping payload parsing");
            None
        } else {
            let hook = self
                .parser
                .parse(&request.as_hook_request())
                .map_err(|source| InterceptorError::PayloadParse {
                    interceptor: self.interceptor,
                    source,
                })?;
            Some(hook)
        };

        self.event_filter.check(self.interceptor, event_type)?;
        Ok((verification, hook))
    }
}

fn signature_rejected(interceptor: &'static str, reason: SignatureError) -> InterceptorError {
    if reason.is_malformed() {
        InterceptorError::MalformedSignatureHeader {
            interceptor,
            reason: reason.to_string(),
        }
    } else {
        InterceptorError::SignatureMismatch { interceptor }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
