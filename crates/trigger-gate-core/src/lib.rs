//! # Trigger-Gate Core
//!
//! Validation layer that sits between source-control webhooks and CI/CD
//! trigger processing.
//!
//! An [`Interceptor`] takes a buffered [`InterceptRequest`] and either rejects
//! it with an [`InterceptorError`] or returns an [`InterceptResponse`] carrying
//! the payload for downstream processing. Provider interceptors run these
//! phases in order, stopping at the first failure:
//!
//! 1. Signature check against a secret resolved through [`SecretResolver`]
//!    (skipped when no [`SecretRef`] is configured)
//! 2. Payload parsing into a provider-neutral [`Webhook`]
//! 3. Event-type allow-list check
//! 4. Attaching the parsed hook to the response extensions (see [`context`])
//!
//! ## Architecture
//!
//! - Secret storage sits behind the [`SecretStore`] trait; adapters live in [`adapters`]
//! - Payload decoding is delegated to the `scm-hooks` crate
//! - Nothing here writes HTTP responses; callers map [`InterceptorError`] to statuses
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use trigger_gate_core::{
//!     adapters::InMemorySecretStore, build_interceptor, InterceptRequest, InterceptorKind,
//!     ProviderInterceptorConfig, SecretResolver,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = SecretResolver::new(Arc::new(InMemorySecretStore::new()));
//! let interceptor = build_interceptor(
//!     &InterceptorKind::Github(ProviderInterceptorConfig::default()),
//!     resolver,
//! );
//!
//! let mut headers = http::HeaderMap::new();
//! headers.insert("x-github-event", "push".parse()?);
//! let response = interceptor
//!     .intercept(InterceptRequest::new(headers, r#"{"ref":"refs/heads/main"}"#))
//!     .await?;
//!
//! assert_eq!(response.hook().and_then(|h| h.ref_name()), Some("refs/heads/main"));
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod context;
pub mod error;
pub mod event_filter;
pub mod interceptors;
pub mod request;
pub mod secrets;
pub mod signature;

pub use config::{FormDecodeConfig, InterceptorConfigError, InterceptorKind, ProviderInterceptorConfig};
pub use context::{intercepted_hook, with_hook};
pub use error::{InterceptorError, Phase};
pub use event_filter::EventFilter;
pub use interceptors::{
    build_interceptor, BitbucketInterceptor, FormDecodeInterceptor, FormParseError,
    GitHubInterceptor, GitLabInterceptor, Interceptor,
};
pub use request::{InterceptRequest, InterceptResponse};
pub use secrets::{
    SecretData, SecretError, SecretRef, SecretResolver, SecretStore, SecretValue,
    DEFAULT_NAMESPACE,
};
pub use signature::{compute_sha1_signature, verify_hmac_sha1, SignatureError, Verification};

pub use scm_hooks::{HookKind, HookRepository, ParseError, Provider, Webhook};
