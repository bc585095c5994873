//! # SCM Hooks
//!
//! Parsing of source-control webhook deliveries into a provider-neutral
//! [`Webhook`] value.
//!
//! This crate provides:
//! - Typed, provider-neutral hook values (push, pull request, ping)
//! - Parsers for GitHub, GitLab and Bitbucket Server wire payloads
//! - The GitLab shared-token check, which runs inside the parse call through a
//!   [`SecretCallback`] supplied by the caller
//!
//! Parsers never perform HMAC signature checks. Callers that need them verify
//! the raw body before handing it to a parser.
//!
//! # Examples
//!
//! ```rust
//! use http::HeaderMap;
//! use scm_hooks::{GitHubParser, HookRequest, Webhook, WebhookParser};
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("x-github-event", "push".parse().unwrap());
//! let body = br#"{"ref": "refs/heads/main"}"#;
//!
//! let hook = GitHubParser::new()
//!     .parse(&HookRequest::new(&headers, body))
//!     .unwrap();
//! assert_eq!(hook.ref_name(), Some("refs/heads/main"));
//! assert!(matches!(hook, Webhook::Push(_)));
//! ```

pub mod bitbucket;
pub mod error;
pub mod github;
pub mod gitlab;
pub mod hook;
pub mod parser;

pub use bitbucket::BitbucketParser;
pub use error::{BoxError, ParseError};
pub use github::GitHubParser;
pub use gitlab::GitLabParser;
pub use hook::{
    HookKind, HookRepository, OtherHook, PingHook, Provider, PullRequestHook, PushHook, Webhook,
};
pub use parser::{HookRequest, SecretCallback, WebhookParser};
