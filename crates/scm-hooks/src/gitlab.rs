//! GitLab webhook parsing.
//!
//! GitLab does not sign deliveries. It echoes a shared token in
//! `X-Gitlab-Token`, and the check against the configured secret happens as
//! part of [`GitLabParser::parse_and_verify`].

use crate::error::ParseError;
use crate::hook::{HookRepository, Provider, PullRequestHook, PushHook, Webhook};
use crate::parser::{self, HookRequest, SecretCallback, WebhookParser};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::debug;

/// Header declaring the GitLab event type.
pub const EVENT_HEADER: &str = "X-Gitlab-Event";

/// Header carrying the shared secret token.
pub const TOKEN_HEADER: &str = "X-Gitlab-Token";

/// Parser for GitLab deliveries.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitLabParser;

impl GitLabParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse the request and check its shared token.
    ///
    /// The payload is decoded first; `secrets` is then asked for the expected
    /// token. When it yields `None` the token is not checked. Otherwise
    /// `X-Gitlab-Token` must be present, non-empty and equal to it, compared
    /// in constant time. An empty expected token therefore matches nothing.
    ///
    /// # Errors
    ///
    /// - [`ParseError::InvalidPayload`] / [`ParseError::MissingEventType`] if decoding fails
    /// - [`ParseError::SecretLookup`] if the callback fails
    /// - [`ParseError::TokenMismatch`] if the token does not match
    pub async fn parse_and_verify(
        &self,
        request: &HookRequest<'_>,
        secrets: &dyn SecretCallback,
    ) -> Result<Webhook, ParseError> {
        let hook = self.parse(request)?;

        let expected = secrets
            .expected_secret(&hook)
            .await
            .map_err(|source| ParseError::SecretLookup {
                provider: Provider::GitLab,
                source,
            })?;

        let Some(expected) = expected else {
            debug!("No GitLab token configured, skipping token check");
            return Ok(hook);
        };

        let provided = request
            .header(TOKEN_HEADER)
            .filter(|token| !token.is_empty());
        let matches = match provided {
            Some(token) => {
                !expected.is_empty() && bool::from(token.as_bytes().ct_eq(expected.as_slice()))
            }
            None => false,
        };
        if matches {
            Ok(hook)
        } else {
            Err(ParseError::TokenMismatch {
                provider: Provider::GitLab,
            })
        }
    }
}

impl WebhookParser for GitLabParser {
    fn provider(&self) -> Provider {
        Provider::GitLab
    }

    fn event_header(&self) -> &'static str {
        EVENT_HEADER
    }

    fn parse(&self, request: &HookRequest<'_>) -> Result<Webhook, ParseError> {
        let event = parser::require_event(self, request)?;
        let body = request.body();

        match event {
            "Push Hook" | "Tag Push Hook" => {
                let payload: PushPayload = parser::decode(Provider::GitLab, event, body)?;
                Ok(Webhook::Push(PushHook {
                    provider: Provider::GitLab,
                    ref_name: payload.ref_name,
                    before: payload.before,
                    after: payload.after,
                    repository: payload.project.into(),
                    sender: payload.user_username,
                }))
            }
            "Merge Request Hook" => {
                let payload: MergeRequestPayload = parser::decode(Provider::GitLab, event, body)?;
                let attrs = payload.object_attributes;
                Ok(Webhook::PullRequest(PullRequestHook {
                    provider: Provider::GitLab,
                    action: attrs.action,
                    number: attrs.iid,
                    title: attrs.title,
                    source_branch: attrs.source_branch,
                    target_branch: attrs.target_branch,
                    head_sha: attrs.last_commit.id,
                    repository: payload.project.into(),
                    sender: payload.user.username,
                }))
            }
            other => parser::other(Provider::GitLab, other, body),
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Project {
    id: Option<u64>,
    name: String,
    namespace: String,
    path_with_namespace: String,
    git_http_url: String,
    web_url: String,
}

impl From<Project> for HookRepository {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.map(|id| id.to_string()).unwrap_or_default(),
            namespace: project.namespace,
            name: project.name,
            full_name: project.path_with_namespace,
            clone_url: project.git_http_url,
            link: project.web_url,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PushPayload {
    #[serde(rename = "ref")]
    ref_name: String,
    before: String,
    after: String,
    user_username: String,
    project: Project,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct User {
    username: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Commit {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MergeRequestAttributes {
    iid: u64,
    action: String,
    title: String,
    source_branch: String,
    target_branch: String,
    last_commit: Commit,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MergeRequestPayload {
    user: User,
    project: Project,
    object_attributes: MergeRequestAttributes,
}

#[cfg(test)]
#[path = "gitlab_tests.rs"]
mod tests;
