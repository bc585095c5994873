//! GitHub webhook parsing.
//!
//! GitHub declares the event type in `X-GitHub-Event` and signs deliveries
//! with `X-Hub-Signature` (HMAC-SHA1). Signature checks are the caller's job;
//! this parser only decodes payloads.

use crate::error::ParseError;
use crate::hook::{HookRepository, PingHook, Provider, PullRequestHook, PushHook, Webhook};
use crate::parser::{self, HookRequest, WebhookParser};
use serde::Deserialize;

/// Header declaring the GitHub event type.
pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// Header carrying the `sha1=<hex>` HMAC of the body.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// Parser for GitHub deliveries.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHubParser;

impl GitHubParser {
    pub fn new() -> Self {
        Self
    }
}

impl WebhookParser for GitHubParser {
    fn provider(&self) -> Provider {
        Provider::GitHub
    }

    fn event_header(&self) -> &'static str {
        EVENT_HEADER
    }

    fn parse(&self, request: &HookRequest<'_>) -> Result<Webhook, ParseError> {
        let event = parser::require_event(self, request)?;
        let body = request.body();

        match event {
            "push" => {
                let payload: PushPayload = parser::decode(Provider::GitHub, event, body)?;
                Ok(Webhook::Push(PushHook {
                    provider: Provider::GitHub,
                    ref_name: payload.ref_name,
                    before: payload.before,
                    after: payload.after,
                    repository: payload.repository.into(),
                    sender: payload.sender.login,
                }))
            }
            "pull_request" => {
                let payload: PullRequestPayload = parser::decode(Provider::GitHub, event, body)?;
                Ok(Webhook::PullRequest(PullRequestHook {
                    provider: Provider::GitHub,
                    action: payload.action,
                    number: payload.number,
                    title: payload.pull_request.title,
                    source_branch: payload.pull_request.head.ref_name,
                    target_branch: payload.pull_request.base.ref_name,
                    head_sha: payload.pull_request.head.sha,
                    repository: payload.repository.into(),
                    sender: payload.sender.login,
                }))
            }
            "ping" => {
                let payload: PingPayload = parser::decode(Provider::GitHub, event, body)?;
                Ok(Webhook::Ping(PingHook {
                    provider: Provider::GitHub,
                    repository: payload.repository.map(Into::into),
                }))
            }
            other => parser::other(Provider::GitHub, other, body),
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct User {
    login: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Repository {
    id: Option<u64>,
    name: String,
    full_name: String,
    owner: User,
    clone_url: String,
    html_url: String,
}

impl From<Repository> for HookRepository {
    fn from(repo: Repository) -> Self {
        Self {
            id: repo.id.map(|id| id.to_string()).unwrap_or_default(),
            namespace: repo.owner.login,
            name: repo.name,
            full_name: repo.full_name,
            clone_url: repo.clone_url,
            link: repo.html_url,
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
    repository: Repository,
    sender: User,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Branch {
    #[serde(rename = "ref")]
    ref_name: String,
    sha: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PullRequest {
    title: String,
    head: Branch,
    base: Branch,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PullRequestPayload {
    action: String,
    number: u64,
    pull_request: PullRequest,
    repository: Repository,
    sender: User,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PingPayload {
    repository: Option<Repository>,
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
