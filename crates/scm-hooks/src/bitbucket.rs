//! Bitbucket Server webhook parsing.
//!
//! Bitbucket Server declares the event in `X-Event-Key` (e.g.
//! `repo:refs_changed`, `pr:opened`) and signs deliveries with the same
//! `X-Hub-Signature` convention as GitHub.

use crate::error::ParseError;
use crate::hook::{HookRepository, PingHook, Provider, PullRequestHook, PushHook, Webhook};
use crate::parser::{self, HookRequest, WebhookParser};
use serde::Deserialize;

/// Header declaring the Bitbucket event key.
pub const EVENT_HEADER: &str = "X-Event-Key";

/// Header carrying the `sha1=<hex>` HMAC of the body.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

const REFS_CHANGED: &str = "repo:refs_changed";
const PING: &str = "diagnostics:ping";
const PULL_REQUEST_PREFIX: &str = "pr:";

/// Parser for Bitbucket Server deliveries.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitbucketParser;

impl BitbucketParser {
    pub fn new() -> Self {
        Self
    }
}

impl WebhookParser for BitbucketParser {
    fn provider(&self) -> Provider {
        Provider::Bitbucket
    }

    fn event_header(&self) -> &'static str {
        EVENT_HEADER
    }

    fn parse(&self, request: &HookRequest<'_>) -> Result<Webhook, ParseError> {
        let event = parser::require_event(self, request)?;
        let body = request.body();

        if event == REFS_CHANGED {
            let payload: RefsChangedPayload = parser::decode(Provider::Bitbucket, event, body)?;
            let change = payload.changes.into_iter().next().unwrap_or_default();
            let ref_name = if change.reference.id.is_empty() {
                change.ref_id
            } else {
                change.reference.id
            };
            return Ok(Webhook::Push(PushHook {
                provider: Provider::Bitbucket,
                ref_name,
                before: change.from_hash,
                after: change.to_hash,
                repository: payload.repository.into(),
                sender: payload.actor.name,
            }));
        }

        if event == PING {
            parser::decode::<serde::de::IgnoredAny>(Provider::Bitbucket, event, body)?;
            return Ok(Webhook::Ping(PingHook {
                provider: Provider::Bitbucket,
                repository: None,
            }));
        }

        if let Some(action) = event.strip_prefix(PULL_REQUEST_PREFIX) {
            let payload: PullRequestPayload = parser::decode(Provider::Bitbucket, event, body)?;
            let pr = payload.pull_request;
            return Ok(Webhook::PullRequest(PullRequestHook {
                provider: Provider::Bitbucket,
                action: action.to_string(),
                number: pr.id,
                title: pr.title,
                source_branch: pr.from_ref.id,
                target_branch: pr.to_ref.id,
                head_sha: pr.from_ref.latest_commit,
                repository: pr.to_ref.repository.into(),
                sender: payload.actor.name,
            }));
        }

        parser::other(Provider::Bitbucket, event, body)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct User {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Project {
    key: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Link {
    href: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Links {
    #[serde(rename = "clone")]
    clone_links: Vec<Link>,
    #[serde(rename = "self")]
    web: Vec<Link>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Repository {
    id: Option<u64>,
    slug: String,
    project: Project,
    links: Links,
}

impl From<Repository> for HookRepository {
    fn from(repo: Repository) -> Self {
        let clone_url = repo
            .links
            .clone_links
            .iter()
            .find(|link| link.name == "http")
            .map(|link| link.href.clone())
            .unwrap_or_default();
        let link = repo
            .links
            .web
            .first()
            .map(|link| link.href.clone())
            .unwrap_or_default();
        let full_name = if repo.project.key.is_empty() {
            repo.slug.clone()
        } else {
            format!("{}/{}", repo.project.key, repo.slug)
        };

        Self {
            id: repo.id.map(|id| id.to_string()).unwrap_or_default(),
            namespace: repo.project.key,
            name: repo.slug,
            full_name,
            clone_url,
            link,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChangedRef {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Change {
    #[serde(rename = "ref")]
    reference: ChangedRef,
    ref_id: String,
    from_hash: String,
    to_hash: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RefsChangedPayload {
    actor: User,
    repository: Repository,
    changes: Vec<Change>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PullRequestRef {
    id: String,
    latest_commit: String,
    repository: Repository,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PullRequest {
    id: u64,
    title: String,
    from_ref: PullRequestRef,
    to_ref: PullRequestRef,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PullRequestPayload {
    actor: User,
    pull_request: PullRequest,
}

#[cfg(test)]
#[path = "bitbucket_tests.rs"]
mod tests;
