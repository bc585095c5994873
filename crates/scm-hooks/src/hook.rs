//! Provider-neutral webhook values.
//!
//! Every parser in this crate produces a [`Webhook`]. Downstream trigger
//! matching only needs the kind of hook plus a handful of fields (ref,
//! repository identity, pull request branches), so the structures here keep
//! exactly that and nothing provider-specific.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Provider
// ============================================================================

/// Source-control provider that sent a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    GitHub,
    GitLab,
    Bitbucket,
}

impl Provider {
    /// Stable lowercase name, suitable for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
            Self::Bitbucket => "bitbucket",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Hook payloads
// ============================================================================

/// Repository the hook refers to.
///
/// `id` is always a string; numeric provider ids are rendered in decimal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookRepository {
    pub id: String,
    pub namespace: String,
    pub name: String,
    pub full_name: String,
    pub clone_url: String,
    pub link: String,
}

/// A push of commits or tags to a ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushHook {
    pub provider: Provider,

    /// Fully qualified ref, e.g. `refs/heads/main`
    #[serde(rename = "ref")]
    pub ref_name: String,

    pub before: String,
    pub after: String,
    pub repository: HookRepository,
    pub sender: String,
}

/// A pull (or merge) request lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestHook {
    pub provider: Provider,

    /// Provider action verbatim, e.g. `opened`, `synchronize`, `merge`
    pub action: String,

    pub number: u64,
    pub title: String,
    pub source_branch: String,
    pub target_branch: String,
    pub head_sha: String,
    pub repository: HookRepository,
    pub sender: String,
}

/// A connectivity check sent when a webhook is created or tested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingHook {
    pub provider: Provider,
    pub repository: Option<HookRepository>,
}

/// Any event without a dedicated representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherHook {
    pub provider: Provider,

    /// Event type exactly as declared by the provider's event header
    pub event: String,
}

// ============================================================================
// Webhook
// ============================================================================

/// Kind of a parsed webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Push,
    PullRequest,
    Ping,
    Other,
}

impl HookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::PullRequest => "pull_request",
            Self::Ping => "ping",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-neutral parsed webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Webhook {
    Push(PushHook),
    PullRequest(PullRequestHook),
    Ping(PingHook),
    Other(OtherHook),
}

impl Webhook {
    pub fn kind(&self) -> HookKind {
        match self {
            Self::Push(_) => HookKind::Push,
            Self::PullRequest(_) => HookKind::PullRequest,
            Self::Ping(_) => HookKind::Ping,
            Self::Other(_) => HookKind::Other,
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::Push(hook) => hook.provider,
            Self::PullRequest(hook) => hook.provider,
            Self::Ping(hook) => hook.provider,
            Self::Other(hook) => hook.provider,
        }
    }

    /// Repository the hook refers to, when the payload names one.
    pub fn repository(&self) -> Option<&HookRepository> {
        match self {
            Self::Push(hook) => Some(&hook.repository),
            Self::PullRequest(hook) => Some(&hook.repository),
            Self::Ping(hook) => hook.repository.as_ref(),
            Self::Other(_) => None,
        }
    }

    /// Ref the hook is about.
    ///
    /// For pull requests this is the source branch.
    pub fn ref_name(&self) -> Option<&str> {
        match self {
            Self::Push(hook) => Some(&hook.ref_name),
            Self::PullRequest(hook) => Some(&hook.source_branch),
            Self::Ping(_) | Self::Other(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "hook_tests.rs"]
mod tests;
