//! Interceptor configuration.
//!
//! Configuration is deserialized once at start-up and is immutable afterwards.
//! [`InterceptorKind`] is internally tagged by `type`:
//!
//! ```yaml
//! type: github
//! secret_ref:
//!   secret_name: github-secret
//!   secret_key: token
//! event_types: [push, pull_request]
//! ```

use crate::secrets::SecretRef;
use serde::{Deserialize, Serialize};

/// Settings shared by the GitHub, GitLab and Bitbucket interceptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderInterceptorConfig {
    /// Secret holding the shared webhook secret. `None` disables the
    /// signature check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<SecretRef>,

    /// Allowed event types. Absent or empty allows every event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_types: Option<Vec<String>>,
}

impl ProviderInterceptorConfig {
    pub fn with_secret(mut self, secret_ref: SecretRef) -> Self {
        self.secret_ref = Some(secret_ref);
        self
    }

    pub fn with_event_types<I, S>(mut self, event_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_types = Some(event_types.into_iter().map(Into::into).collect());
        self
    }

    /// # Errors
    ///
    /// Rejects secret references with an empty name or key and blank event
    /// types.
    pub fn validate(&self) -> Result<(), InterceptorConfigError> {
        if let Some(secret_ref) = &self.secret_ref {
            if secret_ref.secret_name.trim().is_empty() {
                return Err(InterceptorConfigError::EmptySecretField {
                    field: "secret_name",
                });
            }
            if secret_ref.secret_key.trim().is_empty() {
                return Err(InterceptorConfigError::EmptySecretField {
                    field: "secret_key",
                });
            }
        }

        if let Some(event_types) = &self.event_types {
            if let Some(position) = event_types.iter().position(|e| e.trim().is_empty()) {
                return Err(InterceptorConfigError::EmptyEventType { position });
            }
        }

        Ok(())
    }
}

/// Settings of the form-decode transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDecodeConfig {
    /// Key the decoded form is wrapped under.
    pub prefix: String,

    /// Keep only the first value of each field.
    #[serde(default)]
    pub flatten: bool,
}

impl FormDecodeConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            flatten: false,
        }
    }

    pub fn flattened(mut self) -> Self {
        self.flatten = true;
        self
    }
}

/// Interceptor type together with its settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InterceptorKind {
    Github(ProviderInterceptorConfig),
    Gitlab(ProviderInterceptorConfig),
    Bitbucket(ProviderInterceptorConfig),
    FormDecode(FormDecodeConfig),
}

impl InterceptorKind {
    /// Name of the interceptor type, as used in configuration.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Github(_) => "github",
            Self::Gitlab(_) => "gitlab",
            Self::Bitbucket(_) => "bitbucket",
            Self::FormDecode(_) => "form_decode",
        }
    }

    /// # Errors
    ///
    /// Returns the first problem found in the settings.
    pub fn validate(&self) -> Result<(), InterceptorConfigError> {
        match self {
            Self::Github(config) | Self::Gitlab(config) | Self::Bitbucket(config) => {
                config.validate()
            }
            Self::FormDecode(config) => {
                if config.prefix.is_empty() {
                    Err(InterceptorConfigError::EmptyPrefix)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Invalid interceptor settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterceptorConfigError {
    #[error("secret_ref.{field} must not be empty")]
    EmptySecretField { field: &'static str },

    #[error("event_types[{position}] must not be empty")]
    EmptyEventType { position: usize },

    #[error("form_decode prefix must not be empty")]
    EmptyPrefix,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
