//! Configuration types for the HTTP service

use crate::errors::ConfigError;
use crate::registry::InterceptorName;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, path::PathBuf, sync::Arc};
use trigger_gate_core::{
    adapters::{FileSystemSecretStore, InMemorySecretStore},
    InterceptorKind, SecretStore, SecretValue, DEFAULT_NAMESPACE,
};

/// Service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Where interceptor secrets are read from
    pub secrets: SecretsConfig,

    /// Interceptors exposed at `POST /interceptors/{name}`
    pub interceptors: Vec<NamedInterceptorConfig>,
}

impl ServiceConfig {
    /// Check the configuration for problems deserialization cannot catch.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: a zero port, an invalid or duplicate
    /// interceptor name, invalid interceptor settings or an invalid inline
    /// secret.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                message: "server.port must not be 0".to_string(),
            });
        }

        self.secrets.validate()?;

        let mut seen = HashSet::new();
        for interceptor in &self.interceptors {
            interceptor.validate()?;
            if !seen.insert(interceptor.name.as_str()) {
                return Err(ConfigError::DuplicateInterceptor {
                    name: interceptor.name.clone(),
                });
            }
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            timeout_seconds: 30,
            shutdown_timeout_seconds: 30,
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level, used when `RUST_LOG` is not set
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

// ============================================================================
// Secrets
// ============================================================================

/// Secret store selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecretsConfig {
    /// Secrets listed inline. Intended for development and tests.
    Memory {
        #[serde(default)]
        secrets: Vec<InlineSecret>,
    },

    /// Mounted secret volume laid out as `<root>/<namespace>/<name>/<key>`
    Filesystem { root: PathBuf },
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self::Memory {
            secrets: Vec::new(),
        }
    }
}

impl SecretsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Memory { secrets } => secrets.iter().try_for_each(InlineSecret::validate),
            Self::Filesystem { root } if root.as_os_str().is_empty() => {
                Err(ConfigError::Invalid {
                    message: "secrets.root must not be empty".to_string(),
                })
            }
            Self::Filesystem { .. } => Ok(()),
        }
    }

    /// Build the configured secret store.
    pub fn build_store(&self) -> Arc<dyn SecretStore> {
        match self {
            Self::Memory { secrets } => {
                let store = InMemorySecretStore::new();
                for secret in secrets {
                    store.add_secret(
                        secret.namespace(),
                        secret.name.clone(),
                        secret.key.clone(),
                        SecretValue::from_string(secret.value.clone()),
                    );
                }
                Arc::new(store)
            }
            Self::Filesystem { root } => Arc::new(FileSystemSecretStore::new(root.clone())),
        }
    }
}

/// One key of an inline secret
#[derive(Clone, Serialize, Deserialize)]
pub struct InlineSecret {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
    pub key: String,
    #[serde(skip_serializing)]
    pub value: String,
}

impl InlineSecret {
    fn namespace(&self) -> String {
        match self.namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => namespace.to_string(),
            _ => DEFAULT_NAMESPACE.to_string(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() || self.key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "inline secrets need a non-empty name and key".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for InlineSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineSecret")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("key", &self.key)
            .field("value", &"<REDACTED>")
            .finish()
    }
}

// ============================================================================
// Interceptors
// ============================================================================

/// An interceptor and the name it is routed under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedInterceptorConfig {
    pub name: String,
    pub kind: InterceptorKind,
}

impl NamedInterceptorConfig {
    pub fn new(name: impl Into<String>, kind: InterceptorKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        InterceptorName::new(self.name.as_str()).map_err(|e| {
            ConfigError::InterceptorValidation {
                name: self.name.clone(),
                message: e.to_string(),
            }
        })?;
        self.kind
            .validate()
            .map_err(|e| ConfigError::InterceptorValidation {
                name: self.name.clone(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
