//! # Secret Resolution
//!
//! Interceptors authenticate senders with shared secrets held in a key-value
//! secret store. A [`SecretRef`] names a single value: a key within a named
//! secret within a namespace. [`SecretResolver`] fetches it through a
//! [`SecretStore`] implementation.
//!
//! Every resolution is a fresh store lookup. Nothing is cached, so rotated
//! secrets take effect on the next request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, sync::Arc};
use tracing::{debug, instrument, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Namespace used when a [`SecretRef`] does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

// ============================================================================
// SecretRef
// ============================================================================

/// Reference to one value inside a namespaced secret.
///
/// # Examples
///
/// ```rust
/// use trigger_gate_core::SecretRef;
///
/// let reference = SecretRef::new("github-webhook", "token");
/// assert_eq!(reference.namespace(), "default");
///
/// let reference = reference.in_namespace("ci");
/// assert_eq!(reference.to_string(), "ci/github-webhook[token]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    /// Store namespace; unset or empty means [`DEFAULT_NAMESPACE`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Name of the secret object
    pub secret_name: String,

    /// Key within the secret object
    pub secret_key: String,
}

impl SecretRef {
    pub fn new(secret_name: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            namespace: None,
            secret_name: secret_name.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Namespace to look the secret up in, with the default applied.
    pub fn namespace(&self) -> &str {
        match self.namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => namespace,
            _ => DEFAULT_NAMESPACE,
        }
    }
}

impl fmt::Display for SecretRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}[{}]",
            self.namespace(),
            self.secret_name,
            self.secret_key
        )
    }
}

// ============================================================================
// SecretValue
// ============================================================================

/// Secret bytes, wiped from memory on drop.
///
/// `Debug` never prints the value.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretValue {
    bytes: Vec<u8>,
}

impl SecretValue {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn from_string(value: String) -> Self {
        Self {
            bytes: value.into_bytes(),
        }
    }

    /// Secret bytes. Use immediately; do not store copies.
    pub fn expose_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretValue")
            .field("length", &self.len())
            .field("value", &"<REDACTED>")
            .finish()
    }
}

impl From<&str> for SecretValue {
    fn from(value: &str) -> Self {
        Self::from_bytes(value.as_bytes().to_vec())
    }
}

/// Contents of a secret object, keyed by entry name.
pub type SecretData = HashMap<String, SecretValue>;

// ============================================================================
// Errors
// ============================================================================

/// Secret lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecretError {
    #[error("secret '{namespace}/{name}' not found")]
    NotFound { namespace: String, name: String },

    #[error("key '{key}' not found in secret '{namespace}/{name}'")]
    KeyNotFound {
        namespace: String,
        name: String,
        key: String,
    },

    #[error("failed to access secret '{namespace}/{name}': {message}")]
    Access {
        namespace: String,
        name: String,
        message: String,
    },
}

impl SecretError {
    /// True when the secret or the key is absent, as opposed to the store
    /// being unreachable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::KeyNotFound { .. })
    }
}

// ============================================================================
// SecretStore
// ============================================================================

/// Key-value secret store.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch every entry of the secret `name` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::NotFound`] if the secret does not exist and
    /// [`SecretError::Access`] if the store cannot be read.
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData, SecretError>;
}

// ============================================================================
// SecretResolver
// ============================================================================

/// Resolves [`SecretRef`]s against a [`SecretStore`].
#[derive(Clone)]
pub struct SecretResolver {
    store: Arc<dyn SecretStore>,
}

impl SecretResolver {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Fetch the value `reference` points at.
    ///
    /// # Errors
    ///
    /// - [`SecretError::NotFound`] if the secret does not exist
    /// - [`SecretError::KeyNotFound`] if the secret has no such key
    /// - [`SecretError::Access`] if the store cannot be read
    #[instrument(
        skip(self, reference),
        fields(
            namespace = %reference.namespace(),
            secret_name = %reference.secret_name,
            secret_key = %reference.secret_key,
        )
    )]
    pub async fn resolve(&self, reference: &SecretRef) -> Result<SecretValue, SecretError> {
        let namespace = reference.namespace();

        let mut data = self
            .store
            .get_secret(namespace, &reference.secret_name)
            .await
            .inspect_err(|e| warn!(error = %e, "Secret lookup failed"))?;

        let value = data
            .remove(&reference.secret_key)
            .ok_or_else(|| SecretError::KeyNotFound {
                namespace: namespace.to_string(),
                name: reference.secret_name.clone(),
                key: reference.secret_key.clone(),
            })?;

        debug!(length = value.len(), "Secret resolved");
        Ok(value)
    }
}

impl fmt::Debug for SecretResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "secrets_tests.rs"]
mod tests;
