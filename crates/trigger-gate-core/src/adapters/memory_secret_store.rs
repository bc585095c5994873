//! # In-Memory Secret Store
//!
//! Thread-safe in-memory implementation for testing and development.

use crate::secrets::{SecretData, SecretError, SecretStore, SecretValue};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

type SecretKey = (String, String);

/// In-memory secret store
///
/// Secrets are keyed by `(namespace, name)`. Clones share the same contents.
/// Writes are single map operations; a poisoned lock is recovered on reads
/// and writes alike.
#[derive(Clone, Default)]
pub struct InMemorySecretStore {
    secrets: Arc<RwLock<HashMap<SecretKey, SecretData>>>,
}

impl InMemorySecretStore {
    /// Create new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store pre-populated with secrets keyed by `(namespace, name)`
    pub fn with_secrets(secrets: HashMap<(String, String), SecretData>) -> Self {
        Self {
            secrets: Arc::new(RwLock::new(secrets)),
        }
    }

    /// Add or replace one key of a secret
    pub fn add_secret(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
        value: SecretValue,
    ) {
        let mut secrets = self
            .secrets
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        secrets
            .entry((namespace.into(), name.into()))
            .or_default()
            .insert(key.into(), value);
    }

    /// Remove a whole secret
    pub fn remove_secret(&self, namespace: &str, name: &str) {
        let mut secrets = self
            .secrets
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        secrets.remove(&(namespace.to_string(), name.to_string()));
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData, SecretError> {
        let secrets = self
            .secrets
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| SecretError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "memory_secret_store_tests.rs"]
mod tests;
