//! # Filesystem Secret Store Adapter
//!
//! Reads secrets from a mounted secret volume laid out as
//! `<root>/<namespace>/<name>/<key>`, one file per key. File contents are
//! used byte for byte.

use crate::secrets::{SecretData, SecretError, SecretStore, SecretValue};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Filesystem-based secret store
///
/// Entries whose names start with `.` are ignored; volume mounts use them for
/// bookkeeping symlinks.
///
/// # Examples
///
/// ```no_run
/// use trigger_gate_core::adapters::FileSystemSecretStore;
/// use trigger_gate_core::SecretStore;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = FileSystemSecretStore::new("/var/run/secrets/trigger-gate");
/// let data = store.get_secret("default", "github-webhook").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemSecretStore {
    root: PathBuf,
}

impl FileSystemSecretStore {
    /// Create a store rooted at `root`. The directory is not checked until the
    /// first lookup.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn secret_dir(&self, namespace: &str, name: &str) -> Result<PathBuf, SecretError> {
        for component in [namespace, name] {
            if !is_plain_component(component) {
                return Err(SecretError::Access {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    message: format!("invalid path component '{}'", component),
                });
            }
        }
        Ok(self.root.join(namespace).join(name))
    }
}

fn is_plain_component(component: &str) -> bool {
    !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains(&['/', '\\', '\0'][..])
}

#[async_trait]
impl SecretStore for FileSystemSecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData, SecretError> {
        let dir = self.secret_dir(namespace, name)?;
        let access_error = |message: String| SecretError::Access {
            namespace: namespace.to_string(),
            name: name.to_string(),
            message,
        };

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SecretError::NotFound {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                });
            }
            Err(e) => {
                return Err(access_error(format!(
                    "failed to read directory {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut data = SecretData::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| access_error(format!("failed to list {}: {}", dir.display(), e)))?
        {
            let Some(key) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if key.starts_with('.') {
                continue;
            }

            // Follows symlinks, which is how mounted volumes expose keys.
            let path = entry.path();
            let metadata = fs::metadata(&path)
                .await
                .map_err(|e| access_error(format!("failed to stat {}: {}", path.display(), e)))?;
            if !metadata.is_file() {
                continue;
            }

            let bytes = fs::read(&path)
                .await
                .map_err(|e| access_error(format!("failed to read {}: {}", path.display(), e)))?;
            data.insert(key, SecretValue::from_bytes(bytes));
        }

        debug!(
            namespace = %namespace,
            secret_name = %name,
            keys = data.len(),
            "Loaded secret from filesystem"
        );
        Ok(data)
    }
}

#[cfg(test)]
#[path = "filesystem_secret_store_tests.rs"]
mod tests;
