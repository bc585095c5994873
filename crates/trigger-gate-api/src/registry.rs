//! Interceptor registry for name-based routing.
//!
//! [`InterceptorRegistry`] associates configured interceptor names with their
//! [`Interceptor`] implementations. It is built once at startup and read-only
//! during request handling.
//!
//! # URL Structure
//!
//! Each registered interceptor is reachable at:
//! ```text
//! POST /interceptors/{name}
//! ```

use std::{collections::HashMap, fmt, sync::Arc};
use trigger_gate_core::Interceptor;

/// Longest accepted interceptor name.
pub const MAX_NAME_LENGTH: usize = 64;

// ============================================================================
// InterceptorName
// ============================================================================

/// URL-safe name of a configured interceptor.
///
/// Names consist of lowercase ASCII letters, digits, hyphens and underscores
/// and are 1 to 64 characters long.
///
/// # Examples
///
/// ```rust
/// use trigger_gate_api::registry::InterceptorName;
///
/// let name = InterceptorName::new("github-push").unwrap();
/// assert_eq!(name.as_str(), "github-push");
///
/// assert!(InterceptorName::new("GitHub").is_err());
/// assert!(InterceptorName::new("").is_err());
/// assert!(InterceptorName::new("../escape").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterceptorName(String);

impl InterceptorName {
    /// # Errors
    ///
    /// Returns [`InvalidInterceptorNameError`] if the value is empty, too long
    /// or contains characters outside `[a-z0-9_-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidInterceptorNameError> {
        let s = value.into();
        if s.is_empty() {
            return Err(InvalidInterceptorNameError::Empty);
        }
        if s.len() > MAX_NAME_LENGTH {
            return Err(InvalidInterceptorNameError::TooLong { length: s.len() });
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(InvalidInterceptorNameError::InvalidChars { value: s });
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterceptorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when an [`InterceptorName`] cannot be created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInterceptorNameError {
    #[error("Interceptor name must not be empty")]
    Empty,

    #[error("Interceptor name is {length} characters long; the limit is 64")]
    TooLong { length: usize },

    #[error(
        "Interceptor name '{value}' contains invalid characters; \
         use lowercase alphanumeric, hyphens, or underscores"
    )]
    InvalidChars { value: String },
}

// ============================================================================
// InterceptorRegistry
// ============================================================================

/// Registry mapping interceptor names to their implementations.
#[derive(Clone, Default)]
pub struct InterceptorRegistry {
    interceptors: HashMap<String, Arc<dyn Interceptor>>,
}

impl InterceptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interceptor, replacing any previous one with the same name.
    pub fn register(
        &mut self,
        name: InterceptorName,
        interceptor: Arc<dyn Interceptor>,
    ) -> &mut Self {
        self.interceptors.insert(name.0, interceptor);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Interceptor>> {
        self.interceptors.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.interceptors.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.interceptors.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

impl fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
