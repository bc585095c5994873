//! Event-type allow-lists.

use crate::error::InterceptorError;

/// Exact-match, case-sensitive allow-list of event types.
///
/// An empty list allows every event.
///
/// # Examples
///
/// ```rust
/// use trigger_gate_core::EventFilter;
///
/// let filter = EventFilter::new(Some(vec!["push".to_string(), "pull_request".to_string()]));
/// assert!(filter.is_allowed("push"));
/// assert!(!filter.is_allowed("Push"));
///
/// assert!(EventFilter::allow_all().is_allowed("anything"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    allowed: Vec<String>,
}

impl EventFilter {
    pub fn new(event_types: Option<Vec<String>>) -> Self {
        Self {
            allowed: event_types.unwrap_or_default(),
        }
    }

    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn is_restricted(&self) -> bool {
        !self.allowed.is_empty()
    }

    pub fn is_allowed(&self, event_type: &str) -> bool {
        self.allowed.is_empty() || self.allowed.iter().any(|allowed| allowed == event_type)
    }

    /// Reject `event_type` unless it is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`InterceptorError::EventNotAllowed`] naming the event type.
    pub fn check(&self, interceptor: &'static str, event_type: &str) -> Result<(), InterceptorError> {
        if self.is_allowed(event_type) {
            Ok(())
        } else {
            Err(InterceptorError::EventNotAllowed {
                interceptor,
                event_type: event_type.to_string(),
            })
        }
    }
}

#[cfg(test)]
#[path = "event_filter_tests.rs"]
mod tests;
