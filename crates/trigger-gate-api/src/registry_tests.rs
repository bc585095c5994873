//! Tests for [`InterceptorName`] and [`InterceptorRegistry`].

use super::*;
use trigger_gate_core::{FormDecodeConfig, FormDecodeInterceptor};

fn form_decode() -> Arc<dyn Interceptor> {
    Arc::new(FormDecodeInterceptor::new(FormDecodeConfig::new("payload")))
}

// ============================================================================
// InterceptorName
// ============================================================================

#[test]
fn test_valid_names() {
    for name in ["github", "gitlab-ci", "form_decode", "a", "team1-push"] {
        assert_eq!(InterceptorName::new(name).unwrap().as_str(), name);
    }
}

#[test]
fn test_empty_name_is_rejected() {
    assert_eq!(
        InterceptorName::new(""),
        Err(InvalidInterceptorNameError::Empty)
    );
}

#[test]
fn test_invalid_characters_are_rejected() {
    for name in ["GitHub", "git hub", "../escape", "a/b", "name.with.dots"] {
        assert!(
            matches!(
                InterceptorName::new(name),
                Err(InvalidInterceptorNameError::InvalidChars { .. })
            ),
            "'{name}' should be rejected"
        );
    }
}

#[test]
fn test_length_limit() {
    assert!(InterceptorName::new("a".repeat(MAX_NAME_LENGTH)).is_ok());
    assert_eq!(
        InterceptorName::new("a".repeat(MAX_NAME_LENGTH + 1)),
        Err(InvalidInterceptorNameError::TooLong { length: 65 })
    );
}

// ============================================================================
// InterceptorRegistry
// ============================================================================

#[test]
fn test_empty_registry() {
    let registry = InterceptorRegistry::new();

    assert!(registry.is_empty());
    assert!(registry.get("github").is_none());
    assert!(!registry.contains("github"));
}

#[test]
fn test_register_and_get() {
    let mut registry = InterceptorRegistry::new();
    registry.register(InterceptorName::new("forms").unwrap(), form_decode());

    assert!(registry.contains("forms"));
    assert_eq!(registry.get("forms").unwrap().kind(), "form_decode");
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_names_are_sorted() {
    let mut registry = InterceptorRegistry::new();
    registry
        .register(InterceptorName::new("zeta").unwrap(), form_decode())
        .register(InterceptorName::new("alpha").unwrap(), form_decode())
        .register(InterceptorName::new("mid").unwrap(), form_decode());

    assert_eq!(registry.names(), vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_register_replaces_existing() {
    let mut registry = InterceptorRegistry::new();
    registry.register(InterceptorName::new("forms").unwrap(), form_decode());
    registry.register(InterceptorName::new("forms").unwrap(), form_decode());

    assert_eq!(registry.len(), 1);
}
