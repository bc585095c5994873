use super::*;
use crate::adapters::InMemorySecretStore;
use crate::secrets::{SecretData, SecretStore, SecretValue};
use http::HeaderMap;
use std::sync::Arc;

const PUSH_BODY: &str = r#"{"ref":"refs/heads/master","project":{"id":15}}"#;

fn resolver() -> SecretResolver {
    let store = InMemorySecretStore::new();
    store.add_secret("default", "gitlab", "token", SecretValue::from("secret"));
    SecretResolver::new(Arc::new(store))
}

fn secured() -> ProviderInterceptorConfig {
    ProviderInterceptorConfig::default().with_secret(SecretRef::new("gitlab", "token"))
}

fn request(event: &str, token: Option<&str>, body: &'static str) -> InterceptRequest {
    let mut headers = HeaderMap::new();
    headers.insert("x-gitlab-event", event.parse().unwrap());
    if let Some(token) = token {
        headers.insert("x-gitlab-token", token.parse().unwrap());
    }
    InterceptRequest::new(headers, body)
}

struct UnreachableStore;

#[async_trait]
impl SecretStore for UnreachableStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData, SecretError> {
        Err(SecretError::Access {
            namespace: namespace.to_string(),
            name: name.to_string(),
            message: "connection refused".to_string(),
        })
    }
}

#[tokio::test]
async fn test_matching_token_attaches_push_hook() {
    let interceptor = GitLabInterceptor::new(secured(), resolver());

    let response = interceptor
        .intercept(request("Push Hook", Some("secret"), PUSH_BODY))
        .await
        .unwrap();

    assert_eq!(response.body().as_ref(), PUSH_BODY.as_bytes());
    let Some(Webhook::Push(push)) = response.hook() else {
        panic!("expected a push hook");
    };
    assert_eq!(push.ref_name, "refs/heads/master");
    assert_eq!(push.repository.id, "15");
}

#[tokio::test]
async fn test_wrong_token_is_a_mismatch() {
    let interceptor = GitLabInterceptor::new(secured(), resolver());

    let err = interceptor
        .intercept(request("Push Hook", Some("not-the-secret"), PUSH_BODY))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InterceptorError::SignatureMismatch {
            interceptor: "gitlab"
        }
    ));
}

#[tokio::test]
async fn test_missing_token_is_a_mismatch() {
    let interceptor = GitLabInterceptor::new(secured(), resolver());

    let err = interceptor
        .intercept(request("Push Hook", None, PUSH_BODY))
        .await
        .unwrap_err();

    assert!(matches!(err, InterceptorError::SignatureMismatch { .. }));
}

#[tokio::test]
async fn test_empty_configured_secret_rejects_any_token() {
    let store = InMemorySecretStore::new();
    store.add_secret("default", "gitlab", "token", SecretValue::from(""));
    let interceptor = GitLabInterceptor::new(secured(), SecretResolver::new(Arc::new(store)));

    for token in [Some("attacker"), None] {
        let err = interceptor
            .intercept(request("Push Hook", token, PUSH_BODY))
            .await
            .unwrap_err();

        assert!(
            matches!(err, InterceptorError::SignatureMismatch { .. }),
            "token {:?} should be rejected",
            token
        );
    }
}

#[tokio::test]
async fn test_no_secret_skips_token_check() {
    let interceptor = GitLabInterceptor::new(ProviderInterceptorConfig::default(), resolver());

    for token in [Some("foo"), None] {
        let response = interceptor
            .intercept(request("Push Hook", token, PUSH_BODY))
            .await
            .unwrap();
        assert!(response.hook().is_some());
    }
}

#[tokio::test]
async fn test_secret_lookup_failure_fails_closed() {
    let interceptor =
        GitLabInterceptor::new(secured(), SecretResolver::new(Arc::new(UnreachableStore)));

    let err = interceptor
        .intercept(request("Push Hook", Some("secret"), PUSH_BODY))
        .await
        .unwrap_err();

    let InterceptorError::SecretAccess { source, .. } = &err else {
        panic!("expected a secret access error, got {err:?}");
    };
    assert!(matches!(source, SecretError::Access { message, .. } if message == "connection refused"));
    assert!(err.is_server_fault());
}

#[tokio::test]
async fn test_missing_secret_key_is_secret_not_found() {
    let config =
        ProviderInterceptorConfig::default().with_secret(SecretRef::new("gitlab", "other-key"));
    let interceptor = GitLabInterceptor::new(config, resolver());

    let err = interceptor
        .intercept(request("Push Hook", Some("secret"), PUSH_BODY))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InterceptorError::SecretNotFound {
            source: SecretError::KeyNotFound { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_empty_body_is_a_parse_error() {
    let interceptor = GitLabInterceptor::new(ProviderInterceptorConfig::default(), resolver());

    let err = interceptor
        .intercept(request("Push Hook", None, ""))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InterceptorError::PayloadParse {
            interceptor: "gitlab",
            ..
        }
    ));
}

#[tokio::test]
async fn test_event_allow_list() {
    let config = secured().with_event_types(["Merge Request Hook"]);
    let interceptor = GitLabInterceptor::new(config, resolver());

    let err = interceptor
        .intercept(request("Push Hook", Some("secret"), PUSH_BODY))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InterceptorError::EventNotAllowed { ref event_type, .. } if event_type == "Push Hook"
    ));
}

#[tokio::test]
async fn test_token_checked_before_event_filter() {
    let config = secured().with_event_types(["Merge Request Hook"]);
    let interceptor = GitLabInterceptor::new(config, resolver());

    let err = interceptor
        .intercept(request("Push Hook", Some("wrong"), PUSH_BODY))
        .await
        .unwrap_err();

    assert!(matches!(err, InterceptorError::SignatureMismatch { .. }));
}
