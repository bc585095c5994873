use super::*;

#[test]
fn test_github_config_from_yaml() {
    let yaml = r#"
type: github
secret_ref:
  namespace: ci
  secret_name: github-secret
  secret_key: token
event_types: [push, pull_request]
"#;

    let kind: InterceptorKind = serde_yaml::from_str(yaml).unwrap();

    let InterceptorKind::Github(config) = &kind else {
        panic!("expected a github interceptor");
    };
    let secret_ref = config.secret_ref.as_ref().unwrap();
    assert_eq!(secret_ref.namespace(), "ci");
    assert_eq!(secret_ref.secret_name, "github-secret");
    assert_eq!(secret_ref.secret_key, "token");
    assert_eq!(
        config.event_types.as_deref(),
        Some(&["push".to_string(), "pull_request".to_string()][..])
    );
    assert_eq!(kind.kind_name(), "github");
    assert!(kind.validate().is_ok());
}

#[test]
fn test_provider_config_fields_are_optional() {
    let kind: InterceptorKind = serde_yaml::from_str("type: bitbucket").unwrap();

    assert_eq!(
        kind,
        InterceptorKind::Bitbucket(ProviderInterceptorConfig::default())
    );
}

#[test]
fn test_secret_ref_namespace_defaults() {
    let yaml = r#"
type: gitlab
secret_ref:
  secret_name: gitlab-secret
  secret_key: token
"#;

    let kind: InterceptorKind = serde_yaml::from_str(yaml).unwrap();

    let InterceptorKind::Gitlab(config) = kind else {
        panic!("expected a gitlab interceptor");
    };
    assert_eq!(config.secret_ref.unwrap().namespace(), "default");
}

#[test]
fn test_form_decode_config_from_yaml() {
    let kind: InterceptorKind =
        serde_yaml::from_str("type: form_decode\nprefix: payload\nflatten: true").unwrap();

    assert_eq!(
        kind,
        InterceptorKind::FormDecode(FormDecodeConfig::new("payload").flattened())
    );
    assert_eq!(kind.kind_name(), "form_decode");
}

#[test]
fn test_form_decode_flatten_defaults_to_false() {
    let kind: InterceptorKind = serde_yaml::from_str("type: form_decode\nprefix: foo").unwrap();

    assert_eq!(kind, InterceptorKind::FormDecode(FormDecodeConfig::new("foo")));
}

#[test]
fn test_unknown_type_is_rejected() {
    assert!(serde_yaml::from_str::<InterceptorKind>("type: cel").is_err());
}

#[test]
fn test_validate_rejects_empty_prefix() {
    let kind = InterceptorKind::FormDecode(FormDecodeConfig::new(""));

    assert_eq!(kind.validate(), Err(InterceptorConfigError::EmptyPrefix));
}

#[test]
fn test_validate_rejects_empty_secret_fields() {
    let kind = InterceptorKind::Github(
        ProviderInterceptorConfig::default().with_secret(SecretRef::new("", "token")),
    );
    assert_eq!(
        kind.validate(),
        Err(InterceptorConfigError::EmptySecretField {
            field: "secret_name"
        })
    );

    let kind = InterceptorKind::Gitlab(
        ProviderInterceptorConfig::default().with_secret(SecretRef::new("name", " ")),
    );
    assert_eq!(
        kind.validate(),
        Err(InterceptorConfigError::EmptySecretField {
            field: "secret_key"
        })
    );
}

#[test]
fn test_validate_rejects_blank_event_type() {
    let kind = InterceptorKind::Bitbucket(
        ProviderInterceptorConfig::default().with_event_types(["repo:refs_changed", ""]),
    );

    assert_eq!(
        kind.validate(),
        Err(InterceptorConfigError::EmptyEventType { position: 1 })
    );
}

#[test]
fn test_empty_event_list_is_valid() {
    let kind = InterceptorKind::Github(
        ProviderInterceptorConfig::default().with_event_types(Vec::<String>::new()),
    );

    assert!(kind.validate().is_ok());
}
