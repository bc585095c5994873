use super::*;
use trigger_gate_api::{ConfigError, NamedInterceptorConfig};
use trigger_gate_core::{FormDecodeConfig, InterceptorKind};

fn form_decode(name: &str) -> NamedInterceptorConfig {
    NamedInterceptorConfig::new(
        name,
        InterceptorKind::FormDecode(FormDecodeConfig::new("payload")),
    )
}

#[test]
fn test_build_interceptors_registers_configured_names() {
    let config = ServiceConfig {
        interceptors: vec![form_decode("slack"), form_decode("teams")],
        ..Default::default()
    };

    let registry = build_interceptors(&config).unwrap();

    assert_eq!(registry.names(), vec!["slack", "teams"]);
}

#[test]
fn test_registry_failure_is_a_configuration_error() {
    let config = ServiceConfig {
        interceptors: vec![form_decode("slack"), form_decode("slack")],
        ..Default::default()
    };

    let err = build_interceptors(&config).unwrap_err();

    assert!(matches!(
        &err,
        ServiceError::Configuration(ConfigError::DuplicateInterceptor { name }) if name == "slack"
    ));
    assert_eq!(exit_code(&err), 3);
}

#[test]
fn test_exit_codes() {
    let bind = ServiceError::BindFailed {
        address: "0.0.0.0:8080".to_string(),
        message: "address in use".to_string(),
    };
    let server = ServiceError::ServerFailed {
        message: "accept failed".to_string(),
    };

    assert_eq!(exit_code(&bind), 1);
    assert_eq!(exit_code(&server), 2);
}
