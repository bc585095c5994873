//! Common test utilities for trigger-gate-api integration tests
//!
//! This module provides:
//! - A service configuration covering every interceptor type
//! - A router built from that configuration the way the service binary does
//! - Request builders for signed provider deliveries

#![allow(dead_code)]

use axum::{body::Body, http::Request, response::Response, Router};
use trigger_gate_api::{build_registry, create_router, AppState, ServiceConfig};
use trigger_gate_core::{compute_sha1_signature, SecretResolver};

/// HMAC secret shared by the GitHub and Bitbucket interceptors.
pub const SIGNING_SECRET: &str = "integration-secret";

/// GitLab token.
pub const GITLAB_TOKEN: &str = "gitlab-token";

/// Configuration with one interceptor of each type.
pub const SERVICE_CONFIG: &str = r#"
secrets:
  type: memory
  secrets:
    - name: github-secret
      key: token
      value: integration-secret
    - namespace: ci
      name: bitbucket-secret
      key: token
      value: integration-secret
    - name: gitlab-secret
      key: token
      value: gitlab-token
interceptors:
  - name: github
    kind:
      type: github
      secret_ref:
        secret_name: github-secret
        secret_key: token
      event_types: [push, pull_request]
  - name: github-open
    kind:
      type: github
  - name: gitlab
    kind:
      type: gitlab
      secret_ref:
        secret_name: gitlab-secret
        secret_key: token
  - name: bitbucket
    kind:
      type: bitbucket
      secret_ref:
        namespace: ci
        secret_name: bitbucket-secret
        secret_key: token
      event_types: ["repo:refs_changed"]
  - name: slack
    kind:
      type: form_decode
      prefix: payload
      flatten: true
"#;

/// Parse and validate [`SERVICE_CONFIG`].
pub fn test_config() -> ServiceConfig {
    let config: ServiceConfig = serde_yaml::from_str(SERVICE_CONFIG).unwrap();
    config.validate().unwrap();
    config
}

/// Build the router the way the service binary wires it.
pub fn test_router() -> Router {
    let config = test_config();
    let resolver = SecretResolver::new(config.secrets.build_store());
    let registry = build_registry(&config.interceptors, resolver).unwrap();
    create_router(AppState::new(config, registry))
}

/// A POST to `/interceptors/{name}` with the given headers and body.
pub fn post(name: &str, headers: &[(&str, &str)], body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/interceptors/{name}"));
    for (header, value) in headers {
        builder = builder.header(*header, *value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// `X-Hub-Signature` value for `body` signed with [`SIGNING_SECRET`].
pub fn sign(body: &str) -> String {
    compute_sha1_signature(SIGNING_SECRET.as_bytes(), body.as_bytes()).unwrap()
}

pub async fn body_bytes(response: Response) -> bytes::Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
