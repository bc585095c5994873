use super::*;
use crate::hook::HookKind;
use http::HeaderMap;

fn headers_for(event: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-github-event", event.parse().unwrap());
    headers
}

#[test]
fn test_parse_push() {
    let headers = headers_for("push");
    let body = br#"{
        "ref": "refs/heads/master",
        "before": "0000000000000000000000000000000000000000",
        "after": "6113728f27ae82c7b1a177c8d03f9e96e0adf246",
        "repository": {
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "owner": {"login": "octocat"},
            "clone_url": "https://github.com/octocat/Hello-World.git",
            "html_url": "https://github.com/octocat/Hello-World"
        },
        "sender": {"login": "octocat"}
    }"#;

    let hook = GitHubParser::new()
        .parse(&HookRequest::new(&headers, body))
        .unwrap();

    let Webhook::Push(push) = hook else {
        panic!("expected push hook");
    };
    assert_eq!(push.ref_name, "refs/heads/master");
    assert_eq!(push.after, "6113728f27ae82c7b1a177c8d03f9e96e0adf246");
    assert_eq!(push.repository.id, "1296269");
    assert_eq!(push.repository.namespace, "octocat");
    assert_eq!(push.repository.full_name, "octocat/Hello-World");
    assert_eq!(push.sender, "octocat");
}

#[test]
fn test_parse_minimal_push() {
    let headers = headers_for("push");
    let body = br#"{"ref": "refs/heads/master"}"#;

    let hook = GitHubParser::new()
        .parse(&HookRequest::new(&headers, body))
        .unwrap();

    assert_eq!(hook.kind(), HookKind::Push);
    assert_eq!(hook.ref_name(), Some("refs/heads/master"));
    assert_eq!(hook.repository().unwrap().id, "");
}

#[test]
fn test_parse_pull_request() {
    let headers = headers_for("pull_request");
    let body = br#"{
        "action": "opened",
        "number": 12,
        "pull_request": {
            "title": "Fix the thing",
            "head": {"ref": "fix-thing", "sha": "abc123"},
            "base": {"ref": "main", "sha": "def456"}
        },
        "repository": {"id": 5, "name": "repo", "full_name": "org/repo", "owner": {"login": "org"}},
        "sender": {"login": "dev"}
    }"#;

    let hook = GitHubParser::new()
        .parse(&HookRequest::new(&headers, body))
        .unwrap();

    let Webhook::PullRequest(pr) = hook else {
        panic!("expected pull request hook");
    };
    assert_eq!(pr.action, "opened");
    assert_eq!(pr.number, 12);
    assert_eq!(pr.source_branch, "fix-thing");
    assert_eq!(pr.target_branch, "main");
    assert_eq!(pr.head_sha, "abc123");
    assert_eq!(pr.repository.full_name, "org/repo");
}

#[test]
fn test_parse_ping_without_repository() {
    let headers = headers_for("ping");
    let body = br#"{"zen": "Keep it logically awesome.", "hook_id": 1}"#;

    let hook = GitHubParser::new()
        .parse(&HookRequest::new(&headers, body))
        .unwrap();

    assert_eq!(hook.kind(), HookKind::Ping);
    assert!(hook.repository().is_none());
}

#[test]
fn test_unknown_event_becomes_other() {
    let headers = headers_for("deployment_status");

    let hook = GitHubParser::new()
        .parse(&HookRequest::new(&headers, b"{}"))
        .unwrap();

    assert_eq!(
        hook,
        Webhook::Other(crate::hook::OtherHook {
            provider: Provider::GitHub,
            event: "deployment_status".to_string(),
        })
    );
}

#[test]
fn test_event_header_is_case_insensitive() {
    let mut headers = HeaderMap::new();
    headers.insert(
        http::HeaderName::from_bytes(b"X-GITHUB-EVENT").unwrap(),
        "push".parse().unwrap(),
    );

    let hook = GitHubParser::new()
        .parse(&HookRequest::new(&headers, b"{}"))
        .unwrap();

    assert_eq!(hook.kind(), HookKind::Push);
}

#[test]
fn test_missing_event_header() {
    let headers = HeaderMap::new();

    let err = GitHubParser::new()
        .parse(&HookRequest::new(&headers, b"{}"))
        .unwrap_err();

    assert!(matches!(
        err,
        ParseError::MissingEventType {
            provider: Provider::GitHub,
            header: EVENT_HEADER
        }
    ));
}

#[test]
fn test_invalid_json_is_rejected_for_known_and_unknown_events() {
    for event in ["push", "OTHER_EVENT"] {
        let headers = headers_for(event);

        let err = GitHubParser::new()
            .parse(&HookRequest::new(&headers, b"somepayload"))
            .unwrap_err();

        assert!(
            matches!(err, ParseError::InvalidPayload { event: ref declared, .. } if declared == event),
            "unexpected error for {}: {:?}",
            event,
            err
        );
    }
}
