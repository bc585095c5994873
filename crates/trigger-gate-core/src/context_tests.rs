use super::*;
use scm_hooks::{HookRepository, OtherHook, Provider, PushHook};

fn push(ref_name: &str) -> Webhook {
    Webhook::Push(PushHook {
        provider: Provider::GitHub,
        ref_name: ref_name.to_string(),
        before: String::new(),
        after: String::new(),
        repository: HookRepository::default(),
        sender: String::new(),
    })
}

#[test]
fn test_round_trip() {
    let mut extensions = Extensions::new();

    assert!(with_hook(&mut extensions, push("refs/heads/master")).is_none());

    let hook = intercepted_hook(&extensions).unwrap();
    assert_eq!(hook.ref_name(), Some("refs/heads/master"));
}

#[test]
fn test_empty_context_has_no_hook() {
    assert!(intercepted_hook(&Extensions::new()).is_none());
}

#[test]
fn test_last_write_wins() {
    let mut extensions = Extensions::new();
    with_hook(&mut extensions, push("refs/heads/first"));

    let previous = with_hook(&mut extensions, push("refs/heads/second"));

    assert_eq!(previous.unwrap().ref_name(), Some("refs/heads/first"));
    assert_eq!(
        intercepted_hook(&extensions).unwrap().ref_name(),
        Some("refs/heads/second")
    );
}

#[test]
fn test_bare_webhook_in_extensions_is_not_the_intercepted_hook() {
    let mut extensions = Extensions::new();
    extensions.insert(Webhook::Other(OtherHook {
        provider: Provider::GitLab,
        event: "Note Hook".to_string(),
    }));

    assert!(intercepted_hook(&extensions).is_none());
}
