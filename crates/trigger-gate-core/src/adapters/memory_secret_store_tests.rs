//! Tests for the in-memory secret store

use super::*;

#[tokio::test]
async fn test_in_memory_store_basic_operations() {
    let store = InMemorySecretStore::new();

    // Initially empty
    assert!(matches!(
        store.get_secret("default", "hook").await,
        Err(SecretError::NotFound { .. })
    ));

    store.add_secret("default", "hook", "token", SecretValue::from("one"));
    store.add_secret("default", "hook", "other", SecretValue::from("two"));

    let data = store.get_secret("default", "hook").await.unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data["token"].expose_bytes(), b"one");
    assert_eq!(data["other"].expose_bytes(), b"two");

    store.remove_secret("default", "hook");
    assert!(store.get_secret("default", "hook").await.is_err());
}

#[tokio::test]
async fn test_in_memory_store_separates_namespaces() {
    let store = InMemorySecretStore::new();
    store.add_secret("a", "hook", "token", SecretValue::from("from-a"));

    assert!(store.get_secret("a", "hook").await.is_ok());
    assert!(store.get_secret("b", "hook").await.is_err());
}

#[tokio::test]
async fn test_in_memory_store_with_secrets() {
    let mut data = SecretData::new();
    data.insert("token".to_string(), SecretValue::from("preloaded"));
    let mut secrets = HashMap::new();
    secrets.insert(("ci".to_string(), "hook".to_string()), data);

    let store = InMemorySecretStore::with_secrets(secrets);

    let data = store.get_secret("ci", "hook").await.unwrap();
    assert_eq!(data["token"].expose_bytes(), b"preloaded");
}

#[tokio::test]
async fn test_in_memory_store_clones_share_contents() {
    let store = InMemorySecretStore::new();
    let clone = store.clone();

    clone.add_secret("default", "hook", "token", SecretValue::from("shared"));

    assert!(store.get_secret("default", "hook").await.is_ok());
}

#[tokio::test]
async fn test_in_memory_store_recovers_poisoned_lock() {
    let store = InMemorySecretStore::new();
    store.add_secret("default", "hook", "token", SecretValue::from("one"));

    let secrets = store.secrets.clone();
    let _ = std::thread::spawn(move || {
        let _guard = secrets.write().unwrap();
        panic!("poison the lock");
    })
    .join();
    assert!(store.secrets.is_poisoned());

    let data = store.get_secret("default", "hook").await.unwrap();
    assert_eq!(data["token"].expose_bytes(), b"one");

    store.add_secret("default", "hook", "token", SecretValue::from("two"));
    let data = store.get_secret("default", "hook").await.unwrap();
    assert_eq!(data["token"].expose_bytes(), b"two");
}
