//! # Secret Store Adapters
//!
//! Implementations of [`SecretStore`](crate::secrets::SecretStore) for
//! development, tests and mounted secret volumes.

pub mod filesystem_secret_store;
pub mod memory_secret_store;

pub use filesystem_secret_store::FileSystemSecretStore;
pub use memory_secret_store::InMemorySecretStore;
