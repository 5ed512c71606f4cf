//! Session store: session key to bearer token.

mod redis_store;

#[cfg(any(test, feature = "test-utils"))]
mod memory;

use async_trait::async_trait;

use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub use redis_store::RedisSessionStore;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemorySessionStore;

/// Key-value store holding one bearer token per session key.
///
/// A missing key is an empty result. Connectivity failures surface as
/// `StoreUnavailable`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store the token under `key`, replacing any previous one
    async fn set(&self, key: &str, token: &str) -> AppResult<()>;

    /// Token stored under `key`
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Remove one key; absent keys are ignored
    async fn delete_one(&self, key: &str) -> AppResult<()>;

    /// Remove every listed key; absent keys are ignored
    async fn delete_many(&self, keys: &[String]) -> AppResult<()>;
}
