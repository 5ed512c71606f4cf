//! In-memory session store for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::SessionStore;
use common::AppResult;

/// [`SessionStore`] backed by a map, without expiry.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.sessions.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn set(&self, key: &str, token: &str) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .insert(key.to_string(), token.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.sessions.read().await.get(key).cloned())
    }

    async fn delete_one(&self, key: &str) -> AppResult<()> {
        self.sessions.write().await.remove(key);
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        for key in keys {
            sessions.remove(key);
        }
        Ok(())
    }
}
