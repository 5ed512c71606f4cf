//! Redis session store.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisError};
use tracing::{debug, warn};

use super::SessionStore;
use common::{AppError, AppResult};

/// Sessions kept in Redis with a fixed time to live.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    /// Connect to Redis. Every session expires after `ttl_seconds`.
    pub async fn connect(url: &str, ttl_seconds: u64) -> Result<Self, RedisError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        debug!(ttl_seconds, "Connected to session store");
        Ok(Self { conn, ttl_seconds })
    }
}

fn store_error(op: &'static str, err: RedisError) -> AppError {
    warn!(op, error = %err, "Session store error");
    AppError::from(err)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn set(&self, key: &str, token: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(key, token, self.ttl_seconds)
            .await
            .map_err(|e| store_error("set", e))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(|e| store_error("get", e))
    }

    async fn delete_one(&self, key: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await.map_err(|e| store_error("del", e))?;
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> AppResult<()> {
        // DEL requires at least one key
        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(keys).await.map_err(|e| store_error("del", e))?;
        debug!(requested = keys.len(), removed, "Sessions invalidated");
        Ok(())
    }
}
