//! In-memory identity store for tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::user_repository::UserRepository;
use common::{AppError, AppResult};
use domain::{FieldUpdate, Filter, NewUser, User};

/// [`UserRepository`] backed by a vector, with the same email uniqueness
/// rule as the `users` table.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-built users as-is.
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// Copy of every stored user.
    pub async fn snapshot(&self) -> Vec<User> {
        self.users.read().await.clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn get(&self, filter: Filter) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| filter.matches(u)).cloned())
    }

    async fn get_all(&self, filter: Filter) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| filter.matches(u)).cloned().collect())
    }

    async fn count(&self, filter: Filter) -> AppResult<u64> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| filter.matches(u)).count() as u64)
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict("User"));
        }

        let created = user.into_user(Uuid::new_v4());
        users.push(created.clone());
        Ok(created)
    }

    async fn update_by_id(&self, id: Uuid, user: User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if let Some(existing) = users.iter_mut().find(|u| u.id == id) {
            let created_at = existing.created_at;
            *existing = User {
                id,
                created_at,
                updated_at: Utc::now(),
                ..user
            };
        }
        Ok(())
    }

    async fn update_many(&self, filter: Filter, update: FieldUpdate) -> AppResult<()> {
        let mut users = self.users.write().await;
        for user in users.iter_mut().filter(|u| filter.matches(u)) {
            update.apply(user)?;
        }
        Ok(())
    }

    async fn delete_many(&self, filter: Filter) -> AppResult<()> {
        let mut users = self.users.write().await;
        users.retain(|u| !filter.matches(u));
        Ok(())
    }
}
