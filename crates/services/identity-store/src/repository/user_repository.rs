//! User repository over the `users` table.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::query::{column, condition, sql_value};
use common::{AppError, AppResult};
use domain::{FieldUpdate, Filter, NewUser, User, UserField};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Identity store operations.
///
/// "Not found" is an empty result, never an error. Driver and connectivity
/// failures surface as `StoreUnavailable`; a duplicate email on `create`
/// surfaces as `Conflict`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// First user matching the filter
    async fn get(&self, filter: Filter) -> AppResult<Option<User>>;

    /// All users matching the filter
    async fn get_all(&self, filter: Filter) -> AppResult<Vec<User>>;

    /// Number of users matching the filter
    async fn count(&self, filter: Filter) -> AppResult<u64>;

    /// Insert a new user; the store assigns the id
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Replace every mutable field of the user with the given id
    async fn update_by_id(&self, id: Uuid, user: User) -> AppResult<()>;

    /// Set one field on every matching user
    async fn update_many(&self, filter: Filter, update: FieldUpdate) -> AppResult<()>;

    /// Delete every matching user
    async fn delete_many(&self, filter: Filter) -> AppResult<()>;
}

/// SeaORM implementation of [`UserRepository`].
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn get(&self, filter: Filter) -> AppResult<Option<User>> {
        if filter.matches_nothing() {
            return Ok(None);
        }

        let model = UserEntity::find()
            .filter(condition(&filter))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        model.map(User::try_from).transpose()
    }

    async fn get_all(&self, filter: Filter) -> AppResult<Vec<User>> {
        if filter.matches_nothing() {
            return Ok(Vec::new());
        }

        let models = UserEntity::find()
            .filter(condition(&filter))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(User::try_from).collect()
    }

    async fn count(&self, filter: Filter) -> AppResult<u64> {
        if filter.matches_nothing() {
            return Ok(0);
        }

        UserEntity::find()
            .filter(condition(&filter))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            roles: Set(serde_json::json!(user.roles)),
            verified: Set(user.verified),
            verification_token: Set(user.verification_token),
            user_type: Set(user.user_type.as_str().to_string()),
            blocked: Set(user.blocked),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        User::try_from(model)
    }

    async fn update_by_id(&self, id: Uuid, user: User) -> AppResult<()> {
        // Id and creation time are never rewritten
        let replacement = ActiveModel {
            id: NotSet,
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            roles: Set(serde_json::json!(user.roles)),
            verified: Set(user.verified),
            verification_token: Set(user.verification_token),
            user_type: Set(user.user_type.as_str().to_string()),
            blocked: Set(user.blocked),
            created_at: NotSet,
            updated_at: Set(Utc::now()),
        };

        UserEntity::update_many()
            .set(replacement)
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    async fn update_many(&self, filter: Filter, update: FieldUpdate) -> AppResult<()> {
        if update.field == UserField::Id {
            return Err(AppError::bad_request("field id cannot be updated"));
        }
        if filter.matches_nothing() {
            return Ok(());
        }

        let result = UserEntity::update_many()
            .col_expr(column(update.field), Expr::value(sql_value(&update.value)))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(condition(&filter))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        tracing::debug!(
            field = update.field.name(),
            rows = result.rows_affected,
            "Bulk user update applied"
        );
        Ok(())
    }

    async fn delete_many(&self, filter: Filter) -> AppResult<()> {
        if filter.matches_nothing() {
            return Ok(());
        }

        let result = UserEntity::delete_many()
            .filter(condition(&filter))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        tracing::debug!(rows = result.rows_affected, "Users deleted");
        Ok(())
    }
}
