//! User table entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::{User, UserType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    /// Ordered role names as a JSON array
    pub roles: Json,
    pub verified: bool,
    pub verification_token: Option<String>,
    #[sea_orm(column_name = "type")]
    pub user_type: String,
    pub blocked: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let roles: Vec<String> = serde_json::from_value(model.roles).map_err(|e| {
            AppError::internal(format!("Malformed roles for user {}: {}", model.id, e))
        })?;

        Ok(User {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            roles,
            verified: model.verified,
            verification_token: model.verification_token,
            user_type: UserType::from(model.user_type.as_str()),
            blocked: model.blocked,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
