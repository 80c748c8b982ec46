//! User repository for account storage.

use coop_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::common::{is_unique_violation, now};
use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Errors that can occur during user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email already registered.
    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),

    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match &err {
            UserError::DuplicateEmail(_) => Self::Conflict(err.to_string()),
            UserError::NotFound(_) => Self::NotFound(err.to_string()),
            UserError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Normalized (lower-case) email.
    pub email: String,
    /// Argon2 PHC hash.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Role to assign.
    pub role: UserRole,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, UserError> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    /// Finds a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, UserError> {
        Ok(users::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::DuplicateEmail` when the email is taken.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        let now = now();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email.clone()),
            password_hash: Set(input.password_hash),
            full_name: Set(input.full_name.trim().to_string()),
            role: Set(input.role),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                UserError::DuplicateEmail(input.email)
            } else {
                UserError::Database(e)
            }
        })
    }

    /// Lists users, optionally limited to one role.
    pub async fn list(&self, role: Option<UserRole>) -> Result<Vec<users::Model>, UserError> {
        let mut query = users::Entity::find().order_by_asc(users::Column::Email);
        if let Some(role) = role {
            query = query.filter(users::Column::Role.eq(role));
        }
        Ok(query.all(&self.db).await?)
    }
}
