//! Admin-only account management.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use coop_db::{UserRepository, entities::sea_orm_active_enums::UserRole};
use coop_shared::auth::{RegisterRequest, UserInfo};
use serde::Deserialize;
use tracing::info;

use super::auth::{create_account, user_info};
use crate::{
    AppState,
    error::ApiResult,
    extractors::{AppJson, AppQuery},
    middleware::AdminUser,
};

/// Creates the user management routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users).post(create_user))
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Login email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Display name.
    pub full_name: String,
    /// Role to grant (defaults to employee).
    pub role: Option<UserRole>,
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Only this role.
    pub role: Option<UserRole>,
}

/// POST /users - Create a staff (or any) account.
async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let role = payload.role.unwrap_or(UserRole::Employee);
    let user = create_account(
        &state,
        RegisterRequest {
            email: payload.email,
            password: payload.password,
            full_name: payload.full_name,
        },
        role,
    )
    .await?;

    info!(user_id = %user.id, created_by = %admin.user_id(), role = ?role, "Account created");
    Ok((StatusCode::CREATED, AppJson(user_info(&user))))
}

/// GET /users - List accounts.
async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(query): AppQuery<ListUsersQuery>,
) -> ApiResult<AppJson<Vec<UserInfo>>> {
    let users = UserRepository::new(state.db()).list(query.role).await?;
    Ok(AppJson(users.iter().map(user_info).collect()))
}
