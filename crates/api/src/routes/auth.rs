//! Authentication routes: register, login and the current user.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use coop_core::auth::{
    PasswordError, hash_password, normalize_email, validate_password, verify_password,
};
use coop_db::{
    UserRepository,
    entities::{sea_orm_active_enums::UserRole, users},
    repositories::CreateUserInput,
};
use coop_shared::{
    AppError,
    auth::{LoginRequest, LoginResponse, RegisterRequest, UserInfo},
};
use tracing::{error, info};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::AppJson,
    middleware::AuthUser,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

/// POST /auth/register - Create a storefront (`customer`) account.
async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = create_account(&state, payload, UserRole::Customer).await?;
    info!(user_id = %user.id, "New customer account registered");

    let response = issue_token(&state, &user)?;
    Ok((StatusCode::CREATED, AppJson(response)))
}

/// POST /auth/login - Exchange credentials for an access token.
async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> ApiResult<AppJson<LoginResponse>> {
    let invalid = || ApiError(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));

    let email = normalize_email(&payload.email).ok_or_else(invalid)?;
    let Some(user) = UserRepository::new(state.db()).find_by_email(&email).await? else {
        info!("Login attempt for unknown email");
        return Err(invalid());
    };

    if !user.is_active {
        return Err(AppError::Unauthorized("This account has been disabled".to_string()).into());
    }

    let password = payload.password;
    let hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| {
            error!(user_id = %user.id, error = %e, "Password verification error");
            AppError::Internal(e.to_string())
        })?;
    if !verified {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(invalid());
    }

    info!(user_id = %user.id, "User logged in");
    Ok(AppJson(issue_token(&state, &user)?))
}

/// GET /auth/me - The authenticated user's profile.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<AppJson<UserInfo>> {
    let user = UserRepository::new(state.db())
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;
    Ok(AppJson(user_info(&user)))
}

/// Validates, hashes and stores a new account.
pub(crate) async fn create_account(
    state: &AppState,
    payload: RegisterRequest,
    role: UserRole,
) -> ApiResult<users::Model> {
    let email = normalize_email(&payload.email).ok_or_else(|| {
        AppError::Validation(format!("'{}' is not a valid email", payload.email.trim()))
    })?;
    let full_name = payload.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(AppError::Validation("Full name is required".to_string()).into());
    }
    validate_password(&payload.password).map_err(password_error)?;

    let password = payload.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(password_error)?;

    let user = UserRepository::new(state.db())
        .create(CreateUserInput {
            email,
            password_hash,
            full_name,
            role,
        })
        .await?;
    Ok(user)
}

/// Public view of a user row.
pub(crate) fn user_info(user: &users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        role: coop_core::auth::UserRole::from(user.role).as_str().to_string(),
    }
}

fn issue_token(state: &AppState, user: &users::Model) -> ApiResult<LoginResponse> {
    let info = user_info(user);
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &info.role)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(LoginResponse {
        user: info,
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
}

fn password_error(err: PasswordError) -> ApiError {
    match err {
        PasswordError::TooShort => ApiError(AppError::Validation(err.to_string())),
        _ => ApiError(AppError::Internal(err.to_string())),
    }
}
