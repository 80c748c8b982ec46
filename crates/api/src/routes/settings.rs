//! Site settings. Reads are public so the storefront can show prices and
//! contact details.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use coop_db::{SettingRepository, entities::site_settings};
use coop_shared::AppError;
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::ApiResult,
    extractors::AppJson,
    middleware::AdminUser,
};

/// Creates the settings routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/settings", get(list_settings)).route(
        "/settings/{key}",
        get(get_setting).put(upsert_setting).delete(delete_setting),
    )
}

/// Request body for writing a setting.
#[derive(Debug, Deserialize)]
pub struct UpsertSettingRequest {
    /// New value.
    pub value: String,
}

async fn list_settings(
    State(state): State<AppState>,
) -> ApiResult<AppJson<Vec<site_settings::Model>>> {
    let settings = SettingRepository::new(state.db()).list().await?;
    Ok(AppJson(settings))
}

async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<AppJson<site_settings::Model>> {
    SettingRepository::new(state.db())
        .get(&key)
        .await?
        .map(AppJson)
        .ok_or_else(|| AppError::NotFound(format!("Setting '{key}' not found")).into())
}

/// PUT /settings/{key} - Create or replace a setting.
async fn upsert_setting(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(key): Path<String>,
    AppJson(payload): AppJson<UpsertSettingRequest>,
) -> ApiResult<AppJson<site_settings::Model>> {
    let setting = SettingRepository::new(state.db())
        .upsert(&key, &payload.value)
        .await?;
    info!(key = %setting.key, updated_by = %admin.user_id(), "Setting saved");
    Ok(AppJson(setting))
}

async fn delete_setting(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(key): Path<String>,
) -> ApiResult<StatusCode> {
    SettingRepository::new(state.db()).delete(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}
