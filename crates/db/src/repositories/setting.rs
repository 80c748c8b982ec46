//! Site settings: storefront contact details and catalog prices.

use coop_core::orders::Catalog;
use coop_shared::AppError;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use tracing::info;

use super::common::now;
use crate::entities::site_settings;

/// Longest accepted setting key.
pub const MAX_KEY_LENGTH: usize = 100;

/// Errors that can occur during settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingError {
    /// Key missing or too long.
    #[error("Setting key must be 1..={MAX_KEY_LENGTH} characters")]
    InvalidKey,

    /// Catalog price that is not a positive integer amount.
    #[error("Catalog price '{key}' must be a positive integer amount, got '{value}'")]
    InvalidPrice {
        /// Setting key.
        key: String,
        /// Rejected value.
        value: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SettingError> for AppError {
    fn from(err: SettingError) -> Self {
        match &err {
            SettingError::InvalidKey | SettingError::InvalidPrice { .. } => {
                Self::Validation(err.to_string())
            }
            SettingError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Settings repository.
#[derive(Debug, Clone)]
pub struct SettingRepository {
    db: DatabaseConnection,
}

impl SettingRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all settings by key.
    pub async fn list(&self) -> Result<Vec<site_settings::Model>, SettingError> {
        Ok(site_settings::Entity::find()
            .order_by_asc(site_settings::Column::Key)
            .all(&self.db)
            .await?)
    }

    /// Finds one setting.
    pub async fn get(&self, key: &str) -> Result<Option<site_settings::Model>, SettingError> {
        Ok(site_settings::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?)
    }

    /// Inserts or replaces a setting.
    pub async fn upsert(&self, key: &str, value: &str) -> Result<site_settings::Model, SettingError> {
        let key = validate_setting(key, value)?;
        let model = upsert_on(&self.db, &key, value.trim()).await?;
        info!(key = %model.key, "Setting saved");
        Ok(model)
    }

    /// Deletes a setting. Returns `false` when it did not exist.
    pub async fn delete(&self, key: &str) -> Result<bool, SettingError> {
        let result = site_settings::Entity::delete_by_id(key.trim().to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Current catalog prices.
    pub async fn catalog(&self) -> Result<Catalog, SettingError> {
        catalog_on(&self.db).await.map_err(SettingError::from)
    }
}

/// Inserts or replaces one setting on any connection.
pub(crate) async fn upsert_on<C>(conn: &C, key: &str, value: &str) -> Result<site_settings::Model, DbErr>
where
    C: ConnectionTrait,
{
    let model = site_settings::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value.to_string()),
        updated_at: Set(now()),
    };
    site_settings::Entity::insert(model)
        .on_conflict(
            OnConflict::column(site_settings::Column::Key)
                .update_columns([site_settings::Column::Value, site_settings::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    site_settings::Entity::find_by_id(key.to_string())
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("setting '{key}'")))
}

/// Reads the catalog prices on any connection.
pub(crate) async fn catalog_on<C>(conn: &C) -> Result<Catalog, DbErr>
where
    C: ConnectionTrait,
{
    let settings = site_settings::Entity::find().all(conn).await?;
    Ok(Catalog::from_settings(
        settings.iter().map(|s| (s.key.as_str(), s.value.as_str())),
    ))
}

/// Trims the key and checks catalog prices parse as positive integers.
fn validate_setting(key: &str, value: &str) -> Result<String, SettingError> {
    let key = key.trim();
    if key.is_empty() || key.len() > MAX_KEY_LENGTH {
        return Err(SettingError::InvalidKey);
    }
    if key.starts_with(coop_core::orders::CATALOG_PRICE_PREFIX) {
        match value.trim().parse::<i64>() {
            Ok(price) if price > 0 => {}
            _ => {
                return Err(SettingError::InvalidPrice {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_setting() {
        assert_eq!(validate_setting(" farm.phone ", "+256 700 000000").unwrap(), "farm.phone");
        assert_eq!(validate_setting("price.tray", "12000").unwrap(), "price.tray");
        assert!(matches!(validate_setting("", "x"), Err(SettingError::InvalidKey)));
        assert!(matches!(
            validate_setting("price.tray", "12.5"),
            Err(SettingError::InvalidPrice { .. })
        ));
        assert!(matches!(
            validate_setting("price.tray", "0"),
            Err(SettingError::InvalidPrice { .. })
        ));
    }
}
