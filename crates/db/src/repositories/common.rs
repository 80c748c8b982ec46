//! Query helpers shared by the repositories.

use chrono::Utc;
use coop_core::flock::FlockError;
use coop_shared::AppError;
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QuerySelect, Select, SqlErr,
    prelude::DateTimeWithTimeZone,
};

/// Current time in the form the timestamp columns store.
pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

/// True when the error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// `CAST(COALESCE(SUM(column), 0) AS BIGINT)` over `query`.
///
/// Postgres widens `SUM(bigint)` to `numeric`; the cast keeps the result an
/// `i64` on every backend.
pub(crate) async fn sum_i64<E, C, Db>(query: Select<E>, column: C, db: &Db) -> Result<i64, DbErr>
where
    E: EntityTrait,
    C: ColumnTrait,
    Db: ConnectionTrait,
{
    let summed = Func::coalesce([
        SimpleExpr::from(Func::sum(Expr::col(column))),
        Expr::val(0i64).into(),
    ]);
    let total = query
        .select_only()
        .column_as(
            SimpleExpr::from(Func::cast_as(summed, Alias::new("BIGINT"))),
            "total",
        )
        .into_tuple::<i64>()
        .one(db)
        .await?;

    Ok(total.unwrap_or(0))
}

/// Maps a flock rule failure: refused mortality is a business rule, the
/// rest is malformed input.
pub(crate) fn flock_rule_error(err: &FlockError) -> AppError {
    match err {
        FlockError::MortalityExceedsLiveCount { .. } => AppError::BusinessRule(err.to_string()),
        _ => AppError::Validation(err.to_string()),
    }
}

/// Trims an optional text field and drops it when blank.
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
