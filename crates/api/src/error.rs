//! HTTP error responses.
//!
//! Every handler error becomes `{"error": <code>, "message": <text>}` with the
//! status from [`AppError::status_code`]. Server-side failures are logged in
//! full and answered with a generic message; [`expose_internal_errors`]
//! swaps the real message back in for development deployments.

use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use coop_db::repositories;
use coop_shared::AppError;
use serde::Serialize;
use tracing::{debug, error};

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable code.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Handler error: anything convertible into [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// `From<RepoError> for ApiError` through each repository's `AppError` mapping.
macro_rules! from_repository_errors {
    ($($error:ty),+ $(,)?) => {
        $(
            impl From<$error> for ApiError {
                fn from(err: $error) -> Self {
                    Self(err.into())
                }
            }
        )+
    };
}

from_repository_errors!(
    repositories::BatchError,
    repositories::CustomerError,
    repositories::DashboardError,
    repositories::ExpenseError,
    repositories::HealthError,
    repositories::OrderError,
    repositories::ProductionError,
    repositories::SaleError,
    repositories::SettingError,
    repositories::UserError,
);

/// Full message of a hidden server error, carried on the response.
#[derive(Debug, Clone)]
struct InternalDetail(String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: err.error_code(),
            message: err.public_message(false),
        };

        if err.is_server_error() {
            error!(error = %err, "Request failed");
            let mut response = (status, Json(body)).into_response();
            response
                .extensions_mut()
                .insert(InternalDetail(err.public_message(true)));
            response
        } else {
            debug!(status = status.as_u16(), error = %err, "Request rejected");
            (status, Json(body)).into_response()
        }
    }
}

/// Middleware that puts the real message back into 500 responses.
pub async fn expose_internal_errors(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    match response.extensions().get::<InternalDetail>().cloned() {
        Some(InternalDetail(message)) => (
            response.status(),
            Json(ErrorBody {
                error: "internal_error",
                message,
            }),
        )
            .into_response(),
        None => response,
    }
}
