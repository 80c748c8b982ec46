//! Application-wide error types.
//!
//! Every repository error converts into [`AppError`], which is the only
//! error shape the HTTP boundary knows about.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Message shown for server-side failures when details are hidden.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or malformed input, rejected before any write.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Well-formed request that violates a domain rule (e.g. a status transition).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Uniqueness or dependency conflict.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage failure; the in-flight operation was rolled back.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) => 422,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_error",
            Self::BusinessRule(_) => "business_rule_violation",
            Self::Conflict(_) => "conflict",
            Self::Database(_) | Self::Internal(_) => "internal_error",
        }
    }

    /// Returns true for failures the caller cannot fix.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }

    /// Returns the message that is safe to send to the client.
    ///
    /// Server errors collapse to a generic message unless `expose_internal`
    /// is set (development deployments).
    #[must_use]
    pub fn public_message(&self, expose_internal: bool) -> String {
        match self {
            Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Validation(m)
            | Self::BusinessRule(m)
            | Self::Conflict(m) => m.clone(),
            Self::Database(m) | Self::Internal(m) if expose_internal => m.clone(),
            Self::Database(_) | Self::Internal(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Unauthorized(String::new()), 401, "unauthorized")]
    #[case(AppError::Forbidden(String::new()), 403, "forbidden")]
    #[case(AppError::NotFound(String::new()), 404, "not_found")]
    #[case(AppError::Validation(String::new()), 400, "validation_error")]
    #[case(AppError::BusinessRule(String::new()), 422, "business_rule_violation")]
    #[case(AppError::Conflict(String::new()), 409, "conflict")]
    #[case(AppError::Database(String::new()), 500, "internal_error")]
    #[case(AppError::Internal(String::new()), 500, "internal_error")]
    fn test_status_and_code(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
        assert_eq!(err.is_server_error(), status == 500);
    }

    #[test]
    fn test_public_message_hides_database_details() {
        let err = AppError::Database("relation \"sales\" does not exist".into());
        assert_eq!(err.public_message(false), GENERIC_ERROR_MESSAGE);
        assert_eq!(
            err.public_message(true),
            "relation \"sales\" does not exist"
        );
    }

    #[test]
    fn test_public_message_keeps_client_errors() {
        let err = AppError::Validation("quantity must be at least 1".into());
        assert_eq!(err.public_message(false), "quantity must be at least 1");
        assert_eq!(
            err.to_string(),
            "Validation error: quantity must be at least 1"
        );
    }
}
