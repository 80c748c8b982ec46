//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification and minimum-strength checks
//! - User role definitions

mod password;

pub use password::{
    MIN_PASSWORD_LENGTH, PasswordError, hash_password, normalize_email, validate_password,
    verify_password,
};

use serde::{Deserialize, Serialize};

/// Roles a user account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Self-registered storefront account; no back-office access.
    Customer,
    /// Farm staff: records production, sales and orders.
    Employee,
    /// Full access, including deletes, settings and user management.
    Admin,
}

impl UserRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Employee => "employee",
            Self::Admin => "admin",
        }
    }

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "customer" => Some(Self::Customer),
            "employee" => Some(Self::Employee),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns true if this role can use the back office.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Employee | Self::Admin)
    }

    /// Returns true if this role can delete records and manage settings.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
