//! Request middleware.

pub mod auth;

pub use auth::{AdminUser, AuthUser, StaffUser, auth_middleware};
