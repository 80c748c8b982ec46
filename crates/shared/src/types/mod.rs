//! Common types used across the application.

pub mod money;
pub mod pagination;

pub use money::{Money, MoneyError};
pub use pagination::{PageMeta, PageRequest, PageResponse};
