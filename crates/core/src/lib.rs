//! Core farm business rules for Coop.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain rules, validation and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing and user roles
//! - `sales` - Sale pricing and ledger arithmetic
//! - `flock` - Batch head counts, mortality, egg and feed rules
//! - `orders` - Order status machine, numbering and pricing
//! - `reports` - Dashboard windows, series and activity feed

pub mod auth;
pub mod flock;
pub mod orders;
pub mod reports;
pub mod sales;
