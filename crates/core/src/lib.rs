//! Core business logic for Centime.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `transfer` - The balance-transfer engine and its store abstraction
//! - `auth` - Password hashing and credential validation helpers

pub mod auth;
pub mod transfer;
