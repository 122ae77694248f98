//! Shared types, errors, and configuration for Centime.
//!
//! This crate provides common types used across all other crates:
//! - The money module (fixed-point decimal helpers)
//! - Pagination types for list endpoints
//! - JWT claims and token services
//! - Email delivery for account activation
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{ActivationClaims, Claims};
pub use config::AppConfig;
pub use email::EmailService;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
