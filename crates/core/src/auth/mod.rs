//! Password hashing and credential validation.

pub mod password;
pub mod validate;

pub use password::{PasswordError, hash_password, verify_password};
pub use validate::{non_empty_trimmed, valid_email_shape};
