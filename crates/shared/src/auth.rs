//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: Uuid,
    /// Account email, as stored (lowercase).
    pub email: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an account.
    #[must_use]
    pub fn new(account_id: Uuid, email: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the account ID from claims.
    #[must_use]
    pub const fn account_id(&self) -> Uuid {
        self.sub
    }
}

/// JWT claims for account-activation links.
///
/// The nonce ties one link to one signup attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationClaims {
    /// Email of the account being activated.
    pub email: String,
    /// Single-use nonce minted at signup.
    pub nonce: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl ActivationClaims {
    /// Creates new activation claims.
    #[must_use]
    pub fn new(email: &str, nonce: Uuid, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            email: email.to_string(),
            nonce,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Signup request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Phone number.
    pub phone: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Human-readable outcome message.
    pub message: String,
    /// Signed access token.
    pub token: String,
}
