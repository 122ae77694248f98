//! Authentication routes: signup, account activation, and login.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Duration, Utc};
use rand::Rng;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::AppState;
use crate::error::respond;
use centime_core::auth::{hash_password, non_empty_trimmed, valid_email_shape, verify_password};
use centime_db::entities::sea_orm_active_enums::AccountStatus;
use centime_db::repositories::account::{AccountRepository, CreateAccountInput};
use centime_shared::AppError;
use centime_shared::auth::{LoginRequest, LoginResponse, SignupRequest};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/auth/{pin}/{token}", get(activate))
        .route("/login", post(login))
}

/// POST /signup - Register a new account.
///
/// Creates an inactive account with the fixed starting balance and emails
/// an activation link. Mail delivery is best-effort: a send failure is
/// logged and signup still succeeds.
async fn signup(State(state): State<AppState>, Json(payload): Json<SignupRequest>) -> Response {
    if !valid_email_shape(&payload.email) {
        return respond(&AppError::Validation("Invalid email address".into()));
    }
    if !non_empty_trimmed(&payload.password) {
        return respond(&AppError::Validation("Password is required".into()));
    }

    let repo = AccountRepository::new((*state.db).clone());

    match repo.email_exists(&payload.email).await {
        Ok(true) => {
            return respond(&AppError::Conflict("Email already registered".into()));
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error during signup");
            return internal_error();
        }
    }

    let pin = format!("{:06}", rand::rng().random_range(0..1_000_000u32));

    let (password_hash, pin_hash) =
        match (hash_password(&payload.password), hash_password(&pin)) {
            (Ok(p), Ok(n)) => (p, n),
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "Hashing error during signup");
                return internal_error();
            }
        };

    let nonce = Uuid::new_v4();
    let token = match state
        .jwt_service
        .generate_activation_token(&payload.email, nonce)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate activation token");
            return internal_error();
        }
    };

    let expires_at =
        Utc::now() + Duration::minutes(state.jwt_service.activation_token_expires_minutes());
    let phone_number = Some(payload.phone).filter(|p| non_empty_trimmed(p));

    let account = match repo
        .create(CreateAccountInput {
            email: payload.email,
            password_hash,
            phone_number,
            activation_pin_hash: pin_hash,
            activation_expires_at: expires_at,
        })
        .await
    {
        Ok(a) => a,
        Err(e) => {
            error!(error = %e, "Failed to create account");
            return internal_error();
        }
    };

    let activation_url = format!("{}/api/v1/auth/{pin}/{token}", state.urls.backend);
    if let Err(e) = state
        .email_service
        .send_activation_email(&account.email, &activation_url)
        .await
    {
        warn!(account_id = %account.id, error = %e, "Failed to send activation email");
    }

    info!(account_id = %account.id, "Account created");

    (
        StatusCode::CREATED,
        Json(json!({ "message": "Account created, check your email to activate it" })),
    )
        .into_response()
}

/// GET /auth/{pin}/{token} - Activate an account from the emailed link.
///
/// Always answers with a redirect to the frontend login page:
/// `?activated=1` on success, `?activated=0&reason=...` on any failure.
async fn activate(
    State(state): State<AppState>,
    Path((pin, token)): Path<(String, String)>,
) -> Response {
    let frontend = &state.urls.frontend;

    let claims = match state.jwt_service.validate_activation_token(&token) {
        Ok(c) => c,
        Err(centime_shared::JwtError::Expired) => {
            return activation_failure(frontend, "expired");
        }
        Err(_) => return activation_failure(frontend, "invalid-token"),
    };

    let repo = AccountRepository::new((*state.db).clone());
    let account = match repo.find_by_email(&claims.email).await {
        Ok(Some(a)) => a,
        Ok(None) => return activation_failure(frontend, "unknown-account"),
        Err(e) => {
            error!(error = %e, "Database error during activation");
            return activation_failure(frontend, "internal-error");
        }
    };

    if account.status != AccountStatus::Inactive {
        return activation_failure(frontend, "already-active");
    }

    let expired = account
        .activation_expires_at
        .is_none_or(|at| at < Utc::now());
    if expired {
        return activation_failure(frontend, "expired");
    }

    let pin_matches = match account.activation_pin_hash.as_deref() {
        Some(hash) => verify_password(&pin, hash).unwrap_or(false),
        None => false,
    };
    if !pin_matches {
        return activation_failure(frontend, "invalid-pin");
    }

    if let Err(e) = repo.activate(account.id).await {
        error!(account_id = %account.id, error = %e, "Failed to activate account");
        return activation_failure(frontend, "internal-error");
    }

    info!(account_id = %account.id, "Account activated");

    redirect(
        StatusCode::MOVED_PERMANENTLY,
        &format!("{frontend}/login?activated=1"),
    )
}

/// POST /login - Authenticate an account and return an access token.
async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    let repo = AccountRepository::new((*state.db).clone());

    let account = match repo.find_by_email(&payload.email).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for unknown email");
            return respond(&AppError::Unauthorized("Invalid email or password".into()));
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    match verify_password(&payload.password, &account.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(account_id = %account.id, "Failed login attempt");
            return respond(&AppError::Unauthorized("Invalid email or password".into()));
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    match account.status {
        AccountStatus::Inactive => {
            return respond(&AppError::Unauthorized("Account not activated".into()));
        }
        AccountStatus::Blocked => {
            return respond(&AppError::Unauthorized("Account is blocked".into()));
        }
        AccountStatus::Active => {}
    }

    let token = match state
        .jwt_service
        .generate_access_token(account.id, &account.email)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error();
        }
    };

    info!(account_id = %account.id, "Account logged in");

    (
        StatusCode::OK,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token,
        }),
    )
        .into_response()
}

fn activation_failure(frontend: &str, reason: &str) -> Response {
    redirect(
        StatusCode::FOUND,
        &format!("{frontend}/login?activated=0&reason={reason}"),
    )
}

fn redirect(status: StatusCode, location: &str) -> Response {
    (status, [(LOCATION, location.to_string())]).into_response()
}

fn internal_error() -> Response {
    respond(&AppError::Internal("An unexpected error occurred".into()))
}
