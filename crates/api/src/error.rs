//! Wire mapping for application errors.
//!
//! Every error body is `{"error": "<message>"}`; the status comes from
//! [`AppError::status_code`]. Handlers classify their failures into the
//! [`AppError`] taxonomy and render through [`respond`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use centime_core::transfer::TransferError;
use centime_shared::AppError;

/// Renders an [`AppError`] as the wire error contract.
pub fn respond(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Json(json!({ "error": err.message() }))).into_response()
}

/// Classifies a transfer-engine failure into the application taxonomy.
///
/// Rejections keep their engine message; contention and store failures
/// become server errors.
pub fn classify(e: &TransferError) -> AppError {
    match e {
        TransferError::InvalidRecipient | TransferError::InvalidAmount => {
            AppError::Validation(e.to_string())
        }
        TransferError::SenderNotFound
        | TransferError::RecipientNotFound
        | TransferError::AccountNotFound => AppError::NotFound(e.to_string()),
        TransferError::SenderNotActive
        | TransferError::SelfTransfer
        | TransferError::InsufficientFunds => AppError::BusinessRule(e.to_string()),
        TransferError::Contention => AppError::Internal(e.to_string()),
        TransferError::Store(_) => AppError::Database(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_respond_uses_taxonomy_status() {
        let response = respond(&AppError::Unauthorized("Invalid email or password".into()));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = respond(&AppError::Conflict("Email already registered".into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_classify_keeps_rejections_client_side() {
        assert_eq!(
            classify(&TransferError::InsufficientFunds).status_code(),
            400
        );
        assert_eq!(classify(&TransferError::SelfTransfer).status_code(), 400);
        assert_eq!(classify(&TransferError::Contention).status_code(), 500);
    }
}
