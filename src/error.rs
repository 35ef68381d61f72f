use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Forbidden")]
    Forbidden,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("You cannot follow yourself")]
    SelfFollow,

    #[error("You already follow this user")]
    AlreadyFollowing,

    #[error("You do not follow this user")]
    NotFollowing,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Payload too large")]
    PayloadTooLarge,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl utoipa::ToSchema for AppError {
    fn name() -> std::borrow::Cow<'static, str> {
        "ErrorResponse".into()
    }
}

impl utoipa::PartialSchema for AppError {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ErrorResponse::schema()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 500s carry the storage cause in the `error` field; client errors
        // carry only the message.
        let (status, message, cause) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None),
            AppError::Jwt(e) => {
                tracing::error!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string(), None)
            }
            AppError::NotFound(entity) => {
                (StatusCode::NOT_FOUND, format!("{} not found", entity), None)
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string(), None),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
            // Duplicate email / category name / follow edge respond as 400,
            // the same status the field validations use.
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::SelfFollow => (
                StatusCode::BAD_REQUEST,
                "You cannot follow yourself".to_string(),
                None,
            ),
            AppError::AlreadyFollowing => (
                StatusCode::BAD_REQUEST,
                "You already follow this user".to_string(),
                None,
            ),
            AppError::NotFollowing => (
                StatusCode::BAD_REQUEST,
                "You do not follow this user".to_string(),
                None,
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "File too large".to_string(),
                None,
            ),
        };

        let body = match cause {
            Some(cause) => json!({ "message": message, "error": cause }),
            None => json!({ "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Map a unique-index violation to the given conflict error, leaving every
/// other storage failure as a 500.
pub fn on_unique_violation(e: sea_orm::DbErr, conflict: AppError) -> AppError {
    match e.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => conflict,
        _ => AppError::Database(e),
    }
}

pub type AppResult<T> = Result<T, AppError>;
