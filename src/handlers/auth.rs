use crate::error::{AppError, AppResult};
use crate::models::UserModel;
use crate::response::ApiResponse;
use crate::services::auth::AuthService;
use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Display name (3-50 characters)
    #[validate(length(min = 3, max = 50))]
    pub name: String,
    /// Email address (unique)
    #[validate(email)]
    pub email: String,
    /// Password (8-100 characters)
    #[validate(length(min = 8, max = 100))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub profile_picture: String,
    pub role: String,
    pub status: String,
    pub followers: i32,
    pub ban_end_date: Option<String>,
    pub created_at: String,
}

impl From<UserModel> for UserResponse {
    fn from(u: UserModel) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            profile_picture: u.profile_picture,
            role: u.role,
            status: u.status,
            followers: u.followers,
            ban_end_date: u.ban_end_date.map(|t| t.to_string()),
            created_at: u.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserResponse,
    /// Bearer token, valid for one hour.
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Validation error or duplicate email", body = AppError),
    ),
    tag = "auth"
)]
pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = AuthService::new(db);
    let user = service
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    let message = format!("Welcome, {}", user.name);
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(UserResponse::from(user), message),
    ))
}

#[utoipa::path(
    put,
    path = "/api/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Incorrect password", body = AppError),
        (status = 404, description = "Email not registered", body = AppError),
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = AuthService::new(db);
    let (user, token) = service.login(&payload.email, &payload.password).await?;

    let message = format!("Welcome, {}", user.name);
    Ok(ApiResponse::with_message(
        LoginResponse {
            user: UserResponse::from(user),
            token,
        },
        message,
    ))
}
