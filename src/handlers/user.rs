use crate::error::{AppError, AppResult};
use crate::handlers::auth::UserResponse;
use crate::response::ApiResponse;
use crate::services::follow::FollowService;
use crate::services::upload::{UploadConfig, UploadService};
use crate::services::user::UserService;
use axum::{
    extract::{Multipart, Path},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    /// One of: user, moderator, admin
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DisableUserRequest {
    /// When the ban lapses; absent for an indefinite ban.
    pub ban_end_date: Option<chrono::NaiveDateTime>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 8, max = 100))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FollowRequest {
    /// The user doing the (un)following.
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FollowersResponse {
    pub followers: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfilePictureResponse {
    pub profile_picture: String,
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details (including disabled accounts)", body = UserResponse),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn get_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = UserService::new(db);
    let user = service.get_by_id(id).await?;
    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error or duplicate email", body = AppError),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn update_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let service = UserService::new(db);
    let user = service
        .update(id, payload.name, payload.email, payload.role)
        .await?;
    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/disable",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = DisableUserRequest,
    responses(
        (status = 200, description = "User disabled", body = UserResponse),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn disable_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<DisableUserRequest>,
) -> AppResult<impl IntoResponse> {
    let service = UserService::new(db);
    let user = service.disable(id, payload.ban_end_date).await?;
    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/password",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = UserResponse),
        (status = 400, description = "Validation error", body = AppError),
    ),
    tag = "users"
)]
pub async fn update_password(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = UserService::new(db);
    let user = service.update_password(id, &payload.password).await?;
    Ok(ApiResponse::with_message(
        UserResponse::from(user),
        "Password updated".to_string(),
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/profile-picture",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile picture updated", body = ProfilePictureResponse),
        (status = 400, description = "Invalid image", body = AppError),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn update_profile_picture(
    Extension(db): Extension<DatabaseConnection>,
    Extension(config): Extension<UploadConfig>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let service = UserService::new(db);
    // 404 before touching the upload
    service.get_by_id(id).await?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?
        .ok_or_else(|| AppError::Validation("No image provided".to_string()))?;

    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;

    let url = UploadService::save_image(&config, &data, &content_type, "profile-pictures").await?;

    service.update_profile_picture(id, &url).await?;

    Ok(ApiResponse::with_message(
        ProfilePictureResponse {
            profile_picture: url,
        },
        "Profile picture updated".to_string(),
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/follow",
    params(("id" = i32, Path, description = "User to follow")),
    request_body = FollowRequest,
    responses(
        (status = 200, description = "Now following", body = String),
        (status = 400, description = "Self-follow or already following", body = AppError),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn follow_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<FollowRequest>,
) -> AppResult<impl IntoResponse> {
    let follower_id = payload
        .user_id
        .ok_or_else(|| AppError::Validation("Follower user id is required".to_string()))?;

    let service = FollowService::new(db);
    service.follow(id, follower_id).await?;
    Ok(ApiResponse::ok("Followed"))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/unfollow",
    params(("id" = i32, Path, description = "User to unfollow")),
    request_body = FollowRequest,
    responses(
        (status = 200, description = "No longer following", body = String),
        (status = 400, description = "Self-follow or not following", body = AppError),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn unfollow_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<FollowRequest>,
) -> AppResult<impl IntoResponse> {
    let follower_id = payload
        .user_id
        .ok_or_else(|| AppError::Validation("Follower user id is required".to_string()))?;

    let service = FollowService::new(db);
    service.unfollow(id, follower_id).await?;
    Ok(ApiResponse::ok("Unfollowed"))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/followers",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Follower names", body = FollowersResponse),
    ),
    tag = "users"
)]
pub async fn list_followers(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = FollowService::new(db);
    let followers = service.follower_names(id).await?;
    Ok(ApiResponse::ok(FollowersResponse { followers }))
}
