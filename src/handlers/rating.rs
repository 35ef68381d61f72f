use crate::error::{AppError, AppResult};
use crate::models::{RatingModel, UserModel};
use crate::response::{ApiResponse, NamedRef};
use crate::services::rating::{RatingService, RatingSummary};
use axum::{extract::Path, http::StatusCode, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertRatingRequest {
    /// Rating value
    pub qualification: Option<f64>,
    /// Author user ID
    pub author: Option<i32>,
    /// Rated answer ID
    pub answer: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RatingResponse {
    pub id: i32,
    pub qualification: f64,
    pub answer_id: i32,
    pub author: Option<NamedRef>,
    pub created_at: String,
    pub updated_at: String,
}

impl RatingResponse {
    fn from_parts(r: RatingModel, author: Option<UserModel>) -> Self {
        Self {
            id: r.id,
            qualification: r.qualification,
            answer_id: r.answer_id,
            author: author.map(|u| NamedRef {
                id: u.id,
                name: u.name,
            }),
            created_at: r.created_at.to_string(),
            updated_at: r.updated_at.to_string(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/ratings",
    request_body = UpsertRatingRequest,
    responses(
        (status = 201, description = "Rating recorded; answer aggregate recomputed", body = RatingSummary),
        (status = 400, description = "Missing required field", body = AppError),
        (status = 404, description = "Answer or user not found", body = AppError),
    ),
    tag = "ratings"
)]
pub async fn upsert_rating(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<UpsertRatingRequest>,
) -> AppResult<impl IntoResponse> {
    let qualification = payload
        .qualification
        .ok_or_else(|| AppError::Validation("Rating value is required".to_string()))?;
    let author = payload
        .author
        .ok_or_else(|| AppError::Validation("Rating author is required".to_string()))?;
    let answer = payload.answer.ok_or_else(|| {
        AppError::Validation("Rating must be associated with an answer".to_string())
    })?;

    let service = RatingService::new(db);
    let summary = service.upsert(author, answer, qualification).await?;

    Ok((StatusCode::CREATED, ApiResponse::ok(summary)))
}

#[utoipa::path(
    get,
    path = "/api/ratings/{id}",
    params(("id" = i32, Path, description = "Rating ID")),
    responses(
        (status = 200, description = "Rating details", body = RatingResponse),
        (status = 404, description = "Rating not found", body = AppError),
    ),
    tag = "ratings"
)]
pub async fn get_rating(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = RatingService::new(db);
    let (rating, author) = service.get_by_id(id).await?;
    Ok(ApiResponse::ok(RatingResponse::from_parts(rating, author)))
}

#[utoipa::path(
    get,
    path = "/api/ratings/answer/{answer_id}",
    params(("answer_id" = i32, Path, description = "Answer ID")),
    responses(
        (status = 200, description = "All ratings for an answer", body = Vec<RatingResponse>),
    ),
    tag = "ratings"
)]
pub async fn list_ratings_by_answer(
    Extension(db): Extension<DatabaseConnection>,
    Path(answer_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = RatingService::new(db);
    let ratings = service.list_by_answer(answer_id).await?;
    let items: Vec<RatingResponse> = ratings
        .into_iter()
        .map(|(r, u)| RatingResponse::from_parts(r, u))
        .collect();
    Ok(ApiResponse::ok(items))
}
