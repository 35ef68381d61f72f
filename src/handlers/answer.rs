use crate::error::{AppError, AppResult};
use crate::models::AnswerModel;
use crate::response::{ApiResponse, NamedRef, PaginatedResponse, PaginationQuery};
use crate::services::answer::{AnswerService, AnswerTarget};
use crate::services::feed::{AnswerFeedItem, FeedService};
use crate::services::user::UserService;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAnswerRequest {
    pub content: Option<String>,
    /// Author user ID
    pub author: Option<i32>,
    /// Post being answered (top-level answer)
    pub post: Option<i32>,
    /// Answer being replied to (threaded reply)
    pub parent_answer: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAnswerRequest {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnswerListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Viewer user ID; enables follow annotation
    pub user: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerResponse {
    pub id: i32,
    pub content: String,
    pub qualification: f64,
    pub total_ratings: i32,
    pub status: String,
    pub post_id: Option<i32>,
    pub parent_answer_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
    pub author: Option<NamedRef>,
}

impl AnswerResponse {
    fn from_parts(a: AnswerModel, author: Option<NamedRef>) -> Self {
        Self {
            id: a.id,
            content: a.content,
            qualification: a.qualification,
            total_ratings: a.total_ratings,
            status: a.status,
            post_id: a.post_id,
            parent_answer_id: a.parent_answer_id,
            created_at: a.created_at.to_string(),
            updated_at: a.updated_at.to_string(),
            author,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/answers/{id}",
    params(("id" = i32, Path, description = "Answer ID")),
    responses(
        (status = 200, description = "Answer details (including soft-deleted)", body = AnswerResponse),
        (status = 404, description = "Answer not found", body = AppError),
    ),
    tag = "answers"
)]
pub async fn get_answer(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = AnswerService::new(db.clone());
    let answer = service.get_by_id(id).await?;

    let author = UserService::new(db)
        .get_by_id(answer.author_id)
        .await
        .ok()
        .map(|u| NamedRef {
            id: u.id,
            name: u.name,
        });

    Ok(ApiResponse::ok(AnswerResponse::from_parts(answer, author)))
}

#[utoipa::path(
    get,
    path = "/api/answers/post/{post_id}",
    params(
        ("post_id" = i32, Path, description = "Post ID"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Items per page"),
        ("user" = Option<i32>, Query, description = "Viewer user ID"),
    ),
    responses(
        (status = 200, description = "Answers of a post, best-rated first", body = PaginatedResponse<AnswerFeedItem>),
    ),
    tag = "answers"
)]
pub async fn list_answers_by_post(
    Extension(db): Extension<DatabaseConnection>,
    Path(post_id): Path<i32>,
    Query(params): Query<AnswerListQuery>,
) -> AppResult<impl IntoResponse> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).max(1);

    let service = FeedService::new(db);
    let (items, total) = service
        .list_answers(post_id, page, limit, params.user)
        .await?;

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, limit,
    )))
}

#[utoipa::path(
    get,
    path = "/api/answers/answer/{answer_id}",
    params(
        ("answer_id" = i32, Path, description = "Parent answer ID"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Replies to an answer", body = PaginatedResponse<AnswerFeedItem>),
    ),
    tag = "answers"
)]
pub async fn list_replies(
    Extension(db): Extension<DatabaseConnection>,
    Path(answer_id): Path<i32>,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let page = params.page();
    let limit = params.limit();

    let service = FeedService::new(db);
    let (items, total) = service.list_replies(answer_id, page, limit).await?;

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, limit,
    )))
}

#[utoipa::path(
    post,
    path = "/api/answers",
    request_body = CreateAnswerRequest,
    responses(
        (status = 201, description = "Answer created", body = AnswerResponse),
        (status = 400, description = "Missing required field or ambiguous target", body = AppError),
        (status = 404, description = "Referenced post or answer not found", body = AppError),
    ),
    tag = "answers"
)]
pub async fn create_answer(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateAnswerRequest>,
) -> AppResult<impl IntoResponse> {
    let content = payload
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Answer content is required".to_string()))?;
    let author = payload
        .author
        .ok_or_else(|| AppError::Validation("Answer author is required".to_string()))?;

    let target = AnswerTarget::from_parts(payload.post, payload.parent_answer)?;

    let service = AnswerService::new(db);
    let answer = service.create(author, &content, target).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(AnswerResponse::from_parts(answer, None)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/answers/{id}",
    params(("id" = i32, Path, description = "Answer ID")),
    request_body = UpdateAnswerRequest,
    responses(
        (status = 200, description = "Answer updated", body = AnswerResponse),
        (status = 400, description = "Missing content", body = AppError),
        (status = 404, description = "Answer not found", body = AppError),
    ),
    tag = "answers"
)]
pub async fn update_answer(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAnswerRequest>,
) -> AppResult<impl IntoResponse> {
    let content = payload
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Answer content is required".to_string()))?;

    let service = AnswerService::new(db);
    let answer = service.update_content(id, &content).await?;

    Ok(ApiResponse::ok(AnswerResponse::from_parts(answer, None)))
}

#[utoipa::path(
    delete,
    path = "/api/answers/{id}",
    params(("id" = i32, Path, description = "Answer ID")),
    responses(
        (status = 200, description = "Answer soft-deleted", body = String),
        (status = 404, description = "Answer not found", body = AppError),
    ),
    tag = "answers"
)]
pub async fn delete_answer(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = AnswerService::new(db);
    service.soft_delete(id).await?;
    Ok(ApiResponse::ok("Answer deleted"))
}
