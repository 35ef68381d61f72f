use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, AuthUser};
use crate::models::{post, PostModel};
use crate::response::{ApiResponse, NamedRef, PaginatedResponse};
use crate::services::category::CategoryService;
use crate::services::feed::{FeedService, PostFeedItem, PostFilter};
use crate::services::post::PostService;
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
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Category ID
    pub category: Option<i32>,
    /// Stored-image URLs from prior uploads
    pub multimedia: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<i32>,
    pub is_resolved: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PostListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Case-insensitive search over title and content
    pub content: Option<String>,
    /// Filter by category ID
    pub category: Option<i32>,
    /// Restrict to authors the viewer follows
    pub following: Option<bool>,
    /// Viewer user ID; enables follow annotation
    pub user: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub multimedia: Option<post::Multimedia>,
    pub is_resolved: bool,
    pub views: i32,
    pub likes: i32,
    pub total_answers: i32,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub author: Option<NamedRef>,
    pub category: Option<NamedRef>,
}

impl PostResponse {
    fn from_parts(
        p: PostModel,
        author: Option<NamedRef>,
        category: Option<NamedRef>,
    ) -> Self {
        Self {
            id: p.id,
            title: p.title,
            content: p.content,
            multimedia: p.multimedia,
            is_resolved: p.is_resolved,
            views: p.views,
            likes: p.likes,
            total_answers: p.total_answers,
            status: p.status,
            created_at: p.created_at.to_string(),
            updated_at: p.updated_at.to_string(),
            author,
            category,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Items per page"),
        ("content" = Option<String>, Query, description = "Search over title and content"),
        ("category" = Option<i32>, Query, description = "Filter by category"),
        ("following" = Option<bool>, Query, description = "Only posts by followed authors"),
        ("user" = Option<i32>, Query, description = "Viewer user ID"),
    ),
    responses(
        (status = 200, description = "Post feed", body = PaginatedResponse<PostFeedItem>),
    ),
    tag = "posts"
)]
pub async fn list_posts(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<PostListQuery>,
) -> AppResult<impl IntoResponse> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).max(1);

    let filter = PostFilter {
        content: params.content,
        category: params.category,
        following: params.following.unwrap_or(false),
    };

    let service = FeedService::new(db);
    let (items, total) = service
        .list_posts(&filter, page, limit, params.user)
        .await?;

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, limit,
    )))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post details (including soft-deleted)", body = PostResponse),
        (status = 404, description = "Post not found", body = AppError),
    ),
    tag = "posts"
)]
pub async fn get_post(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = PostService::new(db.clone());
    service.increment_views(id).await?;
    let post = service.get_by_id(id).await?;

    let author = UserService::new(db.clone())
        .get_by_id(post.author_id)
        .await
        .ok()
        .map(|u| NamedRef {
            id: u.id,
            name: u.name,
        });
    let category = CategoryService::new(db)
        .get_by_id(post.category_id)
        .await
        .ok()
        .map(|c| NamedRef {
            id: c.id,
            name: c.name,
        });

    Ok(ApiResponse::ok(PostResponse::from_parts(
        post, author, category,
    )))
}

#[utoipa::path(
    get,
    path = "/api/posts/user/{user_id}",
    params(("user_id" = i32, Path, description = "Author user ID")),
    responses(
        (status = 200, description = "The author's active posts", body = Vec<PostFeedItem>),
    ),
    tag = "posts"
)]
pub async fn get_posts_by_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(user_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = FeedService::new(db);
    let posts = service.list_posts_by_author(user_id).await?;
    Ok(ApiResponse::ok(posts))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    security(("jwt_token" = [])),
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Missing required field", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "posts"
)]
pub async fn create_post(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> AppResult<impl IntoResponse> {
    let title = payload
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Post title is required".to_string()))?;
    let content = payload
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Post content is required".to_string()))?;
    let category = payload
        .category
        .ok_or_else(|| AppError::Validation("Post category is required".to_string()))?;

    if title.len() < 5 || title.len() > 100 {
        return Err(AppError::Validation(
            "Post title must be 5-100 characters".to_string(),
        ));
    }

    let author_id = parse_user_id(&auth_user)?;
    let multimedia = payload.multimedia.map(post::Multimedia);

    let service = PostService::new(db);
    let post = service
        .create(author_id, category, &title, &content, multimedia)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(PostResponse::from_parts(post, None, None)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Missing required field", body = AppError),
        (status = 404, description = "Post not found", body = AppError),
    ),
    tag = "posts"
)]
pub async fn update_post(
    Extension(db): Extension<DatabaseConnection>,
    _auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePostRequest>,
) -> AppResult<impl IntoResponse> {
    let title = payload
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Post title is required".to_string()))?;
    let content = payload
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Post content is required".to_string()))?;

    let service = PostService::new(db);
    let post = service
        .update(id, &title, &content, payload.category, payload.is_resolved)
        .await?;

    Ok(ApiResponse::ok(PostResponse::from_parts(post, None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post soft-deleted", body = String),
        (status = 404, description = "Post not found", body = AppError),
    ),
    tag = "posts"
)]
pub async fn delete_post(
    Extension(db): Extension<DatabaseConnection>,
    _auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = PostService::new(db);
    service.soft_delete(id).await?;
    Ok(ApiResponse::ok("Post deleted"))
}
