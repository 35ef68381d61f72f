use crate::error::{AppError, AppResult};
use crate::middleware::auth::{require_moderator, AuthUser};
use crate::models::{ReportModel, UserModel};
use crate::response::{ApiResponse, NamedRef, PaginatedResponse};
use crate::services::report::{ReportService, ReportTarget};
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
pub struct CreateReportRequest {
    pub reason: Option<String>,
    /// Reporter user ID
    pub reporter: Option<i32>,
    /// Reported post (exactly one of post/answer)
    pub post: Option<i32>,
    /// Reported answer (exactly one of post/answer)
    pub answer: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReportRequest {
    /// One of: pending, checked, sanctioned
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Filter by status
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub id: i32,
    pub reason: String,
    pub reporter: Option<NamedRef>,
    pub target_type: String,
    pub target_id: i32,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ReportResponse {
    fn from_parts(r: ReportModel, reporter: Option<UserModel>) -> Self {
        Self {
            id: r.id,
            reason: r.reason,
            reporter: reporter.map(|u| NamedRef {
                id: u.id,
                name: u.name,
            }),
            target_type: r.target_type,
            target_id: r.target_id,
            status: r.status,
            created_at: r.created_at.to_string(),
            updated_at: r.updated_at.to_string(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report created", body = ReportResponse),
        (status = 400, description = "Missing fields or ambiguous target", body = AppError),
        (status = 404, description = "Referenced entity not found", body = AppError),
    ),
    tag = "reports"
)]
pub async fn create_report(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateReportRequest>,
) -> AppResult<impl IntoResponse> {
    let (reason, reporter) = match (payload.reason, payload.reporter) {
        (Some(reason), Some(reporter)) if !reason.trim().is_empty() => (reason, reporter),
        _ => {
            return Err(AppError::Validation(
                "Reason and reporter are required".to_string(),
            ))
        }
    };

    let target = ReportTarget::from_parts(payload.post, payload.answer)?;

    let service = ReportService::new(db);
    let report = service.create(reporter, &reason, target).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(ReportResponse::from_parts(report, None)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/reports",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Filter by status"),
    ),
    responses(
        (status = 200, description = "Reports, newest first", body = PaginatedResponse<ReportResponse>),
    ),
    tag = "reports"
)]
pub async fn list_reports(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<ReportListQuery>,
) -> AppResult<impl IntoResponse> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).max(1);

    let service = ReportService::new(db);
    let (reports, total) = service
        .list(params.status.as_deref(), page, limit)
        .await?;
    let items: Vec<ReportResponse> = reports
        .into_iter()
        .map(|(r, u)| ReportResponse::from_parts(r, u))
        .collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, limit,
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(("id" = i32, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report details", body = ReportResponse),
        (status = 404, description = "Report not found", body = AppError),
    ),
    tag = "reports"
)]
pub async fn get_report(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = ReportService::new(db);
    let (report, reporter) = service.get_by_id(id).await?;
    Ok(ApiResponse::ok(ReportResponse::from_parts(report, reporter)))
}

#[utoipa::path(
    put,
    path = "/api/reports/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Report ID")),
    request_body = UpdateReportRequest,
    responses(
        (status = 200, description = "Report status updated", body = ReportResponse),
        (status = 400, description = "Missing or invalid status", body = AppError),
        (status = 403, description = "Moderator only", body = AppError),
        (status = 404, description = "Report not found", body = AppError),
    ),
    tag = "reports"
)]
pub async fn update_report(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateReportRequest>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;

    let status = payload
        .status
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Status is required".to_string()))?;

    let service = ReportService::new(db);
    let report = service.update_status(id, &status).await?;

    Ok(ApiResponse::ok(ReportResponse::from_parts(report, None)))
}
