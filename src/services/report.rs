use crate::{
    error::{AppError, AppResult},
    models::{report, Answer, Post, Report, ReportModel, User, UserModel},
};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    ColumnTrait,
};

/// A report points at exactly one thing. Constructing the variant up front
/// replaces the original's "post or answer, whichever is set" convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTarget {
    Post(i32),
    Answer(i32),
}

impl ReportTarget {
    pub fn from_parts(post: Option<i32>, answer: Option<i32>) -> AppResult<Self> {
        match (post, answer) {
            (Some(post_id), None) => Ok(Self::Post(post_id)),
            (None, Some(answer_id)) => Ok(Self::Answer(answer_id)),
            (Some(_), Some(_)) => Err(AppError::Validation(
                "A report cannot reference both a post and an answer".to_string(),
            )),
            (None, None) => Err(AppError::Validation(
                "A report must reference a post or an answer".to_string(),
            )),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Post(_) => "post",
            Self::Answer(_) => "answer",
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Self::Post(id) | Self::Answer(id) => *id,
        }
    }
}

pub struct ReportService {
    db: DatabaseConnection,
}

impl ReportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        reporter_id: i32,
        reason: &str,
        target: ReportTarget,
    ) -> AppResult<ReportModel> {
        User::find_by_id(reporter_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        match target {
            ReportTarget::Post(post_id) => {
                Post::find_by_id(post_id)
                    .one(&self.db)
                    .await?
                    .ok_or(AppError::NotFound("Post"))?;
            }
            ReportTarget::Answer(answer_id) => {
                Answer::find_by_id(answer_id)
                    .one(&self.db)
                    .await?
                    .ok_or(AppError::NotFound("Answer"))?;
            }
        }

        let now = chrono::Utc::now().naive_utc();
        let model = report::ActiveModel {
            reason: sea_orm::ActiveValue::Set(reason.to_string()),
            reporter_id: sea_orm::ActiveValue::Set(reporter_id),
            target_type: sea_orm::ActiveValue::Set(target.type_name().to_string()),
            target_id: sea_orm::ActiveValue::Set(target.id()),
            status: sea_orm::ActiveValue::Set(report::STATUS_PENDING.to_string()),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;
        Ok(saved)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<(ReportModel, Option<UserModel>)> {
        Report::find_by_id(id)
            .find_also_related(User)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Report"))
    }

    pub async fn list(
        &self,
        status: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<(ReportModel, Option<UserModel>)>, u64)> {
        let mut query = Report::find();

        if let Some(status) = status {
            query = query.filter(report::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(report::Column::CreatedAt)
            .find_also_related(User)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let reports = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((reports, total))
    }

    /// Moderation is manual: the only state changes are explicit status
    /// writes, validated against the known set.
    pub async fn update_status(&self, id: i32, status: &str) -> AppResult<ReportModel> {
        if !report::is_valid_status(status) {
            return Err(AppError::Validation(format!(
                "Status must be one of: {}, {}, {}",
                report::STATUS_PENDING,
                report::STATUS_CHECKED,
                report::STATUS_SANCTIONED
            )));
        }

        let existing = Report::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Report"))?;

        let mut active: report::ActiveModel = existing.into();
        active.status = sea_orm::ActiveValue::Set(status.to_string());
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_target_constructed() {
        let target = ReportTarget::from_parts(Some(5), None).unwrap();
        assert_eq!(target, ReportTarget::Post(5));
        assert_eq!(target.type_name(), "post");
        assert_eq!(target.id(), 5);
    }

    #[test]
    fn answer_target_constructed() {
        let target = ReportTarget::from_parts(None, Some(8)).unwrap();
        assert_eq!(target, ReportTarget::Answer(8));
        assert_eq!(target.type_name(), "answer");
    }

    #[test]
    fn both_targets_rejected() {
        assert!(ReportTarget::from_parts(Some(5), Some(8)).is_err());
    }

    #[test]
    fn no_target_rejected() {
        assert!(ReportTarget::from_parts(None, None).is_err());
    }
}
