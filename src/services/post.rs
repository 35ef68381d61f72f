use crate::{
    error::{AppError, AppResult},
    models::{post, Post, PostModel, STATUS_INACTIVE},
};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Statement,
};

pub struct PostService {
    db: DatabaseConnection,
}

impl PostService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetch by id regardless of status; soft-deleted posts stay readable.
    pub async fn get_by_id(&self, id: i32) -> AppResult<PostModel> {
        Post::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Post"))
    }

    pub async fn create(
        &self,
        author_id: i32,
        category_id: i32,
        title: &str,
        content: &str,
        multimedia: Option<post::Multimedia>,
    ) -> AppResult<PostModel> {
        let now = chrono::Utc::now().naive_utc();

        let new_post = post::ActiveModel {
            title: sea_orm::ActiveValue::Set(title.to_string()),
            content: sea_orm::ActiveValue::Set(content.to_string()),
            multimedia: sea_orm::ActiveValue::Set(multimedia),
            author_id: sea_orm::ActiveValue::Set(author_id),
            category_id: sea_orm::ActiveValue::Set(category_id),
            is_resolved: sea_orm::ActiveValue::Set(false),
            views: sea_orm::ActiveValue::Set(0),
            likes: sea_orm::ActiveValue::Set(0),
            total_answers: sea_orm::ActiveValue::Set(0),
            status: sea_orm::ActiveValue::Set(crate::models::STATUS_ACTIVE.to_string()),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let post = new_post.insert(&self.db).await?;
        Ok(post)
    }

    pub async fn update(
        &self,
        id: i32,
        title: &str,
        content: &str,
        category_id: Option<i32>,
        is_resolved: Option<bool>,
    ) -> AppResult<PostModel> {
        let existing = self.get_by_id(id).await?;

        let now = chrono::Utc::now().naive_utc();

        let mut active: post::ActiveModel = existing.into();
        active.title = sea_orm::ActiveValue::Set(title.to_string());
        active.content = sea_orm::ActiveValue::Set(content.to_string());
        if let Some(category_id) = category_id {
            active.category_id = sea_orm::ActiveValue::Set(category_id);
        }
        if let Some(is_resolved) = is_resolved {
            active.is_resolved = sea_orm::ActiveValue::Set(is_resolved);
        }
        active.updated_at = sea_orm::ActiveValue::Set(now);

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Soft delete: flip status to inactive, keep the row addressable.
    pub async fn soft_delete(&self, id: i32) -> AppResult<PostModel> {
        let existing = self.get_by_id(id).await?;

        let mut active: post::ActiveModel = existing.into();
        active.status = sea_orm::ActiveValue::Set(STATUS_INACTIVE.to_string());
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn increment_views(&self, id: i32) -> AppResult<()> {
        self.db
            .execute(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                "UPDATE posts SET views = views + 1 WHERE id = $1",
                [id.into()],
            ))
            .await?;
        Ok(())
    }
}
