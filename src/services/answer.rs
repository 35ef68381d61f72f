use crate::{
    error::{AppError, AppResult},
    models::{answer, Answer, AnswerModel, Post, STATUS_ACTIVE, STATUS_INACTIVE},
};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Statement,
    TransactionTrait,
};

/// Where a new answer hangs: directly off a post, or replying to another
/// answer. Exactly one of the two — the ambiguity the wire format allows is
/// rejected before any storage call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerTarget {
    Post(i32),
    ParentAnswer(i32),
}

impl AnswerTarget {
    pub fn from_parts(post: Option<i32>, parent_answer: Option<i32>) -> AppResult<Self> {
        match (post, parent_answer) {
            (Some(post_id), None) => Ok(Self::Post(post_id)),
            (None, Some(answer_id)) => Ok(Self::ParentAnswer(answer_id)),
            (Some(_), Some(_)) => Err(AppError::Validation(
                "An answer cannot reference both a post and a parent answer".to_string(),
            )),
            (None, None) => Err(AppError::Validation(
                "An answer must reference a post or a parent answer".to_string(),
            )),
        }
    }
}

pub struct AnswerService {
    db: DatabaseConnection,
}

impl AnswerService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<AnswerModel> {
        Answer::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Answer"))
    }

    /// Insert the answer and, for post-level answers, bump the post's
    /// denormalized answer count in the same transaction.
    pub async fn create(
        &self,
        author_id: i32,
        content: &str,
        target: AnswerTarget,
    ) -> AppResult<AnswerModel> {
        let (post_id, parent_answer_id) = match target {
            AnswerTarget::Post(post_id) => {
                Post::find_by_id(post_id)
                    .one(&self.db)
                    .await?
                    .ok_or(AppError::NotFound("Post"))?;
                (Some(post_id), None)
            }
            AnswerTarget::ParentAnswer(answer_id) => {
                Answer::find_by_id(answer_id)
                    .one(&self.db)
                    .await?
                    .ok_or(AppError::NotFound("Answer"))?;
                (None, Some(answer_id))
            }
        };

        let now = chrono::Utc::now().naive_utc();
        let new_answer = answer::ActiveModel {
            content: sea_orm::ActiveValue::Set(content.to_string()),
            author_id: sea_orm::ActiveValue::Set(author_id),
            post_id: sea_orm::ActiveValue::Set(post_id),
            parent_answer_id: sea_orm::ActiveValue::Set(parent_answer_id),
            qualification: sea_orm::ActiveValue::Set(0.0),
            total_ratings: sea_orm::ActiveValue::Set(0),
            status: sea_orm::ActiveValue::Set(STATUS_ACTIVE.to_string()),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let txn = self.db.begin().await?;
        let saved = new_answer.insert(&txn).await?;

        if let Some(post_id) = post_id {
            txn.execute(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                "UPDATE posts SET total_answers = total_answers + 1 WHERE id = $1",
                [post_id.into()],
            ))
            .await?;
        }

        txn.commit().await?;
        Ok(saved)
    }

    pub async fn update_content(&self, id: i32, content: &str) -> AppResult<AnswerModel> {
        let existing = self.get_by_id(id).await?;

        let mut active: answer::ActiveModel = existing.into();
        active.content = sea_orm::ActiveValue::Set(content.to_string());
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn soft_delete(&self, id: i32) -> AppResult<AnswerModel> {
        let existing = self.get_by_id(id).await?;

        let mut active: answer::ActiveModel = existing.into();
        active.status = sea_orm::ActiveValue::Set(STATUS_INACTIVE.to_string());
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_target_selected() {
        assert_eq!(
            AnswerTarget::from_parts(Some(3), None).unwrap(),
            AnswerTarget::Post(3)
        );
    }

    #[test]
    fn parent_answer_target_selected() {
        assert_eq!(
            AnswerTarget::from_parts(None, Some(9)).unwrap(),
            AnswerTarget::ParentAnswer(9)
        );
    }

    #[test]
    fn both_references_rejected() {
        assert!(AnswerTarget::from_parts(Some(3), Some(9)).is_err());
    }

    #[test]
    fn neither_reference_rejected() {
        assert!(AnswerTarget::from_parts(None, None).is_err());
    }
}
