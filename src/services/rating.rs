use crate::{
    error::{AppError, AppResult},
    models::{answer, rating, Answer, Rating, RatingModel, User, UserModel},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Statement, TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;

pub struct RatingService {
    db: DatabaseConnection,
}

/// Projection of an answer's rating aggregate after an upsert.
#[derive(Debug, Serialize, ToSchema)]
pub struct RatingSummary {
    pub answer_id: i32,
    pub qualification: f64,
    pub total_ratings: i32,
}

impl RatingService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Upsert the (author, answer) rating, then recompute the answer's mean
    /// and count from scratch by re-reading every rating for that answer.
    /// Full recomputation favors correctness over speed at realistic rating
    /// volumes.
    pub async fn upsert(
        &self,
        author_id: i32,
        answer_id: i32,
        qualification: f64,
    ) -> AppResult<RatingSummary> {
        Answer::find_by_id(answer_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Answer"))?;
        User::find_by_id(author_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        let txn = self.db.begin().await?;

        txn.execute(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "INSERT INTO ratings (author_id, answer_id, qualification, created_at, updated_at)
             VALUES ($1, $2, $3, NOW(), NOW())
             ON CONFLICT (author_id, answer_id)
             DO UPDATE SET qualification = EXCLUDED.qualification, updated_at = NOW()",
            vec![author_id.into(), answer_id.into(), qualification.into()],
        ))
        .await?;

        let ratings = Rating::find()
            .filter(rating::Column::AnswerId.eq(answer_id))
            .all(&txn)
            .await?;
        let values: Vec<f64> = ratings.iter().map(|r| r.qualification).collect();
        let (mean, count) = mean_and_count(&values);

        let existing = Answer::find_by_id(answer_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("Answer"))?;
        let mut active: answer::ActiveModel = existing.into();
        active.qualification = sea_orm::ActiveValue::Set(mean);
        active.total_ratings = sea_orm::ActiveValue::Set(count);
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());
        active.update(&txn).await?;

        txn.commit().await?;

        Ok(RatingSummary {
            answer_id,
            qualification: mean,
            total_ratings: count,
        })
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<(RatingModel, Option<UserModel>)> {
        Rating::find_by_id(id)
            .find_also_related(User)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Rating"))
    }

    pub async fn list_by_answer(
        &self,
        answer_id: i32,
    ) -> AppResult<Vec<(RatingModel, Option<UserModel>)>> {
        let ratings = Rating::find()
            .filter(rating::Column::AnswerId.eq(answer_id))
            .find_also_related(User)
            .all(&self.db)
            .await?;
        Ok(ratings)
    }
}

/// Arithmetic mean and count of a rating set; an answer with no ratings
/// reads as (0, 0).
pub(crate) fn mean_and_count(values: &[f64]) -> (f64, i32) {
    if values.is_empty() {
        (0.0, 0)
    } else {
        let sum: f64 = values.iter().sum();
        (sum / values.len() as f64, values.len() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::mean_and_count;

    #[test]
    fn empty_set_is_zero() {
        assert_eq!(mean_and_count(&[]), (0.0, 0));
    }

    #[test]
    fn single_rating_is_its_own_mean() {
        assert_eq!(mean_and_count(&[4.0]), (4.0, 1));
    }

    #[test]
    fn mean_is_exact() {
        let (mean, count) = mean_and_count(&[5.0, 3.0, 4.0]);
        assert_eq!(mean, 4.0);
        assert_eq!(count, 3);
    }

    #[test]
    fn fractional_mean_is_not_rounded() {
        let (mean, count) = mean_and_count(&[5.0, 4.0]);
        assert_eq!(mean, 4.5);
        assert_eq!(count, 2);
    }

    #[test]
    fn overwrite_not_append() {
        // Re-rating replaces the old value: the set is {3}, never {5, 3}.
        let (mean, count) = mean_and_count(&[3.0]);
        assert_eq!(mean, 3.0);
        assert_eq!(count, 1);
    }
}
