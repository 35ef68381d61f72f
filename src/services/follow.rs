use crate::{
    error::{on_unique_violation, AppError, AppResult},
    models::{user, user_follower, User, UserFollower},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Statement, TransactionTrait,
};
use std::collections::{HashMap, HashSet};

pub struct FollowService {
    db: DatabaseConnection,
}

impl FollowService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// For a viewer and a set of candidate author ids, return the subset the
    /// viewer actually follows. Skips the query entirely when there are no
    /// candidates.
    pub async fn followed_subset(
        &self,
        follower_id: i32,
        candidate_ids: &[i32],
    ) -> AppResult<HashSet<i32>> {
        let unique: Vec<i32> = candidate_ids
            .iter()
            .copied()
            .collect::<HashSet<i32>>()
            .into_iter()
            .collect();

        if unique.is_empty() {
            return Ok(HashSet::new());
        }

        let edges = UserFollower::find()
            .filter(user_follower::Column::FollowerId.eq(follower_id))
            .filter(user_follower::Column::UserId.is_in(unique))
            .all(&self.db)
            .await?;

        Ok(edges.into_iter().map(|e| e.user_id).collect())
    }

    /// Everyone the given user follows.
    pub async fn followee_ids(&self, follower_id: i32) -> AppResult<Vec<i32>> {
        let edges = UserFollower::find()
            .filter(user_follower::Column::FollowerId.eq(follower_id))
            .all(&self.db)
            .await?;

        Ok(edges.into_iter().map(|e| e.user_id).collect())
    }

    /// Create a follow edge and bump the followed user's counter. The checks
    /// run in a fixed order: self-follow, existence, duplicate edge. Edge
    /// insert and counter increment share one transaction; a concurrent
    /// duplicate that slips past the pre-check loses on the unique index.
    pub async fn follow(&self, followed_id: i32, follower_id: i32) -> AppResult<()> {
        if followed_id == follower_id {
            return Err(AppError::SelfFollow);
        }

        self.require_users(followed_id, follower_id).await?;

        let existing = UserFollower::find()
            .filter(user_follower::Column::UserId.eq(followed_id))
            .filter(user_follower::Column::FollowerId.eq(follower_id))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(AppError::AlreadyFollowing);
        }

        let txn = self.db.begin().await?;

        let now = chrono::Utc::now().naive_utc();
        let edge = user_follower::ActiveModel {
            user_id: sea_orm::ActiveValue::Set(followed_id),
            follower_id: sea_orm::ActiveValue::Set(follower_id),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };
        edge.insert(&txn)
            .await
            .map_err(|e| on_unique_violation(e, AppError::AlreadyFollowing))?;

        txn.execute(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "UPDATE users SET followers = followers + 1 WHERE id = $1",
            [followed_id.into()],
        ))
        .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Remove a follow edge and decrement the counter. Mirrors `follow`.
    pub async fn unfollow(&self, followed_id: i32, follower_id: i32) -> AppResult<()> {
        if followed_id == follower_id {
            return Err(AppError::SelfFollow);
        }

        self.require_users(followed_id, follower_id).await?;

        let existing = UserFollower::find()
            .filter(user_follower::Column::UserId.eq(followed_id))
            .filter(user_follower::Column::FollowerId.eq(follower_id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFollowing)?;

        let txn = self.db.begin().await?;

        UserFollower::delete_by_id(existing.id).exec(&txn).await?;

        txn.execute(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "UPDATE users SET followers = GREATEST(followers - 1, 0) WHERE id = $1",
            [followed_id.into()],
        ))
        .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Display names of everyone following the given user.
    pub async fn follower_names(&self, user_id: i32) -> AppResult<Vec<String>> {
        let edges = UserFollower::find()
            .filter(user_follower::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;

        let follower_ids: Vec<i32> = edges.iter().map(|e| e.follower_id).collect();
        if follower_ids.is_empty() {
            return Ok(vec![]);
        }

        let users = User::find()
            .filter(user::Column::Id.is_in(follower_ids.clone()))
            .all(&self.db)
            .await?;

        // Reorder to match edge order
        let name_map: HashMap<i32, String> =
            users.into_iter().map(|u| (u.id, u.name)).collect();
        let ordered: Vec<String> = follower_ids
            .into_iter()
            .filter_map(|id| name_map.get(&id).cloned())
            .collect();

        Ok(ordered)
    }

    async fn require_users(&self, followed_id: i32, follower_id: i32) -> AppResult<()> {
        User::find_by_id(followed_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        User::find_by_id(follower_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        Ok(())
    }
}
