use crate::{
    error::{on_unique_violation, AppError, AppResult},
    models::{user, User, UserModel, STATUS_INACTIVE},
    utils::hash_password,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

const DUPLICATE_EMAIL: &str = "That email address is already registered";

pub struct UserService {
    db: DatabaseConnection,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetch by id regardless of status; disabled accounts stay readable.
    pub async fn get_by_id(&self, id: i32) -> AppResult<UserModel> {
        User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    pub async fn update(
        &self,
        id: i32,
        name: Option<String>,
        email: Option<String>,
        role: Option<String>,
    ) -> AppResult<UserModel> {
        if let Some(role) = role.as_deref() {
            if !user::is_valid_role(role) {
                return Err(AppError::Validation(format!("Invalid role '{}'", role)));
            }
        }

        let existing = self.get_by_id(id).await?;

        let mut active: user::ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = sea_orm::ActiveValue::Set(name);
        }
        if let Some(email) = email {
            active.email = sea_orm::ActiveValue::Set(email);
        }
        if let Some(role) = role {
            active.role = sea_orm::ActiveValue::Set(role);
        }
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| on_unique_violation(e, AppError::Conflict(DUPLICATE_EMAIL.to_string())))?;
        Ok(updated)
    }

    /// Ban: flip status to inactive and record when the ban ends. The row is
    /// never hard-deleted.
    pub async fn disable(
        &self,
        id: i32,
        ban_end_date: Option<chrono::NaiveDateTime>,
    ) -> AppResult<UserModel> {
        let existing = self.get_by_id(id).await?;

        let mut active: user::ActiveModel = existing.into();
        active.status = sea_orm::ActiveValue::Set(STATUS_INACTIVE.to_string());
        active.ban_end_date = sea_orm::ActiveValue::Set(ban_end_date);
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn update_password(&self, id: i32, password: &str) -> AppResult<UserModel> {
        let existing = self.get_by_id(id).await?;

        let password_hash = hash_password(password)?;
        let mut active: user::ActiveModel = existing.into();
        active.password_hash = sea_orm::ActiveValue::Set(password_hash);
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Update only the profile picture URL (used by the upload handler).
    pub async fn update_profile_picture(&self, id: i32, url: &str) -> AppResult<UserModel> {
        let existing = self.get_by_id(id).await?;

        let mut active: user::ActiveModel = existing.into();
        active.profile_picture = sea_orm::ActiveValue::Set(url.to_string());
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }
}
