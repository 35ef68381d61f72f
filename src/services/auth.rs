use crate::{
    error::{on_unique_violation, AppError, AppResult},
    models::{user, User, UserModel, STATUS_ACTIVE},
    utils::{encode_token, hash_password, verify_password},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a new user. Email uniqueness is the unique index's job; a
    /// duplicate surfaces as a conflict.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<UserModel> {
        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().naive_utc();

        let new_user = user::ActiveModel {
            name: sea_orm::ActiveValue::Set(name.to_string()),
            email: sea_orm::ActiveValue::Set(email.to_string()),
            password_hash: sea_orm::ActiveValue::Set(password_hash),
            profile_picture: sea_orm::ActiveValue::Set(user::DEFAULT_PROFILE_PICTURE.to_string()),
            role: sea_orm::ActiveValue::Set(user::ROLE_USER.to_string()),
            status: sea_orm::ActiveValue::Set(STATUS_ACTIVE.to_string()),
            ban_end_date: sea_orm::ActiveValue::Set(None),
            followers: sea_orm::ActiveValue::Set(0),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let user = new_user.insert(&self.db).await.map_err(|e| {
            on_unique_violation(
                e,
                AppError::Conflict("That email address is already registered".to_string()),
            )
        })?;

        Ok(user)
    }

    /// Login with email + password. An unknown email is a 404, a wrong
    /// password a 400. Returns the user and a one-hour token carrying
    /// `{id, name}`.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(UserModel, String)> {
        let user = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        let is_valid = verify_password(password, &user.password_hash)?;
        if !is_valid {
            return Err(AppError::Validation("Incorrect password".to_string()));
        }

        let token = encode_token(&user.id.to_string(), &user.name)?;

        Ok((user, token))
    }
}
