use crate::{
    error::{on_unique_violation, AppError, AppResult},
    models::{category, Category, CategoryModel, STATUS_ACTIVE, STATUS_INACTIVE},
    services::cache::CacheService,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

const CACHE_KEY_CATEGORIES_LIST: &str = "categories:list";
const CACHE_TTL_CATEGORIES: u64 = 300; // 5 minutes

const DUPLICATE_NAME: &str = "A category with that name already exists";

pub struct CategoryService {
    db: DatabaseConnection,
    cache: Option<CacheService>,
}

impl CategoryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, cache: None }
    }

    pub fn with_cache(mut self, cache: CacheService) -> Self {
        self.cache = Some(cache);
        self
    }

    pub async fn list(&self) -> AppResult<Vec<CategoryModel>> {
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache
                .get::<Vec<CategoryModel>>(CACHE_KEY_CATEGORIES_LIST)
                .await
            {
                return Ok(cached);
            }
        }

        let categories = Category::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;

        if let Some(cache) = &self.cache {
            cache
                .set(CACHE_KEY_CATEGORIES_LIST, &categories, CACHE_TTL_CATEGORIES)
                .await;
        }

        Ok(categories)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<CategoryModel> {
        Category::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Category"))
    }

    /// Name uniqueness rides on the unique index; a losing concurrent insert
    /// surfaces as a conflict, not a race past a pre-check.
    pub async fn create(&self, name: &str, description: &str) -> AppResult<CategoryModel> {
        let now = chrono::Utc::now().naive_utc();

        let new_category = category::ActiveModel {
            name: sea_orm::ActiveValue::Set(name.to_string()),
            description: sea_orm::ActiveValue::Set(description.to_string()),
            status: sea_orm::ActiveValue::Set(STATUS_ACTIVE.to_string()),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let category = new_category
            .insert(&self.db)
            .await
            .map_err(|e| on_unique_violation(e, AppError::Conflict(DUPLICATE_NAME.to_string())))?;

        self.invalidate_list_cache().await;
        Ok(category)
    }

    pub async fn update(
        &self,
        id: i32,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<CategoryModel> {
        let existing = self.get_by_id(id).await?;

        let mut active: category::ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = sea_orm::ActiveValue::Set(name);
        }
        if let Some(description) = description {
            active.description = sea_orm::ActiveValue::Set(description);
        }
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| on_unique_violation(e, AppError::Conflict(DUPLICATE_NAME.to_string())))?;

        self.invalidate_list_cache().await;
        Ok(updated)
    }

    pub async fn soft_delete(&self, id: i32) -> AppResult<CategoryModel> {
        let existing = self.get_by_id(id).await?;

        let mut active: category::ActiveModel = existing.into();
        active.status = sea_orm::ActiveValue::Set(STATUS_INACTIVE.to_string());
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        self.invalidate_list_cache().await;
        Ok(updated)
    }

    async fn invalidate_list_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate(CACHE_KEY_CATEGORIES_LIST).await;
        }
    }
}
