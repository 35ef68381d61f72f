use sea_orm_migration::prelude::*;

mod m20250115_000001_create_users_table;
mod m20250115_000002_create_categories_table;
mod m20250115_000003_create_posts_table;
mod m20250115_000004_create_answers_table;
mod m20250115_000005_create_ratings_table;
mod m20250115_000006_create_user_followers_table;
mod m20250115_000007_create_reports_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250115_000001_create_users_table::Migration),
            Box::new(m20250115_000002_create_categories_table::Migration),
            Box::new(m20250115_000003_create_posts_table::Migration),
            Box::new(m20250115_000004_create_answers_table::Migration),
            Box::new(m20250115_000005_create_ratings_table::Migration),
            Box::new(m20250115_000006_create_user_followers_table::Migration),
            Box::new(m20250115_000007_create_reports_table::Migration),
        ]
    }
}
