#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Once,
};

static INIT: Once = Once::new();
static MIGRATIONS_RAN: AtomicBool = AtomicBool::new(false);

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        // Tests hammer the API from one address; throttling only adds noise.
        std::env::set_var("RATE_LIMIT_ENABLED", "false");
        let config = questhub::config::jwt::JwtConfig::from_env().unwrap();
        let _ = questhub::utils::jwt::init_jwt_config(config);
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.addr, path)
    }
}

pub async fn spawn_app() -> TestApp {
    init_env();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"));

    let db = sea_orm::Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    // Run migrations only once globally (using atomic bool for thread safety)
    if !MIGRATIONS_RAN.swap(true, Ordering::SeqCst) {
        questhub::migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
    }

    let upload_config = questhub::services::upload::UploadConfig {
        upload_dir: "./test_uploads".to_string(),
    };

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(questhub::routes::create_routes())
        .layer(axum::extract::Extension(db.clone()))
        .layer(axum::extract::Extension(upload_config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    let addr_str = format!("http://{}", addr);
    let client = Client::new();

    TestApp {
        addr: addr_str,
        db,
        client,
    }
}

/// A short unique suffix so concurrent tests (and binaries) never collide on
/// unique columns.
pub fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Register a user and return (user_id, token, name).
pub async fn create_test_user(app: &TestApp, prefix: &str) -> (i32, String, String) {
    let name = format!("{}_{}", prefix, unique_suffix());
    let email = format!("{}@test.com", name);
    let password = "test_password_123";

    let resp = app
        .client
        .post(app.url("/auth"))
        .json(&serde_json::json!({
            "name": name,
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to register user");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap_or_else(|e| {
        panic!(
            "Failed to parse register response for '{}': status={}, error={}",
            name, status, e
        );
    });

    if !body["success"].as_bool().unwrap_or(false) {
        panic!(
            "Failed to register user '{}': status={}, body={}",
            name, status, body
        );
    }

    let user_id = body["data"]["id"]
        .as_i64()
        .unwrap_or_else(|| panic!("Register response missing id: {:?}", body))
        as i32;

    // Login for the one-hour bearer token.
    let resp = app
        .client
        .put(app.url("/auth"))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to login");

    let body: serde_json::Value = resp.json().await.expect("Failed to parse login response");
    let token = body["data"]["token"]
        .as_str()
        .unwrap_or_else(|| panic!("Login response missing token: {:?}", body))
        .to_string();

    (user_id, token, name)
}

/// Create a category and return its id.
pub async fn create_test_category(app: &TestApp, token: &str) -> i32 {
    let name = format!("cat_{}", unique_suffix());

    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "name": name,
            "description": "A test category"
        }))
        .send()
        .await
        .expect("Failed to create category");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse response");

    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to create category: status={}, body={}", status, body);
    }

    body["data"]["id"].as_i64().expect("missing category id") as i32
}

/// Create a post and return its id.
pub async fn create_test_post(app: &TestApp, token: &str, category_id: i32, title: &str) -> i32 {
    let resp = app
        .client
        .post(app.url("/posts"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "title": title,
            "content": "Some question body",
            "category": category_id
        }))
        .send()
        .await
        .expect("Failed to create post");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse response");

    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to create post: status={}, body={}", status, body);
    }

    body["data"]["id"].as_i64().expect("missing post id") as i32
}

/// Create a top-level answer on a post and return its id.
pub async fn create_test_answer(app: &TestApp, author_id: i32, post_id: i32) -> i32 {
    let resp = app
        .client
        .post(app.url("/answers"))
        .json(&serde_json::json!({
            "content": "An answer",
            "author": author_id,
            "post": post_id
        }))
        .send()
        .await
        .expect("Failed to create answer");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse response");

    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to create answer: status={}, body={}", status, body);
    }

    body["data"]["id"].as_i64().expect("missing answer id") as i32
}

/// Promote a user to moderator by directly updating the database.
pub async fn make_moderator(db: &DatabaseConnection, user_id: i32) {
    db.execute(Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Postgres,
        "UPDATE users SET role = 'moderator' WHERE id = $1",
        vec![user_id.into()],
    ))
    .await
    .expect("Failed to make user moderator");
}
