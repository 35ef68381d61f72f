use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use crate::middleware::auth::auth_middleware;
use axum::{middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    Router::new().nest("/api", api_routes())
}

fn api_routes() -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    let auth = auth_routes(&rate_limit_config);
    let public = public_routes(&rate_limit_config);
    let protected =
        protected_routes(&rate_limit_config).layer(middleware::from_fn(auth_middleware));

    auth.merge(public).merge(protected)
}

/// Registration and login.
fn auth_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new().route(
        "/auth",
        routing::post(handlers::register).put(handlers::login),
    );

    with_optional_rate_limit(router, config.enabled, config.auth)
}

/// Everything that requires no token: reads plus the caller-identified
/// writes (answers, ratings, reports, follow edges).
fn public_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Users
        .route("/users/{id}", routing::get(handlers::user::get_user))
        .route(
            "/users/{id}/followers",
            routing::get(handlers::user::list_followers),
        )
        .route(
            "/users/{id}/follow",
            routing::put(handlers::user::follow_user),
        )
        .route(
            "/users/{id}/unfollow",
            routing::put(handlers::user::unfollow_user),
        )
        // Categories
        .route(
            "/categories",
            routing::get(handlers::category::list_categories),
        )
        .route(
            "/categories/{id}",
            routing::get(handlers::category::get_category),
        )
        // Posts
        .route("/posts", routing::get(handlers::post::list_posts))
        .route("/posts/{id}", routing::get(handlers::post::get_post))
        .route(
            "/posts/user/{user_id}",
            routing::get(handlers::post::get_posts_by_user),
        )
        // Answers
        .route(
            "/answers",
            routing::post(handlers::answer::create_answer),
        )
        .route(
            "/answers/{id}",
            routing::get(handlers::answer::get_answer)
                .put(handlers::answer::update_answer)
                .delete(handlers::answer::delete_answer),
        )
        .route(
            "/answers/post/{post_id}",
            routing::get(handlers::answer::list_answers_by_post),
        )
        .route(
            "/answers/answer/{answer_id}",
            routing::get(handlers::answer::list_replies),
        )
        // Ratings
        .route("/ratings", routing::post(handlers::rating::upsert_rating))
        .route("/ratings/{id}", routing::get(handlers::rating::get_rating))
        .route(
            "/ratings/answer/{answer_id}",
            routing::get(handlers::rating::list_ratings_by_answer),
        )
        // Reports
        .route(
            "/reports",
            routing::get(handlers::report::list_reports)
                .post(handlers::report::create_report),
        )
        .route(
            "/reports/{id}",
            routing::get(handlers::report::get_report),
        );

    with_optional_rate_limit(router, config.enabled, config.public)
}

/// Token-guarded mutations: category and post writes, user profile writes,
/// report moderation.
fn protected_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Users
        .route("/users/{id}", routing::put(handlers::user::update_user))
        .route(
            "/users/{id}/disable",
            routing::put(handlers::user::disable_user),
        )
        .route(
            "/users/{id}/password",
            routing::put(handlers::user::update_password),
        )
        .route(
            "/users/{id}/profile-picture",
            routing::put(handlers::user::update_profile_picture),
        )
        // Categories
        .route(
            "/categories",
            routing::post(handlers::category::create_category),
        )
        .route(
            "/categories/{id}",
            routing::put(handlers::category::update_category)
                .delete(handlers::category::delete_category),
        )
        // Posts
        .route("/posts", routing::post(handlers::post::create_post))
        .route(
            "/posts/{id}",
            routing::put(handlers::post::update_post).delete(handlers::post::delete_post),
        )
        // Reports (moderator check inside the handler)
        .route(
            "/reports/{id}",
            routing::put(handlers::report::update_report),
        )
        // Uploads
        .route(
            "/uploads/post-image",
            routing::post(handlers::upload::upload_post_image),
        );

    with_optional_rate_limit(router, config.enabled, config.protected)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .expect("Invalid rate limit configuration");

    router.layer(GovernorLayer::new(governor_conf))
}
