mod common;

use serde_json::Value;

#[tokio::test]
async fn profile_update_requires_token() {
    let app = common::spawn_app().await;
    let (user_id, _, _) = common::create_test_user(&app, "guarded").await;

    let resp = app
        .client
        .put(app.url(&format!("/users/{}", user_id)))
        .json(&serde_json::json!({ "name": "new name" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn profile_fields_update_independently() {
    let app = common::spawn_app().await;
    let (user_id, token, _) = common::create_test_user(&app, "editable").await;
    let new_name = format!("renamed_{}", common::unique_suffix());

    let resp = app
        .client
        .put(app.url(&format!("/users/{}", user_id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": new_name }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], new_name.as_str());
    // Untouched fields survive
    assert_eq!(body["data"]["role"], "user");
}

#[tokio::test]
async fn duplicate_email_on_update_is_rejected() {
    let app = common::spawn_app().await;
    let (_a_id, _a_token, a_name) = common::create_test_user(&app, "emailowner").await;
    let (b_id, b_token, _) = common::create_test_user(&app, "emailthief").await;

    let resp = app
        .client
        .put(app.url(&format!("/users/{}", b_id)))
        .bearer_auth(&b_token)
        .json(&serde_json::json!({ "email": format!("{}@test.com", a_name) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("already registered"));
}

#[tokio::test]
async fn invalid_role_is_rejected() {
    let app = common::spawn_app().await;
    let (user_id, token, _) = common::create_test_user(&app, "rolechanger").await;

    let resp = app
        .client
        .put(app.url(&format!("/users/{}", user_id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "role": "superuser" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn disabled_user_stays_readable_but_loses_access() {
    let app = common::spawn_app().await;
    let (user_id, token, _) = common::create_test_user(&app, "banned").await;

    let resp = app
        .client
        .put(app.url(&format!("/users/{}/disable", user_id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "ban_end_date": "2026-12-31T00:00:00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "inactive");
    assert!(body["data"]["ban_end_date"].as_str().is_some());

    // Still addressable by id
    let resp = app
        .client
        .get(app.url(&format!("/users/{}", user_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // But the token no longer opens protected routes
    let resp = app
        .client
        .put(app.url(&format!("/users/{}", user_id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "still here" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn password_update_takes_effect_on_next_login() {
    let app = common::spawn_app().await;
    let (user_id, token, name) = common::create_test_user(&app, "rotator").await;

    let resp = app
        .client
        .put(app.url(&format!("/users/{}/password", user_id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "password": "a_brand_new_password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Old password no longer works
    let resp = app
        .client
        .put(app.url("/auth"))
        .json(&serde_json::json!({
            "email": format!("{}@test.com", name),
            "password": "test_password_123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // New one does
    let resp = app
        .client
        .put(app.url("/auth"))
        .json(&serde_json::json!({
            "email": format!("{}@test.com", name),
            "password": "a_brand_new_password"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn missing_user_is_not_found() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .get(app.url("/users/-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
