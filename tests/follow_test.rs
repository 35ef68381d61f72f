mod common;

use serde_json::Value;

async fn follow(app: &common::TestApp, followed_id: i32, follower_id: i32) -> reqwest::Response {
    app.client
        .put(app.url(&format!("/users/{}/follow", followed_id)))
        .json(&serde_json::json!({ "user_id": follower_id }))
        .send()
        .await
        .unwrap()
}

async fn unfollow(app: &common::TestApp, followed_id: i32, follower_id: i32) -> reqwest::Response {
    app.client
        .put(app.url(&format!("/users/{}/unfollow", followed_id)))
        .json(&serde_json::json!({ "user_id": follower_id }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn follow_then_unfollow() {
    let app = common::spawn_app().await;
    let (follower_id, _, follower_name) = common::create_test_user(&app, "follower").await;
    let (target_id, _, _) = common::create_test_user(&app, "target").await;

    let resp = follow(&app, target_id, follower_id).await;
    assert_eq!(resp.status(), 200);

    // Follower shows up by name
    let resp = app
        .client
        .get(app.url(&format!("/users/{}/followers", target_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let followers: Vec<&str> = body["data"]["followers"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(followers, vec![follower_name.as_str()]);

    // Denormalized counter moved with the edge
    let resp = app
        .client
        .get(app.url(&format!("/users/{}", target_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["followers"], 1);

    let resp = unfollow(&app, target_id, follower_id).await;
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/users/{}", target_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["followers"], 0);
}

#[tokio::test]
async fn double_follow_fails() {
    let app = common::spawn_app().await;
    let (follower_id, _, _) = common::create_test_user(&app, "dupfollower").await;
    let (target_id, _, _) = common::create_test_user(&app, "duptarget").await;

    assert_eq!(follow(&app, target_id, follower_id).await.status(), 200);

    let resp = follow(&app, target_id, follower_id).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("already follow"));
}

#[tokio::test]
async fn unfollow_without_follow_fails() {
    let app = common::spawn_app().await;
    let (follower_id, _, _) = common::create_test_user(&app, "stranger").await;
    let (target_id, _, _) = common::create_test_user(&app, "unknown").await;

    let resp = unfollow(&app, target_id, follower_id).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("do not follow"));
}

#[tokio::test]
async fn self_follow_always_fails() {
    let app = common::spawn_app().await;
    let (user_id, _, _) = common::create_test_user(&app, "narcissist").await;

    let resp = follow(&app, user_id, user_id).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("yourself"));

    // Holds even when the id does not exist
    let resp = follow(&app, -1, -1).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn follow_missing_user_is_not_found() {
    let app = common::spawn_app().await;
    let (follower_id, _, _) = common::create_test_user(&app, "orphan").await;

    let resp = follow(&app, -1, follower_id).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn follow_requires_follower_id() {
    let app = common::spawn_app().await;
    let (target_id, _, _) = common::create_test_user(&app, "silent").await;

    let resp = app
        .client
        .put(app.url(&format!("/users/{}/follow", target_id)))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}
