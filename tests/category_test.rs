mod common;

use serde_json::Value;

#[tokio::test]
async fn create_category_returns_generated_id() {
    let app = common::spawn_app().await;
    let (_id, token, _) = common::create_test_user(&app, "catmaker").await;
    let name = format!("Tech_{}", common::unique_suffix());

    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": name, "description": "desc" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["id"].as_i64().is_some());
    assert_eq!(body["data"]["name"], name.as_str());
    assert_eq!(body["data"]["status"], "active");
}

#[tokio::test]
async fn missing_fields_get_specific_messages() {
    let app = common::spawn_app().await;
    let (_id, token, _) = common::create_test_user(&app, "catvalidator").await;

    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "description": "desc" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("name is required"));

    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "Science" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("description is required"));
}

#[tokio::test]
async fn duplicate_name_rejected_on_create_and_update() {
    let app = common::spawn_app().await;
    let (_id, token, _) = common::create_test_user(&app, "catdupe").await;
    let name = format!("History_{}", common::unique_suffix());

    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": name, "description": "first" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    // Same name on the create path
    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": name, "description": "second" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    // Same name on the update path of another category
    let other_id = common::create_test_category(&app, &token).await;
    let resp = app
        .client
        .put(app.url(&format!("/categories/{}", other_id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn soft_deleted_category_stays_addressable() {
    let app = common::spawn_app().await;
    let (_id, token, _) = common::create_test_user(&app, "catdeleter").await;
    let category_id = common::create_test_category(&app, &token).await;

    let resp = app
        .client
        .delete(app.url(&format!("/categories/{}", category_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/categories/{}", category_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "inactive");
}

#[tokio::test]
async fn category_mutation_requires_token() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/categories"))
        .json(&serde_json::json!({ "name": "NoAuth", "description": "desc" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}
