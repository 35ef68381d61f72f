mod common;

use serde_json::Value;

#[tokio::test]
async fn create_post_validates_required_fields() {
    let app = common::spawn_app().await;
    let (_id, token, _) = common::create_test_user(&app, "postvalidator").await;
    let category_id = common::create_test_category(&app, &token).await;

    // Missing category
    let resp = app
        .client
        .post(app.url("/posts"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "A valid title",
            "content": "Some content"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("category is required"));

    // Missing title
    let resp = app
        .client
        .post(app.url("/posts"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "content": "Some content",
            "category": category_id
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // All fields present
    let resp = app
        .client
        .post(app.url("/posts"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "A valid title",
            "content": "Some content",
            "category": category_id
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["title"], "A valid title");
    assert!(body["data"]["id"].as_i64().is_some());
}

#[tokio::test]
async fn feed_paginates_with_exact_totals() {
    let app = common::spawn_app().await;
    let (_id, token, _) = common::create_test_user(&app, "paginator").await;
    let category_id = common::create_test_category(&app, &token).await;

    for i in 0..3 {
        common::create_test_post(&app, &token, category_id, &format!("Pagination post {}", i))
            .await;
    }

    let resp = app
        .client
        .get(app.url(&format!(
            "/posts?category={}&page=1&limit=2",
            category_id
        )))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let page = &body["data"];
    assert_eq!(page["current_page"], 1);
    assert_eq!(page["total_items"], 3);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);

    let resp = app
        .client
        .get(app.url(&format!(
            "/posts?category={}&page=2&limit=2",
            category_id
        )))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn feed_is_sorted_newest_first_and_expands_refs() {
    let app = common::spawn_app().await;
    let (_id, token, author_name) = common::create_test_user(&app, "feedauthor").await;
    let category_id = common::create_test_category(&app, &token).await;

    common::create_test_post(&app, &token, category_id, "First question").await;
    let second = common::create_test_post(&app, &token, category_id, "Second question").await;

    let resp = app
        .client
        .get(app.url(&format!("/posts?category={}", category_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"].as_i64().unwrap() as i32, second);
    assert_eq!(items[0]["author"]["name"], author_name.as_str());
    assert!(items[0]["category"]["name"].as_str().is_some());
}

#[tokio::test]
async fn following_filter_with_no_followees_short_circuits() {
    let app = common::spawn_app().await;
    let (viewer_id, _, _) = common::create_test_user(&app, "lonelyviewer").await;

    let resp = app
        .client
        .get(app.url(&format!(
            "/posts?following=true&user={}&page=3",
            viewer_id
        )))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let page = &body["data"];
    assert_eq!(page["current_page"], 3);
    assert_eq!(page["total_pages"], 0);
    assert_eq!(page["total_items"], 0);
    assert_eq!(page["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn following_filter_restricts_to_followed_authors() {
    let app = common::spawn_app().await;
    let (author_id, author_token, _) = common::create_test_user(&app, "followedauthor").await;
    let (_other_id, other_token, _) = common::create_test_user(&app, "ignoredauthor").await;
    let (viewer_id, _, _) = common::create_test_user(&app, "pickyviewer").await;
    let category_id = common::create_test_category(&app, &author_token).await;

    common::create_test_post(&app, &author_token, category_id, "Post by followed").await;
    common::create_test_post(&app, &other_token, category_id, "Post by other").await;

    // Viewer follows only the first author
    let resp = app
        .client
        .put(app.url(&format!("/users/{}/follow", author_id)))
        .json(&serde_json::json!({ "user_id": viewer_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!(
            "/posts?category={}&following=true&user={}",
            category_id, viewer_id
        )))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["author"]["id"].as_i64().unwrap() as i32, author_id);
    assert_eq!(items[0]["author"]["is_followed"], true);
}

#[tokio::test]
async fn anonymous_viewer_sees_no_followed_authors() {
    let app = common::spawn_app().await;
    let (_id, token, _) = common::create_test_user(&app, "anonauthor").await;
    let category_id = common::create_test_category(&app, &token).await;
    common::create_test_post(&app, &token, category_id, "Anonymously viewed").await;

    let resp = app
        .client
        .get(app.url(&format!("/posts?category={}", category_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    for item in body["data"]["items"].as_array().unwrap() {
        assert_eq!(item["author"]["is_followed"], false);
    }
}

#[tokio::test]
async fn content_search_matches_title_or_body_case_insensitively() {
    let app = common::spawn_app().await;
    let (_id, token, _) = common::create_test_user(&app, "searcher").await;
    let category_id = common::create_test_category(&app, &token).await;
    let needle = common::unique_suffix();

    common::create_test_post(
        &app,
        &token,
        category_id,
        &format!("Question about {}", needle.to_uppercase()),
    )
    .await;
    common::create_test_post(&app, &token, category_id, "Unrelated question").await;

    let resp = app
        .client
        .get(app.url(&format!(
            "/posts?category={}&content={}",
            category_id, needle
        )))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0]["title"]
        .as_str()
        .unwrap()
        .contains(&needle.to_uppercase()));
}

#[tokio::test]
async fn soft_deleted_post_leaves_feed_but_stays_addressable() {
    let app = common::spawn_app().await;
    let (_id, token, _) = common::create_test_user(&app, "postdeleter").await;
    let category_id = common::create_test_category(&app, &token).await;
    let post_id = common::create_test_post(&app, &token, category_id, "Doomed question").await;

    let resp = app
        .client
        .delete(app.url(&format!("/posts/{}", post_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Excluded from the active-only feed
    let resp = app
        .client
        .get(app.url(&format!("/posts?category={}", category_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["total_items"], 0);

    // Still readable by id
    let resp = app
        .client
        .get(app.url(&format!("/posts/{}", post_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "inactive");
}

#[tokio::test]
async fn get_missing_post_is_not_found() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .get(app.url("/posts/-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
