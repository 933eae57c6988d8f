//! Integration tests for posts, likes and comments.

mod helpers;

use http::StatusCode;
use uuid::Uuid;

use helpers::TestApp;

#[tokio::test]
async fn test_create_post_requires_token() {
    let app = TestApp::offline();

    let response = app
        .request(
            "POST",
            "/api/posts",
            Some(serde_json::json!({ "content": "hello" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_post_id_is_rejected() {
    let app = TestApp::offline();
    let token = app.token_for(Uuid::new_v4(), "poster");

    let response = app
        .request(
            "PUT",
            "/api/posts/not-a-uuid",
            Some(serde_json::json!({ "content": "edit" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_post_lifecycle() {
    let app = TestApp::new().await;
    let (author_id, author_name, token) = app.register("writer").await;

    let created = app
        .request(
            "POST",
            "/api/posts",
            Some(serde_json::json!({ "content": "  First post!  " })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let post = &created.body["data"];
    assert_eq!(post["content"], "First post!");
    assert_eq!(post["author"]["id"], author_id.to_string());
    assert_eq!(post["author"]["username"], author_name);
    assert_eq!(post["likes"], serde_json::json!([]));
    assert_eq!(post["comment_count"], 0);
    let post_id = post["id"].as_str().unwrap().to_string();

    let listed = app.request("GET", "/api/posts", None, None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert!(
        listed.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p["id"] == post_id.as_str())
    );

    // Absent content keeps the current text.
    let unchanged = app
        .request(
            "PUT",
            &format!("/api/posts/{post_id}"),
            Some(serde_json::json!({})),
            Some(&token),
        )
        .await;
    assert_eq!(unchanged.status, StatusCode::OK);
    assert_eq!(unchanged.body["data"]["content"], "First post!");

    let edited = app
        .request(
            "PUT",
            &format!("/api/posts/{post_id}"),
            Some(serde_json::json!({ "content": "Edited" })),
            Some(&token),
        )
        .await;
    assert_eq!(edited.body["data"]["content"], "Edited");

    let removed = app
        .request("DELETE", &format!("/api/posts/{post_id}"), None, Some(&token))
        .await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(removed.body["data"]["message"], "Post removed");

    let gone = app
        .request("DELETE", &format!("/api/posts/{post_id}"), None, Some(&token))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_post_content_rules() {
    let app = TestApp::new().await;
    let (_, _, token) = app.register("rules").await;

    let empty = app
        .request(
            "POST",
            "/api/posts",
            Some(serde_json::json!({ "content": "   " })),
            Some(&token),
        )
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let too_long = app
        .request(
            "POST",
            "/api/posts",
            Some(serde_json::json!({ "content": "x".repeat(281) })),
            Some(&token),
        )
        .await;
    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_only_author_can_edit() {
    let app = TestApp::new().await;
    let (_, _, owner_token) = app.register("owner").await;
    let (_, _, other_token) = app.register("intruder").await;

    let created = app
        .request(
            "POST",
            "/api/posts",
            Some(serde_json::json!({ "content": "mine" })),
            Some(&owner_token),
        )
        .await;
    let post_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let edit = app
        .request(
            "PUT",
            &format!("/api/posts/{post_id}"),
            Some(serde_json::json!({ "content": "theirs" })),
            Some(&other_token),
        )
        .await;
    assert_eq!(edit.status, StatusCode::FORBIDDEN);
    assert_eq!(edit.body["message"], "User not authorized");

    let delete = app
        .request("DELETE", &format!("/api/posts/{post_id}"), None, Some(&other_token))
        .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let missing = app
        .request(
            "PUT",
            &format!("/api/posts/{}", Uuid::new_v4()),
            Some(serde_json::json!({ "content": "x" })),
            Some(&owner_token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_like_toggle_and_comments() {
    let app = TestApp::new().await;
    let (_, _, author_token) = app.register("author").await;
    let (fan_id, fan_name, fan_token) = app.register("fan").await;

    let created = app
        .request(
            "POST",
            "/api/posts",
            Some(serde_json::json!({ "content": "like me" })),
            Some(&author_token),
        )
        .await;
    let post_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let liked = app
        .request("PUT", &format!("/api/posts/{post_id}/like"), None, Some(&fan_token))
        .await;
    assert_eq!(liked.status, StatusCode::OK);
    assert_eq!(
        liked.body["data"]["likes"],
        serde_json::json!([fan_id.to_string()])
    );

    let unliked = app
        .request("PUT", &format!("/api/posts/{post_id}/like"), None, Some(&fan_token))
        .await;
    assert_eq!(unliked.body["data"]["likes"], serde_json::json!([]));

    let blank = app
        .request(
            "POST",
            &format!("/api/posts/{post_id}/comments"),
            Some(serde_json::json!({ "text": " " })),
            Some(&fan_token),
        )
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    for text in ["first", "second"] {
        let comment = app
            .request(
                "POST",
                &format!("/api/posts/{post_id}/comments"),
                Some(serde_json::json!({ "text": text })),
                Some(&fan_token),
            )
            .await;
        assert_eq!(comment.status, StatusCode::CREATED);
        assert_eq!(comment.body["data"]["author"]["username"], fan_name);
    }

    let comments = app
        .request("GET", &format!("/api/posts/{post_id}/comments"), None, None)
        .await;
    let texts: Vec<&str> = comments.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["second", "first"]);

    let orphan = app
        .request(
            "POST",
            &format!("/api/posts/{}/comments", Uuid::new_v4()),
            Some(serde_json::json!({ "text": "hello?" })),
            Some(&fan_token),
        )
        .await;
    assert_eq!(orphan.status, StatusCode::NOT_FOUND);
}
