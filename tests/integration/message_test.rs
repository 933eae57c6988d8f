//! Integration tests for conversations and stored direct messages.

mod helpers;

use http::StatusCode;
use uuid::Uuid;

use helpers::TestApp;

#[tokio::test]
async fn test_messages_require_token() {
    let app = TestApp::offline();

    let response = app.request("GET", "/api/messages", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "POST",
            &format!("/api/messages/send/{}", Uuid::new_v4()),
            Some(serde_json::json!({ "message": "hi" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_send_creates_conversation() {
    let app = TestApp::new().await;
    let (alice_id, _, alice_token) = app.register("alice").await;
    let (bob_id, bob_name, bob_token) = app.register("bob").await;

    let empty = app
        .request("GET", &format!("/api/messages/{bob_id}"), None, Some(&alice_token))
        .await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["data"], serde_json::json!([]));

    for text in ["hi bob", "are you there?"] {
        let sent = app
            .request(
                "POST",
                &format!("/api/messages/send/{bob_id}"),
                Some(serde_json::json!({ "message": text })),
                Some(&alice_token),
            )
            .await;
        assert_eq!(sent.status, StatusCode::CREATED);
        assert_eq!(sent.body["data"]["sender_id"], alice_id.to_string());
        assert_eq!(sent.body["data"]["receiver_id"], bob_id.to_string());
        assert_eq!(sent.body["data"]["text"], text);
    }

    // Both sides see the same thread, oldest first.
    let thread = app
        .request("GET", &format!("/api/messages/{alice_id}"), None, Some(&bob_token))
        .await;
    let texts: Vec<&str> = thread.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["hi bob", "are you there?"]);

    let conversations = app
        .request("GET", "/api/messages", None, Some(&alice_token))
        .await;
    assert_eq!(conversations.status, StatusCode::OK);
    let list = conversations.body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["participants"][0]["id"], bob_id.to_string());
    assert_eq!(list[0]["participants"][0]["username"], bob_name);
    assert_eq!(list[0]["last_message"]["text"], "are you there?");
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_send_bumps_conversation_with_the_message() {
    let app = TestApp::new().await;
    let (_, _, token) = app.register("chatty").await;
    let (peer, _, _) = app.register("peer").await;

    for text in ["first", "second"] {
        let sent = app
            .request(
                "POST",
                &format!("/api/messages/send/{peer}"),
                Some(serde_json::json!({ "message": text })),
                Some(&token),
            )
            .await;
        assert_eq!(sent.status, StatusCode::CREATED);
    }

    // The insert and the activity bump share one statement, so one NOW().
    let conversations = app.request("GET", "/api/messages", None, Some(&token)).await;
    let list = conversations.body["data"].as_array().unwrap();
    assert_eq!(list[0]["last_message"]["text"], "second");
    assert_eq!(list[0]["updated_at"], list[0]["last_message"]["created_at"]);
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_send_rejections() {
    let app = TestApp::new().await;
    let (me, _, token) = app.register("lonely").await;
    let (friend, _, _) = app.register("friend").await;

    let to_self = app
        .request(
            "POST",
            &format!("/api/messages/send/{me}"),
            Some(serde_json::json!({ "message": "note to self" })),
            Some(&token),
        )
        .await;
    assert_eq!(to_self.status, StatusCode::BAD_REQUEST);

    let to_nobody = app
        .request(
            "POST",
            &format!("/api/messages/send/{}", Uuid::new_v4()),
            Some(serde_json::json!({ "message": "hello?" })),
            Some(&token),
        )
        .await;
    assert_eq!(to_nobody.status, StatusCode::NOT_FOUND);

    let blank = app
        .request(
            "POST",
            &format!("/api/messages/send/{friend}"),
            Some(serde_json::json!({ "message": "   " })),
            Some(&token),
        )
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}
