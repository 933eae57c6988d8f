//! Integration tests for registration, login, profiles and follows.

mod helpers;

use http::StatusCode;
use uuid::Uuid;

use helpers::{PASSWORD, TestApp, unique};

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::offline();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["connections"], 0);
    assert_eq!(response.body["data"]["online_users"], 0);
    assert_eq!(response.body["data"]["realtime"]["connections_total"], 0);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = TestApp::offline();

    let response = app
        .request(
            "POST",
            "/api/users/register",
            Some(serde_json::json!({
                "username": "alice",
                "email": "not-an-email",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(response.body["message"], "Please include a valid email");
}

#[tokio::test]
async fn test_register_rejects_short_username() {
    let app = TestApp::offline();

    let response = app
        .request(
            "POST",
            "/api/users/register",
            Some(serde_json::json!({
                "username": "al",
                "email": "al@test.com",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = TestApp::offline();

    let response = app
        .request("POST", "/api/users/login", Some(serde_json::json!([1, 2])), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = TestApp::offline();

    let response = app.request("GET", "/api/users/profile", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");

    let response = app
        .request("GET", "/api/users/profile", None, Some("garbage"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_generate_requires_prompt() {
    let app = TestApp::offline();
    let token = app.token_for(Uuid::new_v4(), "painter");

    let response = app
        .request(
            "POST",
            "/api/generate",
            Some(serde_json::json!({ "prompt": "   " })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Prompt is required");
}

#[tokio::test]
async fn test_generate_unreachable_upstream_is_internal_error() {
    let app = TestApp::offline();
    let token = app.token_for(Uuid::new_v4(), "painter");

    let response = app
        .request(
            "POST",
            "/api/generate",
            Some(serde_json::json!({ "prompt": "a lighthouse at dusk" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], "Failed to generate image");
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_register_and_login() {
    let app = TestApp::new().await;
    let (id, username, token) = app.register("alice").await;
    assert!(!token.is_empty());

    let response = app
        .request(
            "POST",
            "/api/users/login",
            Some(serde_json::json!({
                "email": format!("{username}@test.com"),
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], id.to_string());
    assert_eq!(response.body["data"]["username"], username);
    assert!(response.body["data"]["token"].is_string());
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_login_invalid_password() {
    let app = TestApp::new().await;
    let (_, username, _) = app.register("bob").await;

    let response = app
        .request(
            "POST",
            "/api/users/login",
            Some(serde_json::json!({
                "email": format!("{username}@test.com"),
                "password": "wrong-password-entirely",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid email or password");

    let response = app
        .request(
            "POST",
            "/api/users/login",
            Some(serde_json::json!({
                "email": "nobody-here@test.com",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid email or password");
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_duplicate_registration_conflicts() {
    let app = TestApp::new().await;
    let (_, username, _) = app.register("carol").await;

    let same_email = app
        .request(
            "POST",
            "/api/users/register",
            Some(serde_json::json!({
                "username": unique("other"),
                "email": format!("{username}@test.com"),
                "password": PASSWORD,
            })),
            None,
        )
        .await;
    assert_eq!(same_email.status, StatusCode::CONFLICT);

    let same_username = app
        .request(
            "POST",
            "/api/users/register",
            Some(serde_json::json!({
                "username": username,
                "email": format!("{}@test.com", unique("fresh")),
                "password": PASSWORD,
            })),
            None,
        )
        .await;
    assert_eq!(same_username.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_weak_password_is_rejected() {
    let app = TestApp::new().await;
    let username = unique("weak");

    let response = app
        .request(
            "POST",
            "/api/users/register",
            Some(serde_json::json!({
                "username": username,
                "email": format!("{username}@test.com"),
                "password": "password",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_profile_update_and_public_views() {
    let app = TestApp::new().await;
    let (id, username, token) = app.register("dave").await;

    let me = app
        .request("GET", "/api/users/profile", None, Some(&token))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["username"], username);
    assert!(me.body["data"].get("password_hash").is_none());

    let updated = app
        .request(
            "PUT",
            "/api/users/profile",
            Some(serde_json::json!({
                "bio": "Hello there",
                "profilePicture": "https://img.example/dave.png",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["bio"], "Hello there");

    // Blank fields keep the stored values.
    let kept = app
        .request(
            "PUT",
            "/api/users/profile",
            Some(serde_json::json!({ "bio": "", "profilePicture": null })),
            Some(&token),
        )
        .await;
    assert_eq!(kept.body["data"]["bio"], "Hello there");
    assert_eq!(kept.body["data"]["profilePicture"], "https://img.example/dave.png");

    let by_name = app
        .request("GET", &format!("/api/users/profile/{username}"), None, None)
        .await;
    assert_eq!(by_name.status, StatusCode::OK);
    assert_eq!(by_name.body["data"]["user"]["id"], id.to_string());
    assert!(by_name.body["data"]["user"]["followers"].is_array());
    assert!(by_name.body["data"]["posts"].is_array());
    assert!(by_name.body["data"]["user"].get("password_hash").is_none());

    let by_id = app
        .request("GET", &format!("/api/users/{id}"), None, None)
        .await;
    assert_eq!(by_id.status, StatusCode::OK);
    assert_eq!(by_id.body["data"]["user"]["username"], username);

    let missing = app
        .request("GET", &format!("/api/users/{}", Uuid::new_v4()), None, None)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_follow_toggle() {
    let app = TestApp::new().await;
    let (erin_id, _, erin_token) = app.register("erin").await;
    let (frank_id, _, _) = app.register("frank").await;

    let follow = app
        .request(
            "POST",
            &format!("/api/users/{frank_id}/follow"),
            None,
            Some(&erin_token),
        )
        .await;
    assert_eq!(follow.status, StatusCode::OK);
    assert_eq!(follow.body["data"]["message"], "User followed");

    let frank = app
        .request("GET", &format!("/api/users/{frank_id}"), None, None)
        .await;
    assert_eq!(
        frank.body["data"]["user"]["followers"],
        serde_json::json!([erin_id.to_string()])
    );

    let unfollow = app
        .request(
            "POST",
            &format!("/api/users/{frank_id}/follow"),
            None,
            Some(&erin_token),
        )
        .await;
    assert_eq!(unfollow.body["data"]["message"], "User unfollowed");

    let myself = app
        .request(
            "POST",
            &format!("/api/users/{erin_id}/follow"),
            None,
            Some(&erin_token),
        )
        .await;
    assert_eq!(myself.status, StatusCode::BAD_REQUEST);
    assert_eq!(myself.body["message"], "You cannot follow yourself");

    let ghost = app
        .request(
            "POST",
            &format!("/api/users/{}/follow", Uuid::new_v4()),
            None,
            Some(&erin_token),
        )
        .await;
    assert_eq!(ghost.status, StatusCode::NOT_FOUND);
}
