//! Integration tests for the WebSocket presence and relay flow.

mod helpers;

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use http::StatusCode;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use uuid::Uuid;

use helpers::{TestApp, eventually, test_config};

type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn connect(addr: SocketAddr, query: &str) -> Client {
    let (ws, _) = connect_async(format!("ws://{addr}/ws{query}"))
        .await
        .expect("Failed to connect");
    ws
}

async fn send(ws: &mut Client, frame: Value) {
    ws.send(Message::text(frame.to_string()))
        .await
        .expect("Failed to send frame");
}

async fn next_event(ws: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Stream ended")
            .expect("WebSocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
        }
    }
}

#[tokio::test]
async fn test_announce_relay_and_disconnect() {
    let app = TestApp::offline();
    let addr = app.spawn().await;
    let realtime = app.state.realtime.clone();

    let mut a = connect(addr, "").await;
    let mut b = connect(addr, "").await;
    send(&mut a, json!({"event": "addUser", "data": {"userId": "A1"}})).await;
    send(&mut b, json!({"event": "addUser", "data": "B1"})).await;
    assert!(eventually(|| realtime.registry.is_online("A1") && realtime.registry.is_online("B1")).await);

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["data"]["connections"], 2);
    assert_eq!(health.body["data"]["online_users"], 2);
    assert_eq!(health.body["data"]["realtime"]["connections_active"], 2);
    assert_eq!(health.body["data"]["realtime"]["frames_rejected"], 0);

    send(
        &mut a,
        json!({"event": "sendMessage", "data": {"senderId": "A1", "receiverId": "B1", "text": "hi"}}),
    )
    .await;
    assert_eq!(
        next_event(&mut b).await,
        json!({"event": "getMessage", "data": {"sender": "A1", "text": "hi"}})
    );

    b.close(None).await.expect("Failed to close");
    assert!(eventually(|| !realtime.registry.is_online("B1")).await);

    // Relaying to an offline user is silent; the next frame A sees is the
    // error for the malformed frame that follows.
    send(
        &mut a,
        json!({"event": "sendMessage", "data": {"senderId": "A1", "receiverId": "B1", "text": "still there?"}}),
    )
    .await;
    a.send(Message::text("not json")).await.expect("Failed to send");

    let event = next_event(&mut a).await;
    assert_eq!(event["event"], "error");
    assert_eq!(event["data"]["code"], "INVALID_MESSAGE");
}

#[tokio::test]
async fn test_messages_arrive_in_order() {
    let app = TestApp::offline();
    let addr = app.spawn().await;
    let realtime = app.state.realtime.clone();

    let mut sender = connect(addr, "").await;
    let mut receiver = connect(addr, "").await;
    send(&mut sender, json!({"event": "addUser", "data": {"userId": "S"}})).await;
    send(&mut receiver, json!({"event": "addUser", "data": {"userId": "R"}})).await;
    assert!(eventually(|| realtime.registry.is_online("S") && realtime.registry.is_online("R")).await);

    for text in ["m1", "m2", "m3"] {
        send(
            &mut sender,
            json!({"event": "sendMessage", "data": {"senderId": "S", "receiverId": "R", "text": text}}),
        )
        .await;
    }

    for expected in ["m1", "m2", "m3"] {
        assert_eq!(next_event(&mut receiver).await["data"]["text"], expected);
    }
}

#[tokio::test]
async fn test_unknown_event_is_rejected() {
    let app = TestApp::offline();
    let addr = app.spawn().await;

    let mut ws = connect(addr, "").await;
    send(&mut ws, json!({"event": "dance", "data": {}})).await;

    let event = next_event(&mut ws).await;
    assert_eq!(event["event"], "error");
    assert_eq!(event["data"]["code"], "INVALID_MESSAGE");
}

#[tokio::test]
async fn test_presence_broadcast_when_enabled() {
    let mut config = test_config();
    config.realtime.broadcast_presence = true;
    let app = TestApp::offline_with(config);
    let addr = app.spawn().await;

    let mut ws = connect(addr, "").await;
    send(&mut ws, json!({"event": "addUser", "data": {"userId": "P1"}})).await;

    let event = next_event(&mut ws).await;
    assert_eq!(event["event"], "getUsers");
    let entries = event["data"].as_array().expect("snapshot is an array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["userId"], "P1");
    assert!(entries[0]["connectionId"].is_string());
}

#[tokio::test]
async fn test_require_auth_binds_identity() {
    let mut config = test_config();
    config.realtime.require_auth = true;
    let app = TestApp::offline_with(config);
    let addr = app.spawn().await;
    let realtime = app.state.realtime.clone();

    assert!(connect_async(format!("ws://{addr}/ws")).await.is_err());
    assert!(connect_async(format!("ws://{addr}/ws?token=garbage")).await.is_err());

    let user_id = Uuid::new_v4();
    let token = app.token_for(user_id, "verified");
    let mut ws = connect(addr, &format!("?token={token}")).await;

    send(&mut ws, json!({"event": "addUser", "data": {"userId": "someone-else"}})).await;
    let event = next_event(&mut ws).await;
    assert_eq!(event["data"]["code"], "FORBIDDEN");
    assert!(!realtime.registry.is_online("someone-else"));

    let me = user_id.to_string();
    send(&mut ws, json!({"event": "addUser", "data": {"userId": me}})).await;
    assert!(eventually(|| realtime.registry.is_online(&me)).await);

    send(
        &mut ws,
        json!({"event": "sendMessage", "data": {"senderId": "spoofed", "receiverId": me, "text": "hi"}}),
    )
    .await;
    let event = next_event(&mut ws).await;
    assert_eq!(event["data"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_shutdown_closes_sockets() {
    let app = TestApp::offline();
    let addr = app.spawn().await;
    let realtime = app.state.realtime.clone();

    let mut ws = connect(addr, "").await;
    send(&mut ws, json!({"event": "addUser", "data": {"userId": "Z"}})).await;
    assert!(eventually(|| realtime.registry.is_online("Z")).await);

    realtime.shutdown();

    let closed = tokio::time::timeout(Duration::from_secs(3), async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(closed.is_ok(), "socket stayed open after shutdown");
    assert!(!realtime.registry.is_online("Z"));
    assert_eq!(realtime.gateway.connection_count(), 0);
}

#[tokio::test]
#[ignore = "requires POSTIFY_TEST_DATABASE_URL"]
async fn test_http_send_is_pushed_to_live_receiver() {
    let app = TestApp::new().await;
    let addr = app.spawn().await;
    let realtime = app.state.realtime.clone();

    let (alice_id, _, alice_token) = app.register("alice").await;
    let (bob_id, _, _) = app.register("bob").await;
    let bob_key = bob_id.to_string();

    let mut bob = connect(addr, "").await;
    send(&mut bob, json!({"event": "addUser", "data": {"userId": bob_key}})).await;
    assert!(eventually(|| realtime.registry.is_online(&bob_key)).await);

    let sent = app
        .request(
            "POST",
            &format!("/api/messages/send/{bob_id}"),
            Some(json!({ "message": "live hello" })),
            Some(&alice_token),
        )
        .await;
    assert_eq!(sent.status, StatusCode::CREATED);

    assert_eq!(
        next_event(&mut bob).await,
        json!({"event": "getMessage", "data": {"sender": alice_id.to_string(), "text": "live hello"}})
    );
}
