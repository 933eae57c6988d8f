//! WebSocket upgrade handler.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use postify_realtime::connection::authenticator::AuthenticatedConnection;

use crate::error::ApiError;
use crate::state::AppState;

/// How long the forwarder may keep flushing after the socket loop ends.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// Query parameters for the WebSocket upgrade.
#[derive(Debug, Default, serde::Deserialize)]
pub struct WsQuery {
    /// JWT, required only when `realtime.require_auth` is set.
    pub token: Option<String>,
}

/// GET /ws, optionally `?token={jwt}`
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let auth = if state.realtime.config().require_auth {
        Some(state.ws_authenticator.authenticate(query.token.as_deref())?)
    } else {
        None
    };

    Ok(ws
        .max_message_size(state.realtime.config().max_message_bytes.saturating_mul(2))
        .on_upgrade(move |socket| handle_ws_connection(state, auth, socket)))
}

/// Drives one established socket until the peer leaves or the server stops.
async fn handle_ws_connection(
    state: AppState,
    auth: Option<AuthenticatedConnection>,
    socket: WebSocket,
) {
    let engine = Arc::clone(&state.realtime);
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (conn_id, mut outbound_rx) = engine.gateway.open(auth.as_ref());
    let mut shutdown_rx = engine.shutdown_receiver();

    info!(
        conn_id = %conn_id,
        user_id = auth.as_ref().map(|a| a.user_id.as_str()),
        "WebSocket connection established"
    );

    // The queue closes when the gateway drops the connection, which ends this task.
    let mut outbound_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!(conn_id = %conn_id, error = %e, "Failed to encode outbound event");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                return;
            }
        }
        let _ = ws_tx.send(Message::Close(None)).await;
    });

    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    engine.handle_inbound(conn_id, text.as_str());
                }
                Some(Ok(Message::Binary(_))) => {
                    debug!(conn_id = %conn_id, "Ignoring binary frame");
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            },
            _ = shutdown_rx.recv() => {
                debug!(conn_id = %conn_id, "Server shutting down");
                break;
            }
        }
    }

    engine.gateway.close(conn_id);
    if tokio::time::timeout(FLUSH_TIMEOUT, &mut outbound_task)
        .await
        .is_err()
    {
        outbound_task.abort();
    }

    info!(conn_id = %conn_id, "WebSocket connection closed");
}
