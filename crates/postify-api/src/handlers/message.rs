//! Conversation and direct message handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::debug;

use postify_entity::conversation::{ConversationView, Message};

use crate::dto::request::SendMessageRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_uuid};
use crate::state::AppState;

/// GET /api/messages
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ConversationView>>>, ApiError> {
    let conversations = state.message_service.list_conversations(&auth).await?;
    Ok(Json(ApiResponse::ok(conversations)))
}

/// GET /api/messages/{other_user_id}
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(other): Path<String>,
) -> Result<Json<ApiResponse<Vec<Message>>>, ApiError> {
    let other_id = parse_uuid(&other)?;
    let messages = state.message_service.messages_with(&auth, other_id).await?;
    Ok(Json(ApiResponse::ok(messages)))
}

/// POST /api/messages/send/{receiver_id}
///
/// Stores the message, then pushes it to the receiver's live sockets.
/// The push result never affects the response.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(receiver): Path<String>,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Message>>), ApiError> {
    let receiver_id = parse_uuid(&receiver)?;
    let message = state
        .message_service
        .send(&auth, receiver_id, &req.message)
        .await?;

    let report = state.realtime.relay.relay(
        &auth.user_key(),
        &receiver_id.to_string(),
        &message.text,
    );
    debug!(
        message_id = %message.id,
        targeted = report.targeted,
        delivered = report.delivered,
        "Live delivery attempted"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message))))
}
