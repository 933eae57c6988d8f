//! Conversations and stored direct messages.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use postify_core::error::AppError;
use postify_database::repositories::{ConversationRepository, MessageRepository, UserRepository};
use postify_entity::conversation::{ConversationView, CreateMessage, Message};

use crate::context::RequestContext;

/// Handles conversation listing and message storage.
///
/// Live delivery is not done here; callers hand the stored message to the
/// realtime relay once this service returns.
#[derive(Debug, Clone)]
pub struct MessageService {
    conversation_repo: Arc<ConversationRepository>,
    message_repo: Arc<MessageRepository>,
    user_repo: Arc<UserRepository>,
}

impl MessageService {
    /// Creates a new message service.
    pub fn new(
        conversation_repo: Arc<ConversationRepository>,
        message_repo: Arc<MessageRepository>,
        user_repo: Arc<UserRepository>,
    ) -> Self {
        Self {
            conversation_repo,
            message_repo,
            user_repo,
        }
    }

    /// The caller's conversations, most recently active first.
    pub async fn list_conversations(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<ConversationView>, AppError> {
        Ok(self
            .conversation_repo
            .list_for_user(ctx.user_id)
            .await?
            .into_iter()
            .map(ConversationView::from)
            .collect())
    }

    /// Messages between the caller and `other_id`, oldest first.
    pub async fn messages_with(
        &self,
        ctx: &RequestContext,
        other_id: Uuid,
    ) -> Result<Vec<Message>, AppError> {
        match self
            .conversation_repo
            .find_between(ctx.user_id, other_id)
            .await?
        {
            Some(conversation) => self.message_repo.find_by_conversation(conversation.id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Stores a message from the caller to `receiver_id`, opening the
    /// conversation on first contact.
    pub async fn send(
        &self,
        ctx: &RequestContext,
        receiver_id: Uuid,
        text: &str,
    ) -> Result<Message, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Message text is required"));
        }
        if receiver_id == ctx.user_id {
            return Err(AppError::validation("You cannot message yourself"));
        }
        if !self.user_repo.exists(receiver_id).await? {
            return Err(AppError::not_found("User not found"));
        }

        let conversation = self
            .conversation_repo
            .find_or_create(ctx.user_id, receiver_id)
            .await?;

        let message = self
            .message_repo
            .create(&CreateMessage {
                conversation_id: conversation.id,
                sender_id: ctx.user_id,
                receiver_id,
                text: text.to_string(),
            })
            .await?;

        info!(
            message_id = %message.id,
            conversation_id = %conversation.id,
            sender_id = %ctx.user_id,
            receiver_id = %receiver_id,
            "Message stored"
        );

        Ok(message)
    }
}
