//! Post entity model.

use chrono::{DateTime, Utc};
use postify_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::user::UserSummary;

/// A post row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Unique post identifier.
    pub id: Uuid,
    /// The author.
    pub author_id: Uuid,
    /// Post body.
    pub content: String,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last edited.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Longest accepted post body, in characters.
    pub const MAX_CONTENT_CHARS: usize = 280;

    /// Trim and check a post body.
    pub fn normalize_content(raw: &str) -> AppResult<String> {
        let content = raw.trim();
        if content.is_empty() {
            return Err(AppError::validation("Post content is required"));
        }
        if content.chars().count() > Self::MAX_CONTENT_CHARS {
            return Err(AppError::validation(format!(
                "Post content must be at most {} characters",
                Self::MAX_CONTENT_CHARS
            )));
        }
        Ok(content.to_string())
    }

    /// Check whether `user_id` wrote this post.
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

/// A post joined with its author, likes and comment count.
#[derive(Debug, Clone, FromRow)]
pub struct PostWithAuthor {
    /// Post ID.
    pub id: Uuid,
    /// Author ID.
    pub author_id: Uuid,
    /// Post body.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last edit time.
    pub updated_at: DateTime<Utc>,
    /// Author username.
    pub author_username: String,
    /// Author profile picture.
    pub author_profile_picture: String,
    /// IDs of users who liked the post.
    pub likes: Vec<Uuid>,
    /// Number of comments.
    pub comment_count: i64,
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    /// Post ID.
    pub id: Uuid,
    /// Post body.
    pub content: String,
    /// Author card.
    pub author: UserSummary,
    /// IDs of users who liked the post.
    pub likes: Vec<Uuid>,
    /// Number of comments.
    pub comment_count: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last edit time.
    pub updated_at: DateTime<Utc>,
}

impl From<PostWithAuthor> for PostView {
    fn from(row: PostWithAuthor) -> Self {
        Self {
            id: row.id,
            content: row.content,
            author: UserSummary {
                id: row.author_id,
                username: row.author_username,
                profile_picture: row.author_profile_picture,
            },
            likes: row.likes,
            comment_count: row.comment_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
