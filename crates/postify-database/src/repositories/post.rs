//! Post and like repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use postify_core::error::{AppError, ErrorKind};
use postify_core::result::AppResult;
use postify_entity::post::{Post, PostWithAuthor};

/// Joined projection shared by every post read.
const POST_WITH_AUTHOR: &str = "\
    SELECT p.id, p.author_id, p.content, p.created_at, p.updated_at, \
           u.username AS author_username, \
           u.profile_picture AS author_profile_picture, \
           ARRAY(SELECT l.user_id FROM post_likes l WHERE l.post_id = p.id ORDER BY l.created_at) AS likes, \
           (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count \
    FROM posts p \
    JOIN users u ON u.id = p.author_id";

/// Repository for posts and their likes.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a bare post row by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find post", e))
    }

    /// Find a post with author, likes and comment count.
    pub async fn find_with_author(&self, id: Uuid) -> AppResult<Option<PostWithAuthor>> {
        sqlx::query_as::<_, PostWithAuthor>(&format!("{POST_WITH_AUTHOR} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find post", e))
    }

    /// List every post, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<PostWithAuthor>> {
        sqlx::query_as::<_, PostWithAuthor>(&format!(
            "{POST_WITH_AUTHOR} ORDER BY p.created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list posts", e))
    }

    /// List posts by one author, newest first.
    pub async fn find_by_author(&self, author_id: Uuid) -> AppResult<Vec<PostWithAuthor>> {
        sqlx::query_as::<_, PostWithAuthor>(&format!(
            "{POST_WITH_AUTHOR} WHERE p.author_id = $1 ORDER BY p.created_at DESC"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list posts by author", e)
        })
    }

    /// Create a new post. `content` must already be normalized.
    pub async fn create(&self, author_id: Uuid, content: &str) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (author_id, content) VALUES ($1, $2) RETURNING *",
        )
        .bind(author_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create post", e))
    }

    /// Replace a post's content.
    pub async fn update_content(&self, id: Uuid, content: &str) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "UPDATE posts SET content = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update post", e))?
        .ok_or_else(|| AppError::not_found("Post not found"))
    }

    /// Delete a post and, by cascade, its likes and comments.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete post", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Toggle `user_id`'s like on a post.
    ///
    /// Returns `true` if the post is now liked.
    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to unlike post", e))?;

        if removed.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to like post", e))?;

        Ok(true)
    }
}
