//! Post feed, authoring, likes and comments.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use postify_core::error::AppError;
use postify_database::repositories::{CommentRepository, PostRepository};
use postify_entity::post::{CommentView, Post, PostView};

use crate::context::RequestContext;

/// Handles post and comment operations.
#[derive(Debug, Clone)]
pub struct PostService {
    post_repo: Arc<PostRepository>,
    comment_repo: Arc<CommentRepository>,
}

impl PostService {
    /// Creates a new post service.
    pub fn new(post_repo: Arc<PostRepository>, comment_repo: Arc<CommentRepository>) -> Self {
        Self {
            post_repo,
            comment_repo,
        }
    }

    /// Every post, newest first.
    pub async fn list_posts(&self) -> Result<Vec<PostView>, AppError> {
        Ok(self
            .post_repo
            .find_all()
            .await?
            .into_iter()
            .map(PostView::from)
            .collect())
    }

    /// Publishes a new post by the caller.
    pub async fn create_post(
        &self,
        ctx: &RequestContext,
        content: &str,
    ) -> Result<PostView, AppError> {
        let content = Post::normalize_content(content)?;
        let post = self.post_repo.create(ctx.user_id, &content).await?;

        info!(post_id = %post.id, author_id = %ctx.user_id, "Post created");

        self.view(post.id).await
    }

    /// Edits the caller's post. Absent or blank content keeps the current text.
    pub async fn update_post(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        content: Option<&str>,
    ) -> Result<PostView, AppError> {
        let post = self.owned_post(ctx, post_id).await?;

        if let Some(raw) = content.filter(|c| !c.trim().is_empty()) {
            let content = Post::normalize_content(raw)?;
            self.post_repo.update_content(post.id, &content).await?;
            info!(post_id = %post.id, "Post updated");
        }

        self.view(post.id).await
    }

    /// Deletes the caller's post.
    pub async fn delete_post(&self, ctx: &RequestContext, post_id: Uuid) -> Result<(), AppError> {
        let post = self.owned_post(ctx, post_id).await?;

        if !self.post_repo.delete(post.id).await? {
            return Err(AppError::not_found("Post not found"));
        }

        info!(post_id = %post.id, "Post removed");
        Ok(())
    }

    /// Likes the post, or removes the caller's like.
    pub async fn toggle_like(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
    ) -> Result<PostView, AppError> {
        if self.post_repo.find_by_id(post_id).await?.is_none() {
            return Err(AppError::not_found("Post not found"));
        }

        let liked = self.post_repo.toggle_like(post_id, ctx.user_id).await?;
        info!(post_id = %post_id, user_id = %ctx.user_id, liked, "Like toggled");

        self.view(post_id).await
    }

    /// Adds a comment by the caller.
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        text: &str,
    ) -> Result<CommentView, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Comment text is required"));
        }
        if self.post_repo.find_by_id(post_id).await?.is_none() {
            return Err(AppError::not_found("Post not found"));
        }

        let comment = self.comment_repo.create(post_id, ctx.user_id, text).await?;

        info!(comment_id = %comment.id, post_id = %post_id, "Comment added");

        self.comment_repo
            .find_with_author(comment.id)
            .await?
            .map(CommentView::from)
            .ok_or_else(|| AppError::not_found("Comment not found"))
    }

    /// A post's comments, newest first.
    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentView>, AppError> {
        if self.post_repo.find_by_id(post_id).await?.is_none() {
            return Err(AppError::not_found("Post not found"));
        }

        Ok(self
            .comment_repo
            .find_by_post(post_id)
            .await?
            .into_iter()
            .map(CommentView::from)
            .collect())
    }

    async fn owned_post(&self, ctx: &RequestContext, post_id: Uuid) -> Result<Post, AppError> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        if !post.is_authored_by(ctx.user_id) {
            return Err(AppError::authorization("User not authorized"));
        }
        Ok(post)
    }

    async fn view(&self, post_id: Uuid) -> Result<PostView, AppError> {
        self.post_repo
            .find_with_author(post_id)
            .await?
            .map(PostView::from)
            .ok_or_else(|| AppError::not_found("Post not found"))
    }
}
