//! Post, like and comment handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use postify_entity::post::{CommentView, PostView};

use crate::dto::request::{CreateCommentRequest, CreatePostRequest, UpdatePostRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_uuid};
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PostView>>>, ApiError> {
    let posts = state.post_service.list_posts().await?;
    Ok(Json(ApiResponse::ok(posts)))
}

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostView>>), ApiError> {
    let post = state.post_service.create_post(&auth, &req.content).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(post))))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<ApiResponse<PostView>>, ApiError> {
    let post_id = parse_uuid(&id)?;
    let post = state
        .post_service
        .update_post(&auth, post_id, req.content.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let post_id = parse_uuid(&id)?;
    state.post_service.delete_post(&auth, post_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Post removed"))))
}

/// PUT /api/posts/{id}/like
pub async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PostView>>, ApiError> {
    let post_id = parse_uuid(&id)?;
    let post = state.post_service.toggle_like(&auth, post_id).await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentView>>), ApiError> {
    let post_id = parse_uuid(&id)?;
    let comment = state
        .post_service
        .add_comment(&auth, post_id, &req.text)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(comment))))
}

/// GET /api/posts/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<CommentView>>>, ApiError> {
    let post_id = parse_uuid(&id)?;
    let comments = state.post_service.list_comments(post_id).await?;
    Ok(Json(ApiResponse::ok(comments)))
}
