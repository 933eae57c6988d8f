//! Image generation handler.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::dto::request::GenerateImageRequest;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/generate
pub async fn generate_image(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<GenerateImageRequest>,
) -> Result<Response, ApiError> {
    tracing::info!(user_id = %auth.user_id, "Image generation requested");

    let image = state.generation_service.generate(&req.prompt).await?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], image).into_response())
}
