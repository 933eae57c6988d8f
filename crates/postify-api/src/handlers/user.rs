//! Account, profile and follow handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use postify_entity::user::{PublicUser, UpdateProfile};
use postify_service::user::{RegisterInput, UserProfile};

use crate::dto::request::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::dto::response::{AccountResponse, ApiResponse, AuthResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_uuid};
use crate::state::AppState;

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let registered = state
        .auth_service
        .register(RegisterInput {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(AuthResponse::from(registered))),
    ))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let authenticated = state.auth_service.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(AuthResponse::from(authenticated))))
}

/// GET /api/users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(ApiResponse::ok(AccountResponse::from(user))))
}

/// PUT /api/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let update = UpdateProfile::from_optional(req.bio, req.profile_picture);
    let user = state.user_service.update_profile(&auth, update).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// GET /api/users/profile/{username}
pub async fn profile_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.user_service.profile_by_username(&username).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let user_id = parse_uuid(&id)?;
    let profile = state.user_service.profile_by_id(user_id).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// POST /api/users/{id}/follow
pub async fn toggle_follow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let target_id = parse_uuid(&id)?;
    let outcome = state.user_service.toggle_follow(&auth, target_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(outcome.message()))))
}
