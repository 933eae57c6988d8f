//! Route definitions for the Postify HTTP API.
//!
//! REST routes are mounted under `/api`; the WebSocket upgrade lives at `/ws`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with every route, the body limit and request logging.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    let api_routes = Router::new()
        .merge(user_routes())
        .merge(post_routes())
        .merge(message_routes())
        .merge(generation_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(handlers::user::register))
        .route("/users/login", post(handlers::user::login))
        .route(
            "/users/profile",
            get(handlers::user::get_profile).put(handlers::user::update_profile),
        )
        .route(
            "/users/profile/{username}",
            get(handlers::user::profile_by_username),
        )
        .route("/users/{id}", get(handlers::user::get_user))
        .route("/users/{id}/follow", post(handlers::user::toggle_follow))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/posts",
            get(handlers::post::list_posts).post(handlers::post::create_post),
        )
        .route(
            "/posts/{id}",
            put(handlers::post::update_post).delete(handlers::post::delete_post),
        )
        .route("/posts/{id}/like", put(handlers::post::toggle_like))
        .route(
            "/posts/{id}/comments",
            get(handlers::post::list_comments).post(handlers::post::add_comment),
        )
}

fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(handlers::message::list_conversations))
        .route("/messages/{other_id}", get(handlers::message::get_messages))
        .route(
            "/messages/send/{receiver_id}",
            post(handlers::message::send_message),
        )
}

fn generation_routes() -> Router<AppState> {
    Router::new().route("/generate", post(handlers::generation::generate_image))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
