//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use postify_auth::jwt::{JwtDecoder, JwtEncoder};
use postify_auth::password::{PasswordHasher, PasswordValidator};
use postify_core::config::AppConfig;
use postify_core::error::AppError;
use postify_database::DatabasePool;
use postify_database::repositories::{
    CommentRepository, ConversationRepository, FollowRepository, MessageRepository,
    PostRepository, UserRepository,
};
use postify_realtime::RealtimeEngine;
use postify_realtime::connection::authenticator::WsAuthenticator;
use postify_service::{
    AuthService, ImageGenerationService, MessageService, PostService, UserService,
};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Database pool.
    pub db: DatabasePool,
    /// Bearer token validation.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Upgrade-token validation for `/ws`.
    pub ws_authenticator: Arc<WsAuthenticator>,
    /// Presence registry, gateway and relay.
    pub realtime: Arc<RealtimeEngine>,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub post_service: Arc<PostService>,
    pub message_service: Arc<MessageService>,
    pub generation_service: Arc<ImageGenerationService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("realtime", &self.realtime)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires repositories, auth, services and the realtime engine.
    pub fn new(config: AppConfig, db: DatabasePool) -> Result<Self, AppError> {
        let pool = db.pool().clone();

        // Repositories
        let user_repo = Arc::new(UserRepository::new(pool.clone()));
        let follow_repo = Arc::new(FollowRepository::new(pool.clone()));
        let post_repo = Arc::new(PostRepository::new(pool.clone()));
        let comment_repo = Arc::new(CommentRepository::new(pool.clone()));
        let conversation_repo = Arc::new(ConversationRepository::new(pool.clone()));
        let message_repo = Arc::new(MessageRepository::new(pool));

        // Auth
        let password_hasher = Arc::new(PasswordHasher::new());
        let password_validator = Arc::new(PasswordValidator::new(&config.auth));
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let ws_authenticator = Arc::new(WsAuthenticator::new(Arc::clone(&jwt_decoder)));

        // Services
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&user_repo),
            password_hasher,
            password_validator,
            jwt_encoder,
        ));
        let user_service = Arc::new(UserService::new(
            Arc::clone(&user_repo),
            follow_repo,
            Arc::clone(&post_repo),
        ));
        let post_service = Arc::new(PostService::new(post_repo, comment_repo));
        let message_service = Arc::new(MessageService::new(
            conversation_repo,
            message_repo,
            user_repo,
        ));
        let generation_service = Arc::new(ImageGenerationService::new(&config.generation)?);

        // Realtime
        let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));

        Ok(Self {
            config: Arc::new(config),
            db,
            jwt_decoder,
            ws_authenticator,
            realtime,
            auth_service,
            user_service,
            post_service,
            message_service,
            generation_service,
        })
    }
}
