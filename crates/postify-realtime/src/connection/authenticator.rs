//! WebSocket authentication. Validates the JWT passed on upgrade.

use std::sync::Arc;

use postify_auth::jwt::JwtDecoder;
use postify_core::error::AppError;

/// Identity proven by the upgrade token.
#[derive(Debug, Clone)]
pub struct AuthenticatedConnection {
    /// User ID (token subject) in its string form.
    pub user_id: String,
    /// Username.
    pub username: String,
}

/// Authenticates WebSocket connections using JWT tokens.
#[derive(Clone)]
pub struct WsAuthenticator {
    decoder: Arc<JwtDecoder>,
}

impl std::fmt::Debug for WsAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsAuthenticator").finish()
    }
}

impl WsAuthenticator {
    /// Creates a new WebSocket authenticator.
    pub fn new(decoder: Arc<JwtDecoder>) -> Self {
        Self { decoder }
    }

    /// Authenticates a connection using a token from the query string.
    pub fn authenticate(&self, token: Option<&str>) -> Result<AuthenticatedConnection, AppError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Missing token"))?;
        let claims = self.decoder.decode(token)?;

        Ok(AuthenticatedConnection {
            user_id: claims.user_id().to_string(),
            username: claims.username,
        })
    }
}
