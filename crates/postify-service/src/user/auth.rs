//! Registration and login.

use std::sync::Arc;

use tracing::{info, warn};

use postify_auth::jwt::{IssuedToken, JwtEncoder};
use postify_auth::password::{PasswordHasher, PasswordValidator};
use postify_core::error::AppError;
use postify_database::repositories::user::UserRepository;
use postify_entity::user::{CreateUser, User};

/// Credentials for a new account.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A user together with a freshly issued token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: IssuedToken,
}

/// Handles account creation and credential checks.
#[derive(Debug, Clone)]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
}

/// Returned for any login failure so callers cannot tell which half was wrong.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
            encoder,
        }
    }

    /// Creates an account and signs the user in.
    pub async fn register(&self, input: RegisterInput) -> Result<AuthenticatedUser, AppError> {
        let username = input.username.trim().to_string();
        let email = normalize_email(&input.email);

        self.validator.validate(&input.password)?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }
        if self.user_repo.find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Username '{username}' already exists"
            )));
        }

        let password_hash = self.hasher.hash_password(&input.password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                username,
                email,
                password_hash,
            })
            .await?;

        let token = self.encoder.issue(user.id, &user.username)?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(AuthenticatedUser { user, token })
    }

    /// Checks email and password and issues a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            self.hasher.verify_dummy(password);
            warn!("Login failed: unknown email");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let token = self.encoder.issue(user.id, &user.username)?;

        info!(user_id = %user.id, "User logged in");

        Ok(AuthenticatedUser { user, token })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
