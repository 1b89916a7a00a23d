//! Authentication service for registration and login.

use std::sync::Arc;

use domain::models::User;
use persistence::repositories::UserRepository;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::{non_blank, normalize_email};
use sqlx::PgPool;
use thiserror::Error;

use crate::config::JwtAuthConfig;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// A signed-in user plus a fresh access token.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

/// Builds the RS256 signer/verifier from configured PEM keys.
pub fn jwt_config_from(config: &JwtAuthConfig) -> Result<JwtConfig, JwtError> {
    let private_key = normalize_pem_key(&config.private_key);
    let public_key = normalize_pem_key(&config.public_key);

    JwtConfig::new(
        &private_key,
        &public_key,
        config.access_token_expiry_secs,
        config.leeway_secs,
    )
}

/// PEM keys passed through env files often arrive quoted with literal `\n`.
fn normalize_pem_key(key: &str) -> String {
    key.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .replace("\\n", "\n")
}

/// Authentication service.
pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Register a new user with email and password.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: Option<&str>,
    ) -> Result<AuthResult, AuthError> {
        let email = normalize_email(email);
        let username = non_blank(username);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(password)?;

        let entity = match self
            .users
            .create_user(&email, username.as_deref(), &password_hash)
            .await
        {
            Ok(entity) => entity,
            // Lost a race with a concurrent registration for the same email.
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                return Err(AuthError::EmailAlreadyExists);
            }
            Err(e) => return Err(e.into()),
        };

        let user: User = entity.into();
        tracing::info!(user_id = %user.id, "User registered");
        self.issue(user)
    }

    /// Login with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let email = normalize_email(email);

        let user: User = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?
            .into();

        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue(user)
    }

    fn issue(&self, user: User) -> Result<AuthResult, AuthError> {
        let (access_token, _jti) = self.jwt.generate_access_token(user.id)?;
        Ok(AuthResult {
            user,
            access_token,
            expires_in: self.jwt.access_token_expiry_secs,
        })
    }
}
