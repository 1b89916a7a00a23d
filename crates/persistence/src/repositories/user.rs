//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str = "id, email, username, password_hash, telegram_id, linking_token, \
                            linking_token_created_at, created_at";

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by (normalized) email address.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the user bound to a Telegram chat identity.
    pub async fn find_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_telegram_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users WHERE telegram_id = $1",
            USER_COLUMNS
        ))
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the user holding a pending linking token.
    pub async fn find_by_linking_token(
        &self,
        token: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_linking_token");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users WHERE linking_token = $1",
            USER_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new user account. Email must already be normalized.
    pub async fn create_user(
        &self,
        email: &str,
        username: Option<&str>,
        password_hash: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (email, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Store a fresh linking token, replacing any pending one.
    ///
    /// Returns `false` if the user does not exist.
    pub async fn set_linking_token(&self, user_id: Uuid, token: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("set_linking_token");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET linking_token = $2, linking_token_created_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(token)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Atomically consume a linking token and bind `telegram_id` to its owner.
    ///
    /// The token is matched and cleared in a single statement, so of several
    /// concurrent presentations at most one gets a row back. Tokens issued
    /// before `issued_after` are treated as unknown. A user already bound to
    /// a different chat is never rebound; relinking the same chat is a no-op
    /// that still consumes the token.
    ///
    /// Fails with a unique violation (23505) if `telegram_id` already belongs
    /// to a different user; in that case nothing is changed.
    pub async fn consume_linking_token(
        &self,
        token: &str,
        telegram_id: i64,
        issued_after: Option<DateTime<Utc>>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("consume_linking_token");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users
            SET telegram_id = $2, linking_token = NULL, linking_token_created_at = NULL
            WHERE linking_token = $1
              AND linking_token IS NOT NULL
              AND ($3::TIMESTAMPTZ IS NULL OR linking_token_created_at >= $3)
              AND (telegram_id IS NULL OR telegram_id = $2)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(token)
        .bind(telegram_id)
        .bind(issued_after)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
