//! Form repository for database operations.
//!
//! Every owner-scoped query filters on `user_id` in SQL, so a form that
//! belongs to someone else looks exactly like a missing one.

use domain::models::Question;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::entities::FormEntity;
use crate::metrics::QueryTimer;

/// Aggregate counts for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct FormStats {
    pub total_forms: i64,
    pub total_submissions: i64,
}

/// Repository for form-related database operations.
#[derive(Clone)]
pub struct FormRepository {
    pool: PgPool,
}

impl FormRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        description: Option<&str>,
        questions: &[Question],
    ) -> Result<FormEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_form");
        let result = sqlx::query_as::<_, FormEntity>(
            r#"
            INSERT INTO forms (user_id, title, description, questions, is_public)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING id, user_id, title, description, questions, is_public, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(Json(questions))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a form regardless of owner.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FormEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_form_by_id");
        let result = sqlx::query_as::<_, FormEntity>(
            r#"
            SELECT id, user_id, title, description, questions, is_public, created_at
            FROM forms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a form only if `user_id` owns it.
    pub async fn find_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<FormEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_owned_form");
        let result = sqlx::query_as::<_, FormEntity>(
            r#"
            SELECT id, user_id, title, description, questions, is_public, created_at
            FROM forms
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// A user's forms, newest first.
    ///
    /// `title_pattern` is an `ILIKE` pattern (see
    /// `shared::validation::like_contains_pattern`). `limit = None` returns
    /// every row.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        title_pattern: Option<&str>,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<FormEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_forms_for_user");
        let result = sqlx::query_as::<_, FormEntity>(
            r#"
            SELECT id, user_id, title, description, questions, is_public, created_at
            FROM forms
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR title ILIKE $2)
            ORDER BY created_at DESC, id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(title_pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Row count matching [`Self::list_for_user`] without paging.
    pub async fn count_for_user(
        &self,
        user_id: Uuid,
        title_pattern: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_forms_for_user");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM forms
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR title ILIKE $2)
            "#,
        )
        .bind(user_id)
        .bind(title_pattern)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace title, description and questions. `is_public = None` keeps the
    /// current visibility. Returns `None` when the form is missing or not owned.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        title: &str,
        description: Option<&str>,
        questions: &[Question],
        is_public: Option<bool>,
    ) -> Result<Option<FormEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_form");
        let result = sqlx::query_as::<_, FormEntity>(
            r#"
            UPDATE forms
            SET title = $3,
                description = $4,
                questions = $5,
                is_public = COALESCE($6, is_public)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, questions, is_public, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(Json(questions))
        .bind(is_public)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an owned form. Submissions go with it via `ON DELETE CASCADE`.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_form");
        let result = sqlx::query("DELETE FROM forms WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Form and submission totals for one owner in a single round trip.
    pub async fn stats_for_user(&self, user_id: Uuid) -> Result<FormStats, sqlx::Error> {
        let timer = QueryTimer::new("form_stats_for_user");
        let result = sqlx::query_as::<_, FormStats>(
            r#"
            SELECT COUNT(DISTINCT f.id) AS total_forms,
                   COUNT(s.id) AS total_submissions
            FROM forms f
            LEFT JOIN submissions s ON s.form_id = f.id
            WHERE f.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
