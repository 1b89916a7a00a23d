//! Submission repository for database operations.

use domain::models::Answers;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SubmissionEntity;
use crate::metrics::QueryTimer;

/// Repository for form submissions. Rows are insert-only; removal happens
/// through `ON DELETE CASCADE` on the parent form.
#[derive(Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a submission. Answers must already be sanitized against the form.
    pub async fn create(
        &self,
        form_id: Uuid,
        answers: &Answers,
    ) -> Result<SubmissionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_submission");
        let result = sqlx::query_as::<_, SubmissionEntity>(
            r#"
            INSERT INTO submissions (form_id, answers)
            VALUES ($1, $2)
            RETURNING id, form_id, answers, submitted_at
            "#,
        )
        .bind(form_id)
        .bind(Json(answers))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All submissions for a form, newest first.
    pub async fn list_for_form(&self, form_id: Uuid) -> Result<Vec<SubmissionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_submissions_for_form");
        let result = sqlx::query_as::<_, SubmissionEntity>(
            r#"
            SELECT id, form_id, answers, submitted_at
            FROM submissions
            WHERE form_id = $1
            ORDER BY submitted_at DESC, id
            "#,
        )
        .bind(form_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
