//! Submission entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Answers;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the submissions table. `answers` is a JSONB object.
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionEntity {
    pub id: Uuid,
    pub form_id: Uuid,
    pub answers: Json<Answers>,
    pub submitted_at: DateTime<Utc>,
}

impl From<SubmissionEntity> for domain::models::Submission {
    fn from(entity: SubmissionEntity) -> Self {
        Self {
            id: entity.id,
            form_id: entity.form_id,
            answers: entity.answers.0,
            submitted_at: entity.submitted_at,
        }
    }
}
