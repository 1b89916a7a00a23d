//! Form entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Question;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the forms table. `questions` is JSONB.
#[derive(Debug, Clone, FromRow)]
pub struct FormEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub questions: Json<Vec<Question>>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl From<FormEntity> for domain::models::Form {
    fn from(entity: FormEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            title: entity.title,
            description: entity.description,
            questions: entity.questions.0,
            is_public: entity.is_public,
            created_at: entity.created_at,
        }
    }
}
