//! Submission domain model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use super::form::Question;

pub const MAX_ANSWER_LENGTH: usize = 10_000;

/// Question id to answer text.
pub type Answers = BTreeMap<String, String>;

/// One respondent's answers to one form. Never mutated after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub form_id: Uuid,
    pub answers: Answers,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Answer for `question_id`, or `""` when the respondent skipped it.
    pub fn answer_for(&self, question_id: &str) -> &str {
        self.answers
            .get(question_id)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Body of a public submission.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitFormRequest {
    pub answers: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerValidationError {
    #[error("Answer for '{0}' must be a string")]
    NotAString(String),

    #[error("Answer for '{0}' is too long")]
    TooLong(String),
}

/// Reduces raw JSON answers to the typed map stored for a form.
///
/// Keys that are not question ids of the form are dropped. `null` is treated
/// as unanswered. Any other non-string value for a known question is rejected.
pub fn sanitize_answers(
    raw: &Map<String, Value>,
    questions: &[Question],
) -> Result<Answers, AnswerValidationError> {
    let mut answers = Answers::new();
    for question in questions {
        match raw.get(&question.id) {
            None | Some(Value::Null) => {}
            Some(Value::String(text)) => {
                if text.chars().count() > MAX_ANSWER_LENGTH {
                    return Err(AnswerValidationError::TooLong(question.id.clone()));
                }
                answers.insert(question.id.clone(), text.clone());
            }
            Some(_) => return Err(AnswerValidationError::NotAString(question.id.clone())),
        }
    }
    Ok(answers)
}
