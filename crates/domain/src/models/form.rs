//! Form domain model and write-boundary validation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

pub const MAX_QUESTIONS: usize = 100;
pub const MAX_QUESTION_ID_LENGTH: usize = 64;
pub const MAX_QUESTION_TEXT_LENGTH: usize = 500;

/// Input widget for a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    /// Single-line answer.
    #[default]
    #[serde(rename = "text")]
    Short,
    /// Multi-line answer.
    #[serde(rename = "long_text")]
    Long,
}

/// One question of a form. Order within the form is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind,
        }
    }
}

/// A form owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<Question>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// What anonymous respondents see of a form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicForm {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

impl From<Form> for PublicForm {
    fn from(form: Form) -> Self {
        Self {
            id: form.id,
            title: form.title,
            description: form.description,
            questions: form.questions,
        }
    }
}

/// Rejections for a question list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormValidationError {
    #[error("A form needs at least one question")]
    NoQuestions,

    #[error("A form can have at most {MAX_QUESTIONS} questions")]
    TooManyQuestions,

    #[error("Question {0} has an empty id")]
    EmptyQuestionId(usize),

    #[error("Question id '{0}' is too long")]
    QuestionIdTooLong(String),

    #[error("Question id '{0}' is used more than once")]
    DuplicateQuestionId(String),

    #[error("Question '{0}' has no text")]
    EmptyQuestionText(String),

    #[error("Question '{0}' text is too long")]
    QuestionTextTooLong(String),
}

impl FormValidationError {
    fn code(&self) -> &'static str {
        match self {
            FormValidationError::NoQuestions => "no_questions",
            FormValidationError::TooManyQuestions => "too_many_questions",
            FormValidationError::EmptyQuestionId(_) => "empty_question_id",
            FormValidationError::QuestionIdTooLong(_) => "question_id_too_long",
            FormValidationError::DuplicateQuestionId(_) => "duplicate_question_id",
            FormValidationError::EmptyQuestionText(_) => "empty_question_text",
            FormValidationError::QuestionTextTooLong(_) => "question_text_too_long",
        }
    }
}

/// Checks that a question list is non-empty, bounded, and has unique non-empty ids.
pub fn validate_questions(questions: &[Question]) -> Result<(), FormValidationError> {
    if questions.is_empty() {
        return Err(FormValidationError::NoQuestions);
    }
    if questions.len() > MAX_QUESTIONS {
        return Err(FormValidationError::TooManyQuestions);
    }

    let mut seen = HashSet::with_capacity(questions.len());
    for (index, question) in questions.iter().enumerate() {
        if question.id.trim().is_empty() {
            return Err(FormValidationError::EmptyQuestionId(index + 1));
        }
        if question.id.len() > MAX_QUESTION_ID_LENGTH {
            return Err(FormValidationError::QuestionIdTooLong(question.id.clone()));
        }
        if !seen.insert(question.id.as_str()) {
            return Err(FormValidationError::DuplicateQuestionId(question.id.clone()));
        }
        if question.text.trim().is_empty() {
            return Err(FormValidationError::EmptyQuestionText(question.id.clone()));
        }
        if question.text.chars().count() > MAX_QUESTION_TEXT_LENGTH {
            return Err(FormValidationError::QuestionTextTooLong(question.id.clone()));
        }
    }
    Ok(())
}

fn validate_question_list(questions: &[Question]) -> Result<(), validator::ValidationError> {
    validate_questions(questions).map_err(|e| {
        validator::ValidationError::new(e.code()).with_message(std::borrow::Cow::Owned(e.to_string()))
    })
}

/// Request payload for creating a form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_question_list"))]
    pub questions: Vec<Question>,
}

/// Request payload for replacing a form's content.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_question_list"))]
    pub questions: Vec<Question>,

    /// Leaves visibility unchanged when omitted.
    pub is_public: Option<bool>,
}

/// Query parameters for listing a user's forms.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFormsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}
