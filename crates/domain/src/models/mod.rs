//! Domain models.

pub mod form;
pub mod submission;
pub mod user;

pub use form::{
    validate_questions, CreateFormRequest, Form, FormValidationError, ListFormsQuery, PublicForm,
    Question, QuestionKind, UpdateFormRequest,
};
pub use submission::{
    sanitize_answers, AnswerValidationError, Answers, SubmitFormRequest, Submission,
};
pub use user::{User, UserProfile};
