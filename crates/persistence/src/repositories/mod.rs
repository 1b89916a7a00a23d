//! Repository implementations for database operations.

pub mod form;
pub mod submission;
pub mod user;

pub use form::{FormRepository, FormStats};
pub use submission::SubmissionRepository;
pub use user::UserRepository;
