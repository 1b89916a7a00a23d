//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod form;
pub mod submission;
pub mod user;

pub use form::FormEntity;
pub use submission::SubmissionEntity;
pub use user::UserEntity;
