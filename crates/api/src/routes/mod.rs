//! HTTP route handlers.

pub mod auth;
pub mod dashboard;
pub mod forms;
pub mod health;
pub mod public;
pub mod telegram;
pub mod users;
