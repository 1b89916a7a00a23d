//! Domain layer for the formbot backend.
//!
//! This crate contains:
//! - Domain models (User, Form, Question, Submission)
//! - Bot command decoding and reply rendering
//! - The chat gateway trait and its in-memory mock
//! - CSV export

pub mod models;
pub mod services;
