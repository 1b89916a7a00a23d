//! Shared utilities for the formbot backend.
//!
//! Used by every other crate in the workspace:
//! - Hashing and random token generation
//! - Password hashing with Argon2id
//! - JWT access tokens
//! - Page-based pagination
//! - Input normalization helpers

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
