//! Hashing and random token helpers.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of random bytes behind a linking token (192 bits).
pub const LINKING_TOKEN_BYTES: usize = 24;

/// SHA-256 of `input` as lowercase hex.
fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a URL-safe random token suitable for a Telegram `start` parameter.
///
/// Telegram accepts `[A-Za-z0-9_-]{1,64}` there, which base64url without
/// padding satisfies. 24 bytes encode to exactly 32 characters.
pub fn generate_linking_token() -> String {
    let bytes: [u8; LINKING_TOKEN_BYTES] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compares two secrets without short-circuiting on the first differing byte.
///
/// Both sides are hashed first so the comparison length does not depend on
/// the caller-supplied value.
pub fn secrets_match(expected: &str, provided: &str) -> bool {
    let a = sha256_hex(expected);
    let b = sha256_hex(provided);
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
