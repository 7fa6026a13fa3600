//! Truncated digests of idea identifiers.
//!
//! Only digests are ever written to local storage, never raw ids.

use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Number of hex characters kept from the SHA-256 digest (64 bits).
pub const HASH_LEN: usize = 16;

/// Hash an idea id: SHA-256 of its UTF-8 bytes, lowercase hex, first 16 chars.
pub fn hash_idea_id(idea_id: &str) -> String {
    let digest = Sha256::digest(idea_id.as_bytes());

    let mut hex = String::with_capacity(HASH_LEN);
    for byte in digest.iter().take(HASH_LEN / 2) {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Whether a stored string has the shape of a value produced by [`hash_idea_id`].
pub fn is_idea_hash(s: &str) -> bool {
    s.len() == HASH_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
